use crate::example_generator::ExampleGenerator;
use crate::extractor::path::{controller_prefix, ensure_leading_slash, join_paths, path_parameters};
use crate::extractor::{HttpMethod, RouteDescriptor, RouteExtractor, SourceLocation};
use crate::parser::ParsedFile;
use crate::serializer::example_text;
use crate::syntax::{self, Decorator};
use log::debug;
use std::rc::Rc;
use tree_sitter::Node;

/// Parameter decorator binding a path parameter.
const PARAM_DECORATOR: &str = "Param";
/// Parameter decorator binding a query parameter.
const QUERY_DECORATOR: &str = "Query";
/// Parameter decorator binding the request body.
const BODY_DECORATOR: &str = "Body";

/// Name used by `@Param()` without arguments.
const DEFAULT_PATH_PARAM: &str = "id";
/// Query entry recorded for `@Query()` without arguments.
pub const ANY_QUERY_KEY: &str = "*";

/// Extractor for NestJS-style decorated controllers.
///
/// Recognizes `@Controller` classes whose methods carry `@Get`, `@Post`, `@Put`, `@Patch`,
/// `@Delete`, `@Options`, `@Head` or `@All`, plus `@Param`, `@Query` and `@Body` on handler
/// parameters.
pub struct NestExtractor;

impl RouteExtractor for NestExtractor {
    fn extract_routes(
        &self,
        parsed_file: &Rc<ParsedFile>,
        examples: &mut ExampleGenerator<'_>,
    ) -> Vec<RouteDescriptor> {
        let mut visitor = ControllerVisitor {
            file: parsed_file,
            examples,
            routes: Vec::new(),
        };

        let mut classes = Vec::new();
        syntax::walk_tree(parsed_file.root(), &mut |node| {
            if matches!(node.kind(), "class_declaration" | "abstract_class_declaration" | "class") {
                classes.push(node);
            }
            true
        });

        for class in classes {
            visitor.visit_class(class);
        }

        debug!(
            "Extracted {} routes from {}",
            visitor.routes.len(),
            parsed_file.path.display()
        );
        visitor.routes
    }
}

/// Walks controller classes of one file and collects their routes
struct ControllerVisitor<'a, 'ws> {
    file: &'a Rc<ParsedFile>,
    examples: &'a mut ExampleGenerator<'ws>,
    routes: Vec<RouteDescriptor>,
}

/// What the parameter decorators of one handler declare
#[derive(Default)]
struct HandlerParams<'tree> {
    path_params: Vec<String>,
    query_params: Vec<String>,
    has_body: bool,
    body_param: Option<Node<'tree>>,
}

impl<'a, 'ws> ControllerVisitor<'a, 'ws> {
    fn visit_class(&mut self, class: Node<'_>) {
        let Some(body) = class.child_by_field_name("body") else {
            return;
        };
        let prefix = controller_prefix(self.file, class);

        let mut cursor = body.walk();
        let methods: Vec<Node<'_>> = body
            .named_children(&mut cursor)
            .filter(|member| member.kind() == "method_definition")
            .collect();

        for method in methods {
            if let Some(route) = self.visit_method(method, &prefix) {
                self.routes.push(route);
            }
        }
    }

    fn visit_method(&mut self, method: Node<'_>, prefix: &str) -> Option<RouteDescriptor> {
        let decorators = syntax::member_decorators(self.file, method);
        let (http_method, verb) = decorators
            .iter()
            .find_map(|d| HttpMethod::from_decorator(&d.name).map(|m| (m, d)))?;

        let name_node = method.child_by_field_name("name")?;
        let handler_name = self.file.text(name_node).to_string();
        let method_path = self.method_path(verb);
        let full_path = join_paths(prefix, &method_path);
        debug!("Found handler {} -> {} {}", handler_name, http_method, full_path);

        let mut route = RouteDescriptor::new(
            http_method,
            full_path,
            handler_name,
            SourceLocation {
                file: self.file.path.clone(),
                line: syntax::line_of(name_node),
            },
        );

        let params = self.parse_parameters(method);

        // Path segments first, then names only declared through @Param
        let mut path_params = path_parameters(&route.path);
        for name in params.path_params {
            if !path_params.contains(&name) {
                path_params.push(name);
            }
        }
        route.path_params = path_params;
        route.query_params = params.query_params;
        route.has_body = params.has_body;

        if let Some(body_param) = params.body_param {
            let (type_name, example) = self.body_example(body_param);
            route.body_type_name = type_name;
            route.body_example = example;
        }

        Some(route)
    }

    /// Path argument of the verb decorator, `/` when absent or not a string literal
    fn method_path(&self, verb: &Decorator<'_>) -> String {
        verb.first_argument()
            .and_then(|arg| syntax::string_value(self.file, arg))
            .map(|path| ensure_leading_slash(&path))
            .unwrap_or_else(|| "/".to_string())
    }

    fn parse_parameters<'tree>(&self, method: Node<'tree>) -> HandlerParams<'tree> {
        let mut params = HandlerParams::default();
        let Some(formal) = method.child_by_field_name("parameters") else {
            return params;
        };

        let mut cursor = formal.walk();
        let declared: Vec<Node<'tree>> = formal
            .named_children(&mut cursor)
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .collect();

        for param in declared {
            for decorator in syntax::own_decorators(self.file, param) {
                let first_string = decorator
                    .first_argument()
                    .and_then(|arg| syntax::string_value(self.file, arg));

                match decorator.name.as_str() {
                    PARAM_DECORATOR => {
                        let name = first_string.unwrap_or_else(|| DEFAULT_PATH_PARAM.to_string());
                        if !params.path_params.contains(&name) {
                            params.path_params.push(name);
                        }
                    }
                    QUERY_DECORATOR => {
                        let name = first_string.unwrap_or_else(|| ANY_QUERY_KEY.to_string());
                        if !params.query_params.contains(&name) {
                            params.query_params.push(name);
                        }
                    }
                    BODY_DECORATOR => {
                        params.has_body = true;
                        if params.body_param.is_none() {
                            params.body_param = Some(param);
                        }
                    }
                    _ => {}
                }
            }
        }

        params
    }

    /// Body type name and example text for the `@Body()` parameter
    fn body_example(&mut self, param: Node<'_>) -> (Option<String>, Option<String>) {
        let Some(type_node) = param
            .child_by_field_name("type")
            .and_then(syntax::annotation_type)
        else {
            debug!("Body parameter without type annotation in {}", self.file.path.display());
            return (None, None);
        };

        match type_node.kind() {
            "type_identifier" | "nested_type_identifier" => {
                let name = syntax::type_reference_name(self.file, type_node);
                let value = self.examples.example_for_type_name(&name, self.file);
                (Some(name), Some(example_text(&value)))
            }
            "object_type" => {
                let value = self.examples.example_for_type_node(self.file, type_node);
                (None, Some(example_text(&value)))
            }
            _ => {
                let written = self.file.text(type_node).to_string();
                let value = self.examples.example_for_type_node(self.file, type_node);
                (Some(written), Some(example_text(&value)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AstParser;
    use crate::type_resolver::TypeLocator;
    use crate::workspace::FsWorkspace;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn extract(code: &str) -> Vec<RouteDescriptor> {
        let temp_dir = TempDir::new().unwrap();
        let workspace = FsWorkspace::new(temp_dir.path().to_path_buf());
        let mut examples = ExampleGenerator::new(TypeLocator::new(&workspace));
        let parsed = AstParser::parse_source(
            &temp_dir.path().join("test.controller.ts"),
            code.to_string(),
        )
        .unwrap();
        NestExtractor.extract_routes(&Rc::new(parsed), &mut examples)
    }

    fn body_json(route: &RouteDescriptor) -> Value {
        serde_json::from_str(route.body_example.as_ref().unwrap()).unwrap()
    }

    #[test]
    fn test_simple_controller() {
        let routes = extract(
            r#"
            import { Controller, Get, Post } from '@nestjs/common';

            @Controller('cats')
            export class CatsController {
                @Get()
                findAll() {}

                @Get(':id')
                findOne() {}

                helper() {}
            }
            "#,
        );

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].method, HttpMethod::Get);
        assert_eq!(routes[0].path, "/cats");
        assert_eq!(routes[0].handler_name, "findAll");
        assert_eq!(routes[1].path, "/cats/:id");
        assert_eq!(routes[1].path_params, vec!["id"]);
        assert!(!routes[1].has_body);
        assert!(routes[1].body_example.is_none());
    }

    #[test]
    fn test_all_verbs_in_declaration_order() {
        let routes = extract(
            r#"
            @Controller()
            class ResourceController {
                @Post() a() {}
                @Put() b() {}
                @Patch() c() {}
                @Delete() d() {}
                @Options() e() {}
                @Head() f() {}
                @All() g() {}
                @Get() h() {}
            }
            "#,
        );

        let methods: Vec<&str> = routes.iter().map(|r| r.method.as_str()).collect();
        assert_eq!(
            methods,
            vec!["POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD", "ALL", "GET"]
        );
        assert!(routes.iter().all(|r| r.path == "/"));
    }

    #[test]
    fn test_method_path_gets_leading_slash() {
        let routes = extract(
            r#"
            @Controller('/api/')
            class A {
                @Get('status') status() {}
            }
            "#,
        );

        assert_eq!(routes[0].path, "/api/status");
    }

    #[test]
    fn test_param_and_query_decorators() {
        let routes = extract(
            r#"
            @Controller('users')
            class UsersController {
                @Get(':userId/posts')
                list(
                    @Param('userId') userId: string,
                    @Param() all: any,
                    @Query('page') page: number,
                    @Query('page') again: number,
                    @Query() rest: Record<string, string>,
                ) {}
            }
            "#,
        );

        let route = &routes[0];
        assert_eq!(route.path_params, vec!["userId", "id"]);
        assert_eq!(route.query_params, vec!["page", "*"]);
        assert!(!route.has_body);
    }

    #[test]
    fn test_path_param_from_segment_and_decorator_not_duplicated() {
        let routes = extract(
            r#"
            @Controller('items')
            class ItemsController {
                @Delete(':id')
                remove(@Param('id') id: string) {}
            }
            "#,
        );

        assert_eq!(routes[0].path_params, vec!["id"]);
    }

    #[test]
    fn test_malformed_decorator_arguments_fall_back() {
        let routes = extract(
            r#"
            @Controller(PREFIX)
            class A {
                @Get(ROUTE)
                one(@Param(ParseIntPipe) id: number, @Query(new ValidationPipe()) q: Filter) {}
            }
            "#,
        );

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/");
        assert_eq!(routes[0].path_params, vec!["id"]);
        assert_eq!(routes[0].query_params, vec!["*"]);
    }

    #[test]
    fn test_local_interface_body() {
        let routes = extract(
            r#"
            interface CreateCatDto {
                name: string;
                age: number;
                vaccinated?: boolean;
            }

            @Controller('cats')
            export class CatsController {
                @Post()
                create(@Body() dto: CreateCatDto) {}
            }
            "#,
        );

        let route = &routes[0];
        assert!(route.has_body);
        assert_eq!(route.body_type_name.as_deref(), Some("CreateCatDto"));
        assert_eq!(
            body_json(route),
            json!({ "name": "string", "age": 1, "vaccinated": true })
        );
    }

    #[test]
    fn test_inline_object_body_has_no_type_name() {
        let routes = extract(
            r#"
            @Controller('auth')
            class AuthController {
                @Post('login')
                login(@Body() body: { email: string; remember: boolean }) {}
            }
            "#,
        );

        let route = &routes[0];
        assert!(route.body_type_name.is_none());
        assert_eq!(body_json(route), json!({ "email": "string", "remember": true }));
    }

    #[test]
    fn test_array_body() {
        let routes = extract(
            r#"
            class Tag { label: string; }

            @Controller('tags')
            class TagsController {
                @Put()
                replace(@Body() tags: Tag[]) {}

                @Patch()
                patch(@Body() tags: Array<Tag>) {}
            }
            "#,
        );

        assert_eq!(routes[0].body_type_name.as_deref(), Some("Tag[]"));
        assert_eq!(body_json(&routes[0]), json!([{ "label": "string" }]));
        assert_eq!(routes[1].body_type_name.as_deref(), Some("Array<Tag>"));
        assert_eq!(body_json(&routes[1]), json!([{ "label": "string" }]));
    }

    #[test]
    fn test_unresolved_body_uses_name_fallback() {
        let routes = extract(
            r#"
            @Controller('widgets')
            class WidgetsController {
                @Post()
                create(@Body() dto: WidgetDto) {}
            }
            "#,
        );

        assert_eq!(
            body_json(&routes[0]),
            json!({ "field1": "value1", "field2": "value2", "field3": "value3" })
        );
    }

    #[test]
    fn test_untyped_body_has_no_example() {
        let routes = extract(
            r#"
            @Controller('raw')
            class RawController {
                @Post()
                create(@Body() body) {}
            }
            "#,
        );

        assert!(routes[0].has_body);
        assert!(routes[0].body_type_name.is_none());
        assert!(routes[0].body_example.is_none());
    }

    #[test]
    fn test_class_without_verb_decorators_yields_nothing() {
        let routes = extract(
            r#"
            @Injectable()
            export class CatsService {
                findAll() { return []; }
            }
            "#,
        );

        assert!(routes.is_empty());
    }

    #[test]
    fn test_source_location_line() {
        let routes = extract("@Controller()\nclass A {\n  @Get()\n  ping() {}\n}\n");

        assert_eq!(routes[0].source_location.line, 4);
        assert_eq!(
            routes[0].source_location.file.file_name(),
            PathBuf::from("test.controller.ts").file_name()
        );
    }

    #[test]
    fn test_broken_source_still_extracts_intact_routes() {
        let routes = extract(
            r#"
            @Controller('ok')
            class OkController {
                @Get('fine')
                fine() {}
            }

            export const broken = (;
            "#,
        );

        assert!(routes.iter().any(|r| r.path == "/ok/fine"));
    }
}
