// Body types that live in other files of the project
use pretty_assertions::assert_eq;
use request_from_source::example_generator::ExampleGenerator;
use request_from_source::extractor::nest::NestExtractor;
use request_from_source::extractor::{RouteDescriptor, RouteExtractor};
use request_from_source::parser::AstParser;
use request_from_source::type_resolver::{LocatorOptions, TypeLocator};
use request_from_source::workspace::FsWorkspace;
use serde_json::{json, Value};
use std::rc::Rc;
use tempfile::TempDir;

fn write_files(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        std::fs::create_dir_all(file_path.parent().unwrap()).unwrap();
        std::fs::write(&file_path, content).unwrap();
    }
    temp_dir
}

/// Extracts the routes of `controller` (relative to the project root)
fn routes_of(project: &TempDir, controller: &str, options: LocatorOptions) -> Vec<RouteDescriptor> {
    let workspace = FsWorkspace::new(project.path().to_path_buf());
    let mut examples = ExampleGenerator::new(TypeLocator::with_options(&workspace, options));
    let parsed = Rc::new(AstParser::parse_file(&project.path().join(controller)).unwrap());
    NestExtractor.extract_routes(&parsed, &mut examples)
}

fn body_of(route: &RouteDescriptor) -> Value {
    serde_json::from_str(route.body_example.as_deref().expect("route has no body example")).unwrap()
}

#[test]
fn test_barrel_import_and_mapped_type() {
    let project = write_files(&[
        (
            "src/cats/cats.controller.ts",
            r#"
            import { Body, Controller, Patch, Post } from '@nestjs/common';
            import { CreateCatDto, UpdateCatDto } from './dto';

            @Controller('cats')
            export class CatsController {
              @Post()
              create(@Body() dto: CreateCatDto) {}

              @Patch(':id')
              update(@Body() dto: UpdateCatDto) {}
            }
            "#,
        ),
        (
            "src/cats/dto/index.ts",
            "export * from './create-cat.dto';\nexport { UpdateCatDto } from './update-cat.dto';",
        ),
        (
            "src/cats/dto/create-cat.dto.ts",
            r#"
            export class CreateCatDto {
              name: string;
              age: number;
              breed?: string;
            }
            "#,
        ),
        (
            "src/cats/dto/update-cat.dto.ts",
            r#"
            import { PartialType } from '@nestjs/mapped-types';
            import { CreateCatDto } from './create-cat.dto';

            export class UpdateCatDto extends PartialType(CreateCatDto) {}
            "#,
        ),
    ]);

    let routes = routes_of(&project, "src/cats/cats.controller.ts", LocatorOptions::default());
    assert_eq!(routes.len(), 2);

    assert_eq!(routes[0].path, "/cats");
    assert_eq!(
        body_of(&routes[0]),
        json!({"name": "string", "age": 1, "breed": "string"})
    );

    assert_eq!(routes[1].path, "/cats/:id");
    assert_eq!(routes[1].path_params, vec!["id"]);
    assert_eq!(
        body_of(&routes[1]),
        json!({"name": "string", "age": 1, "breed": "string"})
    );
}

#[test]
fn test_workspace_anchored_import() {
    let project = write_files(&[
        (
            "src/users/users.controller.ts",
            r#"
            import { CreateUserDto } from 'src/users/dto/create-user.dto';

            @Controller('users')
            export class UsersController {
              @Post()
              create(@Body() dto: CreateUserDto) {}
            }
            "#,
        ),
        (
            "src/users/dto/create-user.dto.ts",
            "export interface CreateUserDto { email: string; password: string; isActive: boolean }",
        ),
    ]);

    let routes = routes_of(&project, "src/users/users.controller.ts", LocatorOptions::default());
    assert_eq!(
        body_of(&routes[0]),
        json!({"email": "string", "password": "string", "isActive": true})
    );
}

#[test]
fn test_workspace_search_without_import() {
    let project = write_files(&[
        (
            "src/a/tickets.controller.ts",
            r#"
            @Controller('tickets')
            export class TicketsController {
              @Put(':id')
              replace(@Body() ticket: TicketPayload) {}
            }
            "#,
        ),
        (
            "src/z/models/ticket.ts",
            r#"
            export interface TicketPayload {
              title: string;
              assignee: Person;
            }
            export interface Person {
              name: string;
              manager: Person;
            }
            "#,
        ),
    ]);

    let routes = routes_of(&project, "src/a/tickets.controller.ts", LocatorOptions::default());
    assert_eq!(
        body_of(&routes[0]),
        json!({
            "title": "string",
            "assignee": {"name": "string", "manager": {"person": "object"}}
        })
    );
}

#[test]
fn test_workspace_cap_leads_to_name_fallback() {
    let project = write_files(&[
        (
            "src/a/products.controller.ts",
            r#"
            @Controller('products')
            export class ProductsController {
              @Post()
              create(@Body() dto: ProductInput) {}
            }
            "#,
        ),
        ("src/z/product.ts", "export interface ProductInput { sku: string }"),
    ]);

    let routes = routes_of(
        &project,
        "src/a/products.controller.ts",
        LocatorOptions {
            max_workspace_files: 1,
        },
    );
    assert_eq!(
        body_of(&routes[0]),
        json!({"name": "Product Name", "price": 99.99, "description": "Product description"})
    );
}

#[test]
fn test_local_declaration_shadows_import() {
    let project = write_files(&[
        (
            "src/notes.controller.ts",
            r#"
            import { NoteDto } from './note.dto';

            interface NoteDto { text: string }

            @Controller('notes')
            export class NotesController {
              @Post()
              create(@Body() note: NoteDto) {}
            }
            "#,
        ),
        ("src/note.dto.ts", "export interface NoteDto { imported: boolean }"),
    ]);

    let routes = routes_of(&project, "src/notes.controller.ts", LocatorOptions::default());
    assert_eq!(body_of(&routes[0]), json!({"text": "string"}));
}

#[test]
fn test_mutually_referencing_files_terminate() {
    let project = write_files(&[
        (
            "src/graph.controller.ts",
            r#"
            import { A } from './a';

            @Controller('graph')
            export class GraphController {
              @Post()
              create(@Body() a: A) {}
            }
            "#,
        ),
        ("src/a.ts", "import { B } from './b';\nexport interface A { b: B }"),
        ("src/b.ts", "import { A } from './a';\nexport interface B { a: A }"),
    ]);

    let routes = routes_of(&project, "src/graph.controller.ts", LocatorOptions::default());
    assert_eq!(body_of(&routes[0]), json!({"b": {"a": {"a": "object"}}}));
}

#[test]
fn test_generic_body_binds_type_argument() {
    let project = write_files(&[
        (
            "src/pages.controller.ts",
            r#"
            interface Item { sku: string }
            interface Page<T> { items: T[]; total: number }

            @Controller('pages')
            export class PagesController {
              @Post()
              create(@Body() b: Page<Item>) {}
            }
            "#,
        ),
        ("src/zz/other.ts", "export type T = { unrelated: boolean };"),
    ]);

    let routes = routes_of(&project, "src/pages.controller.ts", LocatorOptions::default());
    assert_eq!(routes[0].body_type_name.as_deref(), Some("Page<Item>"));
    assert_eq!(
        body_of(&routes[0]),
        json!({"items": [{"sku": "string"}], "total": 1})
    );
}
