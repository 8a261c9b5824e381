use crate::heuristics::{
    fallback_for_type_name, reference_placeholder, value_for_property_name, EXAMPLE_TIMESTAMP,
    STRING_PLACEHOLDER, UNKNOWN_PLACEHOLDER,
};
use crate::parser::ParsedFile;
use crate::syntax;
use crate::type_resolver::{DeclarationKind, Resolution, TypeDeclaration, TypeLocator};
use log::{debug, warn};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use tree_sitter::Node;

/// Generic wrappers whose single argument stands in for the whole type.
const TRANSPARENT_GENERICS: &[&str] = &["Partial", "Required", "Readonly", "Promise", "NonNullable"];

/// Generic array spellings; the argument is the element type.
const ARRAY_GENERICS: &[&str] = &["Array", "ReadonlyArray"];

/// Class factories whose first argument supplies the fields of an `extends` clause.
const MAPPED_CLASS_FACTORIES: &[&str] = &["PartialType", "PickType", "OmitType", "IntersectionType"];

/// Example generator - turns declared TypeScript types into example JSON values.
///
/// Named references are looked up through a [`TypeLocator`] and expanded recursively. The
/// names currently being expanded travel down the recursion as an immutable chain; a
/// reference already on the chain is not expanded again and becomes a one-field placeholder
/// object, which keeps self-referential and mutually-referential types finite.
///
/// Type parameters of a declaration are bound to the arguments of the reference that reached
/// it, so `Page<Item>` expands `Page<T>` with `T` standing for `Item`. A parameter with no
/// argument and no default becomes a placeholder; parameters never reach the locator.
pub struct ExampleGenerator<'ws> {
    /// Type locator for finding declarations
    locator: TypeLocator<'ws>,
    /// Top-level results keyed by (type name, originating file)
    cache: HashMap<(String, PathBuf), Value>,
}

/// Names being expanded, outermost first, and the type parameters bound for the declaration
/// currently being expanded.
#[derive(Debug, Default)]
struct Scope {
    chain: Vec<String>,
    bindings: HashMap<String, Value>,
}

impl<'ws> ExampleGenerator<'ws> {
    /// Create a new ExampleGenerator with a TypeLocator
    pub fn new(locator: TypeLocator<'ws>) -> Self {
        debug!("Initializing ExampleGenerator");
        Self {
            locator,
            cache: HashMap::new(),
        }
    }

    /// Example for a type referenced by name from `from`.
    ///
    /// When the name resolves nowhere, the example is derived from the name's text alone.
    pub fn example_for_type_name(&mut self, name: &str, from: &Rc<ParsedFile>) -> Value {
        let key = (name.to_string(), from.path.clone());
        if let Some(cached) = self.cache.get(&key) {
            debug!("Example cache hit for {} from {}", name, from.path.display());
            return cached.clone();
        }

        let value = if let Some(builtin) = builtin_value(name) {
            builtin
        } else {
            match self.locator.locate(name, from) {
                Resolution::Found(decl) => {
                    let value = self.expand_with_arguments(&decl, &[], &Scope::default());
                    if value.is_null() {
                        fallback_for_type_name(name)
                    } else {
                        value
                    }
                }
                Resolution::NotFound => {
                    debug!("Using generic example for unresolved type {}", name);
                    fallback_for_type_name(name)
                }
            }
        };

        self.cache.insert(key, value.clone());
        value
    }

    /// Example for a type written inline, such as `{ name: string }` or `Tag[]`.
    pub fn example_for_type_node(&mut self, file: &Rc<ParsedFile>, node: Node<'_>) -> Value {
        let value = self.value_for_type(file, node, &Scope::default());
        if value.is_null() {
            fallback_for_type_name(file.text(node))
        } else {
            value
        }
    }

    fn value_for_type(&mut self, file: &Rc<ParsedFile>, node: Node<'_>, scope: &Scope) -> Value {
        match node.kind() {
            "type_annotation" | "parenthesized_type" | "readonly_type" | "optional_type"
            | "rest_type" => match first_named_child(node) {
                Some(inner) => self.value_for_type(file, inner, scope),
                None => json!(UNKNOWN_PLACEHOLDER),
            },
            "predefined_type" => predefined_value(file.text(node)),
            "literal_type" => literal_value(file, node),
            "template_literal_type" => json!(STRING_PLACEHOLDER),
            "type_identifier" => {
                let name = file.text(node);
                match scope.bindings.get(name) {
                    Some(bound) => bound.clone(),
                    None => self.value_for_reference(file, name, &[], scope),
                }
            }
            "nested_type_identifier" => {
                let name = syntax::type_reference_name(file, node);
                self.value_for_reference(file, &name, &[], scope)
            }
            "generic_type" => self.value_for_generic(file, node, scope),
            "array_type" => match first_named_child(node) {
                Some(element) => Value::Array(vec![self.value_for_type(file, element, scope)]),
                None => json!([]),
            },
            "tuple_type" => {
                let elements = named_children(node);
                Value::Array(
                    elements
                        .into_iter()
                        .map(|element| self.value_for_type(file, element, scope))
                        .collect(),
                )
            }
            // Only the first member contributes
            "union_type" => match first_named_child(node) {
                Some(first) => self.value_for_type(file, first, scope),
                None => json!(UNKNOWN_PLACEHOLDER),
            },
            "intersection_type" => self.value_for_intersection(file, node, scope),
            "object_type" | "interface_body" => Value::Object(self.members_to_object(file, node, scope)),
            other => {
                debug!("No example rule for type syntax '{}'", other);
                json!(UNKNOWN_PLACEHOLDER)
            }
        }
    }

    fn value_for_generic(&mut self, file: &Rc<ParsedFile>, node: Node<'_>, scope: &Scope) -> Value {
        let name = node
            .child_by_field_name("name")
            .map(|n| syntax::type_reference_name(file, n))
            .unwrap_or_default();
        let arguments = node
            .child_by_field_name("type_arguments")
            .map(named_children)
            .unwrap_or_default();

        match name.as_str() {
            n if ARRAY_GENERICS.contains(&n) => match arguments.first() {
                Some(element) => Value::Array(vec![self.value_for_type(file, *element, scope)]),
                None => json!([]),
            },
            n if TRANSPARENT_GENERICS.contains(&n) => match arguments.first() {
                Some(inner) => self.value_for_type(file, *inner, scope),
                None => json!(UNKNOWN_PLACEHOLDER),
            },
            "Record" => json!({}),
            "Pick" | "Omit" => {
                let Some(target) = arguments.first() else {
                    return json!(UNKNOWN_PLACEHOLDER);
                };
                let value = self.value_for_type(file, *target, scope);
                let keys = arguments
                    .get(1)
                    .map(|keys| string_literals(file, *keys))
                    .unwrap_or_default();
                filter_keys(value, &keys, name == "Pick")
            }
            _ => {
                let values = self.argument_values(file, &arguments, scope);
                self.value_for_reference(file, &name, &values, scope)
            }
        }
    }

    /// Members of `A & B` merged into one object; non-object members only count when no
    /// member is an object.
    fn value_for_intersection(&mut self, file: &Rc<ParsedFile>, node: Node<'_>, scope: &Scope) -> Value {
        let mut object = Map::new();
        let mut saw_object = false;
        let mut first_other = None;
        for member in named_children(node) {
            match self.value_for_type(file, member, scope) {
                Value::Object(fields) => {
                    saw_object = true;
                    object.extend(fields);
                }
                other => {
                    first_other.get_or_insert(other);
                }
            }
        }

        if saw_object {
            Value::Object(object)
        } else {
            first_other.unwrap_or_else(|| json!(UNKNOWN_PLACEHOLDER))
        }
    }

    fn argument_values(&mut self, file: &Rc<ParsedFile>, arguments: &[Node<'_>], scope: &Scope) -> Vec<Value> {
        arguments
            .iter()
            .map(|argument| self.value_for_type(file, *argument, scope))
            .collect()
    }

    /// Value for a named reference found in `file`, with `arguments` already synthesized in
    /// the referencing scope.
    fn value_for_reference(
        &mut self,
        file: &Rc<ParsedFile>,
        name: &str,
        arguments: &[Value],
        scope: &Scope,
    ) -> Value {
        if let Some(builtin) = builtin_value(name) {
            return builtin;
        }
        if scope.chain.iter().any(|n| n == name) {
            warn!("Reference cycle on {} (chain: {})", name, scope.chain.join(" -> "));
            return reference_placeholder(name);
        }

        let Some(decl) = self.locator.locate(name, file).found() else {
            debug!("Unresolved reference {} in {}", name, file.path.display());
            return reference_placeholder(name);
        };
        if decl.name != name && scope.chain.iter().any(|n| *n == decl.name) {
            warn!("Reference cycle on {} (chain: {})", decl.name, scope.chain.join(" -> "));
            return reference_placeholder(name);
        }

        self.expand_with_arguments(&decl, arguments, scope)
    }

    /// Pushes `decl` on the chain, binds its type parameters and expands it.
    fn expand_with_arguments(&mut self, decl: &TypeDeclaration, arguments: &[Value], outer: &Scope) -> Value {
        let mut chain = outer.chain.clone();
        chain.push(decl.name.clone());
        let mut scope = Scope {
            chain,
            bindings: HashMap::new(),
        };
        scope.bindings = self.bind_type_parameters(decl, arguments, &scope);
        self.expand_declaration(decl, &scope)
    }

    /// Binds each declared type parameter to its argument, then its default, then a placeholder.
    fn bind_type_parameters(
        &mut self,
        decl: &TypeDeclaration,
        arguments: &[Value],
        scope: &Scope,
    ) -> HashMap<String, Value> {
        let mut bindings = HashMap::new();
        let Some(parameters) = decl
            .node()
            .and_then(|node| node.child_by_field_name("type_parameters"))
        else {
            return bindings;
        };

        let file = Rc::clone(&decl.file);
        let declared = named_children(parameters)
            .into_iter()
            .filter(|p| p.kind() == "type_parameter");
        for (index, parameter) in declared.enumerate() {
            let Some(name_node) = parameter.child_by_field_name("name") else {
                continue;
            };
            let name = file.text(name_node).to_string();
            let value = match arguments.get(index) {
                Some(argument) => argument.clone(),
                None => match parameter
                    .child_by_field_name("value")
                    .and_then(first_named_child)
                {
                    Some(default) => {
                        let partial = Scope {
                            chain: scope.chain.clone(),
                            bindings: bindings.clone(),
                        };
                        self.value_for_type(&file, default, &partial)
                    }
                    None => reference_placeholder(&name),
                },
            };
            bindings.insert(name, value);
        }
        bindings
    }

    /// Expands a located declaration; the scope's chain already ends with its name.
    fn expand_declaration(&mut self, decl: &TypeDeclaration, scope: &Scope) -> Value {
        let file = Rc::clone(&decl.file);
        let Some(node) = decl.node() else {
            warn!("Lost declaration node for {} in {}", decl.name, file.path.display());
            return reference_placeholder(&decl.name);
        };
        debug!("Expanding {:?} {}", decl.kind, decl.name);

        match decl.kind {
            DeclarationKind::Interface => {
                let mut object = self.interface_parents(&file, node, scope);
                if let Some(body) = node.child_by_field_name("body") {
                    object.extend(self.members_to_object(&file, body, scope));
                }
                Value::Object(object)
            }
            DeclarationKind::Class => {
                let mut object = self.class_parents(&file, node, scope);
                if let Some(body) = node.child_by_field_name("body") {
                    object.extend(self.class_fields(&file, body, scope));
                }
                Value::Object(object)
            }
            DeclarationKind::TypeAlias => match node.child_by_field_name("value") {
                Some(value) => self.value_for_type(&file, value, scope),
                None => json!(UNKNOWN_PLACEHOLDER),
            },
            DeclarationKind::Enum => first_enum_member(&file, node),
        }
    }

    /// Property signatures of an interface body or inline object type.
    fn members_to_object(&mut self, file: &Rc<ParsedFile>, body: Node<'_>, scope: &Scope) -> Map<String, Value> {
        let mut object = Map::new();
        for member in named_children(body) {
            if member.kind() != "property_signature" {
                continue;
            }
            let Some(name_node) = member.child_by_field_name("name") else {
                continue;
            };
            let name = syntax::property_key(file, name_node);
            let value = self.property_value(file, &name, member.child_by_field_name("type"), scope);
            object.insert(name, value);
        }
        object
    }

    /// Field declarations of a class body; methods and static members are skipped.
    fn class_fields(&mut self, file: &Rc<ParsedFile>, body: Node<'_>, scope: &Scope) -> Map<String, Value> {
        let mut object = Map::new();
        for member in named_children(body) {
            if member.kind() != "public_field_definition" || is_static(member) {
                continue;
            }
            let Some(name_node) = member.child_by_field_name("name") else {
                continue;
            };
            let name = syntax::property_key(file, name_node);
            let value = self.property_value(file, &name, member.child_by_field_name("type"), scope);
            object.insert(name, value);
        }
        object
    }

    fn property_value(
        &mut self,
        file: &Rc<ParsedFile>,
        name: &str,
        annotation: Option<Node<'_>>,
        scope: &Scope,
    ) -> Value {
        match annotation.and_then(syntax::annotation_type) {
            Some(type_node) => self.value_for_type(file, type_node, scope),
            None => value_for_property_name(name),
        }
    }

    /// Fields inherited through `interface X extends A, B`.
    fn interface_parents(&mut self, file: &Rc<ParsedFile>, node: Node<'_>, scope: &Scope) -> Map<String, Value> {
        let mut object = Map::new();
        for clause in named_children(node) {
            if clause.kind() != "extends_type_clause" {
                continue;
            }
            for parent in named_children(clause) {
                merge_object(&mut object, self.value_for_type(file, parent, scope));
            }
        }
        object
    }

    /// Fields inherited through `class X extends Y` or `extends PartialType(Y)`.
    fn class_parents(&mut self, file: &Rc<ParsedFile>, node: Node<'_>, scope: &Scope) -> Map<String, Value> {
        let mut object = Map::new();
        let heritage = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "class_heritage");
        let Some(heritage) = heritage else {
            return object;
        };

        for clause in named_children(heritage) {
            if clause.kind() != "extends_clause" {
                continue;
            }
            let Some(expr) = clause
                .child_by_field_name("value")
                .or_else(|| first_named_child(clause))
            else {
                continue;
            };
            let inherited = match clause.child_by_field_name("type_arguments") {
                Some(type_arguments) if expr.kind() == "identifier" => {
                    let arguments = self.argument_values(file, &named_children(type_arguments), scope);
                    let name = file.text(expr).to_string();
                    self.value_for_reference(file, &name, &arguments, scope)
                }
                _ => self.value_for_heritage(file, expr, scope),
            };
            merge_object(&mut object, inherited);
        }
        object
    }

    fn value_for_heritage(&mut self, file: &Rc<ParsedFile>, expr: Node<'_>, scope: &Scope) -> Value {
        match expr.kind() {
            "identifier" | "member_expression" => match syntax::callee_name(file, expr) {
                Some(name) => self.value_for_reference(file, &name, &[], scope),
                None => Value::Null,
            },
            "call_expression" => {
                let factory = expr
                    .child_by_field_name("function")
                    .and_then(|f| syntax::callee_name(file, f))
                    .unwrap_or_default();
                if !MAPPED_CLASS_FACTORIES.contains(&factory.as_str()) {
                    debug!("Ignoring unknown class factory {}", factory);
                    return Value::Null;
                }
                let arguments = expr
                    .child_by_field_name("arguments")
                    .map(named_children)
                    .unwrap_or_default();

                match factory.as_str() {
                    "IntersectionType" => {
                        let mut object = Map::new();
                        for argument in arguments {
                            let value = self.value_for_heritage(file, argument, scope);
                            merge_object(&mut object, value);
                        }
                        Value::Object(object)
                    }
                    "PickType" | "OmitType" => {
                        let Some(base) = arguments.first() else {
                            return Value::Null;
                        };
                        let value = self.value_for_heritage(file, *base, scope);
                        let keys = arguments
                            .get(1)
                            .map(|keys| string_literals(file, *keys))
                            .unwrap_or_default();
                        filter_keys(value, &keys, factory == "PickType")
                    }
                    _ => match arguments.first() {
                        Some(base) => self.value_for_heritage(file, *base, scope),
                        None => Value::Null,
                    },
                }
            }
            _ => Value::Null,
        }
    }
}

/// Representative value for built-in object types.
fn builtin_value(name: &str) -> Option<Value> {
    match name {
        "Date" => Some(json!(EXAMPLE_TIMESTAMP)),
        "String" => Some(json!(STRING_PLACEHOLDER)),
        "Number" | "bigint" | "BigInt" => Some(json!(1)),
        "Boolean" => Some(json!(true)),
        "Object" => Some(json!({})),
        _ => None,
    }
}

fn predefined_value(keyword: &str) -> Value {
    match keyword {
        "string" => json!(STRING_PLACEHOLDER),
        "number" | "bigint" => json!(1),
        "boolean" => json!(true),
        "object" => json!({}),
        "any" | "unknown" | "void" | "null" | "undefined" | "never" => Value::Null,
        _ => json!(UNKNOWN_PLACEHOLDER),
    }
}

fn literal_value(file: &ParsedFile, node: Node<'_>) -> Value {
    let Some(literal) = first_named_child(node) else {
        return parse_literal_text(file.text(node));
    };
    match literal.kind() {
        "string" => syntax::string_value(file, literal)
            .map(Value::String)
            .unwrap_or_else(|| json!(STRING_PLACEHOLDER)),
        _ => parse_literal_text(file.text(literal)),
    }
}

fn parse_literal_text(text: &str) -> Value {
    match text {
        "true" => json!(true),
        "false" => json!(false),
        "null" | "undefined" => Value::Null,
        _ => number_value(text).unwrap_or_else(|| json!(UNKNOWN_PLACEHOLDER)),
    }
}

fn number_value(text: &str) -> Option<Value> {
    if let Ok(int) = text.parse::<i64>() {
        return Some(json!(int));
    }
    text.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// First member of an enum, as its literal initializer or its name.
fn first_enum_member(file: &ParsedFile, node: Node<'_>) -> Value {
    let Some(first) = node
        .child_by_field_name("body")
        .and_then(|body| named_children(body).into_iter().find(|m| m.kind() != "comment"))
    else {
        return json!(UNKNOWN_PLACEHOLDER);
    };

    if first.kind() == "enum_assignment" {
        if let Some(value) = first.child_by_field_name("value") {
            if let Some(text) = syntax::string_value(file, value) {
                return Value::String(text);
            }
            if let Some(number) = number_value(file.text(value)) {
                return number;
            }
        }
        if let Some(name) = first.child_by_field_name("name") {
            return Value::String(syntax::property_key(file, name));
        }
    }
    Value::String(syntax::property_key(file, first))
}

/// Every string literal under `node`, e.g. the keys of `['a', 'b'] as const` or `'a' | 'b'`.
fn string_literals(file: &ParsedFile, node: Node<'_>) -> Vec<String> {
    let mut keys = Vec::new();
    syntax::walk_tree(node, &mut |child| {
        if child.kind() == "string" {
            if let Some(key) = syntax::string_value(file, child) {
                keys.push(key);
            }
            return false;
        }
        true
    });
    keys
}

fn filter_keys(value: Value, keys: &[String], keep: bool) -> Value {
    match value {
        Value::Object(object) => Value::Object(
            object
                .into_iter()
                .filter(|(key, _)| keys.contains(key) == keep)
                .collect(),
        ),
        other => other,
    }
}

fn merge_object(target: &mut Map<String, Value>, value: Value) {
    if let Value::Object(fields) = value {
        target.extend(fields);
    }
}

fn is_static(member: Node<'_>) -> bool {
    let mut cursor = member.walk();
    let found = member.children(&mut cursor).any(|child| child.kind() == "static");
    found
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let first = node
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    first
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    children
}
