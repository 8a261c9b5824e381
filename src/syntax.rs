//! Small helpers over the TypeScript syntax tree.
//!
//! Everything here is read-only and forgiving: a node with an unexpected shape yields `None`
//! rather than an error, which lets callers fall back to their defaults.

use crate::parser::ParsedFile;
use tree_sitter::Node;

/// A decorator reduced to the parts extraction cares about.
#[derive(Debug, Clone)]
pub struct Decorator<'tree> {
    /// Callee name, last segment only (`@common.Get()` gives `Get`)
    pub name: String,
    /// Argument expressions, empty for bare decorators like `@Body`
    pub arguments: Vec<Node<'tree>>,
}

impl<'tree> Decorator<'tree> {
    /// First argument, if any.
    pub fn first_argument(&self) -> Option<Node<'tree>> {
        self.arguments.first().copied()
    }

    /// Second argument, if any.
    pub fn second_argument(&self) -> Option<Node<'tree>> {
        self.arguments.get(1).copied()
    }
}

/// Reads a `decorator` node.
pub fn read_decorator<'tree>(file: &ParsedFile, node: Node<'tree>) -> Option<Decorator<'tree>> {
    if node.kind() != "decorator" {
        return None;
    }

    let mut cursor = node.walk();
    let expr = node.named_children(&mut cursor).next()?;

    match expr.kind() {
        "call_expression" => {
            let callee = expr.child_by_field_name("function")?;
            let arguments = expr
                .child_by_field_name("arguments")
                .map(|args| {
                    let mut cursor = args.walk();
                    let arguments: Vec<Node<'tree>> = args
                        .named_children(&mut cursor)
                        .filter(|arg| arg.kind() != "comment")
                        .collect();
                    arguments
                })
                .unwrap_or_default();
            Some(Decorator {
                name: callee_name(file, callee)?,
                arguments,
            })
        }
        "identifier" | "member_expression" => Some(Decorator {
            name: callee_name(file, expr)?,
            arguments: Vec::new(),
        }),
        _ => None,
    }
}

/// Name of a callee expression: the identifier itself or the last property of a member chain.
pub fn callee_name(file: &ParsedFile, node: Node<'_>) -> Option<String> {
    match node.kind() {
        "identifier" | "property_identifier" => Some(file.text(node).to_string()),
        "member_expression" => node
            .child_by_field_name("property")
            .map(|prop| file.text(prop).to_string()),
        _ => None,
    }
}

/// Decorators attached to a class declaration, in source order.
///
/// `@Controller() export class X {}` hangs the decorator on the `export_statement`, so the
/// parent is checked as well.
pub fn class_decorators<'tree>(file: &ParsedFile, class_node: Node<'tree>) -> Vec<Decorator<'tree>> {
    let mut nodes = Vec::new();

    if let Some(parent) = class_node.parent() {
        if parent.kind() == "export_statement" {
            nodes.extend(direct_decorator_nodes(parent));
        }
    }
    nodes.extend(direct_decorator_nodes(class_node));

    nodes
        .into_iter()
        .filter_map(|node| read_decorator(file, node))
        .collect()
}

/// Decorators attached to a class member, in source order.
///
/// The TypeScript grammar places method decorators as siblings directly before the
/// `method_definition` inside the class body; some versions nest them as children instead.
/// Both placements are collected.
pub fn member_decorators<'tree>(file: &ParsedFile, member: Node<'tree>) -> Vec<Decorator<'tree>> {
    let mut preceding = Vec::new();
    let mut sibling = member.prev_named_sibling();
    while let Some(node) = sibling {
        match node.kind() {
            "decorator" => preceding.push(node),
            "comment" => {}
            _ => break,
        }
        sibling = node.prev_named_sibling();
    }
    preceding.reverse();
    preceding.extend(direct_decorator_nodes(member));

    preceding
        .into_iter()
        .filter_map(|node| read_decorator(file, node))
        .collect()
}

/// Decorators written directly on a node (parameters, fields, classes).
pub fn own_decorators<'tree>(file: &ParsedFile, node: Node<'tree>) -> Vec<Decorator<'tree>> {
    direct_decorator_nodes(node)
        .into_iter()
        .filter_map(|node| read_decorator(file, node))
        .collect()
}

fn direct_decorator_nodes(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let nodes: Vec<Node<'_>> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .collect();
    nodes
}

/// Value of a string literal node without its quotes.
///
/// Template strings count only when they have no `${}` substitutions.
pub fn string_value(file: &ParsedFile, node: Node<'_>) -> Option<String> {
    match node.kind() {
        "string" => Some(strip_delimiters(file.text(node))),
        "template_string" => {
            let mut cursor = node.walk();
            let has_substitution = node
                .named_children(&mut cursor)
                .any(|child| child.kind() == "template_substitution");
            if has_substitution {
                None
            } else {
                Some(strip_delimiters(file.text(node)))
            }
        }
        _ => None,
    }
}

fn strip_delimiters(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

/// Value node of `key` inside an object literal.
pub fn object_property<'tree>(
    file: &ParsedFile,
    object: Node<'tree>,
    key: &str,
) -> Option<Node<'tree>> {
    if object.kind() != "object" {
        return None;
    }

    let mut cursor = object.walk();
    let found = object
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "pair")
        .find(|pair| {
            pair.child_by_field_name("key")
                .map(|k| property_key(file, k) == key)
                .unwrap_or(false)
        });
    found.and_then(|pair| pair.child_by_field_name("value"))
}

/// Name of a property key, unquoting string keys.
pub fn property_key(file: &ParsedFile, key: Node<'_>) -> String {
    string_value(file, key).unwrap_or_else(|| file.text(key).to_string())
}

/// The type node wrapped by a `type_annotation` (`: T`).
pub fn annotation_type(annotation: Node<'_>) -> Option<Node<'_>> {
    if annotation.kind() != "type_annotation" {
        return Some(annotation);
    }
    let mut cursor = annotation.walk();
    let inner = annotation.named_children(&mut cursor).next();
    inner
}

/// Last segment of a possibly qualified type reference (`dto.CreateUserDto` gives `CreateUserDto`).
pub fn type_reference_name(file: &ParsedFile, node: Node<'_>) -> String {
    match node.kind() {
        "nested_type_identifier" => node
            .child_by_field_name("name")
            .map(|n| file.text(n).to_string())
            .unwrap_or_else(|| file.text(node).to_string()),
        _ => file.text(node).to_string(),
    }
}

/// Depth-first pre-order walk calling `visit` on every node.
///
/// Returning `false` from `visit` skips that node's children.
pub fn walk_tree<'tree, F>(node: Node<'tree>, visit: &mut F)
where
    F: FnMut(Node<'tree>) -> bool,
{
    if !visit(node) {
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_tree(child, visit);
    }
}

/// 1-based line where `node` starts.
pub fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}
