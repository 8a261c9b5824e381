//! Path composition and `:param` harvesting.

use crate::parser::ParsedFile;
use crate::syntax::{self, Decorator};
use regex::Regex;
use std::sync::OnceLock;
use tree_sitter::Node;

/// Name of the class-level decorator that carries the controller prefix.
pub const CONTROLLER_DECORATOR: &str = "Controller";

/// Joins two path fragments with exactly one slash between them.
///
/// An empty fragment (or one made only of slashes) yields the other one with a leading slash.
/// Otherwise the trailing slash of `prefix` is dropped and `suffix` gets a leading slash.
pub fn join_paths(prefix: &str, suffix: &str) -> String {
    let prefix_empty = prefix.trim_matches('/').is_empty();
    let suffix_empty = suffix.trim_matches('/').is_empty();

    match (prefix_empty, suffix_empty) {
        (true, true) => "/".to_string(),
        (true, false) => ensure_leading_slash(suffix),
        (false, true) => ensure_leading_slash(prefix),
        (false, false) => format!(
            "{}{}",
            ensure_leading_slash(prefix.trim_end_matches('/')),
            ensure_leading_slash(suffix)
        ),
    }
}

/// Prepends `/` unless already present.
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Names of `:param` segments in `path`, left to right, without duplicates.
///
/// Only the identifier part counts, so `:id?` and `:id(\\d+)` both give `id`.
pub fn path_parameters(path: &str) -> Vec<String> {
    static PARAM: OnceLock<Regex> = OnceLock::new();
    let re = PARAM.get_or_init(|| {
        Regex::new(r":([A-Za-z_$][A-Za-z0-9_$]*)").expect("path parameter regex is valid")
    });

    let mut names: Vec<String> = Vec::new();
    for capture in re.captures_iter(path) {
        let name = &capture[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Prefix declared by `@Controller(...)` on `class_node`, or an empty string.
///
/// Accepts `@Controller('users')` and `@Controller({ path: 'users' })`; any other argument
/// shape counts as no prefix.
pub fn controller_prefix(file: &ParsedFile, class_node: Node<'_>) -> String {
    syntax::class_decorators(file, class_node)
        .iter()
        .find(|d| d.name == CONTROLLER_DECORATOR)
        .and_then(|d| prefix_from_decorator(file, d))
        .unwrap_or_default()
}

fn prefix_from_decorator(file: &ParsedFile, decorator: &Decorator<'_>) -> Option<String> {
    let arg = decorator.first_argument()?;
    match arg.kind() {
        "object" => {
            let value = syntax::object_property(file, arg, "path")?;
            syntax::string_value(file, value)
        }
        _ => syntax::string_value(file, arg),
    }
}
