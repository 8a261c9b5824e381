use crate::extractor::path::{ensure_leading_slash, join_paths};
use crate::parser::{AstParser, ParsedFile};
use crate::syntax;
use crate::workspace::Workspace;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tree_sitter::Node;

/// File name of the application entry point.
pub const BOOTSTRAP_FILE_NAME: &str = "main.ts";

/// Method that registers the application-wide path prefix.
pub const GLOBAL_PREFIX_METHOD: &str = "setGlobalPrefix";

/// Global prefix detector for finding the application-wide route prefix.
///
/// The `GlobalPrefixDetector` locates the bootstrap file (`main.ts`, preferring
/// `src/main.ts`) and looks for a call such as
/// `app.setGlobalPrefix('api', { exclude: ['health'] })`.
///
/// # Example
///
/// ```no_run
/// use request_from_source::detector::GlobalPrefixDetector;
/// use request_from_source::workspace::FsWorkspace;
/// use std::path::PathBuf;
///
/// let workspace = FsWorkspace::new(PathBuf::from("./my-nest-app"));
/// if let Some(prefix) = GlobalPrefixDetector::detect(&workspace) {
///     println!("Global prefix: {}", prefix.prefix);
/// }
/// ```
pub struct GlobalPrefixDetector;

/// A detected global prefix and the paths it does not apply to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalPrefix {
    /// Prefix with a leading slash, or empty when registered as `''`
    pub prefix: String,
    /// Excluded paths as written in the source
    pub exclude: Vec<String>,
}

impl GlobalPrefix {
    pub fn new(prefix: &str) -> Self {
        let prefix = if prefix.is_empty() {
            String::new()
        } else {
            ensure_leading_slash(prefix)
        };
        Self {
            prefix,
            exclude: Vec::new(),
        }
    }

    /// Whether `path` matches an exclusion entry exactly, ignoring one leading slash on either side.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.exclude
            .iter()
            .any(|entry| entry.strip_prefix('/').unwrap_or(entry) == path)
    }

    /// `path` with the prefix applied, unless the path is excluded.
    pub fn apply(&self, path: &str) -> String {
        if self.prefix.is_empty() || self.is_excluded(path) {
            path.to_string()
        } else {
            join_paths(&self.prefix, path)
        }
    }
}

impl GlobalPrefixDetector {
    /// Finds the bootstrap file of the workspace.
    ///
    /// `src/main.ts` wins, then `main.ts` at the root, then the first `main.ts` found by
    /// walking the project.
    pub fn find_bootstrap_file(workspace: &dyn Workspace) -> Option<PathBuf> {
        let root = workspace.root();
        for candidate in [root.join("src").join(BOOTSTRAP_FILE_NAME), root.join(BOOTSTRAP_FILE_NAME)] {
            if workspace.is_file(&candidate) {
                return Some(candidate);
            }
        }

        workspace
            .source_files(usize::MAX)
            .into_iter()
            .find(|path| path.file_name().and_then(|n| n.to_str()) == Some(BOOTSTRAP_FILE_NAME))
    }

    /// Detects the global prefix of the workspace; `None` when there is none.
    pub fn detect(workspace: &dyn Workspace) -> Option<GlobalPrefix> {
        let Some(bootstrap) = Self::find_bootstrap_file(workspace) else {
            debug!("No bootstrap file found under {}", workspace.root().display());
            return None;
        };
        debug!("Bootstrap file: {}", bootstrap.display());

        let source = match workspace.read_to_string(&bootstrap) {
            Ok(source) => source,
            Err(e) => {
                warn!("Cannot read bootstrap file: {}", e);
                return None;
            }
        };
        let parsed = match AstParser::parse_source(&bootstrap, source) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Cannot parse bootstrap file {}: {:#}", bootstrap.display(), e);
                return None;
            }
        };

        let detected = Self::detect_in_file(&parsed);
        if let Some(prefix) = &detected {
            info!(
                "Detected global prefix '{}' ({} exclusion(s))",
                prefix.prefix,
                prefix.exclude.len()
            );
        }
        detected
    }

    /// Reads the first `<expr>.setGlobalPrefix(...)` call in `file`.
    pub fn detect_in_file(file: &ParsedFile) -> Option<GlobalPrefix> {
        let mut call = None;
        syntax::walk_tree(file.root(), &mut |node| {
            if call.is_some() {
                return false;
            }
            if is_global_prefix_call(file, node) {
                call = Some(node);
                return false;
            }
            true
        });

        let call = call?;
        let arguments = call.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let args: Vec<Node<'_>> = arguments
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "comment")
            .collect();

        let Some(prefix) = args.first().and_then(|arg| syntax::string_value(file, *arg)) else {
            debug!("{} called without a string literal prefix", GLOBAL_PREFIX_METHOD);
            return None;
        };

        let mut global = GlobalPrefix::new(&prefix);
        if let Some(options) = args.get(1) {
            global.exclude = exclusions(file, *options);
        }
        Some(global)
    }
}

fn is_global_prefix_call(file: &ParsedFile, node: Node<'_>) -> bool {
    if node.kind() != "call_expression" {
        return false;
    }
    node.child_by_field_name("function")
        .filter(|callee| callee.kind() == "member_expression")
        .and_then(|callee| syntax::callee_name(file, callee))
        .map(|name| name == GLOBAL_PREFIX_METHOD)
        .unwrap_or(false)
}

/// Entries of `{ exclude: [...] }`; each is a string or an object with a `path` string.
fn exclusions(file: &ParsedFile, options: Node<'_>) -> Vec<String> {
    let Some(list) = syntax::object_property(file, options, "exclude") else {
        return Vec::new();
    };
    if list.kind() != "array" {
        return Vec::new();
    }

    let mut cursor = list.walk();
    let entries: Vec<Node<'_>> = list.named_children(&mut cursor).collect();
    entries
        .into_iter()
        .filter_map(|entry| match entry.kind() {
            "object" => syntax::object_property(file, entry, "path")
                .and_then(|path| syntax::string_value(file, path)),
            _ => syntax::string_value(file, entry),
        })
        .collect()
}
