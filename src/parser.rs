use crate::error::Error;
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser, Tree};

/// Syntax tree parser for TypeScript source files.
///
/// The `AstParser` uses `tree-sitter` with the TypeScript grammar to turn source text into a
/// concrete syntax tree, which can then be walked to find controllers, decorators, imports,
/// and type declarations.
///
/// tree-sitter is error tolerant: a file with syntax errors still produces a tree, with the
/// broken regions wrapped in `ERROR` nodes. Those trees are returned as-is so extraction can
/// salvage whatever parsed cleanly.
///
/// # Example
///
/// ```no_run
/// use request_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("src/users/users.controller.ts")).unwrap();
/// println!("Root node: {}", parsed.root().kind());
/// ```
pub struct AstParser;

/// A parsed TypeScript file with its syntax tree.
///
/// Owns the source text alongside the tree, since every node lookup needs the original bytes.
pub struct ParsedFile {
    /// Path to the source file
    pub path: PathBuf,
    /// The original source text
    pub source: String,
    /// The parsed syntax tree
    pub tree: Tree,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("path", &self.path)
            .field("bytes", &self.source.len())
            .finish()
    }
}

impl ParsedFile {
    /// Root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text covered by `node`.
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

impl AstParser {
    /// Parses source text that is already in memory.
    ///
    /// The grammar is chosen from the path extension: `.tsx` uses the TSX dialect, everything
    /// else the plain TypeScript one.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or tree-sitter gives up on the input.
    pub fn parse_source(path: &Path, source: String) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        parser
            .set_language(&Self::language_for(path))
            .map_err(Error::from)
            .with_context(|| format!("Failed to load TypeScript grammar for {}", path.display()))?;

        let tree = parser.parse(&source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            message: "parser returned no tree".to_string(),
        })?;

        if tree.root_node().has_error() {
            debug!(
                "Parsed {} with {} error node(s)",
                path.display(),
                count_error_nodes(tree.root_node())
            );
        }

        Ok(ParsedFile {
            path: path.to_path_buf(),
            source,
            tree,
        })
    }

    /// Reads and parses a single TypeScript source file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - tree-sitter cannot produce a tree for it
    pub fn parse_file(path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let parsed = Self::parse_source(path, content)
            .with_context(|| format!("Failed to parse TypeScript syntax in file: {}", path.display()))?;

        debug!("Successfully parsed file: {}", path.display());
        Ok(parsed)
    }

    /// Parses multiple files, continuing even if some fail.
    ///
    /// Returns one `Result` per input path, in input order. Failures are logged as warnings.
    pub fn parse_files(paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| match Self::parse_file(path) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {:#}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }

    fn language_for(path: &Path) -> Language {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") => tree_sitter_typescript::LANGUAGE_TSX.into(),
            _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

fn count_error_nodes(node: Node<'_>) -> usize {
    let own = usize::from(node.is_error() || node.is_missing());
    let mut cursor = node.walk();
    let nested: usize = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .map(count_error_nodes)
        .sum();
    own + nested
}
