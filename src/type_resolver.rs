use crate::parser::{AstParser, ParsedFile};
use crate::syntax;
use crate::workspace::Workspace;
use log::{debug, warn};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::rc::Rc;
use tree_sitter::Node;

/// Extensions tried, in order, when an import specifier names a file without one.
const IMPORT_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".d.ts", ".js"];

/// Index files tried when an import specifier names a directory.
const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.d.ts", "index.js"];

/// Default cap on files read by the workspace-wide search.
pub const DEFAULT_MAX_WORKSPACE_FILES: usize = 100;

/// Tuning knobs for [`TypeLocator`].
#[derive(Debug, Clone)]
pub struct LocatorOptions {
    /// Maximum number of project files considered by the workspace search
    pub max_workspace_files: usize,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            max_workspace_files: DEFAULT_MAX_WORKSPACE_FILES,
        }
    }
}

/// Kind of a located type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    Class,
    TypeAlias,
    Enum,
}

impl DeclarationKind {
    fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "interface_declaration" => Some(DeclarationKind::Interface),
            "class_declaration" | "abstract_class_declaration" => Some(DeclarationKind::Class),
            "type_alias_declaration" => Some(DeclarationKind::TypeAlias),
            "enum_declaration" => Some(DeclarationKind::Enum),
            _ => None,
        }
    }
}

/// A located interface, class, type alias or enum plus the file it lives in.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    /// Declared name
    pub name: String,
    /// What kind of declaration was found
    pub kind: DeclarationKind,
    /// The file holding the declaration
    pub file: Rc<ParsedFile>,
    start_byte: usize,
    end_byte: usize,
    node_kind: &'static str,
}

impl TypeDeclaration {
    fn new(name: String, kind: DeclarationKind, file: Rc<ParsedFile>, node: Node<'_>) -> Self {
        Self {
            name,
            kind,
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            node_kind: node.kind(),
            file,
        }
    }

    /// The declaration node inside [`TypeDeclaration::file`].
    pub fn node(&self) -> Option<Node<'_>> {
        let mut node = self
            .file
            .root()
            .descendant_for_byte_range(self.start_byte, self.end_byte)?;
        while node.kind() != self.node_kind {
            node = node.parent()?;
        }
        Some(node)
    }
}

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub enum Resolution {
    Found(TypeDeclaration),
    NotFound,
}

impl Resolution {
    pub fn found(self) -> Option<TypeDeclaration> {
        match self {
            Resolution::Found(decl) => Some(decl),
            Resolution::NotFound => None,
        }
    }
}

impl From<Option<TypeDeclaration>> for Resolution {
    fn from(decl: Option<TypeDeclaration>) -> Self {
        decl.map(Resolution::Found).unwrap_or(Resolution::NotFound)
    }
}

/// Type locator - finds the declaration behind a type name.
///
/// Lookup runs three stages and stops at the first hit:
///
/// 1. the file the name was referenced from,
/// 2. files reached through that file's relative (or workspace-anchored) imports,
/// 3. a capped scan of the workspace, pre-filtered by a cheap text match.
///
/// Files read during stages 2 and 3 are parsed once and kept for the rest of the run.
pub struct TypeLocator<'ws> {
    workspace: &'ws dyn Workspace,
    options: LocatorOptions,
    /// Parsed files keyed by path, shared by all lookups of this run
    parsed_cache: HashMap<PathBuf, Rc<ParsedFile>>,
    /// Files that could not be read or parsed
    unreadable: HashSet<PathBuf>,
}

impl<'ws> TypeLocator<'ws> {
    /// Create a new TypeLocator over `workspace` with default options
    pub fn new(workspace: &'ws dyn Workspace) -> Self {
        Self::with_options(workspace, LocatorOptions::default())
    }

    pub fn with_options(workspace: &'ws dyn Workspace, options: LocatorOptions) -> Self {
        debug!(
            "Initializing TypeLocator for {} (max {} workspace files)",
            workspace.root().display(),
            options.max_workspace_files
        );
        Self {
            workspace,
            options,
            parsed_cache: HashMap::new(),
            unreadable: HashSet::new(),
        }
    }

    /// Locate the declaration of `name` as seen from `from`.
    pub fn locate(&mut self, name: &str, from: &Rc<ParsedFile>) -> Resolution {
        debug!("Locating type {} from {}", name, from.path.display());

        if let Some(decl) = Self::find_local(from, name) {
            debug!("Found {} locally in {}", name, from.path.display());
            return Resolution::Found(decl);
        }

        if let Some(decl) = self.find_via_imports(name, from) {
            debug!("Found {} via import in {}", name, decl.file.path.display());
            return Resolution::Found(decl);
        }

        if let Some(decl) = self.find_in_workspace(name, &from.path) {
            debug!("Found {} by workspace search in {}", name, decl.file.path.display());
            return Resolution::Found(decl);
        }

        debug!("Type {} not found", name);
        Resolution::NotFound
    }

    /// Stage 1: a declaration named `name` anywhere in `file`.
    ///
    /// Interfaces, classes and enums match wherever they appear; type aliases only when
    /// exported.
    pub fn find_local(file: &Rc<ParsedFile>, name: &str) -> Option<TypeDeclaration> {
        let mut found: Option<(DeclarationKind, Node<'_>)> = None;

        syntax::walk_tree(file.root(), &mut |node| {
            if found.is_some() {
                return false;
            }
            let Some(kind) = DeclarationKind::from_node_kind(node.kind()) else {
                return true;
            };
            if kind == DeclarationKind::TypeAlias && !is_exported(node) {
                return true;
            }
            let matches = node
                .child_by_field_name("name")
                .map(|n| file.text(n) == name)
                .unwrap_or(false);
            if matches {
                found = Some((kind, node));
                return false;
            }
            true
        });

        found.map(|(kind, node)| TypeDeclaration::new(name.to_string(), kind, Rc::clone(file), node))
    }

    /// Stage 2: follow the imports of `from` that bind `name`.
    fn find_via_imports(&mut self, name: &str, from: &Rc<ParsedFile>) -> Option<TypeDeclaration> {
        for import in collect_imports(from) {
            let Some(original) = import.binding_for(name) else {
                continue;
            };

            let Some(target) = self.resolve_import(&import.specifier, &from.path) else {
                debug!("Skipping unresolvable import '{}'", import.specifier);
                continue;
            };

            let Some(parsed) = self.load(&target) else {
                continue;
            };

            let mut visited = HashSet::new();
            if let Some(decl) = self.find_through_reexports(&original, &parsed, &mut visited) {
                return Some(decl);
            }
        }

        None
    }

    /// Looks in `file`, then through its `export ... from` statements (barrel files).
    fn find_through_reexports(
        &mut self,
        name: &str,
        file: &Rc<ParsedFile>,
        visited: &mut HashSet<PathBuf>,
    ) -> Option<TypeDeclaration> {
        if !visited.insert(file.path.clone()) {
            return None;
        }

        if let Some(decl) = Self::find_local(file, name) {
            return Some(decl);
        }

        for reexport in collect_reexports(file) {
            if !reexport.may_export(name) {
                continue;
            }
            let Some(target) = self.resolve_import(&reexport.specifier, &file.path) else {
                continue;
            };
            let Some(parsed) = self.load(&target) else {
                continue;
            };
            let original = reexport.original_name(name);
            if let Some(decl) = self.find_through_reexports(&original, &parsed, visited) {
                return Some(decl);
            }
        }

        None
    }

    /// Stage 3: capped scan of the workspace.
    fn find_in_workspace(&mut self, name: &str, origin: &Path) -> Option<TypeDeclaration> {
        let pattern = declaration_pattern(name)?;
        let candidates = self.workspace.source_files(self.options.max_workspace_files);
        debug!("Workspace search for {} over {} files", name, candidates.len());

        for candidate in candidates {
            if candidate == origin {
                continue;
            }

            if let Some(parsed) = self.parsed_cache.get(&candidate).cloned() {
                if let Some(decl) = Self::find_local(&parsed, name) {
                    return Some(decl);
                }
                continue;
            }

            let text = match self.workspace.read_to_string(&candidate) {
                Ok(text) => text,
                Err(e) => {
                    debug!("Skipping unreadable candidate: {}", e);
                    continue;
                }
            };
            if !pattern.is_match(&text) {
                continue;
            }

            let Some(parsed) = self.parse_and_cache(&candidate, text) else {
                continue;
            };
            if let Some(decl) = Self::find_local(&parsed, name) {
                return Some(decl);
            }
        }

        None
    }

    /// Maps an import specifier to a concrete file.
    ///
    /// Relative specifiers (`./`, `../`) resolve against the importing file's directory;
    /// specifiers starting with `src/` or `/` resolve against the workspace root. Package
    /// imports yield `None`.
    pub fn resolve_import(&self, specifier: &str, importer: &Path) -> Option<PathBuf> {
        let base = if specifier.starts_with("./") || specifier.starts_with("../") {
            importer.parent()?.join(specifier)
        } else if specifier.starts_with("src/") {
            self.workspace.root().join(specifier)
        } else if let Some(anchored) = specifier.strip_prefix('/') {
            self.workspace.root().join(anchored)
        } else {
            return None;
        };
        let base = normalize(&base);

        for ext in IMPORT_EXTENSIONS {
            let candidate = append_extension(&base, ext);
            if self.workspace.is_file(&candidate) {
                return Some(candidate);
            }
        }

        // ESM style `./user.dto.js` pointing at a TypeScript source
        if base.extension().and_then(|e| e.to_str()) == Some("js") {
            let ts = base.with_extension("ts");
            if self.workspace.is_file(&ts) {
                return Some(ts);
            }
        }
        if self.workspace.is_file(&base) {
            return Some(base);
        }

        INDEX_FILES
            .iter()
            .map(|index| base.join(index))
            .find(|candidate| self.workspace.is_file(candidate))
    }

    /// Parsed file for `path`, reading it through the workspace on first use.
    fn load(&mut self, path: &Path) -> Option<Rc<ParsedFile>> {
        if let Some(parsed) = self.parsed_cache.get(path) {
            debug!("Parsed file cache hit: {}", path.display());
            return Some(Rc::clone(parsed));
        }
        if self.unreadable.contains(path) {
            return None;
        }

        match self.workspace.read_to_string(path) {
            Ok(text) => self.parse_and_cache(path, text),
            Err(e) => {
                warn!("Cannot read {}: {}", path.display(), e);
                self.unreadable.insert(path.to_path_buf());
                None
            }
        }
    }

    fn parse_and_cache(&mut self, path: &Path, text: String) -> Option<Rc<ParsedFile>> {
        match AstParser::parse_source(path, text) {
            Ok(parsed) => {
                let parsed = Rc::new(parsed);
                self.parsed_cache.insert(path.to_path_buf(), Rc::clone(&parsed));
                Some(parsed)
            }
            Err(e) => {
                warn!("Cannot parse {}: {:#}", path.display(), e);
                self.unreadable.insert(path.to_path_buf());
                None
            }
        }
    }
}

/// One `import ... from '...'` statement
#[derive(Debug, Default)]
struct ImportInfo {
    specifier: String,
    default_binding: Option<String>,
    /// (imported name, local name)
    named: Vec<(String, String)>,
}

impl ImportInfo {
    /// Name to search for in the imported module when `local` is bound by this import.
    fn binding_for(&self, local: &str) -> Option<String> {
        if self.default_binding.as_deref() == Some(local) {
            return Some(local.to_string());
        }
        self.named
            .iter()
            .find(|(_, alias)| alias == local)
            .map(|(imported, _)| imported.clone())
    }
}

/// One `export ... from '...'` statement
#[derive(Debug)]
struct ReexportInfo {
    specifier: String,
    /// `None` for `export * from`
    named: Option<Vec<(String, String)>>,
}

impl ReexportInfo {
    fn may_export(&self, name: &str) -> bool {
        match &self.named {
            None => true,
            Some(named) => named.iter().any(|(_, exported)| exported == name),
        }
    }

    fn original_name(&self, exported: &str) -> String {
        self.named
            .as_ref()
            .and_then(|named| named.iter().find(|(_, e)| e == exported))
            .map(|(original, _)| original.clone())
            .unwrap_or_else(|| exported.to_string())
    }
}

fn collect_imports(file: &ParsedFile) -> Vec<ImportInfo> {
    let root = file.root();
    let mut cursor = root.walk();
    let statements: Vec<Node<'_>> = root
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "import_statement")
        .collect();

    let mut imports = Vec::new();
    for statement in statements {
        let Some(specifier) = statement
            .child_by_field_name("source")
            .and_then(|s| syntax::string_value(file, s))
        else {
            continue;
        };
        let mut info = ImportInfo {
            specifier,
            ..ImportInfo::default()
        };

        let mut cursor = statement.walk();
        let clauses: Vec<Node<'_>> = statement
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "import_clause")
            .collect();
        for clause in clauses {
            let mut cursor = clause.walk();
            for part in clause.named_children(&mut cursor) {
                match part.kind() {
                    "identifier" => info.default_binding = Some(file.text(part).to_string()),
                    "named_imports" => info.named.extend(specifier_pairs(file, part, "import_specifier")),
                    _ => {}
                }
            }
        }

        imports.push(info);
    }
    imports
}

fn collect_reexports(file: &ParsedFile) -> Vec<ReexportInfo> {
    let root = file.root();
    let mut cursor = root.walk();
    let statements: Vec<Node<'_>> = root
        .named_children(&mut cursor)
        .filter(|n| n.kind() == "export_statement")
        .collect();

    let mut reexports = Vec::new();
    for statement in statements {
        let Some(specifier) = statement
            .child_by_field_name("source")
            .and_then(|s| syntax::string_value(file, s))
        else {
            continue;
        };

        let mut cursor = statement.walk();
        let clause = statement
            .named_children(&mut cursor)
            .find(|n| n.kind() == "export_clause");
        let named = clause.map(|c| specifier_pairs(file, c, "export_specifier"));

        reexports.push(ReexportInfo { specifier, named });
    }
    reexports
}

/// `(name, alias-or-name)` for every specifier in an import/export clause.
fn specifier_pairs(file: &ParsedFile, clause: Node<'_>, kind: &str) -> Vec<(String, String)> {
    let mut cursor = clause.walk();
    let specifiers: Vec<Node<'_>> = clause
        .named_children(&mut cursor)
        .filter(|n| n.kind() == kind)
        .collect();

    specifiers
        .into_iter()
        .filter_map(|spec| {
            let name = file.text(spec.child_by_field_name("name")?).to_string();
            let alias = spec
                .child_by_field_name("alias")
                .map(|a| file.text(a).to_string())
                .unwrap_or_else(|| name.clone());
            Some((name, alias))
        })
        .collect()
}

fn is_exported(node: Node<'_>) -> bool {
    node.parent()
        .map(|p| p.kind() == "export_statement")
        .unwrap_or(false)
}

/// Cheap text check run before parsing a workspace candidate.
fn declaration_pattern(name: &str) -> Option<Regex> {
    let pattern = format!(
        r"(?m)(?:^|[\s;])(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:class|interface|type|enum)\s+{}\b",
        regex::escape(name)
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Invalid search pattern for {}: {}", name, e);
            None
        }
    }
}

fn append_extension(base: &Path, ext: &str) -> PathBuf {
    let mut raw = base.as_os_str().to_owned();
    raw.push(ext);
    PathBuf::from(raw)
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::FsWorkspace;
    use std::fs;
    use tempfile::TempDir;

    /// Helper function to write project files under a temp root
    fn create_project(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (path, content) in files {
            let file_path = temp_dir.path().join(path);
            fs::create_dir_all(file_path.parent().unwrap()).unwrap();
            fs::write(&file_path, content).unwrap();
        }
        temp_dir
    }

    fn parse_project_file(root: &Path, path: &str) -> Rc<ParsedFile> {
        Rc::new(AstParser::parse_file(&root.join(path)).unwrap())
    }

    #[test]
    fn test_find_local_declarations() {
        let file = Rc::new(
            AstParser::parse_source(
                Path::new("t.ts"),
                r#"
                interface A { a: string }
                export class B { b: number }
                export type C = { c: boolean };
                type Hidden = { h: string };
                enum D { X, Y }
                "#
                .to_string(),
            )
            .unwrap(),
        );

        assert_eq!(TypeLocator::find_local(&file, "A").unwrap().kind, DeclarationKind::Interface);
        assert_eq!(TypeLocator::find_local(&file, "B").unwrap().kind, DeclarationKind::Class);
        assert_eq!(TypeLocator::find_local(&file, "C").unwrap().kind, DeclarationKind::TypeAlias);
        assert_eq!(TypeLocator::find_local(&file, "D").unwrap().kind, DeclarationKind::Enum);
        assert!(TypeLocator::find_local(&file, "Hidden").is_none());
        assert!(TypeLocator::find_local(&file, "a").is_none());
    }

    #[test]
    fn test_declaration_node_round_trips() {
        let file = Rc::new(
            AstParser::parse_source(
                Path::new("t.ts"),
                "export interface User { id: number }".to_string(),
            )
            .unwrap(),
        );
        let decl = TypeLocator::find_local(&file, "User").unwrap();
        let node = decl.node().unwrap();

        assert_eq!(node.kind(), "interface_declaration");
        assert_eq!(file.text(node.child_by_field_name("name").unwrap()), "User");
    }

    #[test]
    fn test_local_declaration_wins_over_import() {
        let project = create_project(&[
            (
                "src/users.controller.ts",
                "import { UserDto } from './user.dto';\ninterface UserDto { local: string }",
            ),
            ("src/user.dto.ts", "export interface UserDto { imported: string }"),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::new(&workspace);
        let from = parse_project_file(project.path(), "src/users.controller.ts");

        let decl = locator.locate("UserDto", &from).found().unwrap();
        assert_eq!(decl.file.path, from.path);
    }

    #[test]
    fn test_follow_relative_import() {
        let project = create_project(&[
            (
                "src/orders/orders.controller.ts",
                "import { CreateItemDto } from './dto/item.dto';",
            ),
            (
                "src/orders/dto/item.dto.ts",
                "export interface CreateItemDto { name: string }",
            ),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::new(&workspace);
        let from = parse_project_file(project.path(), "src/orders/orders.controller.ts");

        let decl = locator.locate("CreateItemDto", &from).found().unwrap();
        assert!(decl.file.path.ends_with("src/orders/dto/item.dto.ts"));
    }

    #[test]
    fn test_follow_aliased_import_and_barrel() {
        let project = create_project(&[
            (
                "src/app.controller.ts",
                "import { CreateUserDto as Payload } from './dto';",
            ),
            ("src/dto/index.ts", "export * from './create-user.dto';"),
            (
                "src/dto/create-user.dto.ts",
                "export class CreateUserDto { email: string; }",
            ),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::with_options(
            &workspace,
            LocatorOptions {
                max_workspace_files: 0,
            },
        );
        let from = parse_project_file(project.path(), "src/app.controller.ts");

        let decl = locator.locate("Payload", &from).found().unwrap();
        assert_eq!(decl.name, "CreateUserDto");
        assert!(decl.file.path.ends_with("src/dto/create-user.dto.ts"));
    }

    #[test]
    fn test_workspace_search_fallback() {
        let project = create_project(&[
            ("src/a.controller.ts", "export class A {}"),
            ("src/deep/nested/models.ts", "export interface Address { city: string }"),
            ("node_modules/lib/index.d.ts", "export interface Address { hidden: string }"),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::new(&workspace);
        let from = parse_project_file(project.path(), "src/a.controller.ts");

        let decl = locator.locate("Address", &from).found().unwrap();
        assert!(decl.file.path.ends_with("src/deep/nested/models.ts"));
    }

    #[test]
    fn test_workspace_search_respects_cap() {
        let project = create_project(&[
            ("a.ts", "export const a = 1;"),
            ("b.ts", "export const b = 1;"),
            ("c.ts", "export interface Late { x: string }"),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::with_options(
            &workspace,
            LocatorOptions {
                max_workspace_files: 2,
            },
        );
        let from = parse_project_file(project.path(), "a.ts");

        assert!(matches!(locator.locate("Late", &from), Resolution::NotFound));
    }

    #[test]
    fn test_workspace_search_skips_unreadable_candidate() {
        let project = create_project(&[
            ("src/b.ts", "export interface Addr { city: string }"),
            ("src/c.controller.ts", "export class C {}"),
        ]);
        fs::write(project.path().join("src/a.ts"), [0xff, 0xfe, 0x00, 0x80]).unwrap();
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::new(&workspace);
        let from = parse_project_file(project.path(), "src/c.controller.ts");

        let decl = locator.locate("Addr", &from).found().unwrap();
        assert!(decl.file.path.ends_with("src/b.ts"));
    }

    #[test]
    fn test_unresolvable_import_falls_through_to_next() {
        let project = create_project(&[
            (
                "src/c.controller.ts",
                "import { Addr } from './gone';\nimport { Addr } from './models/addr';",
            ),
            ("src/models/addr.ts", "export interface Addr { city: string }"),
        ]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::with_options(
            &workspace,
            LocatorOptions {
                max_workspace_files: 0,
            },
        );
        let from = parse_project_file(project.path(), "src/c.controller.ts");

        let decl = locator.locate("Addr", &from).found().unwrap();
        assert!(decl.file.path.ends_with("src/models/addr.ts"));
    }

    #[test]
    fn test_not_found() {
        let project = create_project(&[("src/a.ts", "import { Missing } from './missing';")]);
        let workspace = FsWorkspace::new(project.path().to_path_buf());
        let mut locator = TypeLocator::new(&workspace);
        let from = parse_project_file(project.path(), "src/a.ts");

        assert!(matches!(locator.locate("Missing", &from), Resolution::NotFound));
    }

    #[test]
    fn test_resolve_import_variants() {
        let project = create_project(&[
            ("src/app/x.ts", ""),
            ("src/app/shared/index.ts", ""),
            ("src/app/view.tsx", ""),
            ("src/common/types.d.ts", ""),
            ("src/esm/user.dto.ts", ""),
        ]);
        let root = project.path();
        let workspace = FsWorkspace::new(root.to_path_buf());
        let locator = TypeLocator::new(&workspace);
        let importer = root.join("src/app/x.ts");

        assert_eq!(
            locator.resolve_import("./shared", &importer),
            Some(root.join("src/app/shared/index.ts"))
        );
        assert_eq!(
            locator.resolve_import("./view", &importer),
            Some(root.join("src/app/view.tsx"))
        );
        assert_eq!(
            locator.resolve_import("../common/types", &importer),
            Some(root.join("src/common/types.d.ts"))
        );
        assert_eq!(
            locator.resolve_import("src/app/x", &importer),
            Some(root.join("src/app/x.ts"))
        );
        assert_eq!(
            locator.resolve_import("/src/app/x", &importer),
            Some(root.join("src/app/x.ts"))
        );
        assert_eq!(
            locator.resolve_import("../esm/user.dto.js", &importer),
            Some(root.join("src/esm/user.dto.ts"))
        );
        assert_eq!(locator.resolve_import("@nestjs/common", &importer), None);
        assert_eq!(locator.resolve_import("./nope", &importer), None);
    }

    #[test]
    fn test_declaration_pattern() {
        let re = declaration_pattern("UserDto").unwrap();
        assert!(re.is_match("export class UserDto {}"));
        assert!(re.is_match("interface UserDto {"));
        assert!(re.is_match("export type UserDto = {}"));
        assert!(re.is_match("export default class UserDto {}"));
        assert!(!re.is_match("export class UserDtoList {}"));
        assert!(!re.is_match("const x: UserDto = y;"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
    }
}
