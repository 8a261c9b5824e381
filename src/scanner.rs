use anyhow::Result;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories that never contain project sources worth reading.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "coverage", "out"];

/// File extensions treated as TypeScript sources.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all TypeScript
/// source files. It skips dependency and build output directories such as `node_modules` and
/// `dist`, as well as hidden directories (those starting with `.`).
///
/// # Example
///
/// ```no_run
/// use request_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-nest-app"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} TypeScript files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    max_files: Option<usize>,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered source files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths to all discovered TypeScript files, sorted
    pub source_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl ScanResult {
    /// Files that may hold controllers, i.e. everything except `.d.ts` declarations.
    pub fn route_candidates(&self) -> Vec<PathBuf> {
        self.source_files
            .iter()
            .filter(|path| !is_declaration_file(path))
            .cloned()
            .collect()
    }
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            max_files: None,
        }
    }

    /// Stops collecting once `max_files` sources were found.
    pub fn with_limit(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    /// Scans the directory tree and collects TypeScript files.
    ///
    /// Directory entries are visited in file-name order, so a capped scan always returns the
    /// same prefix of the tree. If any directories or files cannot be accessed, warnings are
    /// logged and added to the result, but scanning continues.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept as `Result` for parity with callers that bubble I/O errors.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                if e.file_type().is_dir() {
                    let is_hidden = file_name.starts_with('.');
                    let is_skipped = SKIPPED_DIRS.contains(&file_name.as_ref());
                    return !is_hidden && !is_skipped;
                }
                true
            });

        for entry in walker {
            if self.max_files.is_some_and(|max| source_files.len() >= max) {
                break;
            }
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && is_source_file(path) {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

/// Whether `path` has a TypeScript source extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Whether `path` is an ambient declaration file (`*.d.ts`).
pub fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.ends_with(".d.ts"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("main.ts"), "bootstrap();").unwrap();
        fs::write(root.join("app.module.ts"), "export class AppModule {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 2);
        assert!(result.warnings.is_empty());

        let file_names: Vec<String> = result
            .source_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(file_names, vec!["app.module.ts", "main.ts"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.source_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("src/users/dto")).unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("src/users/users.controller.ts"), "").unwrap();
        fs::write(root.join("src/users/dto/create-user.dto.ts"), "").unwrap();
        fs::write(root.join("src/app.tsx"), "").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 4);
    }

    #[test]
    fn test_scan_skips_dependency_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("node_modules/@nestjs/common")).unwrap();
        fs::write(root.join("node_modules/@nestjs/common/index.d.ts"), "").unwrap();
        fs::create_dir(root.join("dist")).unwrap();
        fs::write(root.join("dist/main.ts"), "").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/hook.ts"), "").unwrap();
        fs::write(root.join("main.ts"), "").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 1);
        assert_eq!(
            result.source_files[0].file_name().unwrap().to_string_lossy(),
            "main.ts"
        );
    }

    #[test]
    fn test_scan_respects_limit() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        for i in 0..5 {
            fs::write(root.join(format!("file{}.ts", i)), "").unwrap();
        }

        let scanner = FileScanner::new(root.to_path_buf()).with_limit(3);
        let result = scanner.scan().unwrap();

        assert_eq!(result.source_files.len(), 3);
        assert!(result.source_files[0].ends_with("file0.ts"));

        let none = FileScanner::new(root.to_path_buf()).with_limit(0).scan().unwrap();
        assert!(none.source_files.is_empty());
    }

    #[test]
    fn test_route_candidates_exclude_declarations() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("types.d.ts"), "").unwrap();
        fs::write(root.join("users.controller.ts"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.source_files.len(), 2);
        let candidates = result.route_candidates();
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].ends_with("users.controller.ts"));
    }
}
