//! Read-only view of the project being analyzed.
//!
//! Cross-file lookups (import following, the workspace-wide type search, bootstrap discovery)
//! go through the [`Workspace`] trait so the core never touches the file system directly.

use crate::error::{Error, Result};
use crate::scanner::FileScanner;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// File-system-like access needed by the type locator and the global prefix detector.
pub trait Workspace {
    /// Project root; workspace-anchored imports resolve against it.
    fn root(&self) -> &Path;

    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Reads a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// TypeScript sources of the project in a stable order, at most `limit` of them.
    fn source_files(&self, limit: usize) -> Vec<PathBuf>;
}

/// [`Workspace`] backed by a directory on disk.
pub struct FsWorkspace {
    root: PathBuf,
}

impl FsWorkspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl Workspace for FsWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|source| Error::ReadError {
            file: path.to_path_buf(),
            source,
        })
    }

    fn source_files(&self, limit: usize) -> Vec<PathBuf> {
        match FileScanner::new(self.root.clone()).with_limit(limit).scan() {
            Ok(result) => result.source_files,
            Err(e) => {
                debug!("Workspace scan of {} failed: {}", self.root.display(), e);
                Vec::new()
            }
        }
    }
}
