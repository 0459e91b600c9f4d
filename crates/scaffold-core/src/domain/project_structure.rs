use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::domain::error::DomainError;

/// In-memory result of a generation run, written out in one go.
///
/// Entry paths are relative to `root`, which is the package directory.
/// Directories come before the files inside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) entries: Vec<FsEntry>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: String) {
        let path = path.into();
        self.entries.push(FsEntry::File(FileToWrite { path, content }));
    }

    pub fn add_directory(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.entries.push(FsEntry::Directory(DirectoryToCreate { path }));
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: String) -> Self {
        self.add_file(path, content);
        self
    }

    pub fn with_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_directory(path);
        self
    }

    /// Non-empty, relative, and no path listed twice.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.entries.is_empty() {
            return Err(DomainError::EmptyStructure);
        }

        let mut seen: BTreeSet<&Path> = BTreeSet::new();
        for path in self.entries.iter().map(FsEntry::path) {
            let shown = || path.display().to_string();
            if path.is_absolute() {
                return Err(DomainError::AbsolutePathNotAllowed { path: shown() });
            }
            if !seen.insert(path) {
                return Err(DomainError::DuplicatePath { path: shown() });
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[FsEntry] {
        &self.entries
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.entries.iter().filter_map(|entry| match entry {
            FsEntry::File(file) => Some(file),
            FsEntry::Directory(_) => None,
        })
    }

    pub fn directories(&self) -> impl Iterator<Item = &DirectoryToCreate> {
        self.entries.iter().filter_map(|entry| match entry {
            FsEntry::Directory(dir) => Some(dir),
            FsEntry::File(_) => None,
        })
    }

    /// Content of the file at `path`, if generated.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        let path = path.as_ref();
        self.files()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsEntry {
    File(FileToWrite),
    Directory(DirectoryToCreate),
}

impl FsEntry {
    pub fn path(&self) -> &Path {
        match self {
            Self::File(f) => &f.path,
            Self::Directory(d) => &d.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToWrite {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryToCreate {
    pub path: PathBuf,
}
