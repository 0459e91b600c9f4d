//! Declarative package schema.
//!
//! A [`SchemaNode`] is either a file or a directory. Its metadata and its
//! children live in separate fields, so iterating children never has to skip
//! a metadata key. Children keep insertion order.
//!
//! ```text
//! {{packageName}}/            Directory (root)
//! ├── package.json            File  external(npm/package:output)   [npm]
//! ├── ...
//! └── src/                    Directory (always)
//!     └── index.ts            File  synthesis(generateIndexTs)     [ts]
//! ```
//!
//! The tree is plain data. Traversal lives in [`walker`]; the canonical
//! package layout lives in [`repo`].

pub mod repo;
pub mod walker;

use std::fmt;

use indexmap::IndexMap;

use crate::domain::{feature::Feature, generator::GeneratorKind};

pub use repo::{ROOT_NAME_TEMPLATE, repo_schema};
pub use walker::{
    ActiveFile, SchemaPlan, directory_paths, file_paths, plan_active, walk_schema,
};

/// Filesystem node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsType {
    File,
    Directory,
}

impl fmt::Display for FsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("file"),
            Self::Directory => f.write_str("directory"),
        }
    }
}

/// Metadata of a file node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub generator: GeneratorKind,
    pub feature: Option<Feature>,
}

impl FileMetadata {
    pub fn new(generator: GeneratorKind) -> Self {
        Self {
            generator,
            feature: None,
        }
    }

    pub fn feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }
}

/// Metadata of a directory node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryMetadata {
    /// Display name; may contain `{{packageName}}`. Meaningful at the root.
    pub name: Option<String>,
    pub feature: Option<Feature>,
    /// Include regardless of `feature`.
    pub always: bool,
}

impl DirectoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn feature(mut self, feature: Feature) -> Self {
        self.feature = Some(feature);
        self
    }

    pub fn always(mut self) -> Self {
        self.always = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeMetadata {
    File(FileMetadata),
    Directory(DirectoryMetadata),
}

impl NodeMetadata {
    pub fn fs_type(&self) -> FsType {
        match self {
            Self::File(_) => FsType::File,
            Self::Directory(_) => FsType::Directory,
        }
    }

    /// The gating feature, if any.
    pub fn feature(&self) -> Option<Feature> {
        match self {
            Self::File(meta) => meta.feature,
            Self::Directory(meta) => meta.feature,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileMetadata> {
        match self {
            Self::File(meta) => Some(meta),
            Self::Directory(_) => None,
        }
    }
}

/// One node of the schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    metadata: NodeMetadata,
    children: IndexMap<String, SchemaNode>,
}

impl SchemaNode {
    pub fn file(metadata: FileMetadata) -> Self {
        Self {
            metadata: NodeMetadata::File(metadata),
            children: IndexMap::new(),
        }
    }

    pub fn directory(metadata: DirectoryMetadata) -> Self {
        Self {
            metadata: NodeMetadata::Directory(metadata),
            children: IndexMap::new(),
        }
    }

    /// Append a child. A repeated key replaces the earlier child in place.
    /// File nodes must stay leaves; registries and runs refuse a tree that
    /// breaks this.
    pub fn child(mut self, key: impl Into<String>, node: SchemaNode) -> Self {
        self.children.insert(key.into(), node);
        self
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.children.get(key)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
