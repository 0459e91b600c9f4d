//! Schema traversal.
//!
//! These are the only sanctioned ways to interrogate a schema tree; they own
//! the path rules. Paths are POSIX-style: the root is `base_path` (usually
//! `""`), a child of the empty root is just its key, and every other child
//! is `parent + "/" + key`. The same strings key the generator registry.

use tracing::trace;

use crate::domain::feature_graph::{ActiveFeatures, is_feature_active};

use super::{FileMetadata, NodeMetadata, SchemaNode};

/// Pre-order walk. `visitor` sees every node exactly once, parents before
/// children, children in insertion order.
pub fn walk_schema<F>(node: &SchemaNode, base_path: &str, visitor: &mut F)
where
    F: FnMut(&str, &NodeMetadata, &SchemaNode),
{
    visitor(base_path, node.metadata(), node);

    for (key, child) in node.children() {
        let child_path = join(base_path, key);
        walk_schema(child, &child_path, visitor);
    }
}

/// Every file path in the tree, in walk order.
pub fn file_paths(schema: &SchemaNode) -> Vec<String> {
    collect_paths(schema, NodeMetadata::is_file)
}

/// Every directory path in the tree except the root, in walk order.
pub fn directory_paths(schema: &SchemaNode) -> Vec<String> {
    collect_paths(schema, NodeMetadata::is_directory)
}

fn collect_paths(schema: &SchemaNode, keep: fn(&NodeMetadata) -> bool) -> Vec<String> {
    let mut paths = Vec::new();
    walk_schema(schema, "", &mut |path, metadata, _| {
        if !path.is_empty() && keep(metadata) {
            paths.push(path.to_string());
        }
    });
    paths
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}/{key}")
    }
}

/// A file selected for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFile<'a> {
    pub path: String,
    pub metadata: &'a FileMetadata,
}

/// The part of a schema that is live for one feature set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaPlan<'a> {
    /// Directory paths, root excluded, parents first.
    pub directories: Vec<String>,
    pub files: Vec<ActiveFile<'a>>,
    /// Paths dropped by a feature gate. Descendants of a dropped
    /// directory are not listed.
    pub skipped: Vec<String>,
}

/// Select the nodes active under `features`.
///
/// The root is always kept. A directory is kept when it is marked `always`
/// or its gate is active; a dropped directory takes its whole subtree with
/// it. A file is kept when its gate is active.
pub fn plan_active<'a>(schema: &'a SchemaNode, features: &ActiveFeatures) -> SchemaPlan<'a> {
    let mut plan = SchemaPlan::default();
    for (key, child) in schema.children() {
        plan_node(child, key.to_string(), features, &mut plan);
    }
    plan
}

fn plan_node<'a>(
    node: &'a SchemaNode,
    path: String,
    features: &ActiveFeatures,
    plan: &mut SchemaPlan<'a>,
) {
    match node.metadata() {
        NodeMetadata::File(meta) => {
            if is_feature_active(meta.feature, features) {
                plan.files.push(ActiveFile {
                    path,
                    metadata: meta,
                });
            } else {
                trace!(%path, "file gated off");
                plan.skipped.push(path);
            }
        }
        NodeMetadata::Directory(meta) => {
            if !(meta.always || is_feature_active(meta.feature, features)) {
                trace!(%path, "directory gated off");
                plan.skipped.push(path);
                return;
            }
            plan.directories.push(path.clone());
            for (key, child) in node.children() {
                plan_node(child, join(&path, key), features, plan);
            }
        }
    }
}
