//! The canonical ecosystem package layout.
//!
//! Adding a file here without registering a generator for it makes registry
//! validation fail before any generation run starts.

use std::sync::OnceLock;

use crate::domain::{
    feature::Feature,
    generator::{GeneratorKind, SynthesisFn},
};

use super::{DirectoryMetadata, FileMetadata, SchemaNode};

/// Root directory name; rendered with the package short name.
pub const ROOT_NAME_TEMPLATE: &str = "{{packageName}}";

/// The schema every generated package follows. Built on first use.
pub fn repo_schema() -> &'static SchemaNode {
    static SCHEMA: OnceLock<SchemaNode> = OnceLock::new();
    SCHEMA.get_or_init(build)
}

fn build() -> SchemaNode {
    SchemaNode::directory(DirectoryMetadata::new().name(ROOT_NAME_TEMPLATE))
        .child(
            "package.json",
            SchemaNode::file(
                FileMetadata::new(GeneratorKind::external("npm/package:output"))
                    .feature(Feature::Npm),
            ),
        )
        .child(
            "tsconfig.json",
            SchemaNode::file(
                FileMetadata::new(GeneratorKind::external("ts/config:output")).feature(Feature::Ts),
            ),
        )
        .child(
            ".gitignore",
            SchemaNode::file(
                FileMetadata::new(GeneratorKind::external("git/ignore:output"))
                    .feature(Feature::Core),
            ),
        )
        .child(
            "dependencies.json",
            SchemaNode::file(
                FileMetadata::new(GeneratorKind::template("dependencies.json.ejs"))
                    .feature(Feature::Cue),
            ),
        )
        .child(
            "vitest.config.ts",
            SchemaNode::file(
                FileMetadata::new(GeneratorKind::synthesis(SynthesisFn::VitestConfig))
                    .feature(Feature::Vitest),
            ),
        )
        .child(
            "src",
            SchemaNode::directory(DirectoryMetadata::new().always()).child(
                "index.ts",
                SchemaNode::file(
                    FileMetadata::new(GeneratorKind::synthesis(SynthesisFn::IndexTs))
                        .feature(Feature::Ts),
                ),
            ),
        )
}
