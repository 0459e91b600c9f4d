//! `scaffold schema`: print the package schema as a tree.

use std::collections::HashSet;

use serde::Serialize;

use scaffold_core::domain::{NodeMetadata, plan_active, repo_schema, walk_schema};

use crate::{cli::SchemaArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct SchemaEntry {
    path: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<String>,
}

/// Print every schema node, or only the nodes live for `--preset`.
pub fn execute(args: SchemaArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let schema = repo_schema();

    let live: Option<HashSet<String>> = match &args.preset {
        Some(preset) => {
            let features = config.feature_resolver()?.resolve(preset);
            let plan = plan_active(schema, &features);
            Some(
                plan.directories
                    .into_iter()
                    .chain(plan.files.into_iter().map(|f| f.path))
                    .collect(),
            )
        }
        None => None,
    };

    let mut entries = Vec::new();
    walk_schema(schema, "", &mut |path, metadata, _| {
        if path.is_empty() {
            return;
        }
        if live.as_ref().is_some_and(|live| !live.contains(path)) {
            return;
        }
        entries.push(SchemaEntry {
            path: path.to_string(),
            kind: match metadata {
                NodeMetadata::File(_) => "file",
                NodeMetadata::Directory(_) => "directory",
            },
            feature: metadata.feature().map(|f| f.as_str()),
            generator: metadata.as_file().map(|f| f.generator.to_string()),
        });
    });

    if output.is_json() {
        return output.json(&entries);
    }

    let root = match schema.metadata() {
        NodeMetadata::Directory(dir) => dir.name.clone().unwrap_or_else(|| ".".into()),
        NodeMetadata::File(_) => ".".into(),
    };
    match &args.preset {
        Some(preset) => output.header(&format!("{root}  (preset '{preset}')"))?,
        None => output.header(&root)?,
    }

    for entry in &entries {
        let depth = entry.path.matches('/').count() + 1;
        let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        let mut line = format!("{}{}", "  ".repeat(depth), name);
        if entry.kind == "directory" {
            line.push('/');
        }
        if let Some(generator) = &entry.generator {
            line.push_str(&format!("  [{generator}]"));
        }
        if let Some(feature) = entry.feature {
            line.push_str(&format!("  ({feature})"));
        }
        output.print(&line)?;
    }
    Ok(())
}
