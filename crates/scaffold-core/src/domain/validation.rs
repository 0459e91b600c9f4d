use crate::domain::{
    error::DomainError,
    project_structure::ProjectStructure,
    schema::{NodeMetadata, SchemaNode},
};

/// Longest package name the npm registry accepts.
const MAX_PACKAGE_NAME_LEN: usize = 214;

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Check the shape of a schema tree: the root is a directory, file
    /// nodes are leaves, and every key is a single non-empty path segment.
    pub fn validate_schema(schema: &SchemaNode) -> Result<(), DomainError> {
        if !schema.metadata().is_directory() {
            return Err(DomainError::RootNotDirectory);
        }
        Self::validate_children(schema, "")
    }

    fn validate_children(node: &SchemaNode, parent: &str) -> Result<(), DomainError> {
        for (key, child) in node.children() {
            let path = if parent.is_empty() {
                key.to_string()
            } else {
                format!("{parent}/{key}")
            };

            if key.is_empty() || key == "." || key == ".." {
                return Err(DomainError::InvalidSchemaKey {
                    path,
                    reason: "key must name a file or directory".into(),
                });
            }
            if key.contains('/') || key.contains('\\') {
                return Err(DomainError::InvalidSchemaKey {
                    path,
                    reason: "key must not contain a path separator".into(),
                });
            }
            if matches!(child.metadata(), NodeMetadata::File(_)) && !child.is_leaf() {
                return Err(DomainError::FileWithChildren { path });
            }

            Self::validate_children(child, &path)?;
        }
        Ok(())
    }

    /// Short package names become both a directory name and the second
    /// half of a scoped npm name.
    pub fn validate_package_name(name: &str) -> Result<(), DomainError> {
        let invalid = |reason: &str| DomainError::InvalidPackageName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > MAX_PACKAGE_NAME_LEN {
            return Err(invalid("name is longer than 214 characters"));
        }
        if name.starts_with('.') || name.starts_with('_') {
            return Err(invalid("name cannot start with '.' or '_'"));
        }
        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')))
        {
            return Err(invalid(&format!("character '{c}' is not allowed")));
        }
        Ok(())
    }

    pub fn validate_project_structure(structure: &ProjectStructure) -> Result<(), DomainError> {
        structure.validate()
    }
}
