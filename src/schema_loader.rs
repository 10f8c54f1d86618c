//! Shared JSON Schema loader for catalog validation.
//!
//! Callers load a schema file, check its `schema_version` const against the
//! accepted marker, compile a validator, and run documents through it. All
//! validation messages are collected so a bad catalog reports every problem
//! at once.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Compiled validator plus the path it came from (for error messages).
pub struct CompiledSchema {
    path: PathBuf,
    compiled: JSONSchema,
}

impl CompiledSchema {
    /// Load and compile the schema at `path`.
    ///
    /// When `expected_version` is set, the schema must pin
    /// `/properties/schema_version/const` (or the same pointer under the
    /// object branch of a `oneOf`) to that value.
    pub fn load(path: &Path, expected_version: Option<&str>) -> Result<Self> {
        let schema_value: Value = serde_json::from_reader(
            File::open(path).with_context(|| format!("opening schema {}", path.display()))?,
        )
        .with_context(|| format!("parsing schema {}", path.display()))?;

        if let Some(expected) = expected_version {
            let declared = extract_schema_version(&schema_value)
                .ok_or_else(|| anyhow!("schema {} missing schema_version const", path.display()))?;
            if declared != expected {
                bail!(
                    "schema {} declares schema_version '{}', expected {}",
                    path.display(),
                    declared,
                    expected
                );
            }
        }

        let compiled = JSONSchema::compile(&schema_value)
            .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            compiled,
        })
    }

    /// Validate `instance`, joining every violation into one error.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{} at {}", err, err.instance_path))
                .collect::<Vec<_>>()
                .join("\n");
            bail!(
                "document failed validation against {}:\n{}",
                self.path.display(),
                details
            );
        }
        Ok(())
    }
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    const POINTERS: [&str; 2] = [
        "/properties/schema_version/const",
        "/oneOf/1/properties/schema_version/const",
    ];
    let version = POINTERS
        .iter()
        .find_map(|pointer| schema.pointer(pointer).and_then(Value::as_str))?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}
