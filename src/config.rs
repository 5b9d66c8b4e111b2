//! The subset of the surrounding CLI's config file the core cares about
//! (spec §6 "Config file", SPEC_FULL §A.3).
//!
//! File search order (`vdl.yaml`, `vdl.yml`, `.vdl.yaml`, `.vdl.yml`) and
//! YAML parsing are a CLI-shell concern; the core only exposes the typed
//! entry-point config and a pure constructor over already-decoded JSON
//! values, keeping this crate's dependency surface JSON-shaped.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// `{ schema: PathBuf }`. Unknown keys (generator configuration owned by
/// the CLI) are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryConfig {
    pub schema: PathBuf,
}

impl EntryConfig {
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let schema = value
            .get("schema")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ConfigError::Invalid("missing or non-string `schema` key".to_string()))?;
        Ok(Self { schema: PathBuf::from(schema) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_schema_path() {
        let cfg = EntryConfig::from_value(json!({ "schema": "src/api.vdl" })).unwrap();
        assert_eq!(cfg.schema, PathBuf::from("src/api.vdl"));
    }

    #[test]
    fn ignores_unknown_keys() {
        let cfg = EntryConfig::from_value(json!({ "schema": "api.vdl", "generators": ["go", "ts"] })).unwrap();
        assert_eq!(cfg.schema, PathBuf::from("api.vdl"));
    }

    #[test]
    fn rejects_missing_schema_key() {
        assert!(EntryConfig::from_value(json!({ "generators": [] })).is_err());
    }
}
