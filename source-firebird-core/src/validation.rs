//! Connection specification and configuration validation.
//!
//! The connection specification is the draft-07 JSON Schema the host
//! framework renders as a configuration form. The same schema is compiled
//! once and used to validate every configuration document before it is
//! deserialized.
//!
//! # Example
//! ```rust
//! use source_firebird_core::validation::validate_config;
//! use serde_json::json;
//!
//! let config = json!({
//!     "host": "db1",
//!     "database": "/data/test.fdb",
//!     "user": "SYSDBA",
//!     "password": "x"
//! });
//!
//! assert!(validate_config(&config).is_ok());
//! assert!(validate_config(&json!({ "host": "db1" })).is_err());
//! ```

use jsonschema::Validator;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Configuration validation errors with field-level reporting
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Embedded specification failed to compile
    #[error("JSON Schema compilation failed: {message}")]
    SchemaCompilation { message: String },

    /// Configuration does not satisfy the specification
    #[error("Configuration validation failed with {error_count} errors: {errors:?}")]
    ValidationFailed {
        error_count: usize,
        errors: Vec<String>,
    },

    /// JSON parsing error
    #[error("JSON parsing failed: {source}")]
    JsonParsing {
        #[from]
        source: serde_json::Error,
    },
}

/// Documentation link advertised in the connector specification
pub const DOCUMENTATION_URL: &str = "https://firebirdsql.org/en/reference-manuals/";

/// Embedded connection specification
const CONNECTION_SPECIFICATION: &str = r#"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "title": "Firebird Source Spec",
  "type": "object",
  "required": ["host", "database", "user", "password"],
  "additionalProperties": true,
  "properties": {
    "host": {
      "title": "Host",
      "description": "Hostname of the Firebird server.",
      "type": "string",
      "minLength": 1,
      "order": 0
    },
    "port": {
      "title": "Port",
      "description": "Port of the Firebird server.",
      "type": "integer",
      "minimum": 1,
      "maximum": 65535,
      "default": 3050,
      "order": 1
    },
    "database": {
      "title": "Database",
      "description": "Path or alias of the database on the server.",
      "type": "string",
      "minLength": 1,
      "order": 2
    },
    "user": {
      "title": "User",
      "description": "User name used to connect.",
      "type": "string",
      "minLength": 1,
      "order": 3
    },
    "password": {
      "title": "Password",
      "description": "Password of the user.",
      "type": "string",
      "airbyte_secret": true,
      "order": 4
    },
    "type_mapping": {
      "title": "Type mapping overrides",
      "description": "Maps RDB$FIELD_TYPE codes to the schema type advertised for columns of that type.",
      "type": "object",
      "propertyNames": { "pattern": "^-?[0-9]+$" },
      "additionalProperties": { "enum": ["string", "integer", "number"] },
      "order": 5
    }
  }
}"#;

/// Compiled specification (initialized once)
static COMPILED_SPECIFICATION: OnceLock<Validator> = OnceLock::new();

/// Returns the connection specification as JSON.
///
/// # Errors
/// Returns `ValidationError::JsonParsing` if the embedded document is not
/// valid JSON.
pub fn connection_specification() -> Result<Value, ValidationError> {
    Ok(serde_json::from_str(CONNECTION_SPECIFICATION)?)
}

/// Compiles the specification on first use and caches it.
fn compiled_specification() -> Result<&'static Validator, ValidationError> {
    if let Some(validator) = COMPILED_SPECIFICATION.get() {
        return Ok(validator);
    }

    let schema = connection_specification()?;
    let compiled =
        jsonschema::validator_for(&schema).map_err(|e| ValidationError::SchemaCompilation {
            message: format!("Schema compilation error: {e}"),
        })?;

    // Another thread may have won the race; either instance is equivalent
    let _ = COMPILED_SPECIFICATION.set(compiled);

    COMPILED_SPECIFICATION
        .get()
        .ok_or_else(|| ValidationError::SchemaCompilation {
            message: "Specification validator unavailable".to_string(),
        })
}

/// Validates a configuration document against the connection specification.
///
/// All violations are collected, not just the first one.
///
/// # Errors
/// Returns `ValidationError::ValidationFailed` listing each violation.
pub fn validate_config(config: &Value) -> Result<(), ValidationError> {
    let validator = compiled_specification()?;

    let errors: Vec<String> = validator
        .iter_errors(config)
        .map(|error| error.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::ValidationFailed {
            error_count: errors.len(),
            errors,
        })
    }
}
