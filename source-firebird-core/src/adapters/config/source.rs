//! Complete source configuration as supplied by the host framework.
//!
//! The configuration document is JSON:
//!
//! ```json
//! {
//!   "host": "db1",
//!   "port": 3050,
//!   "database": "/data/test.fdb",
//!   "user": "SYSDBA",
//!   "password": "masterkey",
//!   "type_mapping": { "23": "string" }
//! }
//! ```
//!
//! It is checked against the connection specification before being
//! deserialized, so every violation is reported at once.

use super::ConnectionConfig;
use crate::adapters::firebird::TypeMapping;
use crate::error::SourceError;
use crate::models::PortableType;
use crate::security::Credentials;
use crate::{Result, validation};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Connection target, credentials and type table for one invocation.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub connection: ConnectionConfig,
    pub credentials: Credentials,
    pub type_mapping: TypeMapping,
}

/// Wire shape of the configuration document.
#[derive(Deserialize)]
struct RawSourceConfig {
    host: String,
    #[serde(default)]
    port: Option<u16>,
    database: String,
    user: String,
    password: String,
    #[serde(default)]
    type_mapping: HashMap<i16, PortableType>,
}

impl SourceConfig {
    /// Creates a configuration using the default type table.
    pub fn new(connection: ConnectionConfig, credentials: Credentials) -> Self {
        Self {
            connection,
            credentials,
            type_mapping: TypeMapping::default(),
        }
    }

    /// Builder method to replace the type table.
    pub fn with_type_mapping(mut self, type_mapping: TypeMapping) -> Self {
        self.type_mapping = type_mapping;
        self
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    /// Returns a validation error listing every specification violation,
    /// or a configuration error for semantically invalid values.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        validation::validate_config(&value)?;

        let raw: RawSourceConfig =
            serde_json::from_value(value).map_err(|e| SourceError::Serialization {
                context: "Failed to decode source configuration".to_string(),
                source: e,
            })?;

        let mut connection = ConnectionConfig::new(raw.host, raw.database);
        connection.port = raw.port;

        let config = Self::new(connection, Credentials::new(raw.user, raw.password))
            .with_type_mapping(TypeMapping::default().with_overrides(raw.type_mapping));
        config.validate()?;

        Ok(config)
    }

    /// Reads a configuration document from disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not JSON or is invalid
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            context: format!("Failed to read config file {}", path.display()),
            source: e,
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| SourceError::Serialization {
                context: format!("Config file {} is not valid JSON", path.display()),
                source: e,
            })?;

        Self::from_value(value)
    }

    /// Validates connection parameters and the user name.
    ///
    /// # Errors
    /// Returns error if any required value is blank
    pub fn validate(&self) -> Result<()> {
        self.connection.validate()?;

        if self.credentials.username().trim().is_empty() {
            return Err(SourceError::configuration("user cannot be empty"));
        }

        Ok(())
    }
}
