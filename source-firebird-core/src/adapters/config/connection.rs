//! Firebird connection configuration.
//!
//! This module provides the `ConnectionConfig` struct describing where the
//! database lives. Credentials are held separately.

use serde::{Deserialize, Serialize};

/// Default Firebird server port.
pub const DEFAULT_PORT: u16 = 3050;

/// Character set requested for every connection.
pub const CONNECTION_CHARSET: &str = "ISO8859_1";

/// Location of a Firebird database.
///
/// # Security
/// This struct intentionally does NOT store the user or password, so it
/// can be logged and displayed safely.
///
/// # Example
/// ```rust
/// use source_firebird_core::adapters::ConnectionConfig;
///
/// let config = ConnectionConfig::new("db1".to_string(), "/data/test.fdb".to_string())
///     .with_port(3051);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "db1/3051:/data/test.fdb");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server host name or address
    pub host: String,
    /// Optional port; [`DEFAULT_PORT`] when absent
    pub port: Option<u16>,
    /// Database file path or alias on the server
    pub database: String,
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Firebird connection string notation: host[/port]:database
        write!(
            f,
            "{}{}:{}",
            self.host,
            self.port.map_or_else(String::new, |p| format!("/{p}")),
            self.database
        )
    }
}

impl ConnectionConfig {
    /// Creates a connection config on the default port.
    pub fn new(host: String, database: String) -> Self {
        Self {
            host,
            port: None,
            database,
        }
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Port to dial.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if the host or database is blank or the port is zero
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.trim().is_empty() {
            return Err(crate::error::SourceError::configuration(
                "host cannot be empty",
            ));
        }

        if self.database.trim().is_empty() {
            return Err(crate::error::SourceError::configuration(
                "database cannot be empty",
            ));
        }

        if self.port == Some(0) {
            return Err(crate::error::SourceError::configuration(
                "port must be greater than 0",
            ));
        }

        Ok(())
    }
}
