//! Connector seam between the source operations and the database driver.
//!
//! The source operations only talk to a [`SourceConnection`]: one open,
//! scoped connection that is released when the value is dropped. A
//! [`Connector`] opens such connections from a [`SourceConfig`].
//!
//! # Module Structure
//! - `config`: Configuration types (ConnectionConfig, SourceConfig)
//! - `firebird`: Firebird type table and the driver-backed connector

use crate::Result;
use crate::models::SourceRow;

// Configuration module
pub mod config;

// Re-export configuration types for convenience
pub use config::{CONNECTION_CHARSET, ConnectionConfig, DEFAULT_PORT, SourceConfig};

pub mod firebird;

/// Lazy, pull-driven cursor over the rows of one statement.
///
/// The underlying statement stays open until the cursor is dropped or
/// exhausted.
pub type RowCursor<'a> = Box<dyn Iterator<Item = Result<SourceRow>> + 'a>;

/// A column as reported by the system catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    /// Column name, whitespace trimmed
    pub name: String,
    /// `RDB$FIELD_TYPE` code of the column's domain
    pub vendor_type_code: i16,
    /// `RDB$FIELD_SCALE`; negative for NUMERIC and DECIMAL with decimals
    pub scale: i16,
    /// `RDB$FIELD_SUB_TYPE`; distinguishes BLOB kinds
    pub sub_type: i16,
}

impl CatalogColumn {
    /// A column with zero scale and sub type.
    pub fn new(name: impl Into<String>, vendor_type_code: i16) -> Self {
        Self {
            name: name.into(),
            vendor_type_code,
            scale: 0,
            sub_type: 0,
        }
    }

    /// Builder method to set the scale.
    pub const fn with_scale(mut self, scale: i16) -> Self {
        self.scale = scale;
        self
    }

    /// Builder method to set the sub type.
    pub const fn with_sub_type(mut self, sub_type: i16) -> Self {
        self.sub_type = sub_type;
        self
    }
}

/// One open connection to the backing store.
///
/// # Security
/// - Implementations only issue SELECT statements
/// - Credentials are never logged
///
/// # Resource Model
/// Dropping the value releases the connection, whether the caller
/// finished normally, returned early or unwound on error.
pub trait SourceConnection {
    /// Issues a trivial liveness query.
    ///
    /// # Errors
    /// Returns error if the query fails
    fn probe(&mut self) -> Result<()>;

    /// Names of all non-system relations, whitespace trimmed, in the
    /// catalog's natural order.
    ///
    /// # Errors
    /// Returns error if the catalog query fails
    fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Non-system columns of one relation in field position order.
    ///
    /// # Errors
    /// Returns error if the catalog query fails
    fn list_columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>>;

    /// Executes a query and returns a lazy cursor over its rows.
    ///
    /// # Errors
    /// Returns error if the statement cannot be prepared or executed;
    /// fetch errors are yielded by the cursor itself
    fn query_rows<'a>(&'a mut self, sql: &str) -> Result<RowCursor<'a>>;
}

/// Opens scoped connections.
pub trait Connector {
    /// Opens a new connection for the given configuration.
    ///
    /// # Errors
    /// Returns a connection error if the server cannot be reached or
    /// rejects the credentials
    fn connect(&self, config: &SourceConfig) -> Result<Box<dyn SourceConnection>>;
}

/// Creates the production connector for the compiled feature set.
///
/// # Errors
/// Returns error if the crate was built without the `firebird` feature
pub fn default_connector() -> Result<Box<dyn Connector>> {
    #[cfg(feature = "firebird")]
    {
        Ok(Box::new(firebird::FirebirdConnector))
    }
    #[cfg(not(feature = "firebird"))]
    {
        Err(crate::error::SourceError::unsupported_feature(
            "Firebird adapter",
            "compile with --features firebird to enable the Firebird driver",
        ))
    }
}

/// Quotes an identifier for use in generated SQL.
///
/// Names are used exactly as discovered; embedded double quotes are
/// doubled.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Every row and column of a table, without column metadata.
pub fn select_all_query(table: &str) -> String {
    format!("SELECT * FROM {}", quote_identifier(table))
}
