//! Source operations: connection check, schema discovery and
//! full-refresh extraction.
//!
//! Every operation opens exactly one scoped connection through the
//! configured [`Connector`] and releases it on every exit path. Nothing is
//! shared between calls.
//!
//! # Example
//! ```rust,no_run
//! use source_firebird_core::{FirebirdSource, SourceConfig};
//! use std::path::Path;
//!
//! # fn example() -> source_firebird_core::Result<()> {
//! let source = FirebirdSource::with_default_connector()?;
//! let config = SourceConfig::from_path(Path::new("secrets/config.json"))?;
//!
//! let catalog = source.discover(&config)?;
//! let streams: Vec<String> = catalog.names().map(str::to_string).collect();
//! source.read(&config, &streams, |record| {
//!     println!("{}", serde_json::to_string(&record).unwrap_or_default());
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

mod discovery;
mod extraction;

pub use discovery::describe_table;
pub use extraction::{ReadSession, ReadSummary, RecordIter};

use crate::Result;
use crate::adapters::{Connector, SourceConfig, default_connector};
use crate::models::CheckOutcome;

/// Prefix of every failed connection check message.
pub const CHECK_FAILURE_PREFIX: &str = "Error connecting to Firebird";

/// The Firebird source: entry point for the three protocol operations
/// plus ad hoc queries.
pub struct FirebirdSource {
    connector: Box<dyn Connector>,
}

impl std::fmt::Debug for FirebirdSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebirdSource").finish_non_exhaustive()
    }
}

impl FirebirdSource {
    /// Creates a source over the given connector.
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self { connector }
    }

    /// Creates a source over the production Firebird connector.
    ///
    /// # Errors
    /// Returns error if the crate was built without the `firebird` feature
    pub fn with_default_connector() -> Result<Self> {
        Ok(Self::new(default_connector()?))
    }

    /// Tests connectivity with a trivial liveness query.
    ///
    /// Never fails: every error (unreachable host, bad credentials,
    /// missing database file, failing query) becomes
    /// [`CheckOutcome::Failed`] with a readable message.
    pub fn check(&self, config: &SourceConfig) -> CheckOutcome {
        tracing::info!("Checking connection to {}", config.connection);

        match self.probe(config) {
            Ok(()) => {
                tracing::info!("Connection check succeeded");
                CheckOutcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Connection check failed: {}", e);
                CheckOutcome::Failed {
                    message: format!("{CHECK_FAILURE_PREFIX}: {}", e.detailed_message()),
                }
            }
        }
    }

    fn probe(&self, config: &SourceConfig) -> Result<()> {
        let mut conn = self.connector.connect(config)?;
        conn.probe()
    }

    /// Opens a read session holding one connection for its whole lifetime.
    ///
    /// # Errors
    /// Returns a connection error if the database cannot be reached
    pub fn open_session(&self, config: &SourceConfig) -> Result<ReadSession> {
        let conn = self.connector.connect(config)?;
        tracing::debug!("Read session opened on {}", config.connection);
        Ok(ReadSession::new(conn))
    }
}
