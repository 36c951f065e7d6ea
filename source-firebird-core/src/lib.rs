//! Core of the Firebird source connector.
//!
//! Exposes a Firebird database to a record-interchange framework as a
//! set of full-refresh streams, one per user table. The crate provides
//! the connection check, schema discovery, record extraction and the
//! protocol message shapes used to report them.
//!
//! # Guarantees
//! - Every statement sent to the server is a `SELECT`
//! - Credentials are held in zeroizing containers and never logged
//! - Every connection opened by an operation is released when it ends
//!
//! # Architecture
//! - [`adapters`] hides the driver behind the [`adapters::Connector`] and
//!   [`adapters::SourceConnection`] traits
//! - [`source`] implements check, discover and read on top of that seam
//! - [`protocol`] serializes outcomes as newline-delimited JSON messages

pub mod adapters;
pub mod error;
pub mod logging;
pub mod models;
pub mod protocol;
pub mod security;
pub mod source;
pub mod validation;

// Re-export commonly used types
pub use adapters::{
    CONNECTION_CHARSET, ConnectionConfig, Connector, DEFAULT_PORT, SourceConfig, SourceConnection,
};
pub use error::{Result, SourceError};
pub use logging::{LogFormat, init_logging};
pub use models::{
    CheckOutcome, ColumnDescriptor, FieldValue, PortableType, Record, SourceRow, StreamCatalog,
    SyncMode, TableDescriptor,
};
pub use protocol::{ConfiguredCatalog, Message};
pub use security::Credentials;
pub use source::{FirebirdSource, ReadSession, ReadSummary, RecordIter};
pub use validation::ValidationError;

#[cfg(feature = "firebird")]
pub use adapters::firebird::FirebirdConnector;
