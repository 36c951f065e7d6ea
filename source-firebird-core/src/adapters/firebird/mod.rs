//! Firebird adapter.
//!
//! # Module Structure
//! - `type_mapping`: `RDB$FIELD_TYPE` codes to portable schema types
//! - `connection`: driver-backed connector (requires the `firebird` feature)
//! - `queries`: system catalog statements and the per-stream select
//!
//! # Firebird-Specific Notes
//! - Relation and field names are stored as space-padded CHAR values and
//!   are trimmed on read
//! - Every connection requests the ISO8859_1 character set
//! - Stream reads list columns explicitly; types the driver narrows or
//!   rejects are cast on the server
//! - The wire protocol is implemented in pure Rust; no client library is
//!   loaded

#[cfg(feature = "firebird")]
mod connection;
pub mod queries;
pub mod type_mapping;

#[cfg(feature = "firebird")]
pub use connection::FirebirdConnector;
pub use type_mapping::{TypeMapping, field_type, map_firebird_type};
