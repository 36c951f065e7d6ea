//! Configuration types for the Firebird source.
//!
//! - `ConnectionConfig`: where the database lives
//! - `SourceConfig`: the full configuration document (target, credentials,
//!   type table)
//!
//! # Security
//! `ConnectionConfig` intentionally does NOT store credentials; they are
//! kept in [`Credentials`](crate::security::Credentials).

mod connection;
mod source;

pub use connection::{CONNECTION_CHARSET, ConnectionConfig, DEFAULT_PORT};
pub use source::SourceConfig;
