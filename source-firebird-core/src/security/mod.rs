//! Credential protection.
//!
//! Credentials are kept apart from [`ConnectionConfig`](crate::adapters::ConnectionConfig)
//! so that configuration can be displayed, logged and serialized freely.

mod credentials;

pub use credentials::Credentials;
