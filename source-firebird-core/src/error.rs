//! Error types for the Firebird source.
//!
//! Every error produced here is safe to surface to the host framework:
//! connection errors carry the driver's diagnostic and a context string,
//! never the configured password.

use thiserror::Error;

/// Main error type for source operations.
///
/// # Security
/// Context strings are built from host, database path, table and stream
/// names only. Credentials never appear in error output.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Could not establish the backing connection
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A SQL statement failed or a result row could not be fetched
    #[error("Query execution failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration document is unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration document does not satisfy the connection specification
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationError),

    /// Unsupported operation for the compiled feature set
    #[error("Unsupported operation: {feature} ({hint})")]
    UnsupportedFeature { feature: String, hint: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with `SourceError`
pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Creates a connection error for the given target description.
    ///
    /// `target` should be the credential-free display form of the
    /// connection (`host[/port]:database`), as written by
    /// [`ConnectionConfig`](crate::ConnectionConfig)'s `Display`.
    pub fn connection_failed<E>(target: impl std::fmt::Display, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: format!("cannot connect to {target}"),
            source: Box::new(error),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an unsupported feature error
    pub fn unsupported_feature(feature: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            feature: feature.into(),
            hint: hint.into(),
        }
    }

    /// Full message including the chain of underlying causes.
    ///
    /// Used where a single human-readable line is required, such as a
    /// failed connection check.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
