//! Record-interchange protocol shapes.
//!
//! Messages are newline-delimited JSON objects tagged by `type`. Only the
//! shapes this source produces or consumes are modelled; orchestration
//! and state persistence belong to the host framework.

use crate::error::SourceError;
use crate::models::{CheckOutcome, Record, StreamCatalog, SyncMode};
use crate::{Result, validation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One protocol message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Answer to `spec`
    Spec {
        /// Configuration the connector accepts
        spec: ConnectorSpecification,
    },
    /// Answer to `check`
    ConnectionStatus {
        /// Check result
        #[serde(rename = "connectionStatus")]
        connection_status: ConnectionStatus,
    },
    /// Answer to `discover`
    Catalog {
        /// Streams offered
        catalog: Catalog,
    },
    /// One extracted row
    Record {
        /// Row payload
        record: Record,
    },
    /// Log line forwarded to the host framework
    Log {
        /// Level and text
        log: LogMessage,
    },
    /// Structured failure report
    Trace {
        /// Failure details
        trace: TraceMessage,
    },
}

impl Message {
    /// Wraps a record.
    pub fn record(record: Record) -> Self {
        Self::Record { record }
    }

    /// Builds a log message.
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            log: LogMessage {
                level,
                message: message.into(),
            },
        }
    }

    /// Builds an error trace announcing that the operation failed.
    pub fn error_trace(
        message: impl Into<String>,
        internal_message: Option<String>,
        failure_type: FailureType,
    ) -> Self {
        Self::Trace {
            trace: TraceMessage {
                trace_type: TraceType::Error,
                emitted_at: chrono::Utc::now().timestamp_millis(),
                error: ErrorTrace {
                    message: message.into(),
                    internal_message,
                    failure_type,
                },
            },
        }
    }
}

impl From<CheckOutcome> for Message {
    fn from(outcome: CheckOutcome) -> Self {
        Self::ConnectionStatus {
            connection_status: outcome.into(),
        }
    }
}

impl From<&StreamCatalog> for Message {
    fn from(catalog: &StreamCatalog) -> Self {
        Self::Catalog {
            catalog: catalog.into(),
        }
    }
}

/// What the connector needs to be configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorSpecification {
    /// Where users find setup instructions
    #[serde(rename = "documentationUrl")]
    pub documentation_url: String,
    /// Draft-07 schema of the configuration document
    #[serde(rename = "connectionSpecification")]
    pub connection_specification: serde_json::Value,
    /// Always false
    #[serde(rename = "supportsIncremental")]
    pub supports_incremental: bool,
    /// Destination modes compatible with full refresh
    pub supported_destination_sync_modes: Vec<String>,
}

impl ConnectorSpecification {
    /// Specification of this source.
    ///
    /// # Errors
    /// Returns error if the embedded connection specification is not valid JSON
    pub fn firebird() -> Result<Self> {
        Ok(Self {
            documentation_url: validation::DOCUMENTATION_URL.to_string(),
            connection_specification: validation::connection_specification()?,
            supports_incremental: false,
            supported_destination_sync_modes: vec!["overwrite".to_string()],
        })
    }
}

/// Two-outcome connection check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Outcome
    pub status: Status,
    /// Failure reason; absent on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Connection check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The database answered
    Succeeded,
    /// The database could not be reached or queried
    Failed,
}

impl From<CheckOutcome> for ConnectionStatus {
    fn from(outcome: CheckOutcome) -> Self {
        match outcome {
            CheckOutcome::Succeeded => Self {
                status: Status::Succeeded,
                message: None,
            },
            CheckOutcome::Failed { message } => Self {
                status: Status::Failed,
                message: Some(message),
            },
        }
    }
}

/// Streams offered by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// One entry per discovered table
    pub streams: Vec<Stream>,
}

/// A named, schema-described stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    /// Table name
    pub name: String,
    /// Draft-07 object schema of a record's data
    #[serde(default)]
    pub json_schema: serde_json::Value,
    /// Sync modes the source can serve for this stream
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,
}

impl From<&StreamCatalog> for Catalog {
    fn from(catalog: &StreamCatalog) -> Self {
        Self {
            streams: catalog
                .tables
                .iter()
                .map(|table| Stream {
                    name: table.name.clone(),
                    json_schema: table.json_schema(),
                    supported_sync_modes: vec![SyncMode::FullRefresh],
                })
                .collect(),
        }
    }
}

/// Caller-narrowed catalog passed to `read`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams in read order
    pub streams: Vec<ConfiguredStream>,
}

/// One selected stream and the sync mode requested for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// The stream as discovered
    pub stream: Stream,
    /// Requested sync mode; full refresh when omitted
    #[serde(default = "default_sync_mode")]
    pub sync_mode: SyncMode,
    /// Passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_sync_mode: Option<String>,
}

const fn default_sync_mode() -> SyncMode {
    SyncMode::FullRefresh
}

impl ConfiguredCatalog {
    /// Reads a configured catalog from disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or decoded
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            context: format!("Failed to read catalog file {}", path.display()),
            source: e,
        })?;

        serde_json::from_str(&contents).map_err(|e| SourceError::Serialization {
            context: format!("Failed to decode catalog file {}", path.display()),
            source: e,
        })
    }

    /// Selected stream names in file order, whatever sync mode each
    /// requested.
    pub fn stream_names(&self) -> Vec<String> {
        self.streams
            .iter()
            .map(|configured| configured.stream.name.clone())
            .collect()
    }

    /// Selected streams that asked for anything but full refresh.
    pub fn non_full_refresh(&self) -> impl Iterator<Item = &ConfiguredStream> {
        self.streams
            .iter()
            .filter(|configured| configured.sync_mode != SyncMode::FullRefresh)
    }
}

/// Log line for the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Severity
    pub level: LogLevel,
    /// Log text
    pub message: String,
}

/// Protocol log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Unrecoverable
    Fatal,
    /// Operation failed
    Error,
    /// Degraded but continuing
    Warn,
    /// Progress
    Info,
    /// Diagnostics
    Debug,
    /// Verbose diagnostics
    Trace,
}

/// Structured failure report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceMessage {
    /// Trace kind
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    /// Wall-clock milliseconds since the Unix epoch
    pub emitted_at: i64,
    /// What went wrong
    pub error: ErrorTrace,
}

/// Trace kinds. Only errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TraceType {
    /// The operation failed
    Error,
}

/// Error details of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTrace {
    /// User-facing summary
    pub message: String,
    /// Full cause chain, if different from the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_message: Option<String>,
    /// Who is expected to fix it
    pub failure_type: FailureType,
}

/// Who is expected to fix a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureType {
    /// Server, network or connector fault
    SystemError,
    /// Invalid configuration supplied by the user
    ConfigError,
}

impl FailureType {
    /// Classifies an error: bad configuration is the user's to fix,
    /// everything else is reported as a system error.
    pub const fn of(error: &SourceError) -> Self {
        match error {
            SourceError::Configuration { .. } | SourceError::Validation(_) => Self::ConfigError,
            _ => Self::SystemError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnDescriptor, PortableType, TableDescriptor};
    use serde_json::json;

    #[test]
    fn test_connection_status_messages() {
        let ok = serde_json::to_value(Message::from(CheckOutcome::Succeeded)).unwrap();
        assert_eq!(
            ok,
            json!({ "type": "CONNECTION_STATUS", "connectionStatus": { "status": "SUCCEEDED" } })
        );

        let failed = serde_json::to_value(Message::from(CheckOutcome::Failed {
            message: "Error connecting to Firebird: refused".to_string(),
        }))
        .unwrap();
        assert_eq!(failed["connectionStatus"]["status"], "FAILED");
        assert_eq!(
            failed["connectionStatus"]["message"],
            "Error connecting to Firebird: refused"
        );
    }

    #[test]
    fn test_catalog_message() {
        let catalog = StreamCatalog {
            tables: vec![TableDescriptor::new(
                "CUSTOMERS",
                vec![ColumnDescriptor {
                    name: "ID".to_string(),
                    vendor_type_code: 8,
                    portable_type: PortableType::Integer,
                }],
            )],
            warnings: vec!["Skipped table BROKEN: denied".to_string()],
        };

        let value = serde_json::to_value(Message::from(&catalog)).unwrap();
        assert_eq!(value["type"], "CATALOG");
        let stream = &value["catalog"]["streams"][0];
        assert_eq!(stream["name"], "CUSTOMERS");
        assert_eq!(stream["supported_sync_modes"], json!(["full_refresh"]));
        assert_eq!(stream["json_schema"]["properties"]["ID"]["type"], "integer");
        assert!(value.to_string().find("BROKEN").is_none());
    }

    #[test]
    fn test_record_message() {
        let record = Record {
            stream: "CUSTOMERS".to_string(),
            data: [("ID".to_string(), Some("1".to_string()))].into_iter().collect(),
            emitted_at: 42,
        };

        let value = serde_json::to_value(Message::record(record)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "RECORD",
                "record": { "stream": "CUSTOMERS", "data": { "ID": "1" }, "emitted_at": 42 }
            })
        );
    }

    #[test]
    fn test_spec_message() {
        let spec = ConnectorSpecification::firebird().unwrap();
        let value = serde_json::to_value(Message::Spec { spec }).unwrap();

        assert_eq!(value["type"], "SPEC");
        assert_eq!(value["spec"]["supportsIncremental"], false);
        assert_eq!(
            value["spec"]["connectionSpecification"]["required"],
            json!(["host", "database", "user", "password"])
        );
    }

    #[test]
    fn test_error_trace() {
        let message = Message::error_trace("boom", Some("detail".to_string()), FailureType::SystemError);
        let value = serde_json::to_value(message).unwrap();

        assert_eq!(value["type"], "TRACE");
        assert_eq!(value["trace"]["type"], "ERROR");
        assert_eq!(value["trace"]["error"]["failure_type"], "system_error");
        assert_eq!(value["trace"]["error"]["internal_message"], "detail");
    }

    #[test]
    fn test_configured_catalog_stream_names_keep_order() {
        let catalog: ConfiguredCatalog = serde_json::from_value(json!({
            "streams": [
                { "stream": { "name": "ORDERS", "json_schema": {} }, "sync_mode": "full_refresh", "destination_sync_mode": "overwrite" },
                { "stream": { "name": "CUSTOMERS" }, "sync_mode": "incremental" },
                { "stream": { "name": "ITEMS" } }
            ]
        }))
        .unwrap();

        assert_eq!(catalog.stream_names(), vec!["ORDERS", "CUSTOMERS", "ITEMS"]);
        assert_eq!(catalog.streams[2].sync_mode, SyncMode::FullRefresh);
    }

    #[test]
    fn test_configured_catalog_non_full_refresh_streams() {
        let catalog: ConfiguredCatalog = serde_json::from_value(json!({
            "streams": [
                { "stream": { "name": "ORDERS" }, "sync_mode": "full_refresh" },
                { "stream": { "name": "CUSTOMERS" }, "sync_mode": "incremental" },
                { "stream": { "name": "ITEMS" } }
            ]
        }))
        .unwrap();

        let incremental: Vec<&str> = catalog
            .non_full_refresh()
            .map(|configured| configured.stream.name.as_str())
            .collect();
        assert_eq!(incremental, vec!["CUSTOMERS"]);
    }

    #[test]
    fn test_configured_catalog_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"streams":[{"stream":{"name":"CUSTOMERS"}}]}"#).unwrap();

        let catalog = ConfiguredCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.stream_names(), vec!["CUSTOMERS"]);
    }

    #[test]
    fn test_failure_type_classification() {
        assert_eq!(
            FailureType::of(&SourceError::configuration("bad")),
            FailureType::ConfigError
        );
        assert_eq!(
            FailureType::of(&SourceError::query_failed("q", std::io::Error::other("x"))),
            FailureType::SystemError
        );
    }
}
