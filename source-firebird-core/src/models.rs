//! Core data models for discovered streams and extracted records.
//!
//! Descriptors are built fresh on every discovery call and never
//! persisted. Records are produced per source row and handed straight to
//! the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON Schema dialect advertised for every stream schema.
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Reduced type vocabulary exposed to the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortableType {
    /// Text; also the fallback for every unmapped vendor type
    String,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Number,
}

impl PortableType {
    /// JSON Schema `type` keyword for this portable type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
        }
    }
}

impl std::fmt::Display for PortableType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sync modes a stream may advertise. Only full refresh is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Every row of the stream on every read
    FullRefresh,
    /// Only rows changed since the last read; accepted but never honored
    Incremental,
}

/// A user column of a discovered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, whitespace trimmed
    pub name: String,
    /// Raw `RDB$FIELD_TYPE` code from the system catalog
    pub vendor_type_code: i16,
    /// Type advertised in the stream schema
    pub portable_type: PortableType,
}

/// A discovered table and its columns in source metadata order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Relation name, whitespace trimmed
    pub name: String,
    /// Columns in field position order
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    /// Creates a descriptor from a table name and its columns.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Draft-07 object schema whose properties map each column name to
    /// its portable type.
    pub fn json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .columns
            .iter()
            .map(|column| {
                (
                    column.name.clone(),
                    serde_json::json!({ "type": column.portable_type.as_str() }),
                )
            })
            .collect();

        serde_json::json!({
            "$schema": JSON_SCHEMA_DRAFT_07,
            "type": "object",
            "properties": properties,
        })
    }
}

/// The set of streams offered by the source, keyed by table name.
///
/// Iteration order follows the system catalog and is not guaranteed to
/// be stable across server versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamCatalog {
    /// Discovered tables
    pub tables: Vec<TableDescriptor>,
    /// Tables skipped during discovery and why
    pub warnings: Vec<String>,
}

impl StreamCatalog {
    /// Looks up a stream by name.
    pub fn get(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Stream names in discovery order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    /// Number of discovered streams.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether discovery found no streams.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Outcome of a connection check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The liveness probe answered
    Succeeded,
    /// Connecting or probing failed
    Failed {
        /// Human-readable reason, prefixed with `Error connecting to Firebird`
        message: String,
    },
}

impl CheckOutcome {
    /// Whether the backing store answered the liveness probe.
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// One extracted row, tagged with the stream it came from.
///
/// Serializes to the record payload of the interchange protocol:
/// `{"stream", "data", "emitted_at"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Stream the row was read from
    pub stream: String,
    /// Column name to stringified value; SQL NULL becomes `null`
    pub data: BTreeMap<String, Option<String>>,
    /// Wall-clock milliseconds since the Unix epoch, taken when the
    /// record was handed to the caller
    pub emitted_at: i64,
}

/// Driver-independent value of a single result column.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Character data, and anything the server formatted as text
    Text(String),
    /// Unscaled integer
    Integer(i64),
    /// Floating point
    Float(f64),
    /// Timestamp without time zone
    Timestamp(chrono::NaiveDateTime),
    /// Raw bytes
    Binary(Vec<u8>),
    /// BOOLEAN
    Boolean(bool),
    /// SQL NULL
    Null,
}

impl FieldValue {
    /// Renders the value as the string carried in a record.
    ///
    /// Returns `None` for SQL NULL. Binary values are base64 encoded.
    pub fn render(&self) -> Option<String> {
        use base64::Engine as _;

        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Timestamp(value) => Some(value.to_string()),
            Self::Binary(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Self::Boolean(value) => Some(value.to_string()),
            Self::Null => None,
        }
    }
}

/// A result row: column names (from the result metadata) paired with
/// their values, in select-list order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRow {
    pub fields: Vec<(String, FieldValue)>,
}

impl SourceRow {
    /// Builds a row from `(column, value)` pairs.
    pub fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    /// Stringifies every value into a record payload.
    pub fn into_data(self) -> BTreeMap<String, Option<String>> {
        self.fields
            .into_iter()
            .map(|(name, value)| (name, value.render()))
            .collect()
    }
}
