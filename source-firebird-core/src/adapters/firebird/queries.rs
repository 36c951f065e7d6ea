//! System catalog statements and the per-stream extraction query.

use super::field_type;
use crate::adapters::{CatalogColumn, quote_identifier, select_all_query};

/// Liveness probe against the one-row system relation.
pub const PROBE: &str = "SELECT 1 FROM RDB$DATABASE";

/// Non-system relations. Older servers leave `RDB$SYSTEM_FLAG` NULL for
/// user relations.
pub const LIST_TABLES: &str = "SELECT RDB$RELATION_NAME \
     FROM RDB$RELATIONS \
     WHERE COALESCE(RDB$SYSTEM_FLAG, 0) = 0";

/// Non-system columns of one relation with the type code, scale and sub
/// type of their domain.
pub const LIST_COLUMNS: &str = "SELECT rf.RDB$FIELD_NAME, f.RDB$FIELD_TYPE, \
            COALESCE(f.RDB$FIELD_SCALE, 0), COALESCE(f.RDB$FIELD_SUB_TYPE, 0) \
     FROM RDB$RELATION_FIELDS rf \
     JOIN RDB$FIELDS f ON f.RDB$FIELD_NAME = rf.RDB$FIELD_SOURCE \
     WHERE rf.RDB$RELATION_NAME = ? \
       AND COALESCE(rf.RDB$SYSTEM_FLAG, 0) = 0 \
     ORDER BY rf.RDB$FIELD_POSITION";

/// Wide enough for a DECFLOAT(34), a NUMERIC(38) or a timestamp with a
/// region time zone name.
const TEXT_CAST_LENGTH: u16 = 64;

/// How one column is requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Projection {
    /// Fetched as stored
    Plain,
    /// Formatted by the server as text
    Text,
    /// Fetched as an untyped binary BLOB
    Binary,
}

/// The driver narrows DATE and TIME to timestamps, turns scaled integers
/// into doubles and rejects the Firebird 4 numeric and time zone types as
/// well as BLOB sub types other than binary and text. Those columns are
/// rendered on the server instead.
fn projection(column: &CatalogColumn) -> Projection {
    match column.vendor_type_code {
        field_type::DATE
        | field_type::TIME
        | field_type::DEC16
        | field_type::DEC34
        | field_type::INT128
        | field_type::TIME_TZ
        | field_type::TIMESTAMP_TZ => Projection::Text,
        field_type::SHORT | field_type::LONG | field_type::INT64 | field_type::DOUBLE
            if column.scale != 0 =>
        {
            Projection::Text
        }
        field_type::BLOB if !matches!(column.sub_type, 0 | 1) => Projection::Binary,
        _ => Projection::Plain,
    }
}

fn select_item(column: &CatalogColumn) -> String {
    let name = quote_identifier(&column.name);
    match projection(column) {
        Projection::Plain => name,
        Projection::Text => format!("CAST({name} AS VARCHAR({TEXT_CAST_LENGTH})) AS {name}"),
        Projection::Binary => format!("CAST({name} AS BLOB SUB_TYPE 0) AS {name}"),
    }
}

/// Full-refresh query for a stream, listing its catalog columns in field
/// position order.
///
/// Without column metadata the statement falls back to `SELECT *` so an
/// unknown relation is still reported by the server.
///
/// # Example
/// ```rust
/// use source_firebird_core::adapters::CatalogColumn;
/// use source_firebird_core::adapters::firebird::queries::select_stream;
///
/// let columns = [CatalogColumn::new("ID", 8), CatalogColumn::new("BORN", 12)];
/// assert_eq!(
///     select_stream("PEOPLE", &columns),
///     "SELECT \"ID\", CAST(\"BORN\" AS VARCHAR(64)) AS \"BORN\" FROM \"PEOPLE\""
/// );
/// ```
pub fn select_stream(table: &str, columns: &[CatalogColumn]) -> String {
    if columns.is_empty() {
        return select_all_query(table);
    }

    let items: Vec<String> = columns.iter().map(select_item).collect();
    format!("SELECT {} FROM {}", items.join(", "), quote_identifier(table))
}
