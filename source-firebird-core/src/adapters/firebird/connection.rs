//! Firebird connection handling over the pure-Rust wire protocol.
//!
//! Each call to [`FirebirdConnector::connect`] attaches to the database
//! once; the attachment is detached when the returned connection is
//! dropped. Statements opened by [`SourceConnection::query_rows`] live as
//! long as their cursor.

use super::queries;
use crate::Result;
use crate::adapters::{
    CONNECTION_CHARSET, CatalogColumn, Connector, RowCursor, SourceConfig, SourceConnection,
};
use crate::error::SourceError;
use crate::models::{FieldValue, SourceRow};
use rsfbclient::prelude::*;
use rsfbclient::{Row, SqlType};

/// Connector backed by `rsfbclient`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirebirdConnector;

impl Connector for FirebirdConnector {
    fn connect(&self, config: &SourceConfig) -> Result<Box<dyn SourceConnection>> {
        config.validate()?;

        let target = config.connection.to_string();
        tracing::debug!(
            "Attaching to Firebird database {} with charset {}",
            target,
            CONNECTION_CHARSET
        );

        let conn = rsfbclient::builder_pure_rust()
            .host(config.connection.host.as_str())
            .port(config.connection.effective_port())
            .db_name(config.connection.database.as_str())
            .user(config.credentials.username())
            .pass(config.credentials.password())
            .charset(rsfbclient::charset::ISO_8859_1)
            .connect()
            .map_err(|e| SourceError::connection_failed(&target, e))?;

        Ok(Box::new(FirebirdConnection { conn, target }))
    }
}

/// One attachment to a Firebird database.
struct FirebirdConnection<Q> {
    conn: Q,
    /// Credential-free description used in error context
    target: String,
}

impl<Q> Drop for FirebirdConnection<Q> {
    fn drop(&mut self) {
        tracing::trace!("Detaching from Firebird database {}", self.target);
    }
}

impl<Q: Queryable> SourceConnection for FirebirdConnection<Q> {
    fn probe(&mut self) -> Result<()> {
        let _: Option<(i64,)> = self
            .conn
            .query_first(queries::PROBE, ())
            .map_err(|e| {
                SourceError::query_failed(format!("liveness probe on {}", self.target), e)
            })?;
        Ok(())
    }

    fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self.conn.query(queries::LIST_TABLES, ()).map_err(|e| {
            SourceError::query_failed(format!("listing relations of {}", self.target), e)
        })?;

        Ok(rows
            .into_iter()
            .map(|(name,)| name.trim().to_string())
            .collect())
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>> {
        let rows: Vec<(String, i64, i64, i64)> = self
            .conn
            .query(queries::LIST_COLUMNS, (table.to_string(),))
            .map_err(|e| SourceError::query_failed(format!("listing columns of {table}"), e))?;

        rows.into_iter()
            .map(|(name, code, scale, sub_type)| {
                let name = name.trim().to_string();
                let narrow = |what: &str, value: i64| {
                    i16::try_from(value).map_err(|e| {
                        SourceError::query_failed(
                            format!("{what} {value} of {table}.{name} out of range"),
                            e,
                        )
                    })
                };
                let vendor_type_code = narrow("field type code", code)?;
                let scale = narrow("field scale", scale)?;
                let sub_type = narrow("field sub type", sub_type)?;
                Ok(CatalogColumn::new(name, vendor_type_code)
                    .with_scale(scale)
                    .with_sub_type(sub_type))
            })
            .collect()
    }

    fn query_rows<'a>(&'a mut self, sql: &str) -> Result<RowCursor<'a>> {
        let rows = self
            .conn
            .query_iter::<_, Row>(sql, ())
            .map_err(|e| SourceError::query_failed(format!("executing `{sql}`"), e))?;

        let statement = sql.to_string();
        Ok(Box::new(rows.map(move |row| {
            row.map(convert_row).map_err(|e| {
                SourceError::query_failed(format!("fetching rows of `{statement}`"), e)
            })
        })))
    }
}

/// Converts a driver row, keeping the select-list column order.
fn convert_row(row: Row) -> SourceRow {
    SourceRow::new(
        row.cols
            .into_iter()
            .map(|column| (column.name, convert_value(column.value)))
            .collect(),
    )
}

/// Converts a driver value into the driver-independent representation.
#[allow(unreachable_patterns)]
fn convert_value(value: SqlType) -> FieldValue {
    match value {
        SqlType::Text(text) => FieldValue::Text(text),
        SqlType::Integer(value) => FieldValue::Integer(value),
        SqlType::Floating(value) => FieldValue::Float(value),
        SqlType::Timestamp(value) => FieldValue::Timestamp(value),
        SqlType::Binary(bytes) => FieldValue::Binary(bytes),
        SqlType::Boolean(value) => FieldValue::Boolean(value),
        SqlType::Null => FieldValue::Null,
        // Variants added by newer driver releases are carried as text
        other => FieldValue::Text(format!("{other:?}")),
    }
}
