//! In-memory connector used by the integration tests.
//!
//! Models just enough of a Firebird server to drive the source
//! operations: a set of tables with typed columns and rows, plus knobs to
//! make the server unreachable or make individual queries fail.

#![allow(dead_code)]

use source_firebird_core::adapters::{CatalogColumn, Connector, RowCursor, SourceConnection};
use source_firebird_core::models::{FieldValue, SourceRow};
use source_firebird_core::security::Credentials;
use source_firebird_core::{ConnectionConfig, Result, SourceConfig, SourceError};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A table known to the fake server.
#[derive(Debug, Clone, Default)]
pub struct FakeTable {
    pub name: String,
    pub columns: Vec<CatalogColumn>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl FakeTable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn column(self, name: &str, type_code: i16) -> Self {
        self.catalog_column(CatalogColumn::new(name, type_code))
    }

    pub fn catalog_column(mut self, column: CatalogColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn row(mut self, values: Vec<FieldValue>) -> Self {
        self.rows.push(values);
        self
    }

    fn source_rows(&self) -> Vec<SourceRow> {
        self.rows
            .iter()
            .map(|values| {
                SourceRow::new(
                    self.columns
                        .iter()
                        .map(|column| column.name.clone())
                        .zip(values.iter().cloned())
                        .collect(),
                )
            })
            .collect()
    }
}

/// Behaviour of the fake server.
#[derive(Debug, Default)]
pub struct FakeDatabase {
    pub tables: Vec<FakeTable>,
    /// Connection attempts fail with this message
    pub unreachable: Option<String>,
    /// The liveness probe fails with this message
    pub probe_error: Option<String>,
    /// Column listing fails for these tables
    pub broken_tables: Vec<String>,
    /// Fetching fails after this many rows of the named table
    pub fetch_failure: Option<(String, usize)>,
    /// Results of ad hoc statements, by exact SQL text
    pub ad_hoc: HashMap<String, Vec<SourceRow>>,
}

/// Connector handing out connections to a shared [`FakeDatabase`].
#[derive(Debug, Clone)]
pub struct FakeConnector {
    database: Arc<FakeDatabase>,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
    statements: Arc<std::sync::Mutex<Vec<String>>>,
}

impl FakeConnector {
    pub fn new(database: FakeDatabase) -> Self {
        Self {
            database: Arc::new(database),
            open: Arc::new(AtomicUsize::new(0)),
            opened: Arc::new(AtomicUsize::new(0)),
            statements: Arc::default(),
        }
    }

    /// Connections currently open.
    pub fn open_connections(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Connections opened since creation.
    pub fn opened_connections(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Every statement issued so far, in order.
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .map(|statements| statements.clone())
            .unwrap_or_default()
    }
}

impl Connector for FakeConnector {
    fn connect(&self, config: &SourceConfig) -> Result<Box<dyn SourceConnection>> {
        config.validate()?;

        if let Some(message) = &self.database.unreachable {
            return Err(SourceError::connection_failed(
                &config.connection,
                std::io::Error::other(message.clone()),
            ));
        }

        self.open.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeConnection {
            database: Arc::clone(&self.database),
            open: Arc::clone(&self.open),
            statements: Arc::clone(&self.statements),
        }))
    }
}

struct FakeConnection {
    database: Arc<FakeDatabase>,
    open: Arc<AtomicUsize>,
    statements: Arc<std::sync::Mutex<Vec<String>>>,
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FakeConnection {
    fn record(&self, sql: &str) {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(sql.to_string());
        }
    }

    fn table(&self, name: &str) -> Option<&FakeTable> {
        self.database.tables.iter().find(|table| table.name == name)
    }
}

fn failure(message: &str) -> std::io::Error {
    std::io::Error::other(message.to_string())
}

/// Extracts the table name from `SELECT <items> FROM "NAME"`.
fn select_target(sql: &str) -> Option<String> {
    let rest = sql.strip_prefix("SELECT ")?;
    let (_, quoted) = rest.rsplit_once(" FROM \"")?;
    let inner = quoted.strip_suffix('"')?;
    Some(inner.replace("\"\"", "\""))
}

impl SourceConnection for FakeConnection {
    fn probe(&mut self) -> Result<()> {
        self.record("SELECT 1 FROM RDB$DATABASE");
        match &self.database.probe_error {
            Some(message) => Err(SourceError::query_failed("liveness probe", failure(message))),
            None => Ok(()),
        }
    }

    fn list_tables(&mut self) -> Result<Vec<String>> {
        self.record("list tables");
        Ok(self
            .database
            .tables
            .iter()
            .map(|table| table.name.clone())
            .collect())
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>> {
        self.record(&format!("list columns {table}"));
        if self.database.broken_tables.iter().any(|name| name == table) {
            return Err(SourceError::query_failed(
                format!("listing columns of {table}"),
                failure("no permission for SELECT access"),
            ));
        }

        Ok(self
            .table(table)
            .map(|table| table.columns.clone())
            .unwrap_or_default())
    }

    fn query_rows<'a>(&'a mut self, sql: &str) -> Result<RowCursor<'a>> {
        self.record(sql);

        if let Some(rows) = self.database.ad_hoc.get(sql) {
            return Ok(Box::new(rows.clone().into_iter().map(Ok)));
        }

        let Some(name) = select_target(sql) else {
            return Err(SourceError::query_failed(sql, failure("Token unknown")));
        };
        let Some(table) = self.table(&name) else {
            return Err(SourceError::query_failed(
                sql,
                failure(&format!("Table unknown {name}")),
            ));
        };

        let rows = table.source_rows();
        let fail_after = self
            .database
            .fetch_failure
            .as_ref()
            .filter(|(failing, _)| *failing == name)
            .map(|(_, after)| *after);

        match fail_after {
            Some(after) => {
                let head: Vec<Result<SourceRow>> = rows.into_iter().take(after).map(Ok).collect();
                let tail = std::iter::once(Err(SourceError::query_failed(
                    format!("fetching rows of {name}"),
                    failure("connection lost"),
                )));
                Ok(Box::new(head.into_iter().chain(tail)))
            }
            None => Ok(Box::new(rows.into_iter().map(Ok))),
        }
    }
}

/// A valid configuration pointing at the fake server.
pub fn test_config() -> SourceConfig {
    SourceConfig::new(
        ConnectionConfig::new("db1".to_string(), "/data/test.fdb".to_string()),
        Credentials::new("SYSDBA".to_string(), "masterkey".to_string()),
    )
}

/// The CUSTOMERS table used throughout the examples.
pub fn customers() -> FakeTable {
    FakeTable::new("CUSTOMERS")
        .column("ID", 8)
        .column("NAME", 37)
        .row(vec![
            FieldValue::Integer(1),
            FieldValue::Text("Ann".to_string()),
        ])
        .row(vec![
            FieldValue::Integer(2),
            FieldValue::Text("Bob".to_string()),
        ])
}
