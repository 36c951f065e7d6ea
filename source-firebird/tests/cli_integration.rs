//! Command dispatch tests.
//!
//! Drive every command through `execute` with an in-memory connector and
//! a byte buffer standing in for stdout, then check the emitted protocol
//! messages line by line.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use clap::Parser;
use serde_json::{Value, json};
use source_firebird::{Cli, MessageWriter, execute, failure_trace};
use source_firebird_core::adapters::{CatalogColumn, Connector, RowCursor, SourceConnection};
use source_firebird_core::models::{FieldValue, SourceRow};
use source_firebird_core::{FirebirdSource, Result, SourceConfig, SourceError};
use std::io::Write;
use tempfile::NamedTempFile;

/// Serves one CUSTOMERS table and one ad hoc statement.
#[derive(Clone, Default)]
struct FakeConnector {
    unreachable: bool,
}

struct FakeConnection;

impl Connector for FakeConnector {
    fn connect(&self, config: &SourceConfig) -> Result<Box<dyn SourceConnection>> {
        if self.unreachable {
            return Err(SourceError::connection_failed(
                &config.connection,
                std::io::Error::other("connection refused"),
            ));
        }
        Ok(Box::new(FakeConnection))
    }
}

fn customer(id: i64, name: &str) -> SourceRow {
    SourceRow::new(vec![
        ("ID".to_string(), FieldValue::Integer(id)),
        ("NAME".to_string(), FieldValue::Text(name.to_string())),
    ])
}

impl SourceConnection for FakeConnection {
    fn probe(&mut self) -> Result<()> {
        Ok(())
    }

    fn list_tables(&mut self) -> Result<Vec<String>> {
        Ok(vec!["CUSTOMERS".to_string(), "AUDIT".to_string()])
    }

    fn list_columns(&mut self, table: &str) -> Result<Vec<CatalogColumn>> {
        if table == "AUDIT" {
            return Err(SourceError::query_failed(
                "listing columns of AUDIT",
                std::io::Error::other("no permission"),
            ));
        }
        if table != "CUSTOMERS" {
            return Ok(Vec::new());
        }
        Ok(vec![CatalogColumn::new("ID", 8), CatalogColumn::new("NAME", 37)])
    }

    fn query_rows<'a>(&'a mut self, sql: &str) -> Result<RowCursor<'a>> {
        match sql {
            "SELECT \"ID\", \"NAME\" FROM \"CUSTOMERS\"" => Ok(Box::new(
                vec![customer(1, "Ann"), customer(2, "Bo")].into_iter().map(Ok),
            )),
            "SELECT COUNT(*) AS TOTAL FROM CUSTOMERS" => Ok(Box::new(std::iter::once(Ok(
                SourceRow::new(vec![("TOTAL".to_string(), FieldValue::Integer(2))]),
            )))),
            _ => Err(SourceError::query_failed(
                sql,
                std::io::Error::other("Table unknown"),
            )),
        }
    }
}

fn json_file(value: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{value}").unwrap();
    file
}

fn config_file() -> NamedTempFile {
    json_file(&json!({
        "host": "db1",
        "database": "/data/test.fdb",
        "user": "SYSDBA",
        "password": "x"
    }))
}

/// Runs a command line and returns the emitted messages.
fn run(args: &[&str], connector: FakeConnector) -> (anyhow::Result<()>, Vec<Value>) {
    let cli = Cli::try_parse_from(std::iter::once("source-firebird").chain(args.iter().copied()))
        .unwrap();
    let source = FirebirdSource::new(Box::new(connector));
    let mut writer = MessageWriter::new(Vec::new());

    let result = execute(&cli.command, &source, &mut writer);

    let output = String::from_utf8(writer.into_inner()).unwrap();
    let messages = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (result, messages)
}

#[test]
fn test_spec_command() {
    let (result, messages) = run(&["spec"], FakeConnector::default());

    assert!(result.is_ok());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["type"], "SPEC");
    assert_eq!(
        messages[0]["spec"]["connectionSpecification"]["properties"]["port"]["default"],
        3050
    );
}

#[test]
fn test_check_command_succeeds() {
    let config = config_file();
    let path = config.path().to_str().unwrap();

    let (result, messages) = run(&["check", "--config", path], FakeConnector::default());

    assert!(result.is_ok());
    assert_eq!(
        messages,
        vec![json!({ "type": "CONNECTION_STATUS", "connectionStatus": { "status": "SUCCEEDED" } })]
    );
}

#[test]
fn test_check_command_reports_failure_without_error() {
    let config = config_file();
    let path = config.path().to_str().unwrap();

    let (result, messages) = run(
        &["check", "--config", path],
        FakeConnector { unreachable: true },
    );

    assert!(result.is_ok());
    assert_eq!(messages[0]["connectionStatus"]["status"], "FAILED");
    let message = messages[0]["connectionStatus"]["message"].as_str().unwrap();
    assert!(message.starts_with("Error connecting to Firebird: "));
}

#[test]
fn test_check_command_with_invalid_config() {
    let config = json_file(&json!({ "host": "db1" }));
    let path = config.path().to_str().unwrap();

    let (result, messages) = run(&["check", "--config", path], FakeConnector::default());

    assert!(result.is_ok());
    assert_eq!(messages[0]["connectionStatus"]["status"], "FAILED");
}

#[test]
fn test_discover_command() {
    let config = config_file();
    let path = config.path().to_str().unwrap();

    let (result, messages) = run(&["discover", "--config", path], FakeConnector::default());

    assert!(result.is_ok());
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["type"], "LOG");
    assert_eq!(messages[0]["log"]["level"], "WARN");
    assert!(messages[0]["log"]["message"].as_str().unwrap().contains("AUDIT"));

    let streams = &messages[1]["catalog"]["streams"];
    assert_eq!(streams.as_array().unwrap().len(), 1);
    assert_eq!(streams[0]["name"], "CUSTOMERS");
    assert_eq!(
        streams[0]["json_schema"]["properties"],
        json!({ "ID": { "type": "integer" }, "NAME": { "type": "string" } })
    );
}

#[test]
fn test_discover_command_propagates_connection_failure() {
    let config = config_file();
    let path = config.path().to_str().unwrap();

    let (result, messages) = run(
        &["discover", "--config", path],
        FakeConnector { unreachable: true },
    );

    assert!(messages.is_empty());
    let error = result.unwrap_err();
    let trace = serde_json::to_value(failure_trace(&error)).unwrap();
    assert_eq!(trace["trace"]["error"]["failure_type"], "system_error");
}

#[test]
fn test_read_command_emits_records() {
    let config = config_file();
    let catalog = json_file(&json!({
        "streams": [{
            "stream": { "name": "CUSTOMERS", "json_schema": {} },
            "sync_mode": "full_refresh",
            "destination_sync_mode": "overwrite"
        }]
    }));
    let state = json_file(&json!({}));

    let (result, messages) = run(
        &[
            "read",
            "--config",
            config.path().to_str().unwrap(),
            "--catalog",
            catalog.path().to_str().unwrap(),
            "--state",
            state.path().to_str().unwrap(),
        ],
        FakeConnector::default(),
    );

    assert!(result.is_ok());
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m["type"] == "RECORD"));
    assert_eq!(messages[0]["record"]["stream"], "CUSTOMERS");
    assert_eq!(messages[0]["record"]["data"], json!({ "ID": "1", "NAME": "Ann" }));
    assert_eq!(messages[1]["record"]["data"], json!({ "ID": "2", "NAME": "Bo" }));
    assert!(messages[0]["record"]["emitted_at"].is_i64());
}

#[test]
fn test_read_command_reads_incremental_streams_in_full() {
    let config = config_file();
    let catalog = json_file(&json!({
        "streams": [{ "stream": { "name": "CUSTOMERS" }, "sync_mode": "incremental" }]
    }));

    let (result, messages) = run(
        &[
            "read",
            "--config",
            config.path().to_str().unwrap(),
            "--catalog",
            catalog.path().to_str().unwrap(),
        ],
        FakeConnector::default(),
    );

    assert!(result.is_ok());
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m["type"] == "RECORD"));
}

#[test]
fn test_read_command_keeps_records_before_failure() {
    let config = config_file();
    let catalog = json_file(&json!({
        "streams": [
            { "stream": { "name": "CUSTOMERS" }, "sync_mode": "full_refresh" },
            { "stream": { "name": "MISSING" }, "sync_mode": "full_refresh" }
        ]
    }));

    let (result, messages) = run(
        &[
            "read",
            "--config",
            config.path().to_str().unwrap(),
            "--catalog",
            catalog.path().to_str().unwrap(),
        ],
        FakeConnector::default(),
    );

    assert!(result.is_err());
    assert_eq!(messages.len(), 2);
}

#[test]
fn test_query_command() {
    let config = config_file();

    let (result, messages) = run(
        &[
            "query",
            "--config",
            config.path().to_str().unwrap(),
            "--sql",
            "SELECT COUNT(*) AS TOTAL FROM CUSTOMERS",
            "--stream",
            "customer_count",
        ],
        FakeConnector::default(),
    );

    assert!(result.is_ok());
    assert_eq!(messages[0]["record"]["stream"], "customer_count");
    assert_eq!(messages[0]["record"]["data"]["TOTAL"], "2");
}

#[test]
fn test_missing_config_file_is_an_error() {
    let (result, messages) = run(
        &["discover", "--config", "/nonexistent/config.json"],
        FakeConnector::default(),
    );

    assert!(messages.is_empty());
    let error = result.unwrap_err();
    assert!(error.to_string().contains("/nonexistent/config.json"));
}
