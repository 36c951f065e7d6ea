//! Command dispatch.
//!
//! Each command loads its inputs, runs one source operation and writes
//! the resulting protocol messages. Failures are returned to the caller,
//! which reports them as an error trace.

use crate::cli::{Command, ConfigArgs, QueryArgs, ReadArgs};
use crate::output::MessageWriter;
use anyhow::Context;
use source_firebird_core::protocol::{ConnectorSpecification, LogLevel};
use source_firebird_core::source::CHECK_FAILURE_PREFIX;
use source_firebird_core::{CheckOutcome, ConfiguredCatalog, FirebirdSource, Message, SourceConfig};
use std::io::Write;

/// Runs one command against `source`, writing protocol messages to `writer`.
///
/// # Errors
/// Returns error if inputs cannot be loaded, the operation fails or
/// output cannot be written. A failed connection check is not an error.
pub fn execute<W: Write>(
    command: &Command,
    source: &FirebirdSource,
    writer: &mut MessageWriter<W>,
) -> anyhow::Result<()> {
    match command {
        Command::Spec => spec(writer),
        Command::Check(args) => check(args, source, writer),
        Command::Discover(args) => discover(args, source, writer),
        Command::Read(args) => read(args, source, writer),
        Command::Query(args) => query(args, source, writer),
    }
}

fn spec<W: Write>(writer: &mut MessageWriter<W>) -> anyhow::Result<()> {
    let spec = ConnectorSpecification::firebird()?;
    writer.emit(&Message::Spec { spec })?;
    Ok(())
}

fn check<W: Write>(
    args: &ConfigArgs,
    source: &FirebirdSource,
    writer: &mut MessageWriter<W>,
) -> anyhow::Result<()> {
    let outcome = match SourceConfig::from_path(&args.config) {
        Ok(config) => source.check(&config),
        Err(e) => {
            tracing::warn!("Configuration rejected: {}", e);
            CheckOutcome::Failed {
                message: format!("{CHECK_FAILURE_PREFIX}: {}", e.detailed_message()),
            }
        }
    };

    writer.emit(&Message::from(outcome))?;
    Ok(())
}

fn discover<W: Write>(
    args: &ConfigArgs,
    source: &FirebirdSource,
    writer: &mut MessageWriter<W>,
) -> anyhow::Result<()> {
    let config = SourceConfig::from_path(&args.config)?;
    let catalog = source.discover(&config).context("Schema discovery failed")?;

    for warning in &catalog.warnings {
        writer.emit(&Message::log(LogLevel::Warn, warning.as_str()))?;
    }
    writer.emit(&Message::from(&catalog))?;
    Ok(())
}

fn read<W: Write>(
    args: &ReadArgs,
    source: &FirebirdSource,
    writer: &mut MessageWriter<W>,
) -> anyhow::Result<()> {
    let config = SourceConfig::from_path(&args.config)?;
    let catalog = ConfiguredCatalog::from_path(&args.catalog)?;

    if let Some(state) = &args.state {
        tracing::debug!(
            "Ignoring state file {}: only full refresh is supported",
            state.display()
        );
    }

    for configured in catalog.non_full_refresh() {
        tracing::warn!(
            "Stream {} requested {:?} sync; reading with full refresh",
            configured.stream.name,
            configured.sync_mode
        );
    }

    let streams = catalog.stream_names();
    let summary = source
        .read(&config, &streams, |record| writer.emit(&Message::record(record)))
        .context("Read failed")?;

    tracing::info!(
        "Read completed: {} records from {} streams",
        summary.total_records(),
        summary.streams.len()
    );
    Ok(())
}

fn query<W: Write>(
    args: &QueryArgs,
    source: &FirebirdSource,
    writer: &mut MessageWriter<W>,
) -> anyhow::Result<()> {
    let config = SourceConfig::from_path(&args.config)?;
    source
        .run_query(&config, &args.sql, &args.stream, |record| {
            writer.emit(&Message::record(record))
        })
        .with_context(|| format!("Ad hoc query for stream {} failed", args.stream))?;
    Ok(())
}
