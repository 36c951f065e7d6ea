//! Firebird source connector.
//!
//! Speaks the record-interchange protocol: `spec`, `check`, `discover`
//! and `read` write newline-delimited JSON messages to stdout. Logs go to
//! stderr.
//!
//! # Security Guarantees
//! - Read-only database operations only
//! - Credentials are never logged or echoed in messages

use clap::Parser;
use source_firebird::{Cli, MessageWriter, execute, failure_trace};
use source_firebird_core::{FirebirdSource, init_logging};
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format.into()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let stdout = std::io::stdout();
    let mut writer = MessageWriter::new(stdout.lock());

    match run(&cli, &mut writer) {
        Ok(()) => {
            debug!("Wrote {} protocol messages", writer.written());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            if let Err(write_error) = writer.emit(&failure_trace(&e)) {
                error!("Could not report failure: {}", write_error);
            }
            ExitCode::FAILURE
        }
    }
}

fn run<W: std::io::Write>(cli: &Cli, writer: &mut MessageWriter<W>) -> anyhow::Result<()> {
    let source = FirebirdSource::with_default_connector()?;
    execute(&cli.command, &source, writer)
}
