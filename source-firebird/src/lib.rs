//! Firebird source connector binary support.
//!
//! The binary parses the command line, initializes logging on stderr and
//! dispatches to one source operation. The modules are exposed as a
//! library so the dispatch can be driven from tests with any connector
//! and any output sink.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::execute;
pub use output::MessageWriter;

use source_firebird_core::protocol::FailureType;
use source_firebird_core::{Message, SourceError};

/// Builds the error trace reported for a failed command.
pub fn failure_trace(error: &anyhow::Error) -> Message {
    let failure_type = error
        .downcast_ref::<SourceError>()
        .map_or(FailureType::SystemError, FailureType::of);

    Message::error_trace(
        error.to_string(),
        Some(format!("{error:#}")),
        failure_type,
    )
}
