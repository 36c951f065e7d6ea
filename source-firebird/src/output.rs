//! Protocol message output.
//!
//! Messages are written as one JSON object per line and flushed
//! immediately so the host framework sees each record as it is produced.

use source_firebird_core::{Message, Result, SourceError};
use std::io::Write;

/// Newline-delimited JSON writer for protocol messages.
#[derive(Debug)]
pub struct MessageWriter<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> MessageWriter<W> {
    /// Wraps a byte sink, normally locked stdout.
    pub const fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    /// Serializes and writes one message followed by a newline.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails
    pub fn emit(&mut self, message: &Message) -> Result<()> {
        serde_json::to_writer(&mut self.out, message).map_err(|e| SourceError::Serialization {
            context: "Failed to serialize protocol message".to_string(),
            source: e,
        })?;

        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(|e| SourceError::Io {
                context: "Failed to write protocol message".to_string(),
                source: e,
            })?;

        self.written += 1;
        Ok(())
    }

    /// Messages written so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
