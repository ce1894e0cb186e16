//! JSONL writing operations.
//!
//! This module provides blocking writing of data in JSONL format with
//! efficient buffering.

use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::error::Result;

/// Blocking writer for JSONL (JSON Lines) data.
///
/// Each value is serialized in full before any byte reaches the underlying
/// writer, so a serialization failure never leaves a partial line behind.
///
/// # Examples
///
/// ```
/// use sharpast_jsonl::JsonlWriter;
///
/// let mut out = Vec::new();
/// {
///     let mut writer = JsonlWriter::new(&mut out);
///     writer.write(&serde_json::json!({"status": "ok"})).unwrap();
///     writer.flush().unwrap();
/// }
/// assert_eq!(out, b"{\"status\":\"ok\"}\n");
/// ```
pub struct JsonlWriter<W: Write> {
    /// Buffered writer wrapping the underlying writer.
    writer: BufWriter<W>,
    /// Number of records written so far.
    records: usize,
}

impl<W: Write> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            records: 0,
        }
    }

    /// Number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records
    }

    /// Serializes `value` as a single line.
    ///
    /// The line is buffered; call [`flush`](Self::flush) to push it out.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the value cannot be
    /// serialized (nothing is written in that case) or
    /// [`Error::Io`](crate::Error::Io) if writing fails.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.records += 1;
        Ok(())
    }

    /// Flushes buffered lines to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the underlying writer fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
