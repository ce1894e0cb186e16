//! JSONL reading operations.
//!
//! This module provides blocking, line-at-a-time reading of JSONL data with
//! line number tracking for error reporting.

use std::io::{BufRead, BufReader, Read};

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Blocking reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps a reader and provides buffered reading of JSONL
/// formatted data. It tracks line numbers to provide useful context in error
/// messages when decoding fails.
///
/// A line is consumed before it is decoded, so a line-level error (see
/// [`Error::is_line_error`]) never desynchronises the stream.
///
/// # Type Parameters
///
/// * `R` - The underlying reader type.
///
/// # Examples
///
/// ```
/// use sharpast_jsonl::JsonlReader;
///
/// let mut reader = JsonlReader::new("{\"content\":\"class A {}\"}\n".as_bytes());
/// let line = reader.next_line().unwrap();
/// assert_eq!(line.as_deref(), Some("{\"content\":\"class A {}\"}"));
/// assert_eq!(reader.line_number(), 1);
/// assert!(reader.next_line().unwrap().is_none());
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying reader.
    reader: BufReader<R>,
    /// Current line number (1-based counting, 0 before any lines are read) for error reporting.
    line_number: usize,
    /// Scratch buffer reused across lines.
    buf: Vec<u8>,
}

impl<R: Read> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given reader.
    ///
    /// Line numbering uses 1-based indexing: the counter starts at 0 and
    /// increments after each line is read, so the first line read is
    /// numbered 1.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: Vec::new(),
        }
    }

    /// Returns the current line number.
    ///
    /// Returns 0 before any lines have been read. After reading, returns the
    /// 1-based line number of the last line read.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line, without its line terminator.
    ///
    /// Both `\n` and `\r\n` terminators are accepted, and a final line without
    /// a terminator is still returned. Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the underlying reader fails.
    /// - [`Error::InvalidLine`] if the line is not valid UTF-8. The line is
    ///   consumed regardless.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        match std::str::from_utf8(&self.buf) {
            Ok(line) => Ok(Some(line.to_owned())),
            Err(e) => {
                tracing::trace!(line_number = self.line_number, error = %e, "Line is not UTF-8");
                Err(Error::InvalidLine {
                    line_number: self.line_number,
                    message: format!("invalid UTF-8: {e}"),
                })
            }
        }
    }

    /// Reads and deserializes the next line.
    ///
    /// Every line is decoded, blank ones included, so each input line yields
    /// exactly one result. Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// - [`Error::Io`] if the underlying reader fails.
    /// - [`Error::InvalidLine`] if the line is blank, not UTF-8, or does not
    ///   decode as `T`.
    pub fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(line) = self.next_line()? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            return Err(Error::InvalidLine {
                line_number: self.line_number,
                message: "empty line".to_string(),
            });
        }
        serde_json::from_str(&line)
            .map(Some)
            .map_err(|e| Error::InvalidLine {
                line_number: self.line_number,
                message: e.to_string(),
            })
    }
}
