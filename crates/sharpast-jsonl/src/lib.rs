//! Line-framed JSON (JSON Lines) transport.
//!
//! Every record is one JSON value on one line. [`JsonlReader`] hands lines out
//! one at a time with line-number tracking, and [`JsonlWriter`] writes whole
//! lines so a consumer never observes a partial record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use writer::JsonlWriter;
