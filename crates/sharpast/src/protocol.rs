//! Line-delimited request/response loop.
//!
//! Each input line is a request `{"content": "<source>"}`; each request gets
//! exactly one response line `{"status": "ok"|"error", "errors": [...],
//! "ast": ...}`, written and flushed before the next line is read. Requests
//! are independent: a malformed line (blank lines included), a parse failure
//! or a projection defect produce an error response and the loop carries on.
//! Only a transport I/O failure ends the loop with an error.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use sharpast_jsonl::{JsonlReader, JsonlWriter};

use crate::config::DriverConfig;
use crate::error::{RequestError, RequestErrorKind, Result};
use crate::parser::SourceParser;
use crate::project::Projector;

/// A decoded request line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Request {
    /// Source text to parse.
    pub content: String,
}

/// Outcome of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The source parsed and projected.
    Ok,
    /// Something went wrong; see `errors`.
    Error,
}

/// One response line.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Response {
    /// Request outcome.
    pub status: Status,
    /// Error descriptions; empty on success, never empty on error.
    pub errors: Vec<String>,
    /// Projected tree (or partial tree, when enabled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ast: Option<Json>,
}

impl Response {
    /// A successful response carrying `ast`.
    #[must_use]
    pub fn ok(ast: Json) -> Self {
        Self {
            status: Status::Ok,
            errors: Vec::new(),
            ast: Some(ast),
        }
    }
}

impl From<RequestError> for Response {
    fn from(error: RequestError) -> Self {
        Self {
            status: Status::Error,
            errors: error.messages,
            ast: error.partial_ast,
        }
    }
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for the next line.
    Idle,
    /// Input ended; no further requests are accepted.
    Closed,
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeStats {
    /// Responses written.
    pub responses: usize,
    /// Responses with `status: "error"`.
    pub errors: usize,
}

/// Serves requests with one parser and one projector.
pub struct Server<P> {
    parser: P,
    projector: Projector,
    partial_ast: bool,
    state: SessionState,
}

impl<P: SourceParser> Server<P> {
    /// Creates a server for `parser`.
    pub fn new(parser: P, config: &DriverConfig) -> Self {
        let projector = Projector::new(config, parser.vocabulary());
        Self {
            parser,
            projector,
            partial_ast: config.projection.partial_ast,
            state: SessionState::Idle,
        }
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Parses and projects one request.
    pub fn handle_request(&mut self, request: &Request) -> Response {
        match self.process(&request.content) {
            Ok(ast) => Response::ok(ast),
            Err(error) => rejected(error),
        }
    }

    fn process(&mut self, content: &str) -> std::result::Result<Json, RequestError> {
        match self.parser.parse(content) {
            Ok(tree) => self
                .projector
                .project(&tree)
                .map_err(|e| RequestError::projection(&e)),
            Err(failure) => {
                let error = RequestError::new(RequestErrorKind::ParseFailed, failure.messages());
                match failure.partial {
                    Some(tree) if self.partial_ast => match self.projector.project(&tree) {
                        Ok(ast) => Err(error.with_partial_ast(ast)),
                        Err(e) => {
                            tracing::warn!(error = %e, "Could not project partial tree");
                            Err(error)
                        }
                    },
                    _ => Err(error),
                }
            }
        }
    }

    /// Runs the loop until `input` ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading `input` or writing `output` fails.
    /// The state is `Closed` afterwards either way.
    pub fn serve<R: Read, W: Write>(&mut self, input: R, output: W) -> Result<ServeStats> {
        let mut reader = JsonlReader::new(input);
        let mut writer = JsonlWriter::new(output);
        let mut stats = ServeStats::default();

        tracing::info!(language = self.parser.language_name(), "Serving requests");
        let result = self.serve_lines(&mut reader, &mut writer, &mut stats);
        self.state = SessionState::Closed;

        tracing::info!(
            responses = stats.responses,
            errors = stats.errors,
            "Input closed"
        );
        result.map(|()| stats)
    }

    fn serve_lines<R: Read, W: Write>(
        &mut self,
        reader: &mut JsonlReader<R>,
        writer: &mut JsonlWriter<W>,
        stats: &mut ServeStats,
    ) -> Result<()> {
        loop {
            let next = reader.read_line::<Request>();
            let line_number = reader.line_number();
            let _span = tracing::info_span!("request", line = line_number).entered();

            let response = match next {
                Ok(None) => return Ok(()),
                Ok(Some(request)) => self.handle_request(&request),
                Err(e) if e.is_line_error() => rejected(RequestError::malformed(e)),
                Err(e) => return Err(e.into()),
            };

            if response.status == Status::Error {
                stats.errors += 1;
            }
            writer.write(&response)?;
            writer.flush()?;
            stats.responses = writer.records_written();
        }
    }
}

/// Logs a failed request and turns it into its response. Internal failures
/// are defects and log at error level; bad input is routine.
fn rejected(error: RequestError) -> Response {
    if error.kind.is_internal_error() {
        tracing::error!(kind = %error.kind, errors = ?error.messages, "Request failed");
    } else if error.kind.is_input_error() {
        tracing::debug!(kind = %error.kind, errors = error.messages.len(), "Request rejected");
    }
    error.into()
}
