//! Error types for the driver.
//!
//! Errors are split by how far they reach:
//!
//! - **`Error`**: process-level failures (transport I/O, configuration,
//!   parser setup). These end the process.
//! - **`RequestError`**: failures tied to a single request line. These are
//!   turned into an error response and the loop carries on.
//! - **`ProjectionError`**: defects found while projecting a tree; always
//!   reported through a `RequestError`.
//!
//! ## Error Categorization
//!
//! `RequestErrorKind` uses a 4xx/5xx style categorization:
//! - Input problems (caller's fault): malformed requests, unparsable source
//! - Internal problems (our fault): projection defects

use thiserror::Error;

use crate::node::{Kind, NodeId};

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the driver.
///
/// These errors represent infrastructure failures that prevent the driver
/// from serving any further request.
#[derive(Debug, Error)]
pub enum Error {
    /// Standard stream or file system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing the line protocol failed
    #[error("transport error: {0}")]
    Transport(#[from] sharpast_jsonl::Error),

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

/// A defect found while projecting a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The kind vocabulary has no name for a node's kind
    #[error("unknown kind {kind} on node {node} of class {class_name}")]
    UnknownKind {
        /// The offending node.
        node: NodeId,
        /// Its class name.
        class_name: String,
        /// The unresolvable kind value.
        kind: Kind,
    },

    /// A node has no class name to derive its tag from
    #[error("node {node} has an empty class name")]
    EmptyClassName {
        /// The offending node.
        node: NodeId,
    },

    /// A property refers to a node that is not in the tree
    #[error("property {property} refers to missing node {node}")]
    DanglingNode {
        /// The missing node id.
        node: NodeId,
        /// Name of the property holding the reference.
        property: String,
    },

    /// The tree nests deeper than the configured limit
    #[error("tree is nested deeper than {max_depth} levels")]
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
    },
}

/// Categorization of per-request failures.
///
/// Uses a 4xx/5xx style pattern:
/// - Input problems are issues with the request (caller can fix)
/// - Internal problems are issues with the driver (we need to fix)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// The line is not a valid request object
    MalformedRequest,

    /// The source could not be parsed
    ParseFailed,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// The parsed tree could not be projected
    ProjectionFailed,
}

impl std::fmt::Display for RequestErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRequest => write!(f, "malformed request"),
            Self::ParseFailed => write!(f, "parse failed"),
            Self::ProjectionFailed => write!(f, "projection failed"),
        }
    }
}

impl RequestErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MalformedRequest | Self::ParseFailed)
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::ProjectionFailed)
    }
}

/// A failure tied to one request, carrying every message for the response.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    /// Category of the error
    pub kind: RequestErrorKind,
    /// Human-readable messages, never empty
    pub messages: Vec<String>,
    /// Projected partial tree, when the policy allows one
    pub partial_ast: Option<serde_json::Value>,
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.messages.join("; "))
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    /// Create a request error. An empty message list is replaced by the
    /// category name so the response never carries an empty `errors` list.
    #[must_use]
    pub fn new(kind: RequestErrorKind, messages: Vec<String>) -> Self {
        let messages = if messages.is_empty() {
            vec![kind.to_string()]
        } else {
            messages
        };
        Self {
            kind,
            messages,
            partial_ast: None,
        }
    }

    /// Create a malformed request error.
    #[must_use]
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::new(
            RequestErrorKind::MalformedRequest,
            vec![format!("malformed request: {message}")],
        )
    }

    /// Create a projection error.
    #[must_use]
    pub fn projection(error: &ProjectionError) -> Self {
        Self::new(
            RequestErrorKind::ProjectionFailed,
            vec![format!("internal error: {error}")],
        )
    }

    /// Attach a projected partial tree.
    #[must_use]
    pub fn with_partial_ast(mut self, ast: serde_json::Value) -> Self {
        self.partial_ast = Some(ast);
        self
    }
}
