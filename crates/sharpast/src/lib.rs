//! # Sharpast: Syntax Trees as Line-Delimited JSON
//!
//! Sharpast reads source text, parses it, and writes the syntax tree back as
//! JSON, one request per line. It is meant to sit behind another process that
//! wants a compiler-grade tree without linking a compiler.
//!
//! ## Design Philosophy
//!
//! - **Generic projection** - The projector knows nothing about any grammar;
//!   it walks a node graph of class names, kinds and named properties
//! - **Cycle-safe** - Parent and root back-references are pruned by tracking
//!   the current path, so shared subtrees are still inlined everywhere
//! - **Deterministic** - Same input, same bytes out
//! - **One bad request never stops the loop**
//!
//! ## Quick Start
//!
//! ```no_run
//! use sharpast::{DriverConfig, Server, TreeSitterParser};
//!
//! let config = DriverConfig::default();
//! let parser = TreeSitterParser::new(config.language)?
//!     .with_max_depth(config.projection.max_depth);
//! let mut server = Server::new(parser, &config);
//!
//! let stdin = std::io::stdin();
//! let stdout = std::io::stdout();
//! server.serve(stdin.lock(), stdout.lock())?;
//! # Ok::<(), sharpast::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod languages;
pub mod node;
pub mod parser;
pub mod project;
pub mod protocol;
pub mod roles;
pub mod tag;

pub use config::{DriverConfig, FilterConfig, ProjectionConfig, TagConfig};
pub use error::{Error, ProjectionError, RequestError, RequestErrorKind, Result};
pub use languages::Language;
pub use node::{Kind, KindVocabulary, Node, NodeId, Property, SyntaxTree, TreeBuilder, Value};
pub use parser::{Diagnostic, ParseFailure, SourceParser, TreeSitterParser};
pub use project::{Projector, TYPE_KEY};
pub use protocol::{Request, Response, ServeStats, Server, SessionState, Status};
pub use roles::{RoleTable, ROLE_KEY};
