//! Type tag resolution.
//!
//! Every projected node carries an `@type` tag derived from its class name
//! and kind:
//!
//! | class                    | kind name       | tag                              |
//! |--------------------------|-----------------|----------------------------------|
//! | `CompilationUnitSyntax`  | (none)          | `CompilationUnit`                |
//! | `IfStatementSyntax`      | `IfStatement`   | `IfStatement`                    |
//! | `SyntaxToken`            | `PlusToken`     | `PlusToken`                      |
//! | `LiteralSyntax`          | `NullLiteral`   | `NullLiteral`                    |
//! | `BinaryExpressionSyntax` | `AddExpression` | `BinaryExpression_AddExpression` |
//!
//! The tag is a pure function of `(class name, kind name)`.

use std::borrow::Cow;
use std::sync::Arc;

use crate::config::TagConfig;
use crate::error::ProjectionError;
use crate::node::{KindVocabulary, Node, NodeId};

/// Computes `@type` tags.
pub struct TagResolver {
    config: TagConfig,
    vocabulary: Arc<dyn KindVocabulary>,
}

impl TagResolver {
    /// Creates a resolver that names kinds through `vocabulary`.
    #[must_use]
    pub fn new(config: TagConfig, vocabulary: Arc<dyn KindVocabulary>) -> Self {
        Self { config, vocabulary }
    }

    /// Class name with the generic suffix stripped, unless that would leave
    /// nothing.
    #[must_use]
    pub fn base_name<'a>(&self, class_name: &'a str) -> &'a str {
        match class_name.strip_suffix(self.config.generic_suffix.as_str()) {
            Some(base) if !base.is_empty() && !self.config.generic_suffix.is_empty() => base,
            _ => class_name,
        }
    }

    /// Returns `true` if `class_name` is a terminal (token or trivia) class.
    #[must_use]
    pub fn is_leaf_class(&self, class_name: &str) -> bool {
        self.config.leaf_classes.iter().any(|c| c == class_name)
    }

    /// Tag of node `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::EmptyClassName`] if the node has no class
    /// name, or [`ProjectionError::UnknownKind`] if the vocabulary cannot
    /// name the node's kind.
    pub fn tag<'n>(&self, id: NodeId, node: &'n Node) -> Result<Cow<'n, str>, ProjectionError> {
        let class_name = node.class_name();
        if class_name.is_empty() {
            return Err(ProjectionError::EmptyClassName { node: id });
        }
        let base = self.base_name(class_name);

        let Some(kind) = node.kind() else {
            return Ok(Cow::Borrowed(base));
        };
        let kind_name =
            self.vocabulary
                .kind_name(kind)
                .ok_or_else(|| ProjectionError::UnknownKind {
                    node: id,
                    class_name: class_name.to_string(),
                    kind,
                })?;

        Ok(Cow::Owned(self.combine(class_name, base, kind_name)))
    }

    fn combine(&self, class_name: &str, base: &str, kind_name: &str) -> String {
        if kind_name == base {
            base.to_string()
        } else if self.is_leaf_class(class_name) || kind_name.ends_with(base) {
            kind_name.to_string()
        } else {
            format!("{base}_{kind_name}")
        }
    }
}
