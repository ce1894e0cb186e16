//! Driver configuration.
//!
//! Configuration is read from an optional YAML file; every field has a
//! default, so an empty file (or no file at all) yields the standard C#
//! driver behaviour. Command-line flags are applied on top by the binary.
//!
//! ```yaml
//! language: csharp
//! projection:
//!   omit_defaults: true
//! filter:
//!   back_references: [Parent, SyntaxTrivia.Token]
//! tags:
//!   generic_suffix: Syntax
//! roles:
//!   PlusToken: [Operator, Arithmetic, Add]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::languages::Language;

/// Top-level driver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    /// Grammar used by the parser collaborator.
    pub language: Language,
    /// Projection policies.
    pub projection: ProjectionConfig,
    /// Property filter rules.
    pub filter: FilterConfig,
    /// Type tag rules.
    pub tags: TagConfig,
    /// Role overrides per type tag, applied over the built-in table. An
    /// empty list removes the tag's roles.
    pub roles: BTreeMap<String, Vec<String>>,
}

impl DriverConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or does not match
    /// the configuration schema.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_yaml(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration from YAML text. Empty text yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed YAML or unknown fields.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Projection policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Drop properties whose value is the default of its type.
    pub omit_defaults: bool,
    /// Deepest node nesting the projector will descend into.
    pub max_depth: usize,
    /// Attach the projected partial tree to parse failure responses.
    pub partial_ast: bool,
    /// Annotate objects with `@role` from the role table.
    pub roles: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            omit_defaults: false,
            max_depth: 2048,
            partial_ast: false,
            roles: false,
        }
    }
}

/// Rules for the property filter. See [`crate::filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Properties repeated identically on every node.
    pub tree_constants: Vec<String>,
    /// Back-reference properties, either `Name` or `Class.Name`.
    pub back_references: Vec<String>,
    /// Prefixes naming upward relations (`ParentTrivia`, `AncestorScope`).
    pub relation_prefixes: Vec<String>,
    /// The raw discriminator folded into `@type`.
    pub discriminator: String,
    /// Prefixes of derived presence flags (`HasLeadingTrivia`).
    pub derived_flag_prefixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tree_constants: vec!["Language".to_string(), "SyntaxTree".to_string()],
            back_references: vec!["Parent".to_string(), "SyntaxTrivia.Token".to_string()],
            relation_prefixes: vec!["Parent".to_string(), "Ancestor".to_string()],
            discriminator: "RawKind".to_string(),
            derived_flag_prefixes: vec!["Has".to_string()],
        }
    }
}

/// Rules for the type tag resolver. See [`crate::tag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagConfig {
    /// Suffix stripped from class names.
    pub generic_suffix: String,
    /// Classes of terminal nodes, tagged by kind alone.
    pub leaf_classes: Vec<String>,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            generic_suffix: "Syntax".to_string(),
            leaf_classes: vec!["SyntaxToken".to_string(), "SyntaxTrivia".to_string()],
        }
    }
}
