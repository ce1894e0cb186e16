//! Parser collaborator.
//!
//! The protocol loop only needs something that turns source text into a
//! [`SyntaxTree`] plus a vocabulary for the kinds it produces. That seam is
//! the [`SourceParser`] trait; [`TreeSitterParser`] is the production
//! implementation.
//!
//! ## Design
//!
//! The parser is stateful (tree-sitter parsers keep internal buffers), so one
//! instance is created at startup and reused for every request.

use std::fmt;
use std::sync::Arc;

use crate::config::ProjectionConfig;
use crate::error::{Error, Result};
use crate::languages::kinds::KindTable;
use crate::languages::{adapter, get_language_support, Language, LanguageSupport};
use crate::node::{KindVocabulary, SyntaxTree};

/// One problem found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable description.
    pub message: String,
    /// 1-based line, if known.
    pub line: Option<usize>,
    /// 1-based column, if known.
    pub column: Option<usize>,
}

impl Diagnostic {
    /// A diagnostic without a position.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// A diagnostic at a 1-based position.
    #[must_use]
    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column}: {}", self.message),
            (Some(line), None) => write!(f, "{line}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Source text that could not be parsed cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseFailure {
    /// Everything the parser reported, in source order.
    pub diagnostics: Vec<Diagnostic>,
    /// The tree built despite the errors, if any.
    pub partial: Option<SyntaxTree>,
}

impl ParseFailure {
    /// A failure with a single unpositioned diagnostic and no tree.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            diagnostics: vec![Diagnostic::new(message)],
            partial: None,
        }
    }

    /// Diagnostics rendered as `line:column: message` strings.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }
}

/// Turns source text into a syntax tree.
pub trait SourceParser {
    /// Display name of the language being parsed.
    fn language_name(&self) -> &str;

    /// Names for every kind this parser's trees contain.
    fn vocabulary(&self) -> Arc<dyn KindVocabulary>;

    /// Parses one source text.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] if the text has syntax errors or the parser
    /// gave up.
    fn parse(&mut self, source: &str) -> std::result::Result<SyntaxTree, ParseFailure>;
}

/// Parses with a tree-sitter grammar and adapts the result.
pub struct TreeSitterParser {
    support: &'static dyn LanguageSupport,
    parser: tree_sitter::Parser,
    kinds: Arc<KindTable>,
    max_depth: usize,
}

impl TreeSitterParser {
    /// Creates a parser for `language` with the default nesting limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parser`] if the grammar is incompatible with the
    /// linked tree-sitter runtime.
    pub fn new(language: Language) -> Result<Self> {
        let support = get_language_support(language);
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&support.tree_sitter_language())
            .map_err(|e| Error::Parser(format!("cannot load {} grammar: {e}", support.name())))?;
        let kinds = Arc::new(KindTable::for_language(support));

        tracing::info!(
            language = support.name(),
            kinds = kinds.len(),
            "Parser ready"
        );
        Ok(Self {
            support,
            parser,
            kinds,
            max_depth: ProjectionConfig::default().max_depth,
        })
    }

    /// Sets how deeply nested a source may be before it is rejected.
    ///
    /// Deeper sources fail with a single diagnostic instead of being
    /// adapted, so the limit also bounds the adapter's recursion.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl SourceParser for TreeSitterParser {
    fn language_name(&self) -> &str {
        self.support.name()
    }

    fn vocabulary(&self) -> Arc<dyn KindVocabulary> {
        self.kinds.clone()
    }

    fn parse(&mut self, source: &str) -> std::result::Result<SyntaxTree, ParseFailure> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ParseFailure::message("parser produced no tree"))?;
        adapter::adapt(self.support, &self.kinds, &tree, source, self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Value;

    #[test]
    fn diagnostics_render_with_positions() {
        assert_eq!(Diagnostic::at("missing `;`", 3, 14).to_string(), "3:14: missing `;`");
        assert_eq!(Diagnostic::new("gave up").to_string(), "gave up");
    }

    #[test]
    fn failure_messages_keep_order() {
        let failure = ParseFailure {
            diagnostics: vec![Diagnostic::at("first", 1, 1), Diagnostic::at("second", 2, 5)],
            partial: None,
        };
        assert_eq!(failure.messages(), ["1:1: first", "2:5: second"]);
    }

    #[test]
    fn every_language_grammar_loads() {
        for language in <Language as clap::ValueEnum>::value_variants() {
            let parser = TreeSitterParser::new(*language);
            assert!(parser.is_ok(), "{language}: {:?}", parser.err());
        }
    }

    #[test]
    fn nesting_limit_is_configurable() {
        let source = "fn f() { ((((((((((1)))))))))); }";
        let mut shallow = TreeSitterParser::new(Language::Rust).unwrap().with_max_depth(5);
        let failure = shallow.parse(source).unwrap_err();
        assert!(failure.partial.is_none());
        assert!(failure.messages()[0].contains("nested deeper than 5 levels"));

        let mut default = TreeSitterParser::new(Language::Rust).unwrap();
        assert!(default.parse(source).is_ok());
    }

    #[test]
    fn parses_valid_csharp() {
        let mut parser = TreeSitterParser::new(Language::CSharp).unwrap();
        assert_eq!(parser.language_name(), "C#");

        let tree = parser.parse("class C { }").unwrap();
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.class_name(), "CompilationUnitSyntax");
        assert_eq!(root.property("Language"), Some(&Value::Str("C#".into())));
    }

    #[test]
    fn reports_diagnostics_for_invalid_csharp() {
        let mut parser = TreeSitterParser::new(Language::CSharp).unwrap();
        let failure = parser.parse("class C { int x = ; }").unwrap_err();
        assert!(!failure.diagnostics.is_empty());
        assert!(failure.partial.is_some());
    }

    #[test]
    fn parser_is_reusable_after_a_failure() {
        let mut parser = TreeSitterParser::new(Language::CSharp).unwrap();
        assert!(parser.parse("class {").is_err());
        assert!(parser.parse("class C { }").is_ok());
    }

    #[test]
    fn vocabulary_names_root_kind() {
        let mut parser = TreeSitterParser::new(Language::Rust).unwrap();
        let vocabulary = parser.vocabulary();
        let tree = parser.parse("fn main() {}").unwrap();
        let kind = tree.get(tree.root()).unwrap().kind().unwrap();
        assert_eq!(vocabulary.kind_name(kind), Some("SourceFile"));
    }
}
