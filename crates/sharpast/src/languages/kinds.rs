//! Kind vocabulary for tree-sitter grammars.
//!
//! A [`Kind`] value below the grammar's symbol count is the tree-sitter
//! symbol id itself. Named symbols are named in PascalCase
//! (`if_statement` → `IfStatement`); anonymous symbols get Roslyn-style token
//! names spelled out character by character (`==` → `EqualsEqualsToken`,
//! `if` → `IfKeyword`).
//!
//! Values past the grammar range are synthetic kinds the adapter assigns:
//! operator refinements, comment trivia kinds, the end-of-file token and
//! skipped (error) tokens.

use std::collections::HashMap;

use super::LanguageSupport;
use crate::node::{Kind, KindVocabulary};

/// Synthetic kind of the token that closes every tree.
pub const END_OF_FILE_TOKEN: &str = "EndOfFileToken";

/// Synthetic kind of tree-sitter `ERROR` nodes.
pub const SKIPPED_TOKENS: &str = "SkippedTokens";

/// Comment prefixes and their trivia kinds, longest prefix first.
pub const COMMENT_KINDS: &[(&str, &str)] = &[
    ("///", "SingleLineDocumentationCommentTrivia"),
    ("//!", "SingleLineDocumentationCommentTrivia"),
    ("/**", "MultiLineDocumentationCommentTrivia"),
    ("/*!", "MultiLineDocumentationCommentTrivia"),
    ("//", "SingleLineCommentTrivia"),
    ("/*", "MultiLineCommentTrivia"),
];

/// Trivia kind for a comment, chosen by its opening characters.
#[must_use]
pub fn comment_kind(text: &str) -> Option<&'static str> {
    COMMENT_KINDS
        .iter()
        .find(|(prefix, _)| text.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

/// Names every kind a tree-sitter grammar can produce.
#[derive(Debug, Clone)]
pub struct KindTable {
    names: Vec<String>,
    grammar_count: usize,
    synthetic: HashMap<&'static str, Kind>,
}

impl KindTable {
    /// Builds the table for a language: grammar symbols first, then every
    /// synthetic kind its refinements can produce.
    #[must_use]
    pub fn for_language(support: &dyn LanguageSupport) -> Self {
        let language = support.tree_sitter_language();
        let grammar_count = language.node_kind_count();

        let mut names = Vec::with_capacity(grammar_count + 64);
        for id in 0..u16::try_from(grammar_count).unwrap_or(u16::MAX) {
            let name = match language.node_kind_for_id(id) {
                Some(kind) if language.node_kind_is_named(id) => pascal_case(kind),
                Some(kind) => token_kind_name(kind),
                None => format!("Symbol{id}"),
            };
            names.push(name);
        }

        let synthetic_names = support
            .refinements()
            .iter()
            .flat_map(|r| r.kinds.iter().map(|(_, name)| *name))
            .chain(COMMENT_KINDS.iter().map(|(_, name)| *name))
            .chain([END_OF_FILE_TOKEN, SKIPPED_TOKENS]);

        let mut synthetic = HashMap::new();
        for name in synthetic_names {
            if synthetic.contains_key(name) {
                continue;
            }
            let Ok(value) = u16::try_from(names.len()) else {
                tracing::warn!(name, "Kind table is full, dropping synthetic kind");
                break;
            };
            let kind = Kind(value);
            names.push(name.to_string());
            synthetic.insert(name, kind);
        }

        tracing::debug!(
            language = support.name(),
            grammar_kinds = grammar_count,
            synthetic_kinds = synthetic.len(),
            "Built kind table"
        );

        Self {
            names,
            grammar_count,
            synthetic,
        }
    }

    /// Kind of a tree-sitter symbol id, if it belongs to the grammar.
    #[must_use]
    pub fn grammar_kind(&self, symbol: u16) -> Option<Kind> {
        (usize::from(symbol) < self.grammar_count).then_some(Kind(symbol))
    }

    /// Kind of a synthetic name registered at construction.
    #[must_use]
    pub fn synthetic(&self, name: &str) -> Option<Kind> {
        self.synthetic.get(name).copied()
    }

    /// Number of grammar symbols.
    #[must_use]
    pub fn grammar_count(&self) -> usize {
        self.grammar_count
    }

    /// Total number of named kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the table names nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl KindVocabulary for KindTable {
    fn kind_name(&self, kind: Kind) -> Option<&str> {
        self.names.get(usize::from(kind.0)).map(String::as_str)
    }
}

/// `snake_case` → `PascalCase`, dropping underscores.
#[must_use]
pub fn pascal_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    for word in snake.split('_').filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Roslyn-style name of an anonymous token.
///
/// Text containing letters is a keyword (`if` → `IfKeyword`,
/// `#region` → `HashRegionKeyword`); anything else is spelled out
/// character by character (`=>` → `EqualsGreaterThanToken`).
#[must_use]
pub fn token_kind_name(text: &str) -> String {
    let is_keyword = text.chars().any(char::is_alphabetic);
    let mut out = String::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || (is_keyword && c == '_') {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            out.push_str(&pascal_case(&word));
            word.clear();
        }
        match punctuation_name(c) {
            Some(name) => out.push_str(name),
            None => out.push_str(&format!("U{:04X}", u32::from(c))),
        }
    }
    if !word.is_empty() {
        out.push_str(&pascal_case(&word));
    }

    if out.is_empty() {
        out.push_str("Empty");
    }
    out.push_str(if is_keyword { "Keyword" } else { "Token" });
    out
}

fn punctuation_name(c: char) -> Option<&'static str> {
    Some(match c {
        '+' => "Plus",
        '-' => "Minus",
        '*' => "Asterisk",
        '/' => "Slash",
        '%' => "Percent",
        '&' => "Ampersand",
        '|' => "Bar",
        '^' => "Caret",
        '!' => "Exclamation",
        '~' => "Tilde",
        '=' => "Equals",
        '<' => "LessThan",
        '>' => "GreaterThan",
        '?' => "Question",
        '.' => "Dot",
        ',' => "Comma",
        ':' => "Colon",
        ';' => "Semicolon",
        '(' => "OpenParen",
        ')' => "CloseParen",
        '[' => "OpenBracket",
        ']' => "CloseBracket",
        '{' => "OpenBrace",
        '}' => "CloseBrace",
        '#' => "Hash",
        '@' => "At",
        '$' => "Dollar",
        '"' => "DoubleQuote",
        '\'' => "SingleQuote",
        '\\' => "Backslash",
        '`' => "Backtick",
        '_' => "Underscore",
        ' ' => "Space",
        '\t' => "Tab",
        '\n' => "NewLine",
        '\r' => "CarriageReturn",
        _ => return None,
    })
}
