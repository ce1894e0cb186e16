//! Language support for the tree-sitter parser collaborator.
//!
//! Each supported language implements the `LanguageSupport` trait, which
//! supplies the grammar and the operator tables used to refine node kinds.
//! Everything else (kind naming, tree adaptation) is shared.
//!
//! ## Adding a New Language
//!
//! 1. Add the variant to the `Language` enum
//! 2. Create a new module (e.g., `python.rs`)
//! 3. Implement `LanguageSupport` trait
//! 4. Register in `get_language_support()`

pub mod adapter;
pub mod csharp;
pub mod kinds;
pub mod rust;
pub mod tree_sitter_utils;

use serde::{Deserialize, Serialize};

/// Languages the driver can parse.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// C# via tree-sitter-c-sharp.
    #[default]
    #[value(name = "csharp")]
    CSharp,
    /// Rust via tree-sitter-rust.
    #[value(name = "rust")]
    Rust,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(get_language_support(*self).name())
    }
}

/// Get the language support implementation for a language.
#[must_use]
pub fn get_language_support(lang: Language) -> &'static dyn LanguageSupport {
    match lang {
        Language::CSharp => &csharp::CSharpLanguage,
        Language::Rust => &rust::RustLanguage,
    }
}

/// Where a refinable node keeps its operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSlot {
    /// The child stored under this field name.
    Field(&'static str),
    /// The first anonymous child (prefix operators).
    FirstToken,
    /// The last anonymous child (postfix operators).
    LastToken,
}

/// Refines the kind of one grammar node type from its operator.
///
/// `binary_expression` on its own says little; `binary_expression` with a
/// `+` operator is an `AddExpression`.
#[derive(Debug, Clone, Copy)]
pub struct Refinement {
    /// Grammar node type the refinement applies to.
    pub node_kind: &'static str,
    /// Where to find the operator.
    pub operator: OperatorSlot,
    /// Operator text → refined kind name.
    pub kinds: &'static [(&'static str, &'static str)],
}

impl Refinement {
    /// Refined kind name for `operator`, if the table has one.
    #[must_use]
    pub fn kind_for(&self, operator: &str) -> Option<&'static str> {
        self.kinds
            .iter()
            .find(|(op, _)| *op == operator)
            .map(|(_, name)| *name)
    }
}

/// Trait for language-specific parsing support.
pub trait LanguageSupport: Send + Sync {
    /// Human-readable language name, emitted as the tree-global `Language`.
    fn name(&self) -> &'static str;

    /// File extensions this language handles.
    fn extensions(&self) -> &[&str];

    /// Get the tree-sitter language for parsing.
    fn tree_sitter_language(&self) -> tree_sitter::Language;

    /// Operator refinements for this grammar.
    fn refinements(&self) -> &'static [Refinement];
}

/// Shared Roslyn-style names for binary operators.
pub(crate) const BINARY_OPERATORS: &[(&str, &str)] = &[
    ("+", "AddExpression"),
    ("-", "SubtractExpression"),
    ("*", "MultiplyExpression"),
    ("/", "DivideExpression"),
    ("%", "ModuloExpression"),
    ("<<", "LeftShiftExpression"),
    (">>", "RightShiftExpression"),
    (">>>", "UnsignedRightShiftExpression"),
    ("&&", "LogicalAndExpression"),
    ("||", "LogicalOrExpression"),
    ("&", "BitwiseAndExpression"),
    ("|", "BitwiseOrExpression"),
    ("^", "ExclusiveOrExpression"),
    ("==", "EqualsExpression"),
    ("!=", "NotEqualsExpression"),
    ("<", "LessThanExpression"),
    ("<=", "LessThanOrEqualExpression"),
    (">", "GreaterThanExpression"),
    (">=", "GreaterThanOrEqualExpression"),
    ("??", "CoalesceExpression"),
];

/// Shared Roslyn-style names for assignment operators.
pub(crate) const ASSIGNMENT_OPERATORS: &[(&str, &str)] = &[
    ("=", "SimpleAssignmentExpression"),
    ("+=", "AddAssignmentExpression"),
    ("-=", "SubtractAssignmentExpression"),
    ("*=", "MultiplyAssignmentExpression"),
    ("/=", "DivideAssignmentExpression"),
    ("%=", "ModuloAssignmentExpression"),
    ("&=", "AndAssignmentExpression"),
    ("|=", "OrAssignmentExpression"),
    ("^=", "ExclusiveOrAssignmentExpression"),
    ("<<=", "LeftShiftAssignmentExpression"),
    (">>=", "RightShiftAssignmentExpression"),
    (">>>=", "UnsignedRightShiftAssignmentExpression"),
    ("??=", "CoalesceAssignmentExpression"),
];

/// Shared Roslyn-style names for prefix unary operators.
pub(crate) const PREFIX_OPERATORS: &[(&str, &str)] = &[
    ("!", "LogicalNotExpression"),
    ("-", "UnaryMinusExpression"),
    ("+", "UnaryPlusExpression"),
    ("~", "BitwiseNotExpression"),
    ("++", "PreIncrementExpression"),
    ("--", "PreDecrementExpression"),
    ("&", "AddressOfExpression"),
    ("*", "PointerIndirectionExpression"),
    ("^", "IndexExpression"),
];

/// Shared Roslyn-style names for postfix unary operators.
pub(crate) const POSTFIX_OPERATORS: &[(&str, &str)] = &[
    ("++", "PostIncrementExpression"),
    ("--", "PostDecrementExpression"),
    ("!", "SuppressNullableWarningExpression"),
];
