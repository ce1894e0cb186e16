//! C# language support.
//!
//! Parses C# with tree-sitter-c-sharp. Operator refinements give binary,
//! assignment and unary expressions their Roslyn-style kind names.

use super::{
    LanguageSupport, OperatorSlot, Refinement, ASSIGNMENT_OPERATORS, BINARY_OPERATORS,
    POSTFIX_OPERATORS, PREFIX_OPERATORS,
};

/// Tree-sitter node kind constants for the C# grammar.
mod node_kinds {
    pub const BINARY_EXPRESSION: &str = "binary_expression";
    pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
    pub const PREFIX_UNARY_EXPRESSION: &str = "prefix_unary_expression";
    pub const POSTFIX_UNARY_EXPRESSION: &str = "postfix_unary_expression";
}

static REFINEMENTS: &[Refinement] = &[
    Refinement {
        node_kind: node_kinds::BINARY_EXPRESSION,
        operator: OperatorSlot::Field("operator"),
        kinds: BINARY_OPERATORS,
    },
    Refinement {
        node_kind: node_kinds::ASSIGNMENT_EXPRESSION,
        operator: OperatorSlot::Field("operator"),
        kinds: ASSIGNMENT_OPERATORS,
    },
    Refinement {
        node_kind: node_kinds::PREFIX_UNARY_EXPRESSION,
        operator: OperatorSlot::FirstToken,
        kinds: PREFIX_OPERATORS,
    },
    Refinement {
        node_kind: node_kinds::POSTFIX_UNARY_EXPRESSION,
        operator: OperatorSlot::LastToken,
        kinds: POSTFIX_OPERATORS,
    },
];

/// C# language support implementation.
pub struct CSharpLanguage;

impl LanguageSupport for CSharpLanguage {
    fn name(&self) -> &'static str {
        "C#"
    }

    fn extensions(&self) -> &[&str] {
        &["cs"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_c_sharp::LANGUAGE.into()
    }

    fn refinements(&self) -> &'static [Refinement] {
        REFINEMENTS
    }
}
