//! Rust language support.
//!
//! Parses Rust with tree-sitter-rust, reusing the C# operator vocabulary so
//! both languages share one set of expression kind names.

use super::{
    LanguageSupport, OperatorSlot, Refinement, ASSIGNMENT_OPERATORS, BINARY_OPERATORS,
    PREFIX_OPERATORS,
};

/// Tree-sitter node kind constants for the Rust grammar.
mod node_kinds {
    pub const BINARY_EXPRESSION: &str = "binary_expression";
    pub const ASSIGNMENT_EXPRESSION: &str = "assignment_expression";
    pub const COMPOUND_ASSIGNMENT_EXPR: &str = "compound_assignment_expr";
    pub const UNARY_EXPRESSION: &str = "unary_expression";
}

static REFINEMENTS: &[Refinement] = &[
    Refinement {
        node_kind: node_kinds::BINARY_EXPRESSION,
        operator: OperatorSlot::Field("operator"),
        kinds: BINARY_OPERATORS,
    },
    // `=` is not a field in tree-sitter-rust
    Refinement {
        node_kind: node_kinds::ASSIGNMENT_EXPRESSION,
        operator: OperatorSlot::FirstToken,
        kinds: ASSIGNMENT_OPERATORS,
    },
    Refinement {
        node_kind: node_kinds::COMPOUND_ASSIGNMENT_EXPR,
        operator: OperatorSlot::Field("operator"),
        kinds: ASSIGNMENT_OPERATORS,
    },
    Refinement {
        node_kind: node_kinds::UNARY_EXPRESSION,
        operator: OperatorSlot::FirstToken,
        kinds: PREFIX_OPERATORS,
    },
];

/// Rust language support implementation.
pub struct RustLanguage;

impl LanguageSupport for RustLanguage {
    fn name(&self) -> &'static str {
        "Rust"
    }

    fn extensions(&self) -> &[&str] {
        &["rs"]
    }

    fn tree_sitter_language(&self) -> tree_sitter::Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    fn refinements(&self) -> &'static [Refinement] {
        REFINEMENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_language_extensions() {
        assert_eq!(RustLanguage.extensions(), &["rs"]);
    }

    #[test]
    fn refined_node_kinds_exist_in_grammar() {
        let language = RustLanguage.tree_sitter_language();
        for refinement in RustLanguage.refinements() {
            assert_ne!(
                language.id_for_node_kind(refinement.node_kind, true),
                0,
                "{} is not a Rust grammar node",
                refinement.node_kind
            );
        }
    }
}
