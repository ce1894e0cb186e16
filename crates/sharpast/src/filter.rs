//! Property filter.
//!
//! Decides which node properties are worth emitting. The decision depends
//! only on the `(class name, property name)` pair, so it is computed once
//! per pair and cached for the lifetime of the filter.
//!
//! A property is rejected when any of these rules match, checked in order:
//!
//! 1. It is a tree-global constant (`Language`, `SyntaxTree`).
//! 2. It is an upward relation: an exact configured name (`Parent`), a
//!    class-qualified name (`SyntaxTrivia.Token`), or a relation prefix
//!    followed by an uppercase letter or nothing (`ParentTrivia`).
//! 3. It is the raw discriminator already folded into `@type` (`RawKind`).
//! 4. It is a derived presence flag: a flag prefix followed by an uppercase
//!    letter (`HasLeadingTrivia`).
//!
//! Default-value suppression looks at values, not names, and lives in the
//! projector.

use std::collections::HashMap;

use crate::config::FilterConfig;
use crate::node::{Node, Property};

/// Why a property was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Identical on every node of the tree.
    TreeConstant,
    /// Points up or sideways rather than down the tree.
    BackReference,
    /// The raw kind, already encoded in `@type`.
    Discriminator,
    /// Presence flag derivable from another property.
    DerivedFlag,
}

/// Cached per-class property filter.
#[derive(Debug)]
pub struct PropertyFilter {
    config: FilterConfig,
    cache: HashMap<String, HashMap<String, bool>>,
}

impl PropertyFilter {
    /// Creates a filter with the given rules.
    #[must_use]
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
        }
    }

    /// Returns `true` if `property` of `class_name` nodes should be emitted.
    pub fn admit(&mut self, class_name: &str, property: &str) -> bool {
        if let Some(decision) = self
            .cache
            .get(class_name)
            .and_then(|props| props.get(property))
        {
            return *decision;
        }

        let rejection = self.rejection(class_name, property);
        if let Some(rule) = rejection {
            tracing::trace!(class_name, property, ?rule, "Rejecting property");
        }
        let decision = rejection.is_none();
        self.cache
            .entry(class_name.to_string())
            .or_default()
            .insert(property.to_string(), decision);
        decision
    }

    /// Admitted properties of `node`, in their original order.
    pub fn admitted<'n>(&mut self, node: &'n Node) -> Vec<&'n Property> {
        node.properties()
            .iter()
            .filter(|p| self.admit(node.class_name(), &p.name))
            .collect()
    }

    /// Evaluates the rules without touching the cache.
    #[must_use]
    pub fn rejection(&self, class_name: &str, property: &str) -> Option<Rejection> {
        let c = &self.config;

        if c.tree_constants.iter().any(|n| n == property) {
            return Some(Rejection::TreeConstant);
        }

        let listed_back_reference = c.back_references.iter().any(|entry| match entry.split_once('.') {
            Some((class, name)) => class == class_name && name == property,
            None => entry == property,
        });
        if listed_back_reference
            || c
                .relation_prefixes
                .iter()
                .any(|prefix| has_word_prefix(property, prefix, true))
        {
            return Some(Rejection::BackReference);
        }

        if property == c.discriminator {
            return Some(Rejection::Discriminator);
        }

        if c
            .derived_flag_prefixes
            .iter()
            .any(|prefix| has_word_prefix(property, prefix, false))
        {
            return Some(Rejection::DerivedFlag);
        }

        None
    }

    /// Number of cached `(class, property)` decisions.
    #[must_use]
    pub fn cached_decisions(&self) -> usize {
        self.cache.values().map(HashMap::len).sum()
    }
}

/// `name` starts with `prefix` and the prefix ends on a PascalCase word
/// boundary. `whole` also accepts `name == prefix`.
fn has_word_prefix(name: &str, prefix: &str, whole: bool) -> bool {
    if prefix.is_empty() {
        return false;
    }
    match name.strip_prefix(prefix) {
        Some("") => whole,
        Some(rest) => rest.starts_with(|c: char| c.is_ascii_uppercase()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeBuilder;
    use rstest::rstest;

    fn filter() -> PropertyFilter {
        PropertyFilter::new(FilterConfig::default())
    }

    #[rstest]
    #[case::language("IfStatementSyntax", "Language", Some(Rejection::TreeConstant))]
    #[case::syntax_tree("SyntaxToken", "SyntaxTree", Some(Rejection::TreeConstant))]
    #[case::parent("IfStatementSyntax", "Parent", Some(Rejection::BackReference))]
    #[case::parent_trivia("SyntaxToken", "ParentTrivia", Some(Rejection::BackReference))]
    #[case::ancestor("BlockSyntax", "AncestorScope", Some(Rejection::BackReference))]
    #[case::trivia_token("SyntaxTrivia", "Token", Some(Rejection::BackReference))]
    #[case::raw_kind("BinaryExpressionSyntax", "RawKind", Some(Rejection::Discriminator))]
    #[case::has_leading("SyntaxToken", "HasLeadingTrivia", Some(Rejection::DerivedFlag))]
    #[case::has_trailing("SyntaxToken", "HasTrailingTrivia", Some(Rejection::DerivedFlag))]
    #[case::token_elsewhere("LiteralExpressionSyntax", "Token", None)]
    #[case::parenthesized("ArgumentSyntax", "Parenthesized", None)]
    #[case::hash_token("DirectiveSyntax", "HashToken", None)]
    #[case::has_alone("FooSyntax", "Has", None)]
    #[case::span("IfStatementSyntax", "Span", None)]
    #[case::leading("SyntaxToken", "LeadingTrivia", None)]
    fn rules(
        #[case] class_name: &str,
        #[case] property: &str,
        #[case] expected: Option<Rejection>,
    ) {
        assert_eq!(filter().rejection(class_name, property), expected);
        assert_eq!(filter().admit(class_name, property), expected.is_none());
    }

    #[test]
    fn decisions_are_cached_per_pair() {
        let mut f = filter();
        assert!(f.admit("SyntaxToken", "Text"));
        assert!(f.admit("SyntaxToken", "Text"));
        assert!(!f.admit("SyntaxToken", "Parent"));
        assert!(f.admit("IfStatementSyntax", "Text"));
        assert_eq!(f.cached_decisions(), 3);
    }

    #[test]
    fn admitted_keeps_relative_order() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("IfStatementSyntax", None);
        b.set(root, "Language", "C#");
        b.set(root, "Condition", true);
        b.set(root, "RawKind", 12_i64);
        b.set(root, "Statement", false);
        b.set(root, "HasElse", true);
        b.set(root, "Else", "x");
        let tree = b.finish(root);

        let mut f = filter();
        let names: Vec<_> = f
            .admitted(tree.get(root).unwrap())
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Condition", "Statement", "Else"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("SyntaxToken", None);
        for name in ["Parent", "Text", "HasLeadingTrivia", "LeadingTrivia", "RawKind", "Span"] {
            b.set(root, name, true);
        }
        let tree = b.finish(root);
        let node = tree.get(root).unwrap();

        let mut f = filter();
        let first: Vec<_> = f.admitted(node).into_iter().map(|p| p.name.clone()).collect();
        let second: Vec<_> = first
            .iter()
            .filter(|name| f.admit(node.class_name(), name))
            .cloned()
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_prefixes_match_nothing() {
        let f = PropertyFilter::new(FilterConfig {
            relation_prefixes: vec![String::new()],
            derived_flag_prefixes: vec![String::new()],
            ..FilterConfig::default()
        });
        assert_eq!(f.rejection("Foo", "Anything"), None);
    }
}
