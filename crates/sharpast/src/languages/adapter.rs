//! Converts tree-sitter trees into the generic node model.
//!
//! The adapter produces Roslyn-shaped graphs: structural `*Syntax` nodes,
//! `SyntaxToken` leaves carrying their trivia, and `SyntaxTrivia` for
//! comments and directives. Every node gets the usual back-references
//! (`SyntaxTree`, `Parent`, `Token`) so the projector has real cycles to deal
//! with, exactly as it would with a compiler's object model.
//!
//! Error and missing nodes are kept in the tree and reported as diagnostics;
//! a tree with diagnostics comes back as a [`ParseFailure`] that still
//! carries the adapted tree.

use super::kinds::{comment_kind, pascal_case, KindTable, END_OF_FILE_TOKEN, SKIPPED_TOKENS};
use super::tree_sitter_utils::{end_position, excerpt, node_text, start_position};
use super::{LanguageSupport, OperatorSlot};
use crate::node::{Kind, KindVocabulary, NodeId, SyntaxTree, TreeBuilder, Value};
use crate::parser::{Diagnostic, ParseFailure};

/// Class of structural nodes built from `ERROR` nodes.
const SKIPPED_TOKENS_CLASS: &str = "SkippedTokensSyntax";
const TOKEN_CLASS: &str = "SyntaxToken";
const TRIVIA_CLASS: &str = "SyntaxTrivia";
const SPAN_CLASS: &str = "TextSpan";

/// Property name for unfielded named children.
const CHILD_NODES: &str = "ChildNodes";

/// Properties every structural node sets before its children.
const RESERVED: &[&str] = &[
    "Language",
    "SyntaxTree",
    "Parent",
    "RawKind",
    "Span",
    "IsMissing",
    "ContainsDiagnostics",
    "EndOfFileToken",
];

/// Longest source excerpt quoted in a diagnostic.
const EXCERPT_CHARS: usize = 40;

/// Adapts a parsed tree-sitter tree, descending at most `max_depth` levels.
///
/// # Errors
///
/// Returns a [`ParseFailure`] with the adapted tree attached if the tree
/// contains error or missing nodes, or one without a tree if the source
/// nests deeper than `max_depth`.
pub fn adapt(
    support: &dyn LanguageSupport,
    kinds: &KindTable,
    tree: &tree_sitter::Tree,
    source: &str,
    max_depth: usize,
) -> Result<SyntaxTree, ParseFailure> {
    let mut adapter = Adapter {
        support,
        kinds,
        source,
        builder: TreeBuilder::new(),
        root: None,
        tokens: Vec::new(),
        pending: Vec::new(),
        diagnostics: Vec::new(),
        depth: 0,
        max_depth,
        too_deep: None,
    };

    let root_node = tree.root_node();
    let root = adapter.structural(root_node, None);
    adapter.end_of_file(root, root_node);
    adapter.attach_trivia();

    let Adapter {
        builder,
        diagnostics,
        tokens,
        too_deep,
        ..
    } = adapter;
    if let Some(diagnostic) = too_deep {
        tracing::warn!(max_depth, %diagnostic, "Source nests too deeply");
        return Err(ParseFailure {
            diagnostics: vec![diagnostic],
            partial: None,
        });
    }
    let tree = builder.finish(root);

    tracing::debug!(
        language = support.name(),
        nodes = tree.len(),
        tokens = tokens.len(),
        diagnostics = diagnostics.len(),
        "Adapted tree-sitter tree"
    );

    if diagnostics.is_empty() {
        Ok(tree)
    } else {
        Err(ParseFailure {
            diagnostics,
            partial: Some(tree),
        })
    }
}

/// A token and the trivia routed to it so far.
struct TokenSlot {
    id: NodeId,
    end_row: usize,
    leading: Vec<NodeId>,
    trailing: Vec<NodeId>,
}

struct Adapter<'a> {
    support: &'a dyn LanguageSupport,
    kinds: &'a KindTable,
    source: &'a str,
    builder: TreeBuilder,
    root: Option<NodeId>,
    tokens: Vec<TokenSlot>,
    /// Trivia waiting for the next token.
    pending: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
    /// Structural nodes currently being descended into.
    depth: usize,
    max_depth: usize,
    /// Set at the first node whose children were not visited.
    too_deep: Option<Diagnostic>,
}

impl Adapter<'_> {
    /// Converts any node, returning `None` for trivia (which is attached to
    /// tokens rather than to its syntactic parent).
    fn convert(&mut self, node: tree_sitter::Node<'_>, parent: NodeId) -> Option<NodeId> {
        if node.is_error() {
            return Some(self.structural(node, Some(parent)));
        }
        if node.is_extra() {
            self.trivia(node);
            return None;
        }
        if node.child_count() == 0 || node.is_missing() {
            return Some(self.token(node, parent));
        }
        Some(self.structural(node, Some(parent)))
    }

    fn structural(&mut self, node: tree_sitter::Node<'_>, parent: Option<NodeId>) -> NodeId {
        let (class_name, kind) = if node.is_error() {
            let message = format!("unexpected syntax `{}`", self.excerpt(node));
            self.diagnose(node, message);
            (
                SKIPPED_TOKENS_CLASS.to_string(),
                self.kinds.synthetic(SKIPPED_TOKENS),
            )
        } else {
            (
                format!("{}Syntax", pascal_case(node.kind())),
                self.refined_kind(node),
            )
        };

        let id = self.builder.add_node(class_name, kind);
        self.common(id, node, parent, kind);
        self.builder.set(id, "IsMissing", node.is_missing());
        self.builder.set(id, "ContainsDiagnostics", node.has_error());

        if self.depth >= self.max_depth {
            if self.too_deep.is_none() {
                let (line, column) = start_position(&node, self.source);
                let message = format!("source is nested deeper than {} levels", self.max_depth);
                self.too_deep = Some(Diagnostic::at(message, line, column));
            }
            return id;
        }
        self.depth += 1;

        let mut groups: Vec<(String, Vec<NodeId>, bool)> = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                let field = cursor.field_name();
                if let Some(child_id) = self.convert(child, id) {
                    let (name, always_sequence) = self.group_name(child, field);
                    match groups.iter_mut().find(|(n, _, _)| *n == name) {
                        Some((_, members, _)) => members.push(child_id),
                        None => groups.push((name, vec![child_id], always_sequence)),
                    }
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        self.depth -= 1;

        for (name, members, always_sequence) in groups {
            let value = if members.len() == 1 && !always_sequence {
                Value::Node(members[0])
            } else {
                Value::Nodes(members)
            };
            self.builder.set(id, name, value);
        }
        id
    }

    fn token(&mut self, node: tree_sitter::Node<'_>, parent: NodeId) -> NodeId {
        if node.is_missing() {
            self.diagnose(node, format!("missing `{}`", node.kind()));
        }

        let kind = self.kinds.grammar_kind(node.kind_id());
        let id = self.builder.add_node(TOKEN_CLASS, kind);
        self.common(id, node, Some(parent), kind);
        self.builder.set(id, "IsMissing", node.is_missing());
        let text = if node.is_missing() {
            String::new()
        } else {
            node_text(&node, self.source.as_bytes()).into_owned()
        };
        self.builder.set(id, "Text", text);

        self.tokens.push(TokenSlot {
            id,
            end_row: node.end_position().row,
            leading: std::mem::take(&mut self.pending),
            trailing: Vec::new(),
        });
        id
    }

    fn trivia(&mut self, node: tree_sitter::Node<'_>) {
        if node.has_error() {
            let message = format!("unexpected syntax `{}`", self.excerpt(node));
            self.diagnose(node, message);
        }

        let text = node_text(&node, self.source.as_bytes()).into_owned();
        let kind = comment_kind(&text)
            .and_then(|name| self.kinds.synthetic(name))
            .or_else(|| self.kinds.grammar_kind(node.kind_id()));
        let is_directive = node.kind().starts_with("preproc") || text.starts_with('#');

        let id = self.builder.add_node(TRIVIA_CLASS, kind);
        let root = self.root_or(id);
        self.builder.set(id, "SyntaxTree", root);
        self.builder.set(id, "Token", Value::Null);
        self.builder.set(id, "RawKind", raw_kind(kind));
        let span = self.span(node);
        self.builder.set(id, "Span", span);
        self.builder.set(id, "Text", text);
        self.builder.set(id, "IsDirective", is_directive);

        let row = node.start_position().row;
        match self.tokens.last_mut() {
            Some(last) if last.end_row == row => last.trailing.push(id),
            _ => self.pending.push(id),
        }
    }

    /// Appends the end-of-file token, which owns any leftover trivia.
    fn end_of_file(&mut self, root: NodeId, root_node: tree_sitter::Node<'_>) {
        let kind = self.kinds.synthetic(END_OF_FILE_TOKEN);
        let id = self.builder.add_node(TOKEN_CLASS, kind);
        self.builder.set(id, "Language", self.support.name());
        self.builder.set(id, "SyntaxTree", root);
        self.builder.set(id, "Parent", root);
        self.builder.set(id, "RawKind", raw_kind(kind));

        let end = root_node.end_byte().max(self.source.len());
        let (line, column) = end_position(&root_node, self.source);
        let span = self.builder.add_node(SPAN_CLASS, None);
        for (name, value) in [
            ("Start", end),
            ("End", end),
            ("Length", 0),
            ("StartLine", line),
            ("StartColumn", column),
            ("EndLine", line),
            ("EndColumn", column),
        ] {
            self.builder.set(span, name, int(value));
        }
        self.builder.set(id, "Span", span);
        self.builder.set(id, "IsMissing", false);
        self.builder.set(id, "Text", "");

        self.tokens.push(TokenSlot {
            id,
            end_row: usize::MAX,
            leading: std::mem::take(&mut self.pending),
            trailing: Vec::new(),
        });
        self.builder.set(root, "EndOfFileToken", id);
    }

    /// Writes the trivia lists onto their tokens and points each trivia back
    /// at its owner.
    fn attach_trivia(&mut self) {
        for slot in &self.tokens {
            for trivia in slot.leading.iter().chain(&slot.trailing) {
                self.builder.set(*trivia, "Token", slot.id);
            }
            self.builder
                .set(slot.id, "LeadingTrivia", slot.leading.clone());
            self.builder
                .set(slot.id, "TrailingTrivia", slot.trailing.clone());
            self.builder
                .set(slot.id, "HasLeadingTrivia", !slot.leading.is_empty());
            self.builder
                .set(slot.id, "HasTrailingTrivia", !slot.trailing.is_empty());
        }
    }

    /// `Language`, `SyntaxTree`, `Parent`, `RawKind`, `Span`.
    fn common(
        &mut self,
        id: NodeId,
        node: tree_sitter::Node<'_>,
        parent: Option<NodeId>,
        kind: Option<Kind>,
    ) {
        let root = self.root_or(id);
        self.builder.set(id, "Language", self.support.name());
        self.builder.set(id, "SyntaxTree", root);
        self.builder
            .set(id, "Parent", parent.map_or(Value::Null, Value::Node));
        self.builder.set(id, "RawKind", raw_kind(kind));
        let span = self.span(node);
        self.builder.set(id, "Span", span);
    }

    fn span(&mut self, node: tree_sitter::Node<'_>) -> NodeId {
        let (start_line, start_column) = start_position(&node, self.source);
        let (end_line, end_column) = end_position(&node, self.source);
        let span = self.builder.add_node(SPAN_CLASS, None);
        for (name, value) in [
            ("Start", node.start_byte()),
            ("End", node.end_byte()),
            ("Length", node.end_byte() - node.start_byte()),
            ("StartLine", start_line),
            ("StartColumn", start_column),
            ("EndLine", end_line),
            ("EndColumn", end_column),
        ] {
            self.builder.set(span, name, int(value));
        }
        span
    }

    /// The first node allocated becomes the root.
    fn root_or(&mut self, id: NodeId) -> NodeId {
        *self.root.get_or_insert(id)
    }

    /// Grammar kind, refined from the operator where the language says so.
    fn refined_kind(&self, node: tree_sitter::Node<'_>) -> Option<Kind> {
        let grammar = self.kinds.grammar_kind(node.kind_id());
        let Some(refinement) = self
            .support
            .refinements()
            .iter()
            .find(|r| r.node_kind == node.kind())
        else {
            return grammar;
        };

        let operator = match refinement.operator {
            OperatorSlot::Field(field) => node.child_by_field_name(field),
            OperatorSlot::FirstToken => anonymous_children(node).next(),
            OperatorSlot::LastToken => anonymous_children(node).last(),
        };
        operator
            .map(|op| node_text(&op, self.source.as_bytes()))
            .and_then(|text| refinement.kind_for(&text))
            .and_then(|name| self.kinds.synthetic(name))
            .or(grammar)
    }

    /// Property name for a child and whether it is always a sequence.
    fn group_name(&self, child: tree_sitter::Node<'_>, field: Option<&str>) -> (String, bool) {
        let name = match field {
            Some(field) => pascal_case(field),
            None if child.is_named() || child.is_error() => return (CHILD_NODES.to_string(), true),
            None => self
                .kinds
                .kind_name(Kind(child.kind_id()))
                .map_or_else(|| pascal_case(child.kind()), str::to_string),
        };
        if RESERVED.contains(&name.as_str()) {
            (format!("{name}Child"), false)
        } else {
            (name, false)
        }
    }

    fn diagnose(&mut self, node: tree_sitter::Node<'_>, message: String) {
        let (line, column) = start_position(&node, self.source);
        tracing::debug!(line, column, %message, "Syntax diagnostic");
        self.diagnostics.push(Diagnostic::at(message, line, column));
    }

    fn excerpt(&self, node: tree_sitter::Node<'_>) -> String {
        excerpt(&node_text(&node, self.source.as_bytes()), EXCERPT_CHARS)
    }
}

fn anonymous_children(node: tree_sitter::Node<'_>) -> impl Iterator<Item = tree_sitter::Node<'_>> {
    (0..node.child_count())
        .filter_map(move |i| node.child(i))
        .filter(|c| !c.is_named() && !c.is_extra())
}

fn raw_kind(kind: Option<Kind>) -> Value {
    Value::Int(kind.map_or(0, |k| i64::from(k.0)))
}

fn int(value: usize) -> Value {
    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
}
