//! Shared tree-sitter utilities.
//!
//! Provides common functions for extracting text and positions from
//! tree-sitter nodes.

use std::borrow::Cow;

/// Get text content of a tree-sitter node.
///
/// Falls back to a lossy conversion if the node's byte range is not valid
/// UTF-8 (tree-sitter error recovery can split multi-byte characters).
pub fn node_text<'a>(node: &tree_sitter::Node, content: &'a [u8]) -> Cow<'a, str> {
    let bytes = &content[node.byte_range()];
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            String::from_utf8_lossy(bytes)
        }
    }
}

/// 1-based `(line, column)` of the node's start.
///
/// Tree-sitter reports 0-indexed rows and byte columns; the column returned
/// here counts characters, so it does not drift on non-ASCII lines.
#[must_use]
pub fn start_position(node: &tree_sitter::Node, source: &str) -> (usize, usize) {
    let point = node.start_position();
    (point.row + 1, char_column(source, node.start_byte(), point.column))
}

/// 1-based `(line, column)` of the node's end, in characters.
#[must_use]
pub fn end_position(node: &tree_sitter::Node, source: &str) -> (usize, usize) {
    let point = node.end_position();
    (point.row + 1, char_column(source, node.end_byte(), point.column))
}

/// 1-based character column of `byte`, given its byte column on the row.
///
/// Falls back to the byte column if the row prefix is not a valid slice of
/// `source` (a split multi-byte character after error recovery).
#[must_use]
pub fn char_column(source: &str, byte: usize, byte_column: usize) -> usize {
    let column = byte
        .checked_sub(byte_column)
        .and_then(|row_start| source.get(row_start..byte))
        .map_or(byte_column, |prefix| prefix.chars().count());
    column + 1
}

/// First line of `text`, cut to `max_chars` characters with an ellipsis.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(max_chars).collect();
    if line.chars().count() > max_chars || text.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}
