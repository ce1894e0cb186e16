//! Generic syntax node model.
//!
//! Every parser collaborator hands the projector a [`SyntaxTree`]: an arena of
//! [`Node`]s that refer to each other by [`NodeId`]. A node is a class name,
//! an optional [`Kind`] and an ordered list of named [`Value`]s. Nothing here
//! knows about any particular grammar.
//!
//! ## Graph shape
//!
//! Ignoring back-references, the nodes form a tree under [`SyntaxTree::root`].
//! Back-references (to the parent, to the root, to an owning token) are plain
//! [`Value::Node`] entries pointing upwards, so the graph as a whole may be
//! cyclic. The projector prunes those edges; the model does not mark them.

use std::fmt;

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Position of the node in the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fine-grained node discriminator, resolved to a name by a [`KindVocabulary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(pub u16);

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps [`Kind`] values to their textual names.
///
/// Implementations must be total over every kind their parser produces;
/// `None` signals a malformed node.
pub trait KindVocabulary: Send + Sync {
    /// Name of `kind`, or `None` if the value is unknown.
    fn kind_name(&self, kind: Kind) -> Option<&str>;
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Integer (offsets, lengths, raw kinds).
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(String),
    /// A single node: a child, or a back-reference.
    Node(NodeId),
    /// An ordered sequence of nodes.
    Nodes(Vec<NodeId>),
}

impl Value {
    /// Returns `true` for the default value of the value's type.
    ///
    /// Used by the optional default suppression policy.
    #[must_use]
    pub fn is_default(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::Str(s) => s.is_empty(),
            Self::Nodes(ids) => ids.is_empty(),
            Self::Node(_) => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<NodeId> for Value {
    fn from(value: NodeId) -> Self {
        Self::Node(value)
    }
}

impl From<Vec<NodeId>> for Value {
    fn from(value: Vec<NodeId>) -> Self {
        Self::Nodes(value)
    }
}

/// A named property of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name, unique within its node.
    pub name: String,
    /// Property value.
    pub value: Value,
}

/// One syntax tree element.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    class_name: String,
    kind: Option<Kind>,
    properties: Vec<Property>,
}

impl Node {
    /// The node's concrete shape, e.g. `BinaryExpressionSyntax`.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The node's discriminator, if its class has one.
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Looks a property up by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

/// An immutable node graph produced by one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// The root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Looks a node up, returning `None` for an id from another tree.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids, in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(u32::try_from(i).unwrap_or(u32::MAX)), n))
    }
}

/// Incrementally builds a [`SyntaxTree`].
///
/// Nodes can be allocated before their properties are known, which is what
/// allows children to point back at parents that are still being built.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a node with no properties yet.
    ///
    /// # Panics
    ///
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn add_node(&mut self, class_name: impl Into<String>, kind: Option<Kind>) -> NodeId {
        let class_name = class_name.into();
        let id = NodeId(u32::try_from(self.nodes.len()).expect("node arena overflow"));
        self.nodes.push(Node {
            class_name,
            kind,
            properties: Vec::new(),
        });
        id
    }

    /// Appends a property to `node`.
    ///
    /// A property with the same name replaces the earlier value in place, so
    /// names stay unique and the first position wins.
    ///
    /// # Panics
    ///
    /// Panics if `node` was not allocated by this builder.
    pub fn set(&mut self, node: NodeId, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        let properties = &mut self.nodes[node.index()].properties;
        if let Some(existing) = properties.iter_mut().find(|p| p.name == name) {
            existing.value = value;
        } else {
            properties.push(Property { name, value });
        }
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Freezes the arena into a tree rooted at `root`.
    ///
    /// # Panics
    ///
    /// Panics if `root` was not allocated by this builder.
    #[must_use]
    pub fn finish(self, root: NodeId) -> SyntaxTree {
        assert!(root.index() < self.nodes.len(), "root {root} is not in the arena");
        SyntaxTree {
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_property_order() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("CompilationUnitSyntax", Some(Kind(1)));
        b.set(root, "Zeta", 1_i64);
        b.set(root, "Alpha", "a");
        b.set(root, "Mid", true);

        let tree = b.finish(root);
        let names: Vec<_> = tree
            .get(root)
            .unwrap()
            .properties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn setting_an_existing_property_replaces_in_place() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("Foo", None);
        b.set(root, "A", 1_i64);
        b.set(root, "B", 2_i64);
        b.set(root, "A", 3_i64);

        let tree = b.finish(root);
        let node = tree.get(root).unwrap();
        assert_eq!(node.properties().len(), 2);
        assert_eq!(node.properties()[0].name, "A");
        assert_eq!(node.property("A"), Some(&Value::Int(3)));
    }

    #[test]
    fn back_references_are_plain_node_values() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("Root", None);
        let child = b.add_node("Child", None);
        b.set(root, "Child", child);
        b.set(child, "Parent", root);

        let tree = b.finish(root);
        assert_eq!(tree.get(child).unwrap().property("Parent"), Some(&Value::Node(root)));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn default_values() {
        assert!(Value::Null.is_default());
        assert!(Value::Bool(false).is_default());
        assert!(Value::Int(0).is_default());
        assert!(Value::Str(String::new()).is_default());
        assert!(Value::Nodes(vec![]).is_default());
        assert!(!Value::Bool(true).is_default());
        assert!(!Value::Node(NodeId(0)).is_default());
        assert!(!Value::Nodes(vec![NodeId(0)]).is_default());
    }

    #[test]
    fn unknown_id_is_none() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("Root", None);
        let tree = b.finish(root);
        assert!(tree.get(NodeId(7)).is_none());
    }
}
