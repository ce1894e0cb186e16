//! Cycle-safe projection of a [`SyntaxTree`] into JSON.
//!
//! The projector walks the tree from the root and turns every node into an
//! object whose first key is `@type`, followed by the admitted properties in
//! their original order. With role annotation enabled, `@role` follows
//! `@type` on objects whose tag has roles. Nodes and node sequences are projected recursively;
//! primitives are copied.
//!
//! ## Cycles
//!
//! The walk keeps the path of nodes between the root and the current node.
//! A property pointing at a node on that path is dropped entirely (no `$ref`
//! placeholder), and such nodes are dropped from sequences. Nothing else is
//! de-duplicated: a node reachable from two places is inlined at both. The
//! only identity tracking is the path itself, so memory is bounded by depth.

use std::sync::Arc;

use serde_json::{Map, Number, Value as Json};

use crate::config::{DriverConfig, ProjectionConfig};
use crate::error::ProjectionError;
use crate::filter::PropertyFilter;
use crate::node::{KindVocabulary, Node, NodeId, SyntaxTree, Value};
use crate::roles::{RoleTable, ROLE_KEY};
use crate::tag::TagResolver;

/// Key holding the type tag in every projected object.
pub const TYPE_KEY: &str = "@type";

/// Projects syntax trees into JSON.
///
/// A projector is reused across requests so the filter cache persists.
pub struct Projector {
    filter: PropertyFilter,
    tags: TagResolver,
    roles: Option<RoleTable>,
    options: ProjectionConfig,
}

/// Per-call walk state.
struct Walk<'t> {
    tree: &'t SyntaxTree,
    path: Vec<NodeId>,
    nodes: usize,
    pruned: usize,
}

impl Projector {
    /// Creates a projector from the driver configuration.
    #[must_use]
    pub fn new(config: &DriverConfig, vocabulary: Arc<dyn KindVocabulary>) -> Self {
        Self {
            filter: PropertyFilter::new(config.filter.clone()),
            tags: TagResolver::new(config.tags.clone(), vocabulary),
            roles: config
                .projection
                .roles
                .then(|| RoleTable::with_overrides(&config.roles)),
            options: config.projection.clone(),
        }
    }

    /// Projects the whole tree, starting at its root.
    ///
    /// # Errors
    ///
    /// Fails on the first malformed node: an unnamed kind, a reference to a
    /// node outside the tree, or nesting deeper than `max_depth`.
    pub fn project(&mut self, tree: &SyntaxTree) -> Result<Json, ProjectionError> {
        self.project_from(tree, tree.root())
    }

    /// Projects the subtree under `start`.
    ///
    /// # Errors
    ///
    /// See [`project`](Self::project).
    pub fn project_from(&mut self, tree: &SyntaxTree, start: NodeId) -> Result<Json, ProjectionError> {
        let node = tree.get(start).ok_or_else(|| ProjectionError::DanglingNode {
            node: start,
            property: TYPE_KEY.to_string(),
        })?;

        let mut walk = Walk {
            tree,
            path: Vec::new(),
            nodes: 0,
            pruned: 0,
        };
        let value = self.visit(&mut walk, start, node)?;

        tracing::debug!(
            nodes = walk.nodes,
            pruned_back_edges = walk.pruned,
            cached_filter_decisions = self.filter.cached_decisions(),
            "Projected syntax tree"
        );
        Ok(value)
    }

    fn visit(&mut self, walk: &mut Walk<'_>, id: NodeId, node: &Node) -> Result<Json, ProjectionError> {
        if walk.path.len() >= self.options.max_depth {
            return Err(ProjectionError::DepthExceeded {
                max_depth: self.options.max_depth,
            });
        }

        walk.path.push(id);
        walk.nodes += 1;
        let result = self.visit_properties(walk, id, node);
        walk.path.pop();
        result
    }

    fn visit_properties(
        &mut self,
        walk: &mut Walk<'_>,
        id: NodeId,
        node: &Node,
    ) -> Result<Json, ProjectionError> {
        let mut object = Map::new();
        let tag = self.tags.tag(id, node)?;
        if let Some(roles) = self.roles.as_ref().and_then(|table| table.roles(&tag)) {
            object.insert(TYPE_KEY.to_string(), Json::String(tag.to_string()));
            let roles = roles.iter().cloned().map(Json::String).collect();
            object.insert(ROLE_KEY.to_string(), Json::Array(roles));
        } else {
            object.insert(TYPE_KEY.to_string(), Json::String(tag.into_owned()));
        }

        for property in node.properties() {
            if !self.filter.admit(node.class_name(), &property.name) {
                continue;
            }
            if self.options.omit_defaults && property.value.is_default() {
                continue;
            }

            let projected = match &property.value {
                Value::Node(child) => {
                    if walk.path.contains(child) {
                        tracing::trace!(node = %id, property = %property.name, "Pruning back edge");
                        walk.pruned += 1;
                        continue;
                    }
                    let child_node = lookup(walk.tree, *child, &property.name)?;
                    self.visit(walk, *child, child_node)?
                }
                Value::Nodes(children) => {
                    let mut items = Vec::with_capacity(children.len());
                    for child in children {
                        if walk.path.contains(child) {
                            walk.pruned += 1;
                            continue;
                        }
                        let child_node = lookup(walk.tree, *child, &property.name)?;
                        items.push(self.visit(walk, *child, child_node)?);
                    }
                    Json::Array(items)
                }
                primitive => primitive_to_json(primitive),
            };
            object.insert(property.name.clone(), projected);
        }

        Ok(Json::Object(object))
    }
}

fn lookup<'t>(tree: &'t SyntaxTree, id: NodeId, property: &str) -> Result<&'t Node, ProjectionError> {
    tree.get(id).ok_or_else(|| ProjectionError::DanglingNode {
        node: id,
        property: property.to_string(),
    })
}

fn primitive_to_json(value: &Value) -> Json {
    match value {
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Str(s) => Json::String(s.clone()),
        Value::Null | Value::Node(_) | Value::Nodes(_) => Json::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::node::{Kind, TreeBuilder};
    use serde_json::json;

    struct Names;

    impl KindVocabulary for Names {
        fn kind_name(&self, kind: Kind) -> Option<&str> {
            ["CompilationUnit", "AddExpression", "PlusToken", "IdentifierToken"]
                .get(usize::from(kind.0))
                .copied()
        }
    }

    /// `a + b` with parent, root and language noise on every node.
    fn addition() -> SyntaxTree {
        let mut b = TreeBuilder::new();
        let root = b.add_node("CompilationUnitSyntax", Some(Kind(0)));
        let expr = b.add_node("BinaryExpressionSyntax", Some(Kind(1)));
        let left = b.add_node("SyntaxToken", Some(Kind(3)));
        let op = b.add_node("SyntaxToken", Some(Kind(2)));
        let right = b.add_node("SyntaxToken", Some(Kind(3)));

        for (id, parent) in [(root, None), (expr, Some(root)), (left, Some(expr)), (op, Some(expr)), (right, Some(expr))] {
            b.set(id, "Language", "C#");
            b.set(id, "SyntaxTree", root);
            b.set(id, "Parent", parent.map_or(Value::Null, Value::Node));
            b.set(id, "RawKind", 7_i64);
        }
        b.set(root, "Members", vec![expr]);
        b.set(expr, "Left", left);
        b.set(expr, "OperatorToken", op);
        b.set(expr, "Right", right);
        b.set(left, "Text", "a");
        b.set(left, "HasLeadingTrivia", false);
        b.set(op, "Text", "+");
        b.set(right, "Text", "b");
        b.finish(root)
    }

    fn project_with(config: &DriverConfig, tree: &SyntaxTree) -> Result<Json, ProjectionError> {
        Projector::new(config, Arc::new(Names)).project(tree)
    }

    #[test]
    fn projects_tags_and_admitted_properties() {
        let value = project_with(&DriverConfig::default(), &addition()).unwrap();
        assert_eq!(
            value,
            json!({
                "@type": "CompilationUnit",
                "Members": [{
                    "@type": "BinaryExpression_AddExpression",
                    "Left": {"@type": "IdentifierToken", "Text": "a"},
                    "OperatorToken": {"@type": "PlusToken", "Text": "+"},
                    "Right": {"@type": "IdentifierToken", "Text": "b"},
                }],
            })
        );
    }

    #[test]
    fn type_key_comes_first() {
        let value = project_with(&DriverConfig::default(), &addition()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["@type", "Members"]);
    }

    #[test]
    fn roles_follow_the_type_when_enabled() {
        let mut config = DriverConfig::default();
        config.projection.roles = true;
        config
            .roles
            .insert("IdentifierToken".to_string(), vec!["Identifier".to_string()]);
        let value = project_with(&config, &addition()).unwrap();

        let expr = &value["Members"][0];
        let keys: Vec<_> = expr.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys[..2], ["@type", "@role"]);
        assert_eq!(expr["@role"], json!(["Binary", "Expression", "Arithmetic", "Add"]));
        assert_eq!(expr["OperatorToken"]["@role"], json!(["Operator", "Arithmetic", "Add"]));
        assert_eq!(expr["Left"]["@role"], json!(["Identifier"]));
        assert_eq!(value["@role"], json!(["File", "Module"]));
    }

    #[test]
    fn roles_are_absent_by_default() {
        let value = project_with(&DriverConfig::default(), &addition()).unwrap();
        assert!(value.get("@role").is_none());
        assert!(value["Members"][0].get("@role").is_none());
    }

    #[test]
    fn back_edges_are_pruned_without_the_filter() {
        let config = DriverConfig {
            filter: FilterConfig {
                tree_constants: vec![],
                back_references: vec![],
                relation_prefixes: vec![],
                ..FilterConfig::default()
            },
            ..DriverConfig::default()
        };
        let value = project_with(&config, &addition()).unwrap();

        // Parent and SyntaxTree point at ancestors and vanish; the root's own
        // SyntaxTree points at itself and vanishes too.
        let root = value.as_object().unwrap();
        assert!(!root.contains_key("SyntaxTree"));
        assert_eq!(root["Parent"], Json::Null);
        let expr = &root["Members"][0];
        assert!(expr.get("Parent").is_none());
        assert!(expr.get("SyntaxTree").is_none());
        assert_eq!(expr["Language"], "C#");
        assert!(expr["Left"].get("Parent").is_none());
    }

    #[test]
    fn ancestors_are_dropped_from_sequences() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("ListSyntax", None);
        let child = b.add_node("ItemSyntax", None);
        b.set(root, "Items", vec![child]);
        b.set(child, "Related", vec![root, child]);
        let tree = b.finish(root);

        let value = project_with(&DriverConfig::default(), &tree).unwrap();
        assert_eq!(
            value,
            json!({"@type": "List", "Items": [{"@type": "Item", "Related": []}]})
        );
    }

    #[test]
    fn shared_nodes_are_inlined_everywhere() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("PairSyntax", None);
        let shared = b.add_node("LeafSyntax", None);
        b.set(root, "First", shared);
        b.set(root, "Second", shared);
        b.set(shared, "Text", "x");
        let tree = b.finish(root);

        let value = project_with(&DriverConfig::default(), &tree).unwrap();
        assert_eq!(value["First"], value["Second"]);
        assert_eq!(value["First"]["Text"], "x");
    }

    #[test]
    fn omit_defaults_drops_empty_values() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("TokenListSyntax", None);
        b.set(root, "IsMissing", false);
        b.set(root, "Count", 0_i64);
        b.set(root, "Text", "");
        b.set(root, "Items", Vec::<NodeId>::new());
        b.set(root, "Else", Value::Null);
        b.set(root, "Name", "n");
        let tree = b.finish(root);

        let mut config = DriverConfig::default();
        let full = project_with(&config, &tree).unwrap();
        assert_eq!(full.as_object().unwrap().len(), 7);

        config.projection.omit_defaults = true;
        let trimmed = project_with(&config, &tree).unwrap();
        assert_eq!(trimmed, json!({"@type": "TokenList", "Name": "n"}));
    }

    #[test]
    fn unknown_kind_fails_the_projection() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("CompilationUnitSyntax", Some(Kind(0)));
        let bad = b.add_node("WeirdSyntax", Some(Kind(42)));
        b.set(root, "Child", bad);
        let tree = b.finish(root);

        let err = project_with(&DriverConfig::default(), &tree).unwrap_err();
        assert!(matches!(err, ProjectionError::UnknownKind { kind: Kind(42), .. }));
    }

    #[test]
    fn dangling_reference_fails_the_projection() {
        let mut big = TreeBuilder::new();
        big.add_node("A", None);
        let far = big.add_node("B", None);

        let mut b = TreeBuilder::new();
        let root = b.add_node("RootSyntax", None);
        b.set(root, "Child", far);
        let tree = b.finish(root);

        let err = project_with(&DriverConfig::default(), &tree).unwrap_err();
        assert_eq!(
            err,
            ProjectionError::DanglingNode {
                node: far,
                property: "Child".to_string()
            }
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("NestSyntax", None);
        let mut current = root;
        for _ in 0..10 {
            let next = b.add_node("NestSyntax", None);
            b.set(current, "Inner", next);
            current = next;
        }
        let tree = b.finish(root);

        let mut config = DriverConfig::default();
        config.projection.max_depth = 11;
        assert!(project_with(&config, &tree).is_ok());

        config.projection.max_depth = 10;
        assert_eq!(
            project_with(&config, &tree).unwrap_err(),
            ProjectionError::DepthExceeded { max_depth: 10 }
        );
    }

    #[test]
    fn nested_node_without_class_fails_the_projection() {
        let mut b = TreeBuilder::new();
        let root = b.add_node("CompilationUnitSyntax", None);
        let nameless = b.add_node("", None);
        b.set(root, "Members", vec![nameless]);
        let tree = b.finish(root);

        let err = project_with(&DriverConfig::default(), &tree).unwrap_err();
        assert!(matches!(err, ProjectionError::EmptyClassName { .. }));
    }

    #[test]
    fn projection_is_deterministic() {
        let tree = addition();
        let mut projector = Projector::new(&DriverConfig::default(), Arc::new(Names));
        let first = serde_json::to_string(&projector.project(&tree).unwrap()).unwrap();
        let second = serde_json::to_string(&projector.project(&tree).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn floats_project_as_numbers_or_null() {
        assert_eq!(primitive_to_json(&Value::Float(1.5)), json!(1.5));
        assert_eq!(primitive_to_json(&Value::Float(f64::NAN)), Json::Null);
    }
}
