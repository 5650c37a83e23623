//! Menu node and tree types with order-preserving insertion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::MenuError;
use crate::leaves::Leaves;

/// A single node in the navigation menu.
///
/// Leaf nodes (no `children`) represent documentation pages; internal nodes
/// represent sections. Fields beyond `id` and `children` are carried through
/// untouched so the persisted form round-trips.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Node identifier, unique across the whole tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Ordered child nodes, exclusively owned by this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuNode>>,

    /// Unrecognized persisted fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MenuNode {
    /// Create a leaf node for a documentation page.
    #[must_use]
    pub fn page(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// True if this node has no children (a documentation page).
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// The navigation menu: an ordered sequence of root nodes.
///
/// Loaded once per run, mutated in place by insertion, serialized back at
/// the end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuTree {
    roots: Vec<MenuNode>,
}

impl MenuTree {
    /// Create a tree from root nodes.
    #[must_use]
    pub fn new(roots: Vec<MenuNode>) -> Self {
        Self { roots }
    }

    /// Parse a tree from the persisted JSON form (an array of node records).
    pub fn from_json(content: &str) -> Result<Self, MenuError> {
        let roots: Vec<MenuNode> = serde_json::from_str(content)
            .map_err(|e| MenuError::Parse(format!("Invalid menu JSON: {e}")))?;
        Ok(Self { roots })
    }

    /// Serialize the tree back to the persisted JSON form (2-space indent).
    pub fn to_json(&self) -> Result<String, MenuError> {
        serde_json::to_string_pretty(&self.roots)
            .map_err(|e| MenuError::Parse(format!("Failed to serialize menu: {e}")))
    }

    /// Root nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[MenuNode] {
        &self.roots
    }

    /// Iterate every leaf with its ancestor-identifier path, depth-first
    /// preorder. The iterator is lazy and restartable; each call starts a
    /// fresh traversal.
    #[must_use]
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(&self.roots)
    }

    /// True if any node anywhere in the tree has the given identifier.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        fn search(nodes: &[MenuNode], id: &str) -> bool {
            nodes.iter().any(|node| {
                node.id.as_deref() == Some(id)
                    || node.children.as_deref().is_some_and(|c| search(c, id))
            })
        }
        search(&self.roots, id)
    }

    /// Insert `node` immediately after the node identified by `anchor_id`
    /// among its siblings.
    ///
    /// The search is depth-first preorder; the first match wins. Returns
    /// `true` on success. When no node has the anchor identifier the tree is
    /// left unchanged and `false` is returned — the caller decides whether
    /// that is fatal.
    #[must_use]
    pub fn insert_after(&mut self, anchor_id: &str, node: MenuNode) -> bool {
        let mut pending = Some(node);
        let inserted = insert_in_siblings(&mut self.roots, anchor_id, &mut pending);
        if inserted {
            debug!(anchor = anchor_id, "inserted menu node after anchor");
        }
        inserted
    }
}

/// Recursive preorder search over a sibling list, inserting after the match.
fn insert_in_siblings(
    siblings: &mut Vec<MenuNode>,
    anchor_id: &str,
    pending: &mut Option<MenuNode>,
) -> bool {
    let mut i = 0;
    while i < siblings.len() {
        if siblings[i].id.as_deref() == Some(anchor_id) {
            if let Some(node) = pending.take() {
                siblings.insert(i + 1, node);
            }
            return true;
        }
        if let Some(children) = siblings[i].children.as_mut()
            && insert_in_siblings(children, anchor_id, pending)
        {
            return true;
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn section(id: &str, children: Vec<MenuNode>) -> MenuNode {
        MenuNode {
            id: Some(id.to_owned()),
            children: Some(children),
            ..MenuNode::default()
        }
    }

    fn sample_tree() -> MenuTree {
        MenuTree::new(vec![section(
            "root",
            vec![MenuNode::page("b"), MenuNode::page("c")],
        )])
    }

    #[test]
    fn test_insert_after_places_node_immediately_after_anchor() {
        let mut tree = sample_tree();

        assert!(tree.insert_after("b", MenuNode::page("new")));

        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();
        assert_eq!(ids, vec!["b", "new", "c"]);
    }

    #[test]
    fn test_insert_after_increases_leaf_count_by_one() {
        let mut tree = sample_tree();
        let before = tree.leaves().count();

        assert!(tree.insert_after("c", MenuNode::page("new")));

        assert_eq!(tree.leaves().count(), before + 1);
    }

    #[test]
    fn test_insert_after_absent_anchor_leaves_tree_unchanged() {
        let mut tree = sample_tree();
        let snapshot = tree.clone();

        assert!(!tree.insert_after("missing", MenuNode::page("new")));

        assert_eq!(tree, snapshot);
    }

    #[test]
    fn test_insert_after_top_level_anchor() {
        let mut tree = MenuTree::new(vec![MenuNode::page("a"), MenuNode::page("b")]);

        assert!(tree.insert_after("a", MenuNode::page("new")));

        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();
        assert_eq!(ids, vec!["a", "new", "b"]);
    }

    #[test]
    fn test_insert_after_first_match_wins() {
        // Two sections, the anchor appears in the first in preorder.
        let mut tree = MenuTree::new(vec![
            section("one", vec![MenuNode::page("dup")]),
            section("two", vec![MenuNode::page("dup")]),
        ]);

        assert!(tree.insert_after("dup", MenuNode::page("new")));

        let entries: Vec<_> = tree.leaves().collect();
        assert_eq!(entries[1].id, "new");
        assert_eq!(entries[1].path, vec!["one".to_owned()]);
    }

    #[test]
    fn test_insert_after_preserves_sibling_order() {
        let mut tree = MenuTree::new(vec![section(
            "root",
            vec![
                MenuNode::page("a"),
                MenuNode::page("b"),
                MenuNode::page("c"),
                MenuNode::page("d"),
            ],
        )]);

        assert!(tree.insert_after("b", MenuNode::page("new")));

        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();
        assert_eq!(ids, vec!["a", "b", "new", "c", "d"]);
    }

    #[test]
    fn test_contains_finds_sections_and_leaves() {
        let tree = sample_tree();
        assert!(tree.contains("root"));
        assert!(tree.contains("b"));
        assert!(!tree.contains("missing"));
    }

    #[test]
    fn test_from_json_parses_nested_nodes() {
        let json = r#"[{"id": "root", "children": [{"id": "page"}]}]"#;
        let tree = MenuTree::from_json(json).unwrap();
        assert_eq!(tree.roots().len(), 1);
        assert!(tree.contains("page"));
    }

    #[test]
    fn test_from_json_invalid_returns_parse_error() {
        let result = MenuTree::from_json("[{invalid");
        assert!(matches!(result, Err(MenuError::Parse(_))));
    }

    #[test]
    fn test_round_trip_preserves_unknown_fields() {
        let json = r#"[{"id": "root", "label": "Root", "children": [{"id": "page"}]}]"#;
        let tree = MenuTree::from_json(json).unwrap();

        let out = tree.to_json().unwrap();
        let reparsed = MenuTree::from_json(&out).unwrap();

        assert_eq!(tree, reparsed);
        assert!(out.contains("\"label\": \"Root\""));
    }

    #[test]
    fn test_to_json_uses_two_space_indent() {
        let tree = MenuTree::new(vec![MenuNode::page("a")]);
        let out = tree.to_json().unwrap();
        assert!(out.contains("\n  {"), "expected 2-space indent: {out}");
    }
}
