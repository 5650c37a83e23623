//! Depth-first leaf flattening.

use crate::MenuNode;

/// A flattened leaf: its identifier and the identifiers of its ancestors,
/// ordered from the root down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafEntry {
    /// Leaf identifier.
    pub id: String,
    /// Ancestor identifiers from root to parent.
    pub path: Vec<String>,
}

impl LeafEntry {
    /// Human-readable ancestor path, e.g. `"guides > video_tutorials"`.
    #[must_use]
    pub fn path_display(&self) -> String {
        self.path.join(" > ")
    }
}

/// Lazy depth-first preorder iterator over the leaves of a menu tree.
///
/// Created by [`MenuTree::leaves`](crate::MenuTree::leaves). Sections
/// contribute their identifier to the path of every descendant; nodes with
/// neither identifier nor children are skipped.
pub struct Leaves<'a> {
    stack: Vec<(&'a MenuNode, Vec<String>)>,
}

impl<'a> Leaves<'a> {
    pub(crate) fn new(roots: &'a [MenuNode]) -> Self {
        let stack = roots.iter().rev().map(|node| (node, Vec::new())).collect();
        Self { stack }
    }
}

impl Iterator for Leaves<'_> {
    type Item = LeafEntry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, path)) = self.stack.pop() {
            if let Some(children) = node.children.as_deref() {
                let mut child_path = path;
                if let Some(id) = &node.id {
                    child_path.push(id.clone());
                }
                for child in children.iter().rev() {
                    self.stack.push((child, child_path.clone()));
                }
            } else if let Some(id) = &node.id {
                return Some(LeafEntry {
                    id: id.clone(),
                    path,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MenuTree;
    use pretty_assertions::assert_eq;

    fn section(id: &str, children: Vec<MenuNode>) -> MenuNode {
        MenuNode {
            id: Some(id.to_owned()),
            children: Some(children),
            ..MenuNode::default()
        }
    }

    #[test]
    fn test_empty_tree_yields_no_leaves() {
        let tree = MenuTree::default();
        assert_eq!(tree.leaves().count(), 0);
    }

    #[test]
    fn test_flat_roots_are_leaves_with_empty_path() {
        let tree = MenuTree::new(vec![MenuNode::page("a"), MenuNode::page("b")]);

        let entries: Vec<_> = tree.leaves().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "a");
        assert!(entries[0].path.is_empty());
    }

    #[test]
    fn test_preorder_traversal_order() {
        let tree = MenuTree::new(vec![
            section(
                "s1",
                vec![MenuNode::page("a"), section("s2", vec![MenuNode::page("b")])],
            ),
            MenuNode::page("c"),
        ]);

        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_paths_accumulate_ancestor_ids() {
        let tree = MenuTree::new(vec![section(
            "guides",
            vec![section("video_tutorials", vec![MenuNode::page("intro")])],
        )]);

        let entries: Vec<_> = tree.leaves().collect();

        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].path,
            vec!["guides".to_owned(), "video_tutorials".to_owned()]
        );
        assert_eq!(entries[0].path_display(), "guides > video_tutorials");
    }

    #[test]
    fn test_every_leaf_id_appears_exactly_once() {
        let tree = MenuTree::new(vec![
            section(
                "s1",
                vec![MenuNode::page("a"), MenuNode::page("b"), MenuNode::page("c")],
            ),
            section("s2", vec![MenuNode::page("d")]),
        ]);

        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();

        for id in ["a", "b", "c", "d"] {
            assert_eq!(ids.iter().filter(|found| *found == id).count(), 1, "{id}");
        }
    }

    #[test]
    fn test_iterator_is_restartable() {
        let tree = MenuTree::new(vec![MenuNode::page("a")]);

        let first: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();
        let second: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_section_without_id_contributes_nothing_to_path() {
        let anonymous = MenuNode {
            id: None,
            children: Some(vec![MenuNode::page("a")]),
            ..MenuNode::default()
        };
        let tree = MenuTree::new(vec![anonymous]);

        let entries: Vec<_> = tree.leaves().collect();

        assert_eq!(entries[0].id, "a");
        assert!(entries[0].path.is_empty());
    }

    #[test]
    fn test_node_without_id_or_children_is_skipped() {
        let tree = MenuTree::new(vec![MenuNode::default(), MenuNode::page("a")]);
        let ids: Vec<_> = tree.leaves().map(|leaf| leaf.id).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_empty_section_yields_no_leaves() {
        let tree = MenuTree::new(vec![section("empty", Vec::new())]);
        assert_eq!(tree.leaves().count(), 0);
    }
}
