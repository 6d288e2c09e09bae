//! Orders in which the nodes of a tree can be visited.

use crate::node::Node;

/// Selects the order in which [`Tree::apply`][crate::Tree::apply],
/// [`Tree::accumulate`][crate::Tree::accumulate] and friends visit nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Node, then left subtree, then right subtree.
    Preorder,
    /// Left subtree, then node, then right subtree. For a BST this yields
    /// the values in ascending order.
    #[default]
    Inorder,
    /// Left subtree, then right subtree, then node.
    Postorder,
}

impl Traversal {
    /// Collects the nodes of the subtree rooted at `root` in this order.
    /// An empty subtree yields an empty `Vec`.
    pub fn nodes<T>(self, root: Option<&Node<T>>) -> Vec<&Node<T>> {
        let mut out = Vec::new();
        if let Some(root) = root {
            root.collect_into(self, &mut out);
        }
        out
    }
}
