//! Reveal order and path reconstruction
//!
//! Order = pre-order over the as-built tree (root, then left subtree,
//! then right subtree), memo-hit leaves included
//! Paths climb the non-owning parent links

use std::ops::Index;

use super::{CallTree, NodeId};

/// Fixed pre-order sequence of node ids
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TraversalOrder {
    order: Vec<NodeId>,
}

impl TraversalOrder {
    /// Pre-order walk with an explicit stack
    pub fn pre_order(tree: &CallTree) -> Self {
        let mut order = Vec::with_capacity(tree.len());
        let mut stack = vec![tree.root_id()];

        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = tree.get(id) {
                // Right pushed first so the left subtree is visited first
                for &child in node.children().iter().rev() {
                    stack.push(child);
                }
            }
        }

        Self { order }
    }

    /// Wrap an explicit sequence
    #[cfg(test)]
    pub(crate) fn from_ids(order: Vec<NodeId>) -> Self {
        Self { order }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True for an empty order
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.order.get(index).copied()
    }

    /// Index of `id` in the order
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|&entry| entry == id)
    }

    /// Iterate in reveal order
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    /// Underlying ids
    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }
}

impl Index<usize> for TraversalOrder {
    type Output = NodeId;

    fn index(&self, index: usize) -> &NodeId {
        &self.order[index]
    }
}

/// Root-to-node path, root first
///
/// Empty if `id` is not in the tree.
pub fn path_to(tree: &CallTree, id: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = tree.get(id).map(|_| id);

    while let Some(cur) = current {
        path.push(cur);
        current = tree.get(cur).and_then(|node| node.parent);
    }

    path.reverse();
    path
}
