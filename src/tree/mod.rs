//! Fibonacci call tree
//!
//! Arena representation: nodes live in one `Vec`, addressed by [`NodeId`].
//! Each node exclusively owns its children (ids appear once as a child);
//! parent ids are back-references used only for path lookups.
//!
//! Arena order = allocation order = pre-order.

mod builder;
mod node;
mod traversal;

pub use builder::{
    BuildMode, BuildRequest, BuildStats, MemoTable, TreeBuilder, DEFAULT_NAIVE_CEILING,
    MAX_FIB_ARG, MAX_NAIVE_CEILING,
};
pub use node::{CallNode, NodeId, NodeKind, Point};
pub use traversal::{path_to, TraversalOrder};

use crate::VisualizerError;

/// Built call tree plus the statistics gathered while building it
#[derive(Debug, Clone)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CallTree {
    nodes: Vec<CallNode>,
    mode: BuildMode,
    stats: BuildStats,
    memo: MemoTable,
}

impl CallTree {
    pub(crate) fn from_parts(
        nodes: Vec<CallNode>,
        mode: BuildMode,
        stats: BuildStats,
        memo: MemoTable,
    ) -> Self {
        debug_assert!(!nodes.is_empty(), "a build always creates the root");
        Self {
            nodes,
            mode,
            stats,
            memo,
        }
    }

    /// Root id
    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Root node
    pub fn root(&self) -> &CallNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Node lookup
    pub fn get(&self, id: NodeId) -> Option<&CallNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut CallNode> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes (= total calls)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true for a built tree
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in arena (pre-)order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CallNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Parent-child pairs, in arena order of the child
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.iter()
            .filter_map(|(id, node)| node.parent.map(|parent| (parent, id)))
    }

    /// Strategy used for this build
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Call counters
    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Memo table (empty for naive builds)
    pub fn memo(&self) -> &MemoTable {
        &self.memo
    }

    /// Deepest node depth
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    /// Number of leaves (base cases + memo hits)
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Pre-order reveal sequence
    pub fn traversal(&self) -> TraversalOrder {
        TraversalOrder::pre_order(self)
    }

    /// Root-to-node path
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        path_to(self, id)
    }

    /// Digest of the tree shape, values and flags
    ///
    /// Identical `(n, mode)` builds hash identically; layout positions are
    /// not included.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.mode as u8]);
        for node in &self.nodes {
            hasher.update(&node.n.to_le_bytes());
            hasher.update(&node.value.to_le_bytes());
            hasher.update(&[node.cached as u8]);
            hasher.update(&(node.depth as u64).to_le_bytes());
            let parent = node.parent.map_or(u64::MAX, |p| p.index() as u64);
            hasher.update(&parent.to_le_bytes());
            for child in node.children() {
                hasher.update(&(child.index() as u64).to_le_bytes());
            }
        }
        hasher.finalize()
    }
}

/// Build with the default naive ceiling
///
/// `build(n, mode)` → tree carrying `total_calls` and `cached_calls`.
pub fn build(n: i64, mode: BuildMode) -> Result<CallTree, VisualizerError> {
    let request = BuildRequest::new(n, mode, false)?;
    request.check_size(DEFAULT_NAIVE_CEILING)?;
    Ok(TreeBuilder::new(mode).build(&request))
}

/// Iterative reference F(n)
///
/// Saturates at `u64::MAX` past `MAX_FIB_ARG`.
pub fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fibonacci() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        for (n, &value) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as u32), value);
        }
        assert_eq!(fibonacci(MAX_FIB_ARG), 12_200_160_415_121_876_738);
    }

    #[test]
    fn test_value_and_depth_invariants() {
        for mode in [BuildMode::Naive, BuildMode::Memoized] {
            let tree = build(8, mode).unwrap();
            for (_, node) in tree.iter() {
                match node.children() {
                    [] => {
                        if !node.cached {
                            assert_eq!(node.value, u64::from(node.n));
                        }
                    }
                    [left, right] => {
                        let l = tree.get(*left).unwrap();
                        let r = tree.get(*right).unwrap();
                        assert_eq!(node.value, l.value + r.value);
                        assert_eq!(l.n, node.n - 1);
                        assert_eq!(r.n, node.n - 2);
                        assert_eq!(l.depth, node.depth + 1);
                        assert_eq!(r.depth, node.depth + 1);
                    }
                    other => panic!("node has {} children", other.len()),
                }
            }
        }
    }

    #[test]
    fn test_edges_and_leaves() {
        let tree = build(4, BuildMode::Naive).unwrap();
        assert_eq!(tree.len(), 9);
        assert_eq!(tree.edges().count(), 8);
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn test_fingerprint_distinguishes_modes() {
        let naive = build(6, BuildMode::Naive).unwrap();
        let memo = build(6, BuildMode::Memoized).unwrap();
        assert_ne!(naive.fingerprint(), memo.fingerprint());
        assert_eq!(naive.fingerprint(), build(6, BuildMode::Naive).unwrap().fingerprint());
    }
}
