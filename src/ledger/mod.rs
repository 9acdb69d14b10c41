//! Reveal ledger
//!
//! Tracks disclosure with one bit per node and one bit per edge.
//! Every non-root node has exactly one parent edge, so edges are
//! indexed by their child id; the root's edge bit is never set.

use crate::tree::NodeId;
use bitvec::prelude::*;

/// Visibility bookkeeping for one reveal session
#[derive(Debug, Clone)]
pub struct RevealLedger {
    /// Node disclosed (1 bit per node)
    nodes: BitVec,
    /// Edge parent→child visible (1 bit per child)
    edges: BitVec,
}

impl RevealLedger {
    /// Ledger for a tree of `num_nodes` nodes, nothing revealed
    pub fn new(num_nodes: usize) -> Self {
        Self {
            nodes: bitvec![0; num_nodes],
            edges: bitvec![0; num_nodes],
        }
    }

    /// Mark a node revealed; false if already revealed or out of range
    pub fn mark_node(&mut self, id: NodeId) -> bool {
        match self.nodes.get(id.index()).map(|bit| *bit) {
            Some(false) => {
                self.nodes.set(id.index(), true);
                true
            }
            _ => false,
        }
    }

    /// Mark the edge into `child` visible; false if already visible or out of range
    pub fn mark_edge(&mut self, child: NodeId) -> bool {
        match self.edges.get(child.index()).map(|bit| *bit) {
            Some(false) => {
                self.edges.set(child.index(), true);
                true
            }
            _ => false,
        }
    }

    /// Node disclosed?
    pub fn is_revealed(&self, id: NodeId) -> bool {
        self.nodes.get(id.index()).map_or(false, |bit| *bit)
    }

    /// Edge into `child` visible?
    pub fn is_edge_visible(&self, child: NodeId) -> bool {
        self.edges.get(child.index()).map_or(false, |bit| *bit)
    }

    /// Edge may be shown once both endpoints are revealed
    pub fn edge_ready(&self, parent: NodeId, child: NodeId) -> bool {
        self.is_revealed(parent) && self.is_revealed(child)
    }

    /// Count of revealed nodes
    pub fn revealed_nodes(&self) -> usize {
        self.nodes.count_ones()
    }

    /// Count of visible edges
    pub fn visible_edges(&self) -> usize {
        self.edges.count_ones()
    }

    /// Every node disclosed
    pub fn all_revealed(&self) -> bool {
        self.nodes.all()
    }

    /// Total nodes tracked
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Space usage in bytes (2 bits per node)
    pub fn space_usage(&self) -> usize {
        (self.nodes.len() * 2 + 7) / 8
    }
}
