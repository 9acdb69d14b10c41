//! Events handed to the rendering layer

use crate::stats::NodeDetail;
use crate::tree::{NodeId, NodeKind, Point};

/// One disclosure
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RevealEvent {
    /// Draw a node circle
    Node {
        /// Node identity
        id: NodeId,
        /// Scene position
        position: Point,
        /// Memo hit
        cached: bool,
        /// Rendering class
        kind: NodeKind,
        /// `F(n)`
        label: String,
        /// `= value`
        value_label: String,
    },
    /// Draw a parent→child line
    Edge {
        /// Parent identity
        parent_id: NodeId,
        /// Child identity
        child_id: NodeId,
        /// Parent scene position
        parent: Point,
        /// Child scene position
        child: Point,
        /// Child is a memo hit
        dashed: bool,
    },
}

/// Result of one reveal step
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct RevealStep {
    /// Node disclosed by this step
    pub node: NodeId,
    /// Node event first, then any edges that became visible
    pub events: Vec<RevealEvent>,
    /// Info panel for the node
    pub detail: NodeDetail,
}

impl RevealStep {
    /// Edge events in this step
    pub fn edges(&self) -> impl Iterator<Item = &RevealEvent> + '_ {
        self.events
            .iter()
            .filter(|event| matches!(event, RevealEvent::Edge { .. }))
    }
}

/// Snapshot of a node for renderers that redraw everything
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeItem {
    /// Node identity
    pub id: NodeId,
    /// Scene position
    pub position: Point,
    /// Rendering class
    pub kind: NodeKind,
    /// `F(n)`
    pub label: String,
    /// `= value`
    pub value_label: String,
    /// Disclosed
    pub visible: bool,
    /// Most recently revealed node
    pub highlighted: bool,
}

/// Snapshot of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct EdgeItem {
    /// Parent scene position
    pub parent: Point,
    /// Child scene position
    pub child: Point,
    /// Child is a memo hit
    pub dashed: bool,
    /// Both endpoints disclosed
    pub visible: bool,
}
