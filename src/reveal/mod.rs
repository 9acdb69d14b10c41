//! Step-by-step reveal of a positioned call tree
//!
//! State machine: Idle → Stepping / Skipping → Finished
//!
//! - `step()`: manual, exactly one node; cancels any armed timer
//! - `play()` / `skip()`: arm a recurring timer (normal / fast cadence)
//! - `tick()`: one step per tick while armed; disarms on Finished
//!
//! Edges become visible once both endpoints are revealed. Skip differs
//! from repeated steps only in pacing.

mod event;
mod timer;

pub use event::{EdgeItem, NodeItem, RevealEvent, RevealStep};
pub use timer::{Cadence, Intervals, RevealTimer, Speed, FAST_INTERVAL, NORMAL_INTERVAL};

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::layout::DEFAULT_HORIZONTAL_UNIT;
use crate::ledger::RevealLedger;
use crate::stats::{node_detail, Progress};
use crate::tree::{CallTree, NodeId, Point, TraversalOrder};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum RevealPhase {
    /// Nothing revealed yet
    Idle,
    /// Manual steps or normal-cadence auto-play
    Stepping,
    /// Fast-forward in progress
    Skipping,
    /// Every node revealed (terminal)
    Finished,
}

impl fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RevealPhase::Idle => "idle",
            RevealPhase::Stepping => "stepping",
            RevealPhase::Skipping => "skipping",
            RevealPhase::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Pacing and scene scaling for a controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Normal / fast tick intervals
    pub intervals: Intervals,
    /// Scene pixels per logical x slot
    pub horizontal_unit: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            intervals: Intervals::default(),
            horizontal_unit: DEFAULT_HORIZONTAL_UNIT,
        }
    }
}

/// Reveal session over one positioned tree
#[derive(Debug)]
pub struct RevealController {
    tree: CallTree,
    order: TraversalOrder,
    ledger: RevealLedger,
    /// Entries of `order` consumed so far
    index: usize,
    phase: RevealPhase,
    timer: Option<RevealTimer>,
    config: RevealConfig,
    last_revealed: Option<NodeId>,
}

impl RevealController {
    /// Controller over a laid-out tree, in pre-order
    pub fn new(tree: CallTree, config: RevealConfig) -> Self {
        let order = tree.traversal();
        Self::with_order(tree, order, config)
    }

    pub(crate) fn with_order(tree: CallTree, order: TraversalOrder, config: RevealConfig) -> Self {
        let ledger = RevealLedger::new(tree.len());
        Self {
            tree,
            order,
            ledger,
            index: 0,
            phase: RevealPhase::Idle,
            timer: None,
            config,
            last_revealed: None,
        }
    }

    /// Begin the session
    ///
    /// `animate`: reveal only the root and wait for step/play/skip.
    /// Otherwise reveal everything at once and finish.
    pub fn start(&mut self, animate: bool) -> Vec<RevealStep> {
        self.cancel();
        if animate {
            self.advance().into_iter().collect()
        } else {
            self.reveal_remaining()
        }
    }

    /// Manual step; no-op once finished
    pub fn step(&mut self) -> Option<RevealStep> {
        if self.is_finished() {
            return None;
        }
        self.cancel();
        self.advance()
    }

    /// Arm normal-cadence auto-play; false once finished
    pub fn play(&mut self) -> bool {
        self.arm(Cadence::Normal)
    }

    /// Arm fast-forward; false once finished
    pub fn skip(&mut self) -> bool {
        self.arm(Cadence::Fast)
    }

    /// Timer tick: one step if armed
    pub fn tick(&mut self) -> Option<RevealStep> {
        let timer = self.timer.as_mut()?;
        timer.record_tick();
        self.advance()
    }

    /// Disarm the timer; revealed content is kept
    pub fn cancel(&mut self) {
        if self.timer.take().is_some() {
            debug!(index = self.index, "reveal timer cancelled");
        }
        if self.phase == RevealPhase::Skipping {
            self.phase = RevealPhase::Stepping;
        }
    }

    /// Reveal everything left, in order, without pacing
    pub fn reveal_remaining(&mut self) -> Vec<RevealStep> {
        let mut steps = Vec::with_capacity(self.order.len() - self.index.min(self.order.len()));
        while !self.is_finished() {
            if let Some(step) = self.advance() {
                steps.push(step);
            }
        }
        steps
    }

    /// How long a driver should wait before the next `tick()`
    pub fn pending_interval(&self) -> Option<Duration> {
        self.timer.map(|timer| timer.interval())
    }

    /// Armed timer, if any
    pub fn timer(&self) -> Option<&RevealTimer> {
        self.timer.as_ref()
    }

    /// Step command enabled
    pub fn can_step(&self) -> bool {
        !self.is_finished()
    }

    /// Skip command enabled
    pub fn can_skip(&self) -> bool {
        !self.is_finished()
    }

    /// Current state
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Terminal state reached
    pub fn is_finished(&self) -> bool {
        self.phase == RevealPhase::Finished
    }

    /// Reveal index (nodes consumed from the order)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the traversal order
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the order is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `index / len`
    pub fn progress(&self) -> Progress {
        Progress::new(self.index, self.order.len())
    }

    /// Positioned tree
    pub fn tree(&self) -> &CallTree {
        &self.tree
    }

    /// Reveal sequence
    pub fn order(&self) -> &TraversalOrder {
        &self.order
    }

    /// Visibility bits
    pub fn ledger(&self) -> &RevealLedger {
        &self.ledger
    }

    /// Most recently revealed node
    pub fn last_revealed(&self) -> Option<NodeId> {
        self.last_revealed
    }

    /// Every positioned node with its visibility
    pub fn node_items(&self) -> Vec<NodeItem> {
        self.tree
            .iter()
            .filter_map(|(id, node)| {
                let position = node.position()?;
                Some(NodeItem {
                    id,
                    position: self.scene(position),
                    kind: node.kind(),
                    label: node.label(),
                    value_label: node.value_label(),
                    visible: self.ledger.is_revealed(id),
                    highlighted: self.last_revealed == Some(id),
                })
            })
            .collect()
    }

    /// Every edge with its visibility
    pub fn edge_items(&self) -> Vec<EdgeItem> {
        self.tree
            .edges()
            .filter_map(|(parent, child)| {
                let p = self.tree.get(parent)?.position()?;
                let c = self.tree.get(child)?;
                Some(EdgeItem {
                    parent: self.scene(p),
                    child: self.scene(c.position()?),
                    dashed: c.cached,
                    visible: self.ledger.is_edge_visible(child),
                })
            })
            .collect()
    }

    fn arm(&mut self, cadence: Cadence) -> bool {
        if self.is_finished() {
            return false;
        }
        self.timer = Some(RevealTimer::arm(cadence, &self.config.intervals));
        self.phase = match cadence {
            Cadence::Normal => RevealPhase::Stepping,
            Cadence::Fast => RevealPhase::Skipping,
        };
        debug!(?cadence, index = self.index, "reveal timer armed");
        true
    }

    /// Reveal the next consistent entry; skipped entries still count
    fn advance(&mut self) -> Option<RevealStep> {
        if self.phase == RevealPhase::Idle {
            self.phase = RevealPhase::Stepping;
        }
        while let Some(id) = self.order.get(self.index) {
            self.index += 1;
            let step = self.reveal(id);
            if self.index >= self.order.len() {
                self.finish();
            }
            if step.is_some() {
                return step;
            }
        }
        self.finish();
        None
    }

    fn reveal(&mut self, id: NodeId) -> Option<RevealStep> {
        let Some(node) = self.tree.get(id) else {
            warn!(node = %id, "reveal order references a node outside the tree, skipped");
            return None;
        };
        let Some(position) = node.position() else {
            warn!(node = %id, "node has no layout position, skipped");
            return None;
        };
        if !self.ledger.mark_node(id) {
            warn!(node = %id, "node already revealed, skipped");
            return None;
        }

        let mut events = vec![RevealEvent::Node {
            id,
            position: self.scene(position),
            cached: node.cached,
            kind: node.kind(),
            label: node.label(),
            value_label: node.value_label(),
        }];
        let parent = node.parent;
        let children = node.children().to_vec();

        if let Some(parent) = parent {
            events.extend(self.show_edge(parent, id));
        }
        for child in children {
            events.extend(self.show_edge(id, child));
        }

        self.last_revealed = Some(id);
        let detail = node_detail(&self.tree, id, self.progress())?;
        debug!(node = %id, label = %detail.label, index = self.index, "revealed node");

        Some(RevealStep {
            node: id,
            events,
            detail,
        })
    }

    fn show_edge(&mut self, parent: NodeId, child: NodeId) -> Option<RevealEvent> {
        if !self.ledger.edge_ready(parent, child) {
            return None;
        }
        let endpoints = self
            .tree
            .get(parent)
            .and_then(|p| p.position())
            .zip(self.tree.get(child).and_then(|c| c.position().map(|pos| (pos, c.cached))));
        let Some((p, (c, dashed))) = endpoints else {
            warn!(%parent, %child, "edge endpoint missing a position, skipped");
            return None;
        };
        if !self.ledger.mark_edge(child) {
            return None;
        }
        Some(RevealEvent::Edge {
            parent_id: parent,
            child_id: child,
            parent: self.scene(p),
            child: self.scene(c),
            dashed,
        })
    }

    fn finish(&mut self) {
        if self.phase == RevealPhase::Finished {
            return;
        }
        self.phase = RevealPhase::Finished;
        self.timer = None;
        info!(
            nodes = self.ledger.revealed_nodes(),
            edges = self.ledger.visible_edges(),
            "reveal finished"
        );
    }

    fn scene(&self, point: Point) -> Point {
        point.to_scene(self.config.horizontal_unit)
    }
}
