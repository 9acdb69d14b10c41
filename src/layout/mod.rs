//! Deterministic tree layout
//!
//! Two passes over the tree:
//! 1. Width (post-order): leaf = 1 slot, internal = Σ children
//! 2. Position (pre-order entry, children first): leaves take the next
//!    cursor slot; internal x = midpoint of first and last child;
//!    y = depth × vertical_gap
//!
//! Result depends on tree shape alone.

use tracing::debug;

use crate::tree::{CallTree, NodeId, Point};

/// Default vertical gap between levels (pixels)
pub const DEFAULT_VERTICAL_GAP: f64 = 100.0;

/// Default pixels per logical x slot
pub const DEFAULT_HORIZONTAL_UNIT: f64 = 110.0;

/// Layout geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct LayoutConfig {
    /// y step per depth level
    pub vertical_gap: f64,
    /// Scene pixels per leaf slot (applied by renderers, not to `x`)
    pub horizontal_unit: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            vertical_gap: DEFAULT_VERTICAL_GAP,
            horizontal_unit: DEFAULT_HORIZONTAL_UNIT,
        }
    }
}

/// Extent of a laid-out tree
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct LayoutSummary {
    /// Root width in leaf slots
    pub width: u32,
    /// Deepest level
    pub max_depth: usize,
    /// Bottom-right corner in logical units (top-left is the origin)
    pub extent: Point,
}

/// Assigns `(x, y)` to every node
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Engine with the given geometry
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Geometry in use
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `tree` in place
    pub fn layout(&self, tree: &mut CallTree) -> LayoutSummary {
        let mut widths = vec![0u32; tree.len()];
        let width = Self::compute_widths(tree, tree.root_id(), &mut widths);

        let mut cursor = 0.0;
        self.assign_positions(tree, tree.root_id(), &mut cursor);

        let max_depth = tree.height();
        let extent = Point::new(
            f64::from(width.saturating_sub(1)),
            max_depth as f64 * self.config.vertical_gap,
        );

        debug!(nodes = tree.len(), width, max_depth, "laid out call tree");

        LayoutSummary {
            width,
            max_depth,
            extent,
        }
    }

    /// Post-order width pass
    fn compute_widths(tree: &CallTree, id: NodeId, widths: &mut [u32]) -> u32 {
        let Some(node) = tree.get(id) else {
            return 0;
        };

        let width = if node.is_leaf() {
            1
        } else {
            node.children()
                .iter()
                .map(|&child| Self::compute_widths(tree, child, widths))
                .sum()
        };

        widths[id.index()] = width;
        width
    }

    /// Position pass; children are placed before their parent
    fn assign_positions(&self, tree: &mut CallTree, id: NodeId, cursor: &mut f64) {
        let Some(node) = tree.get(id) else {
            return;
        };
        let children = node.children().to_vec();
        let y = node.depth as f64 * self.config.vertical_gap;

        let x = match (children.first(), children.last()) {
            (Some(&first), Some(&last)) => {
                for &child in &children {
                    self.assign_positions(tree, child, cursor);
                }
                let left = Self::x_of(tree, first);
                let right = Self::x_of(tree, last);
                (left + right) / 2.0
            }
            _ => {
                let slot = *cursor;
                *cursor += 1.0;
                slot
            }
        };

        if let Some(node) = tree.get_mut(id) {
            node.position = Some(Point::new(x, y));
        }
    }

    fn x_of(tree: &CallTree, id: NodeId) -> f64 {
        tree.get(id)
            .and_then(|node| node.position())
            .map_or(0.0, |p| p.x)
    }
}

/// Lay out with default geometry
pub fn layout(tree: &mut CallTree) -> LayoutSummary {
    LayoutEngine::default().layout(tree)
}
