//! Call-tree node representation
//!
//! Node = one invocation F(n) in the recursion
//! Children are exactly two calls (n-1, n-2) or none:
//!   Internal node: [F(n-1), F(n-2)], left first
//!   Leaf: base case (n ≤ 1) or memo hit

use std::fmt;

/// Arena index of a node inside its [`CallTree`](super::CallTree)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeId(pub usize);

impl NodeId {
    /// Root is always allocated first
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the arena
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout coordinate
///
/// `x` is in logical leaf slots, `y` in pixels (depth × vertical gap).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Scale the logical x axis into scene pixels
    pub fn to_scene(self, horizontal_unit: f64) -> Self {
        Self {
            x: self.x * horizontal_unit,
            y: self.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Rendering class of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum NodeKind {
    /// F(0) or F(1), computed directly
    BaseCase,
    /// Combined from two child calls
    Computed,
    /// Served from the memo table
    Cached,
}

/// One invocation in the recursion tree
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct CallNode {
    /// Argument to F at this call
    pub n: u32,

    /// F(n)
    pub value: u64,

    /// Result was a memo-table hit
    pub cached: bool,

    /// Distance from root (root = 0)
    pub depth: usize,

    /// Non-owning back-reference (None for root)
    pub parent: Option<NodeId>,

    /// Exactly two children or none; a single child is unrepresentable
    pub(crate) children: Option<[NodeId; 2]>,

    /// Assigned by the layout engine
    pub(crate) position: Option<Point>,
}

impl CallNode {
    pub(crate) fn new(n: u32, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            n,
            value: 0,
            cached: false,
            depth,
            parent,
            children: None,
            position: None,
        }
    }

    /// Ordered children: `[F(n-1), F(n-2)]` or empty
    pub fn children(&self) -> &[NodeId] {
        match &self.children {
            Some(pair) => pair,
            None => &[],
        }
    }

    /// Leaf check (base case or memo hit)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Layout position, `None` before layout runs
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    /// Rendering class
    pub fn kind(&self) -> NodeKind {
        if self.cached {
            NodeKind::Cached
        } else if self.n <= 1 {
            NodeKind::BaseCase
        } else {
            NodeKind::Computed
        }
    }

    /// Main label, e.g. `F(5)`
    pub fn label(&self) -> String {
        format!("F({})", self.n)
    }

    /// Value label, e.g. `= 5`
    pub fn value_label(&self) -> String {
        format!("= {}", self.value)
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F({}) = {}", self.n, self.value)?;
        if self.cached {
            write!(f, " (cached)")?;
        }
        Ok(())
    }
}
