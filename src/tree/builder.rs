//! Recursive call-tree construction
//!
//! Naive: unconditional double recursion, one node per call
//! Memoized: memo table consulted before recursing; a hit becomes a
//! fresh cached leaf (tree, not DAG)

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::{CallNode, CallTree, NodeId};
use crate::VisualizerError;

/// Largest argument whose Fibonacci value fits in a `u64`
pub const MAX_FIB_ARG: u32 = 93;

/// Default naive-mode ceiling (tree size grows as ~1.6^n)
pub const DEFAULT_NAIVE_CEILING: u32 = 12;

/// Hard cap on any configured naive ceiling (F(25) has 242785 calls)
pub const MAX_NAIVE_CEILING: u32 = 25;

/// Recursion strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum BuildMode {
    /// Exponential double recursion
    #[default]
    Naive,
    /// Memo table keyed by argument
    Memoized,
}

impl BuildMode {
    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            BuildMode::Naive => "naive",
            BuildMode::Memoized => "memoized",
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated build request
///
/// Construction guarantees `0 ≤ n ≤ MAX_FIB_ARG`. The naive-mode ceiling
/// depends on configuration and is checked by [`BuildRequest::check_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct BuildRequest {
    n: u32,
    mode: BuildMode,
    animate: bool,
}

impl BuildRequest {
    /// Validate a numeric argument
    pub fn new(n: i64, mode: BuildMode, animate: bool) -> Result<Self, VisualizerError> {
        if n < 0 {
            return Err(VisualizerError::InvalidInput(format!(
                "n must be a non-negative integer, got {n}"
            )));
        }
        if n > i64::from(MAX_FIB_ARG) {
            return Err(VisualizerError::InvalidInput(format!(
                "F({n}) exceeds the 64-bit range (max n = {MAX_FIB_ARG})"
            )));
        }
        Ok(Self {
            n: n as u32,
            mode,
            animate,
        })
    }

    /// Validate user-entered text
    pub fn parse(text: &str, mode: BuildMode, animate: bool) -> Result<Self, VisualizerError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VisualizerError::InvalidInput("n is required".to_string()));
        }
        let n: i64 = trimmed.parse().map_err(|_| {
            VisualizerError::InvalidInput(format!("'{trimmed}' is not an integer"))
        })?;
        Self::new(n, mode, animate)
    }

    /// Reject naive builds above the safety ceiling
    ///
    /// The ceiling itself never exceeds [`MAX_NAIVE_CEILING`].
    pub fn check_size(&self, naive_ceiling: u32) -> Result<(), VisualizerError> {
        let ceiling = naive_ceiling.min(MAX_NAIVE_CEILING);
        if self.mode == BuildMode::Naive && self.n > ceiling {
            return Err(VisualizerError::UnsafeSize { n: self.n, ceiling });
        }
        Ok(())
    }

    /// Requested argument
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Requested strategy
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Reveal one node at a time instead of all at once
    pub fn animate(&self) -> bool {
        self.animate
    }
}

/// Call counters accumulated during one build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct BuildStats {
    /// One per node constructed
    pub total_calls: usize,
    /// Memo hits only
    pub cached_calls: usize,
}

impl BuildStats {
    /// Calls that did real work
    pub fn unique_computations(&self) -> usize {
        self.total_calls - self.cached_calls
    }

    /// Share of calls served from the memo table, in percent
    pub fn efficiency(&self) -> f64 {
        if self.total_calls == 0 {
            return 0.0;
        }
        self.cached_calls as f64 / self.total_calls as f64 * 100.0
    }
}

/// `n -> F(n)`, scoped to a single build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct MemoTable {
    entries: BTreeMap<u32, u64>,
}

impl MemoTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `n`
    pub fn get(&self, n: u32) -> Option<u64> {
        self.entries.get(&n).copied()
    }

    /// Record a computed value
    pub fn insert(&mut self, n: u32, value: u64) {
        self.entries.insert(n, value);
    }

    /// Number of distinct arguments computed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True before anything has been computed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending `n`
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.entries.iter().map(|(&n, &v)| (n, v))
    }
}

/// Builds one call tree; consumed by [`TreeBuilder::build`]
///
/// Nodes are pushed before recursing into children, so arena order is
/// the pre-order of the tree.
#[derive(Debug)]
pub struct TreeBuilder {
    mode: BuildMode,
    nodes: Vec<CallNode>,
    memo: MemoTable,
    stats: BuildStats,
}

impl TreeBuilder {
    /// Fresh builder with an empty memo table
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            nodes: Vec::new(),
            memo: MemoTable::new(),
            stats: BuildStats::default(),
        }
    }

    /// Construct the tree for a validated request
    ///
    /// The naive ceiling is the caller's concern (see [`BuildRequest::check_size`]).
    pub fn build(mut self, request: &BuildRequest) -> CallTree {
        let n = request.n();
        let root = match self.mode {
            BuildMode::Naive => self.build_naive(n, 0, None),
            BuildMode::Memoized => self.build_memo(n, 0, None),
        };
        debug_assert_eq!(root, NodeId::ROOT);

        debug!(
            n,
            mode = self.mode.label(),
            total_calls = self.stats.total_calls,
            cached_calls = self.stats.cached_calls,
            "built call tree"
        );

        CallTree::from_parts(self.nodes, self.mode, self.stats, self.memo)
    }

    fn alloc(&mut self, n: u32, depth: usize, parent: Option<NodeId>) -> NodeId {
        self.stats.total_calls += 1;
        let id = NodeId(self.nodes.len());
        self.nodes.push(CallNode::new(n, depth, parent));
        id
    }

    fn attach(&mut self, id: NodeId, left: NodeId, right: NodeId) -> u64 {
        let value = self.nodes[left.0].value + self.nodes[right.0].value;
        let node = &mut self.nodes[id.0];
        node.children = Some([left, right]);
        node.value = value;
        value
    }

    fn build_naive(&mut self, n: u32, depth: usize, parent: Option<NodeId>) -> NodeId {
        let id = self.alloc(n, depth, parent);

        if n <= 1 {
            self.nodes[id.0].value = u64::from(n);
            return id;
        }

        let left = self.build_naive(n - 1, depth + 1, Some(id));
        let right = self.build_naive(n - 2, depth + 1, Some(id));
        self.attach(id, left, right);
        id
    }

    fn build_memo(&mut self, n: u32, depth: usize, parent: Option<NodeId>) -> NodeId {
        let id = self.alloc(n, depth, parent);

        if let Some(value) = self.memo.get(n) {
            let node = &mut self.nodes[id.0];
            node.value = value;
            node.cached = true;
            self.stats.cached_calls += 1;
            return id;
        }

        if n <= 1 {
            self.nodes[id.0].value = u64::from(n);
            self.memo.insert(n, u64::from(n));
            return id;
        }

        let left = self.build_memo(n - 1, depth + 1, Some(id));
        let right = self.build_memo(n - 2, depth + 1, Some(id));
        let value = self.attach(id, left, right);
        self.memo.insert(n, value);
        id
    }
}
