//! Human-readable statistics
//!
//! Build summary (call counts, memo savings) and the per-node info
//! panel shown as each node is revealed.

use std::fmt;

use crate::tree::{BuildMode, CallTree, NodeId};

/// Reveal progress `revealed / total`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Progress {
    /// Nodes disclosed so far
    pub revealed: usize,
    /// Nodes in the traversal order
    pub total: usize,
}

impl Progress {
    /// Progress value
    pub fn new(revealed: usize, total: usize) -> Self {
        Self { revealed, total }
    }

    /// Everything disclosed
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_complete() {
            write!(f, "Animation Complete! Showing all {} nodes", self.total)
        } else {
            write!(f, "Animation Progress: {} / {} nodes", self.revealed, self.total)
        }
    }
}

/// What memoization would have saved a naive build
///
/// `calls` is the rough `2 × (n + 1)` heuristic, not a bound.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct MemoEstimate {
    /// Estimated memoized call count
    pub calls: usize,
    /// `(naive - estimate) / naive × 100`
    pub gain_percent: f64,
}

impl MemoEstimate {
    /// Estimate for a naive build of F(n); `None` when it would not save calls
    pub fn for_naive(n: u32, total_calls: usize) -> Option<Self> {
        let calls = (n as usize + 1) * 2;
        if total_calls <= calls {
            return None;
        }
        Some(Self {
            calls,
            gain_percent: (total_calls - calls) as f64 / total_calls as f64 * 100.0,
        })
    }
}

/// Mode-specific part of the summary
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum ModeReport {
    /// Naive build, with an estimate when memoization would have helped
    Naive {
        /// Labeled estimate
        estimate: Option<MemoEstimate>,
    },
    /// Memoized build
    Memoized {
        /// Memo hits
        cached_calls: usize,
        /// `total - cached`
        unique_computations: usize,
        /// `cached / total × 100`
        efficiency_percent: f64,
    },
}

/// Build summary
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Summary {
    /// Root argument
    pub n: u32,
    /// F(n)
    pub result: u64,
    /// Calls made during the build
    pub total_calls: usize,
    /// Mode-specific figures
    pub report: ModeReport,
    /// Reveal progress
    pub progress: Progress,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Computing F({}) = {}", self.n, self.result)?;
        writeln!(f, "Total function calls: {}", self.total_calls)?;
        match self.report {
            ModeReport::Memoized {
                cached_calls,
                unique_computations,
                efficiency_percent,
            } => {
                writeln!(f, "Memoized calls (reused results): {cached_calls}")?;
                writeln!(f, "Unique computations: {unique_computations}")?;
                writeln!(f, "Efficiency gain: {efficiency_percent:.1}%")?;
            }
            ModeReport::Naive {
                estimate: Some(estimate),
            } => {
                writeln!(
                    f,
                    "With memoization, this would need only ~{} calls",
                    estimate.calls
                )?;
                writeln!(f, "Potential efficiency gain: ~{:.1}%", estimate.gain_percent)?;
            }
            ModeReport::Naive { estimate: None } => {}
        }
        write!(f, "{}", self.progress)
    }
}

/// Summarize a build at the given reveal progress
pub fn summarize(tree: &CallTree, progress: Progress) -> Summary {
    let root = tree.root();
    let stats = tree.stats();

    let report = match tree.mode() {
        BuildMode::Naive => ModeReport::Naive {
            estimate: MemoEstimate::for_naive(root.n, stats.total_calls),
        },
        BuildMode::Memoized => ModeReport::Memoized {
            cached_calls: stats.cached_calls,
            unique_computations: stats.unique_computations(),
            efficiency_percent: stats.efficiency(),
        },
    };

    Summary {
        n: root.n,
        result: root.value,
        total_calls: stats.total_calls,
        report,
        progress,
    }
}

/// Info panel for one node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeDetail {
    /// Node identity
    pub id: NodeId,
    /// `F(n)`
    pub label: String,
    /// F(n)
    pub value: u64,
    /// Distance from root
    pub depth: usize,
    /// Memo hit
    pub cached: bool,
    /// 0 or 2
    pub child_count: usize,
    /// Parent identity and label, `None` for the root
    pub parent: Option<(NodeId, String)>,
    /// Root-to-node ids, root first
    pub path: Vec<NodeId>,
    /// Labels along `path`
    pub path_labels: Vec<String>,
    /// Reveal progress
    pub progress: Progress,
    /// Build strategy
    pub mode: BuildMode,
}

impl fmt::Display for NodeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node: {}", self.label)?;
        writeln!(f, "Value: {}", self.value)?;
        writeln!(f, "Depth: {}", self.depth)?;
        writeln!(f, "Cached: {}", if self.cached { "Yes" } else { "No" })?;
        writeln!(f, "Children: {}", self.child_count)?;
        match &self.parent {
            Some((_, label)) => writeln!(f, "Parent: {label}")?,
            None => writeln!(f, "Parent: (root)")?,
        }
        writeln!(f, "Path from root: {}", self.path_labels.join(" -> "))?;
        write!(
            f,
            "\nNodes revealed: {} / {}",
            self.progress.revealed, self.progress.total
        )?;
        if self.mode == BuildMode::Memoized {
            write!(f, "\n\nNote: memoized mode uses cached subcalls.")?;
        }
        Ok(())
    }
}

/// Detail for `id`, `None` if it is not in the tree
pub fn node_detail(tree: &CallTree, id: NodeId, progress: Progress) -> Option<NodeDetail> {
    let node = tree.get(id)?;
    let path = tree.path_to(id);
    let path_labels = path
        .iter()
        .filter_map(|&step| tree.get(step).map(|n| n.label()))
        .collect();
    let parent = node
        .parent
        .and_then(|pid| tree.get(pid).map(|p| (pid, p.label())));

    Some(NodeDetail {
        id,
        label: node.label(),
        value: node.value,
        depth: node.depth,
        cached: node.cached,
        child_count: node.children().len(),
        parent,
        path,
        path_labels,
        progress,
        mode: tree.mode(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build;

    #[test]
    fn test_memo_summary_figures() {
        let tree = build(5, BuildMode::Memoized).unwrap();
        let summary = summarize(&tree, Progress::new(1, tree.len()));
        match summary.report {
            ModeReport::Memoized {
                cached_calls,
                unique_computations,
                efficiency_percent,
            } => {
                assert_eq!(cached_calls, 3);
                assert_eq!(unique_computations, 6);
                assert!((efficiency_percent - 100.0 / 3.0).abs() < 1e-9);
            }
            other => panic!("unexpected report {other:?}"),
        }
    }

    #[test]
    fn test_naive_estimate_threshold() {
        // F(4): 9 calls vs estimate 10 -> no estimate
        let small = build(4, BuildMode::Naive).unwrap();
        let summary = summarize(&small, Progress::new(9, 9));
        assert_eq!(summary.report, ModeReport::Naive { estimate: None });

        // F(5): 15 calls vs estimate 12 -> 20% gain
        let larger = build(5, BuildMode::Naive).unwrap();
        let estimate = MemoEstimate::for_naive(5, larger.stats().total_calls).unwrap();
        assert_eq!(estimate.calls, 12);
        assert!((estimate.gain_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_naive_summary_text() {
        let tree = build(5, BuildMode::Naive).unwrap();
        let text = summarize(&tree, Progress::new(3, 15)).to_string();
        assert_eq!(
            text,
            "Computing F(5) = 5\n\
             Total function calls: 15\n\
             With memoization, this would need only ~12 calls\n\
             Potential efficiency gain: ~20.0%\n\
             Animation Progress: 3 / 15 nodes"
        );
    }

    #[test]
    fn test_node_detail_for_leaf() {
        let tree = build(3, BuildMode::Naive).unwrap();
        let detail = node_detail(&tree, NodeId(2), Progress::new(3, 5)).unwrap();

        assert_eq!(detail.label, "F(1)");
        assert_eq!(detail.parent, Some((NodeId(1), "F(2)".to_string())));
        assert_eq!(detail.path, vec![NodeId(0), NodeId(1), NodeId(2)]);

        let text = detail.to_string();
        assert!(text.contains("Path from root: F(3) -> F(2) -> F(1)\n"));
        assert!(text.ends_with("Nodes revealed: 3 / 5"));
        assert!(node_detail(&tree, NodeId(50), Progress::default()).is_none());
    }

    #[test]
    fn test_progress_text() {
        assert_eq!(Progress::new(2, 9).to_string(), "Animation Progress: 2 / 9 nodes");
        assert_eq!(
            Progress::new(9, 9).to_string(),
            "Animation Complete! Showing all 9 nodes"
        );
    }
}
