//! # Fibonacci Call-Tree Engine
//!
//! Builds the recursion tree of F(n), naive or memoized, lays it out
//! deterministically and reveals it one node at a time.
//!
//! ## Pipeline
//!
//! 1. **Build**: recursive construction with call counters and a memo table
//! 2. **Layout**: post-order widths, then leaf slots and parent midpoints
//! 3. **Reveal**: pre-order disclosure driven by step / play / skip
//! 4. **Report**: call statistics and per-node info text
//!
//! Naive trees grow as ~1.6^n, so naive builds are capped (default n ≤ 12);
//! memoized trees have 2n - 1 nodes.
//!
//! ## Usage Example
//!
//! ```
//! use fibtree::{BuildMode, BuildRequest, Visualizer, VisualizerConfig};
//!
//! let mut vis = Visualizer::new(VisualizerConfig::default());
//! vis.build(BuildRequest::new(5, BuildMode::Memoized, true)?)?;
//! while vis.step().is_some() {}
//! assert!(!vis.can_step());
//! # Ok::<(), fibtree::VisualizerError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

// Core modules - one per pipeline stage
pub mod tree;    // Call-tree model and builder
pub mod layout;  // Deterministic (x, y) assignment
pub mod ledger;  // Reveal visibility bits
pub mod reveal;  // Reveal state machine and pacing
pub mod stats;   // Summary and per-node text

// Re-exports for convenience
pub use tree::{
    build, fibonacci, BuildMode, BuildRequest, BuildStats, CallNode, CallTree, NodeId, NodeKind,
    Point, TraversalOrder,
};
pub use layout::{LayoutConfig, LayoutEngine, LayoutSummary};
pub use reveal::{Cadence, RevealController, RevealEvent, RevealPhase, RevealStep, Speed};
pub use stats::{NodeDetail, Progress, Summary};

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use reveal::{Intervals, RevealConfig};

/// Session orchestrator
///
/// Holds at most one live session; a new build discards the previous one
/// only after the request validates.
#[derive(Debug)]
pub struct Visualizer {
    config: VisualizerConfig,
    session: Option<Session>,
}

/// Configuration parameters for a visualizer
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Largest n accepted in naive mode
    pub naive_ceiling: u32,

    /// Pixels between depth levels
    pub vertical_gap: f64,

    /// Pixels per leaf slot
    pub horizontal_unit: f64,

    /// Auto-play interval
    pub normal_interval: Duration,

    /// Skip interval
    pub fast_interval: Duration,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            naive_ceiling: tree::DEFAULT_NAIVE_CEILING,
            vertical_gap: layout::DEFAULT_VERTICAL_GAP,
            horizontal_unit: layout::DEFAULT_HORIZONTAL_UNIT,
            normal_interval: reveal::NORMAL_INTERVAL,
            fast_interval: reveal::FAST_INTERVAL,
        }
    }
}

impl VisualizerConfig {
    /// Set the naive-mode ceiling, capped at [`tree::MAX_NAIVE_CEILING`]
    pub fn with_naive_ceiling(mut self, ceiling: u32) -> Self {
        self.naive_ceiling = ceiling.min(tree::MAX_NAIVE_CEILING);
        self
    }

    /// Set the vertical gap
    pub fn with_vertical_gap(mut self, gap: f64) -> Self {
        self.vertical_gap = gap;
        self
    }

    /// Set pixels per leaf slot
    pub fn with_horizontal_unit(mut self, unit: f64) -> Self {
        self.horizontal_unit = unit;
        self
    }

    /// Derive the auto-play interval from a speed level
    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.normal_interval = speed.interval();
        self
    }

    /// Set the skip interval; kept below the auto-play interval
    pub fn with_fast_interval(mut self, interval: Duration) -> Self {
        self.fast_interval = interval;
        self
    }

    /// Layout geometry
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            vertical_gap: self.vertical_gap,
            horizontal_unit: self.horizontal_unit,
        }
    }

    /// Reveal pacing and scaling
    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            intervals: Intervals::new(self.normal_interval, self.fast_interval),
            horizontal_unit: self.horizontal_unit,
        }
    }
}

/// Errors surfaced to the user
///
/// All are recoverable: the previous session stays valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VisualizerError {
    /// Negative, non-integer or out-of-range n
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Naive mode above the safety ceiling
    #[error(
        "naive recursion tree for n = {n} is too large (ceiling {ceiling}); \
         choose n <= {ceiling} or use memoized mode"
    )]
    UnsafeSize {
        /// Requested n
        n: u32,
        /// Configured ceiling
        ceiling: u32,
    },
}

/// One build plus its reveal state
#[derive(Debug)]
pub struct Session {
    request: BuildRequest,
    layout: LayoutSummary,
    controller: RevealController,
    detail: Option<NodeDetail>,
}

impl Session {
    /// Request that produced this session
    pub fn request(&self) -> &BuildRequest {
        &self.request
    }

    /// Positioned tree
    pub fn tree(&self) -> &CallTree {
        self.controller.tree()
    }

    /// Layout extent
    pub fn layout(&self) -> &LayoutSummary {
        &self.layout
    }

    /// Reveal state
    pub fn controller(&self) -> &RevealController {
        &self.controller
    }

    /// Info panel for the most recently revealed node
    pub fn detail(&self) -> Option<&NodeDetail> {
        self.detail.as_ref()
    }

    /// Statistics at the current reveal progress
    pub fn summary(&self) -> Summary {
        stats::summarize(self.controller.tree(), self.controller.progress())
    }

    fn record(&mut self, step: Option<RevealStep>) -> Option<RevealStep> {
        if let Some(step) = &step {
            self.detail = Some(step.detail.clone());
        }
        step
    }
}

impl Visualizer {
    /// Create a visualizer with no session
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    /// Live session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Build a new session
    ///
    /// Validation happens first; on failure the current session is kept.
    /// Otherwise any armed reveal timer is cancelled and the previous
    /// session discarded before the new tree is built. Returns the steps
    /// revealed by the start (root only when animating, all otherwise).
    pub fn build(&mut self, request: BuildRequest) -> Result<Vec<RevealStep>, VisualizerError> {
        if let Err(err) = request.check_size(self.config.naive_ceiling) {
            warn!(n = request.n(), mode = request.mode().label(), %err, "build rejected");
            return Err(err);
        }

        if let Some(mut previous) = self.session.take() {
            previous.controller.cancel();
            info!(
                n = previous.request.n(),
                revealed = previous.controller.index(),
                "discarding previous session"
            );
        }

        let mut tree = tree::TreeBuilder::new(request.mode()).build(&request);
        let layout = LayoutEngine::new(self.config.layout_config()).layout(&mut tree);
        let mut controller = RevealController::new(tree, self.config.reveal_config());
        let steps = controller.start(request.animate());

        info!(
            n = request.n(),
            mode = request.mode().label(),
            nodes = controller.len(),
            animate = request.animate(),
            "session started"
        );

        self.session = Some(Session {
            request,
            layout,
            controller,
            detail: steps.last().map(|step| step.detail.clone()),
        });
        Ok(steps)
    }

    /// Parse user text and build
    pub fn build_from_input(
        &mut self,
        text: &str,
        mode: BuildMode,
        animate: bool,
    ) -> Result<Vec<RevealStep>, VisualizerError> {
        let request = BuildRequest::parse(text, mode, animate)?;
        self.build(request)
    }

    /// Manual step
    pub fn step(&mut self) -> Option<RevealStep> {
        let session = self.session.as_mut()?;
        let step = session.controller.step();
        session.record(step)
    }

    /// Start auto-play at normal cadence
    pub fn play(&mut self) -> bool {
        self.session
            .as_mut()
            .map_or(false, |session| session.controller.play())
    }

    /// Fast-forward to the end
    pub fn skip(&mut self) -> bool {
        self.session
            .as_mut()
            .map_or(false, |session| session.controller.skip())
    }

    /// Timer tick
    pub fn tick(&mut self) -> Option<RevealStep> {
        let session = self.session.as_mut()?;
        let step = session.controller.tick();
        session.record(step)
    }

    /// Wait before the next tick, `None` when no timer is armed
    pub fn pending_interval(&self) -> Option<Duration> {
        self.session
            .as_ref()
            .and_then(|session| session.controller.pending_interval())
    }

    /// Step command enabled
    pub fn can_step(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.controller.can_step())
    }

    /// Skip command enabled
    pub fn can_skip(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.controller.can_skip())
    }

    /// Current summary, `None` before the first build
    pub fn summary(&self) -> Option<Summary> {
        self.session.as_ref().map(Session::summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_disabled_before_build() {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        assert!(!vis.can_step());
        assert!(!vis.can_skip());
        assert!(vis.step().is_none());
        assert!(!vis.skip());
        assert!(vis.summary().is_none());
    }

    #[test]
    fn test_rejection_keeps_previous_session() {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        vis.build(BuildRequest::new(4, BuildMode::Naive, true).unwrap())
            .unwrap();
        vis.step();

        let err = vis
            .build(BuildRequest::new(13, BuildMode::Naive, true).unwrap())
            .unwrap_err();
        assert_eq!(err, VisualizerError::UnsafeSize { n: 13, ceiling: 12 });

        let session = vis.session().unwrap();
        assert_eq!(session.request().n(), 4);
        assert_eq!(session.controller().index(), 2);
    }

    #[test]
    fn test_rebuild_cancels_timer() {
        let mut vis = Visualizer::new(VisualizerConfig::default());
        vis.build(BuildRequest::new(6, BuildMode::Naive, true).unwrap())
            .unwrap();
        assert!(vis.skip());
        vis.tick();

        vis.build(BuildRequest::new(3, BuildMode::Memoized, true).unwrap())
            .unwrap();
        assert!(vis.pending_interval().is_none());
        assert_eq!(vis.session().unwrap().controller().index(), 1);
        assert_eq!(vis.session().unwrap().controller().phase(), RevealPhase::Stepping);
    }

    #[test]
    fn test_config_builders() {
        let config = VisualizerConfig::default()
            .with_naive_ceiling(8)
            .with_speed(Speed::new(10))
            .with_fast_interval(Duration::from_millis(10))
            .with_vertical_gap(50.0)
            .with_horizontal_unit(20.0);

        assert_eq!(config.naive_ceiling, 8);
        assert_eq!(config.reveal_config().intervals.normal, Duration::from_millis(100));
        assert_eq!(config.layout_config().vertical_gap, 50.0);
        assert_eq!(config.reveal_config().horizontal_unit, 20.0);
    }

    #[test]
    fn test_naive_ceiling_is_capped() {
        let config = VisualizerConfig::default().with_naive_ceiling(93);
        assert_eq!(config.naive_ceiling, tree::MAX_NAIVE_CEILING);

        let mut vis = Visualizer::new(config);
        let err = vis
            .build(BuildRequest::new(60, BuildMode::Naive, false).unwrap())
            .unwrap_err();
        assert_eq!(err, VisualizerError::UnsafeSize { n: 60, ceiling: 25 });
        assert!(vis.session().is_none());
    }

    #[test]
    fn test_skip_stays_faster_than_play() {
        let config = VisualizerConfig::default()
            .with_speed(Speed::new(10))
            .with_fast_interval(Duration::from_millis(2000));
        let intervals = config.reveal_config().intervals;
        assert!(intervals.fast < intervals.normal);

        let mut vis = Visualizer::new(config);
        vis.build(BuildRequest::new(6, BuildMode::Naive, true).unwrap())
            .unwrap();
        assert!(vis.play());
        let normal = vis.pending_interval().unwrap();
        assert!(vis.skip());
        let fast = vis.pending_interval().unwrap();
        assert_eq!(normal, Duration::from_millis(100));
        assert!(fast < normal);
    }
}
