//! Reveal pacing
//!
//! No threads: a driver asks for the pending interval, waits on its own
//! clock, then calls `tick()` once.

use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Default normal reveal interval
pub const NORMAL_INTERVAL: Duration = Duration::from_millis(160);

/// Default fast (skip) reveal interval
pub const FAST_INTERVAL: Duration = Duration::from_millis(60);

/// Pacing class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Cadence {
    /// Auto-play
    Normal,
    /// Skip / fast-forward
    Fast,
}

/// Normal and fast intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Intervals {
    /// Auto-play interval
    pub normal: Duration,
    /// Skip interval
    pub fast: Duration,
}

impl Default for Intervals {
    fn default() -> Self {
        Self {
            normal: NORMAL_INTERVAL,
            fast: FAST_INTERVAL,
        }
    }
}

impl Intervals {
    /// Pair with `fast` strictly below `normal`
    ///
    /// A fast interval at or above the normal one falls back to half of it.
    pub fn new(normal: Duration, fast: Duration) -> Self {
        if fast >= normal {
            warn!(?normal, ?fast, "skip interval not faster than playback, using half of it");
        }
        Self {
            normal,
            fast: accelerated(normal, fast),
        }
    }

    /// Interval for a cadence
    pub fn for_cadence(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Normal => self.normal,
            Cadence::Fast => accelerated(self.normal, self.fast),
        }
    }
}

fn accelerated(normal: Duration, fast: Duration) -> Duration {
    if fast < normal {
        fast
    } else {
        normal / 2
    }
}

/// Armed recurring tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTimer {
    cadence: Cadence,
    interval: Duration,
    ticks: usize,
}

impl RevealTimer {
    /// Arm at the given cadence
    pub fn arm(cadence: Cadence, intervals: &Intervals) -> Self {
        Self {
            cadence,
            interval: intervals.for_cadence(cadence),
            ticks: 0,
        }
    }

    /// Pacing class
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Wait before the next tick
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks delivered since arming
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }
}

/// Speed level 1..=10 (slider position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Speed(u8);

impl Speed {
    /// Slowest level
    pub const MIN: u8 = 1;
    /// Fastest level
    pub const MAX: u8 = 10;

    /// Level clamped into `1..=10`
    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    /// Level value
    pub fn level(self) -> u8 {
        self.0
    }

    /// `1100 - 100 × level` ms (level 1 → 1 s, level 10 → 100 ms)
    pub fn interval(self) -> Duration {
        Duration::from_millis(1100 - 100 * u64::from(self.0))
    }

    /// Slow / Normal / Fast
    pub fn label(self) -> &'static str {
        match self.0 {
            0..=3 => "Slow",
            4..=7 => "Normal",
            _ => "Fast",
        }
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.0)
    }
}
