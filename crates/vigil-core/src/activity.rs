//! User-activity tracking
//!
//! Records the most recent interaction instant. Only the latest signal
//! matters; recording is lock-free so it can be called on every pointer
//! move without cost.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::Instant;

/// Qualifying interaction kinds forwarded to the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// Pointer button pressed
    PointerPress,
    /// Pointer moved
    PointerMove,
    /// Key pressed
    KeyPress,
    /// Viewport scrolled
    Scroll,
    /// Touch started
    TouchStart,
    /// Element clicked
    Click,
}

/// Tracks the most recent user-activity instant.
///
/// Stores the offset from a fixed start instant as an atomic millisecond
/// counter, so [`record`](Self::record) is O(1), allocation-free, and safe
/// to call from any context at arbitrarily high frequency.
#[derive(Debug)]
pub struct ActivityTracker {
    started: Instant,
    /// Milliseconds since `started` at the last recorded activity
    last_activity_ms: AtomicU64,
}

impl ActivityTracker {
    /// Create a tracker; construction counts as the first activity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last_activity_ms: AtomicU64::new(0),
        }
    }

    /// Record an activity signal at the current instant.
    pub fn record(&self) {
        let offset = self.started.elapsed().as_millis() as u64;
        self.last_activity_ms.store(offset, Ordering::Relaxed);
    }

    /// Time elapsed since the last recorded activity.
    #[must_use]
    pub fn idle_for(&self) -> std::time::Duration {
        let now = self.started.elapsed().as_millis() as u64;
        let last = self.last_activity_ms.load(Ordering::Relaxed);
        std::time::Duration::from_millis(now.saturating_sub(last))
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
