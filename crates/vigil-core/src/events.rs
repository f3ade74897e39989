//! Monitor event stream
//!
//! Broadcast-based events emitted while the monitor runs, for dashboards,
//! tests, and internal subscribers. Slow subscribers miss events (lagged)
//! rather than blocking the monitor.

use crate::policy::{LogoutReason, PollResult};
use serde::Serialize;
use tokio::sync::broadcast;

/// Events emitted by the inactivity monitor
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonitorEvent {
    /// The monitor was activated
    Started,
    /// A validity check completed without forcing a transition
    CheckCompleted {
        /// Classified outcome of the remote check
        poll: PollResult,
        /// Idle time at check time, in milliseconds
        idle_ms: u64,
    },
    /// The grace-period warning was surfaced
    WarningShown {
        /// Remaining time before the hard timeout, in milliseconds
        remaining_ms: u64,
    },
    /// The warning was dismissed by activity
    WarningDismissed,
    /// The logout sequence ran
    LoggedOut {
        /// Why the logout was forced
        reason: LogoutReason,
    },
    /// The monitor was deactivated
    Stopped,
}

/// Broadcast wrapper for [`MonitorEvent`]
#[derive(Debug, Clone)]
pub struct MonitorEvents {
    sender: broadcast::Sender<MonitorEvent>,
}

impl MonitorEvents {
    /// Create an event stream with the given buffer capacity
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to future events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns the number of subscribers that received it.
    pub fn publish(&self, event: MonitorEvent) -> usize {
        // send() errs when there are no receivers, which is fine
        self.sender.send(event).unwrap_or(0)
    }

    /// Current number of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for MonitorEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let events = MonitorEvents::new(16);
        let mut rx = events.subscribe();

        events.publish(MonitorEvent::WarningShown { remaining_ms: 500 });

        match rx.recv().await.unwrap() {
            MonitorEvent::WarningShown { remaining_ms } => assert_eq!(remaining_ms, 500),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let events = MonitorEvents::new(16);
        assert_eq!(events.publish(MonitorEvent::Started), 0);
    }

    #[test]
    fn test_event_serialization() {
        let event = MonitorEvent::LoggedOut {
            reason: LogoutReason::Inactivity,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"logged_out\""));
        assert!(json.contains("\"reason\":\"inactivity\""));
    }
}
