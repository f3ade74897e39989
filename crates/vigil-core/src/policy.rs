//! Watchdog decision policy
//!
//! The pure decision core of the monitor: given the current phase, the
//! elapsed idle time, and the outcome of a remote validity check, decide the
//! next phase and the action to take. No I/O and no timers live here, so the
//! whole state machine is testable with plain values.

use serde::Serialize;
use std::time::Duration;

/// Phase of the inactivity monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchState {
    /// Not yet warned
    Idle,
    /// Warning surfaced, awaiting acknowledgment or further inactivity
    Warned,
    /// Terminal — session torn down
    LoggedOut,
}

/// Outcome classification of a remote session-validity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollResult {
    /// Session is valid server-side
    Valid,
    /// Backend explicitly signaled the session is inactive
    ServerInvalid,
    /// Endpoint rejected the credential (HTTP 401)
    Unauthorized,
    /// Transport failure or timeout — inconclusive
    NetworkError,
}

/// Why a logout was forced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutReason {
    /// The backend invalidated the session (explicit signal or 401)
    SessionExpired,
    /// Local inactivity exceeded the configured timeout
    Inactivity,
}

impl LogoutReason {
    /// User-facing notice body for this reason
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::SessionExpired => "Your session has expired. Please sign in again.",
            Self::Inactivity => "You have been signed out due to inactivity.",
        }
    }
}

/// Action the monitor must carry out after a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do
    None,
    /// Surface the warning prompt with the remaining grace period
    ShowWarning {
        /// Time left before the hard timeout
        remaining: Duration,
    },
    /// Run the logout sequence
    ForceLogout(LogoutReason),
}

/// Timeout thresholds the policy evaluates against
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    /// Inactivity duration that forces logout
    pub inactivity_timeout: Duration,
    /// Inactivity duration at which the warning is surfaced
    pub warning_lead_time: Duration,
}

/// Decide the next phase and action.
///
/// Ordering mirrors the check sequence: a remote invalidation takes
/// precedence over local timing, a transport failure is inconclusive and
/// never changes state, and only then is local elapsed time evaluated.
/// `LoggedOut` is terminal — nothing transitions out of it.
#[must_use]
pub fn evaluate(
    state: WatchState,
    elapsed: Duration,
    poll: PollResult,
    thresholds: &Thresholds,
) -> (WatchState, Action) {
    if state == WatchState::LoggedOut {
        return (WatchState::LoggedOut, Action::None);
    }

    match poll {
        PollResult::ServerInvalid | PollResult::Unauthorized => (
            WatchState::LoggedOut,
            Action::ForceLogout(LogoutReason::SessionExpired),
        ),
        PollResult::NetworkError => (state, Action::None),
        PollResult::Valid => {
            if elapsed >= thresholds.inactivity_timeout {
                (
                    WatchState::LoggedOut,
                    Action::ForceLogout(LogoutReason::Inactivity),
                )
            } else if elapsed >= thresholds.warning_lead_time {
                match state {
                    WatchState::Idle => (
                        WatchState::Warned,
                        Action::ShowWarning {
                            remaining: thresholds.inactivity_timeout - elapsed,
                        },
                    ),
                    // Already warned — the prompt stays up until acknowledged
                    other => (other, Action::None),
                }
            } else {
                (state, Action::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            inactivity_timeout: Duration::from_millis(3_600_000),
            warning_lead_time: Duration::from_millis(3_000_000),
        }
    }

    #[test]
    fn test_quiet_period_is_noop() {
        let (state, action) = evaluate(
            WatchState::Idle,
            Duration::from_millis(1_000_000),
            PollResult::Valid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::Idle);
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_warning_threshold_crossed() {
        let (state, action) = evaluate(
            WatchState::Idle,
            Duration::from_millis(3_100_000),
            PollResult::Valid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::Warned);
        assert_eq!(
            action,
            Action::ShowWarning {
                remaining: Duration::from_millis(500_000)
            }
        );
    }

    #[test]
    fn test_warning_not_retriggered_while_warned() {
        let (state, action) = evaluate(
            WatchState::Warned,
            Duration::from_millis(3_200_000),
            PollResult::Valid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::Warned);
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_hard_timeout_forces_logout() {
        let (state, action) = evaluate(
            WatchState::Warned,
            Duration::from_millis(3_700_000),
            PollResult::Valid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::LoggedOut);
        assert_eq!(action, Action::ForceLogout(LogoutReason::Inactivity));
    }

    #[test]
    fn test_hard_timeout_from_idle() {
        // Warning may never have surfaced (e.g. the process just woke up)
        let (state, action) = evaluate(
            WatchState::Idle,
            Duration::from_millis(3_600_000),
            PollResult::Valid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::LoggedOut);
        assert_eq!(action, Action::ForceLogout(LogoutReason::Inactivity));
    }

    #[test]
    fn test_server_invalid_overrides_local_timing() {
        // Elapsed time of zero — the remote signal alone forces logout
        let (state, action) = evaluate(
            WatchState::Idle,
            Duration::ZERO,
            PollResult::ServerInvalid,
            &thresholds(),
        );
        assert_eq!(state, WatchState::LoggedOut);
        assert_eq!(action, Action::ForceLogout(LogoutReason::SessionExpired));
    }

    #[test]
    fn test_unauthorized_forces_logout() {
        let (state, action) = evaluate(
            WatchState::Warned,
            Duration::from_millis(100),
            PollResult::Unauthorized,
            &thresholds(),
        );
        assert_eq!(state, WatchState::LoggedOut);
        assert_eq!(action, Action::ForceLogout(LogoutReason::SessionExpired));
    }

    #[test]
    fn test_network_error_never_changes_state() {
        for state in [WatchState::Idle, WatchState::Warned] {
            // Even past the hard timeout the check is inconclusive
            let (next, action) = evaluate(
                state,
                Duration::from_millis(10_000_000),
                PollResult::NetworkError,
                &thresholds(),
            );
            assert_eq!(next, state);
            assert_eq!(action, Action::None);
        }
    }

    #[test]
    fn test_logged_out_is_terminal() {
        for poll in [
            PollResult::Valid,
            PollResult::ServerInvalid,
            PollResult::Unauthorized,
            PollResult::NetworkError,
        ] {
            let (state, action) = evaluate(
                WatchState::LoggedOut,
                Duration::from_millis(10_000_000),
                poll,
                &thresholds(),
            );
            assert_eq!(state, WatchState::LoggedOut);
            assert_eq!(action, Action::None);
        }
    }

    #[test]
    fn test_logout_messages() {
        assert!(LogoutReason::SessionExpired.message().contains("expired"));
        assert!(LogoutReason::Inactivity.message().contains("inactivity"));
    }
}
