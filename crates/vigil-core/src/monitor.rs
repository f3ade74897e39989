//! Inactivity monitor
//!
//! Enforces automatic logout after a configurable period of user
//! inactivity, cross-validated against the backend's authoritative session
//! state, with a grace-period warning before the forced logout.
//!
//! All timers and the pending-warning marker are owned by one monitor
//! instance — there is no module-level state, so independent instances can
//! run side by side (and in tests). Collaborators are injected behind
//! traits; the decision logic itself lives in [`crate::policy`].

use crate::activity::{ActivityKind, ActivityTracker};
use crate::config::MonitorConfig;
use crate::error::{Error, Result};
use crate::events::{MonitorEvent, MonitorEvents};
use crate::nav::{LogNavigator, Navigator};
use crate::notice::{Notice, NoticeOutcome, NoticeSurface, SilentNoticeSurface};
use crate::policy::{self, Action, LogoutReason, WatchState};
use crate::probe::SessionProbe;
use crate::store::{TokenRole, TokenStore};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Hook invoked after the user acknowledges the logout notice
pub type LogoutHook = Arc<dyn Fn(LogoutReason) + Send + Sync>;

/// Buffer size of the interaction-event channel
const ACTIVITY_CHANNEL_CAPACITY: usize = 256;

/// Mutable monitor state, guarded by one lock
struct MonitorState {
    watch: WatchState,
    /// Revocation token of the active warning prompt, if any
    warning: Option<CancellationToken>,
}

struct Inner {
    config: MonitorConfig,
    tracker: ActivityTracker,
    state: Mutex<MonitorState>,
    store: Arc<dyn TokenStore>,
    probe: Arc<dyn SessionProbe>,
    surface: Arc<dyn NoticeSurface>,
    navigator: Arc<dyn Navigator>,
    events: MonitorEvents,
    on_logout: Option<LogoutHook>,
    cancel: CancellationToken,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, MonitorState> {
        // A poisoned lock only means a panicked holder; the state itself
        // is still usable
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn thresholds(&self) -> policy::Thresholds {
        policy::Thresholds {
            inactivity_timeout: self.config.inactivity_timeout(),
            warning_lead_time: self.config.warning_lead_time(),
        }
    }

    /// Record an activity signal. O(1), callable at arbitrary frequency.
    fn record_activity(&self) {
        self.tracker.record();

        let mut st = self.lock_state();
        if st.watch == WatchState::Warned {
            st.watch = WatchState::Idle;
            if let Some(revoke) = st.warning.take() {
                revoke.cancel();
            }
            drop(st);
            self.events.publish(MonitorEvent::WarningDismissed);
        }
    }

    /// Run one inactivity check: token lookup, remote probe, policy
    /// evaluation, and the resulting action.
    async fn run_check(self: &Arc<Self>) {
        if !self.config.enabled || self.cancel.is_cancelled() {
            return;
        }
        if self.lock_state().watch == WatchState::LoggedOut {
            return;
        }

        // Role-appropriate credential: admin wins when both are present
        let mut found = None;
        for role in TokenRole::ALL {
            match self.store.get(role).await {
                Ok(Some(token)) => {
                    found = Some((role, token));
                    break;
                }
                Ok(None) => {}
                Err(e) => warn!(role = %role, error = %e, "token lookup failed"),
            }
        }
        let Some((role, token)) = found else {
            debug!("no session token present, skipping check");
            return;
        };

        let poll = self.probe.check(role, &token).await;

        // Decide and transition under the state lock. A monitor deactivated
        // while the probe was in flight must not mutate anything.
        let (action, warning_revoke, next) = {
            let mut st = self.lock_state();
            if self.cancel.is_cancelled() {
                return;
            }
            let idle = self.tracker.idle_for();
            let (next, action) = policy::evaluate(st.watch, idle, poll, &self.thresholds());
            let mut warning_revoke = None;
            match action {
                Action::ForceLogout(_) => {
                    st.watch = WatchState::LoggedOut;
                    if let Some(revoke) = st.warning.take() {
                        revoke.cancel();
                    }
                }
                Action::ShowWarning { .. } => {
                    let revoke = self.cancel.child_token();
                    st.watch = next;
                    st.warning = Some(revoke.clone());
                    warning_revoke = Some(revoke);
                }
                Action::None => st.watch = next,
            }
            (action, warning_revoke, next)
        };

        match action {
            Action::ForceLogout(reason) => self.finish_logout(reason).await,
            Action::ShowWarning { remaining } => {
                self.show_warning(remaining, warning_revoke.unwrap_or_default());
            }
            Action::None => {
                if next != WatchState::LoggedOut {
                    let idle = self.tracker.idle_for();
                    self.events.publish(MonitorEvent::CheckCompleted {
                        poll,
                        idle_ms: idle.as_millis() as u64,
                    });
                }
            }
        }
    }

    /// Surface the grace-period warning. The prompt stays up until the user
    /// confirms it or the monitor revokes it; confirmation counts as
    /// activity.
    fn show_warning(self: &Arc<Self>, remaining: Duration, revoke: CancellationToken) {
        self.events.publish(MonitorEvent::WarningShown {
            remaining_ms: remaining.as_millis() as u64,
        });

        let inner = self.clone();
        tokio::spawn(async move {
            let outcome = inner
                .surface
                .present(Notice::warning(remaining), revoke)
                .await;
            if outcome == NoticeOutcome::Acknowledged {
                inner.record_activity();
            }
        });
    }

    /// The logout sequence. Callers have already won the single transition
    /// to `LoggedOut`, so this runs at most once per monitor.
    async fn finish_logout(self: &Arc<Self>, reason: LogoutReason) {
        info!(reason = ?reason, "forcing logout");

        // Which login surface to land on depends on the session that existed
        let had_admin = matches!(self.store.get(TokenRole::Admin).await, Ok(Some(_)));

        // The current session's role is not always certain here — delete
        // both role tokens unconditionally
        for role in TokenRole::ALL {
            if let Err(e) = self.store.delete(role).await {
                warn!(role = %role, error = %e, "failed to delete session token");
            }
        }

        self.events.publish(MonitorEvent::LoggedOut { reason });

        let outcome = self
            .surface
            .present(Notice::logout(reason), self.cancel.child_token())
            .await;
        if outcome == NoticeOutcome::Acknowledged {
            if let Some(hook) = &self.on_logout {
                hook(reason);
            } else {
                let route = if had_admin {
                    TokenRole::Admin.login_route()
                } else {
                    TokenRole::User.login_route()
                };
                self.navigator.navigate(route);
            }
        }
    }
}

/// Builder for [`InactivityMonitor`]
#[derive(Default)]
pub struct MonitorBuilder {
    config: MonitorConfig,
    store: Option<Arc<dyn TokenStore>>,
    probe: Option<Arc<dyn SessionProbe>>,
    surface: Option<Arc<dyn NoticeSurface>>,
    navigator: Option<Arc<dyn Navigator>>,
    on_logout: Option<LogoutHook>,
}

impl MonitorBuilder {
    /// Set the configuration
    #[must_use]
    pub fn config(mut self, config: MonitorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the token store (required)
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the session probe (required)
    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn SessionProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Set the notice surface (defaults to [`SilentNoticeSurface`])
    #[must_use]
    pub fn surface(mut self, surface: Arc<dyn NoticeSurface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the navigator (defaults to [`LogNavigator`])
    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Set the hook invoked after the logout notice is acknowledged.
    /// When absent, the default navigation action runs instead.
    #[must_use]
    pub fn on_logout(mut self, hook: impl Fn(LogoutReason) + Send + Sync + 'static) -> Self {
        self.on_logout = Some(Arc::new(hook));
        self
    }

    /// Validate the configuration and build the monitor
    pub fn build(self) -> Result<InactivityMonitor> {
        self.config.validate()?;
        let store = self.store.ok_or(Error::MissingDependency("token store"))?;
        let probe = self.probe.ok_or(Error::MissingDependency("session probe"))?;

        Ok(InactivityMonitor {
            inner: Arc::new(Inner {
                config: self.config,
                tracker: ActivityTracker::new(),
                state: Mutex::new(MonitorState {
                    watch: WatchState::Idle,
                    warning: None,
                }),
                store,
                probe,
                surface: self
                    .surface
                    .unwrap_or_else(|| Arc::new(SilentNoticeSurface::new())),
                navigator: self
                    .navigator
                    .unwrap_or_else(|| Arc::new(LogNavigator::new())),
                events: MonitorEvents::default(),
                on_logout: self.on_logout,
                cancel: CancellationToken::new(),
            }),
        })
    }
}

/// Session-inactivity watchdog
pub struct InactivityMonitor {
    inner: Arc<Inner>,
}

impl InactivityMonitor {
    /// Create a builder
    #[must_use]
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    /// The monitor's event stream
    #[must_use]
    pub fn events(&self) -> &MonitorEvents {
        &self.inner.events
    }

    /// Activate the monitor: attach the activity listener, start the
    /// periodic check loop, and schedule one early check after the
    /// configured startup delay. When the monitor is disabled nothing is
    /// spawned and checks are no-ops.
    ///
    /// Consumes the monitor; the returned [`MonitorHandle`] is the control
    /// surface from here on.
    #[must_use]
    pub fn start(self) -> MonitorHandle {
        let (activity_tx, mut activity_rx) = mpsc::channel::<ActivityKind>(ACTIVITY_CHANNEL_CAPACITY);

        if !self.inner.config.enabled {
            info!("inactivity monitor disabled, no timers attached");
            return MonitorHandle {
                inner: self.inner,
                activity_tx,
            };
        }

        // Interaction-event listener
        let inner = self.inner.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    signal = activity_rx.recv() => match signal {
                        Some(kind) => {
                            trace!(kind = ?kind, "activity signal");
                            inner.record_activity();
                        }
                        None => break,
                    },
                    _ = inner.cancel.cancelled() => break,
                }
            }
        });

        // One early check shortly after activation, to catch near-immediate
        // invalidation
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(inner.config.startup_delay()) => inner.run_check().await,
                _ = inner.cancel.cancelled() => {}
            }
        });

        // Periodic check loop
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let interval = inner.config.check_interval();
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => inner.run_check().await,
                    _ = inner.cancel.cancelled() => break,
                }
            }
        });

        self.inner.events.publish(MonitorEvent::Started);
        info!(
            check_interval_ms = self.inner.config.check_interval_ms,
            inactivity_timeout_ms = self.inner.config.inactivity_timeout_ms,
            "inactivity monitor started"
        );

        MonitorHandle {
            inner: self.inner,
            activity_tx,
        }
    }
}

/// Control surface of a started monitor
#[derive(Clone)]
pub struct MonitorHandle {
    inner: Arc<Inner>,
    activity_tx: mpsc::Sender<ActivityKind>,
}

impl MonitorHandle {
    /// Record an activity signal directly
    pub fn record_activity(&self) {
        self.inner.record_activity();
    }

    /// Sender half of the interaction-event channel, for wiring event
    /// sources (pointer, keyboard, scroll, touch) to the monitor
    #[must_use]
    pub fn activity_sender(&self) -> mpsc::Sender<ActivityKind> {
        self.activity_tx.clone()
    }

    /// Run one inactivity check immediately
    pub async fn check_now(&self) {
        self.inner.run_check().await;
    }

    /// Current monitor phase
    #[must_use]
    pub fn state(&self) -> WatchState {
        self.inner.lock_state().watch
    }

    /// Whether the terminal logout transition has happened
    #[must_use]
    pub fn is_logged_out(&self) -> bool {
        self.state() == WatchState::LoggedOut
    }

    /// Subscribe to monitor events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.inner.events.subscribe()
    }

    /// Deactivate the monitor: synchronously cancel the periodic loop, the
    /// startup timer, the activity listener, and any pending prompt. An
    /// in-flight check resolves without mutating state.
    pub fn stop(&self) {
        if self.inner.cancel.is_cancelled() {
            return;
        }
        self.inner.cancel.cancel();
        self.inner.lock_state().warning.take();
        self.inner.events.publish(MonitorEvent::Stopped);
        info!("inactivity monitor stopped");
    }
}
