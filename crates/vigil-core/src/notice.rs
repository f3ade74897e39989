//! Blocking notice surface
//!
//! The modal analog: a notice is presented with a title, body, icon, and a
//! single confirm action, and stays up until the user confirms it or the
//! monitor revokes it. There is deliberately no outside-click or escape
//! path in the contract — a surface resolves only through [`PendingNotice::
//! acknowledge`] or revocation.

use crate::policy::LogoutReason;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// What a notice is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// Grace-period warning before forced logout
    Warning,
    /// Logout acknowledgment
    Logout,
}

/// A blocking notice shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    /// Unique notice ID
    pub id: Uuid,
    /// Notice kind
    pub kind: NoticeKind,
    /// Title line
    pub title: String,
    /// Body text
    pub body: String,
    /// Icon class for the rendering surface
    pub icon: String,
    /// Label of the single confirm action
    pub confirm_label: String,
    /// When the notice was created
    pub created_at: DateTime<Utc>,
}

impl Notice {
    /// Grace-period warning with the remaining time before forced logout
    #[must_use]
    pub fn warning(remaining: Duration) -> Self {
        let minutes = (remaining.as_secs() + 59) / 60;
        Self {
            id: Uuid::new_v4(),
            kind: NoticeKind::Warning,
            title: "Are you still there?".to_string(),
            body: format!(
                "You will be signed out in about {} minute{} unless you continue working.",
                minutes,
                if minutes == 1 { "" } else { "s" }
            ),
            icon: "warning".to_string(),
            confirm_label: "Stay signed in".to_string(),
            created_at: Utc::now(),
        }
    }

    /// Logout notice for the given reason
    #[must_use]
    pub fn logout(reason: LogoutReason) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: NoticeKind::Logout,
            title: "Signed out".to_string(),
            body: reason.message().to_string(),
            icon: "info".to_string(),
            confirm_label: "OK".to_string(),
            created_at: Utc::now(),
        }
    }
}

/// How a presented notice resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeOutcome {
    /// The user confirmed the notice
    Acknowledged,
    /// The monitor withdrew the notice before confirmation
    Revoked,
}

/// Surface capable of presenting blocking notices.
///
/// `present` must resolve only when the user confirms (`Acknowledged`) or
/// when `revoke` is cancelled (`Revoked`); it must not time out on its own.
#[async_trait]
pub trait NoticeSurface: Send + Sync {
    /// Present a notice and wait for confirmation or revocation
    async fn present(&self, notice: Notice, revoke: CancellationToken) -> NoticeOutcome;
}

/// A notice delivered to an embedding UI, carrying its acknowledgment path
#[derive(Debug)]
pub struct PendingNotice {
    /// The notice to render
    pub notice: Notice,
    ack: oneshot::Sender<()>,
}

impl PendingNotice {
    /// Confirm the notice on behalf of the user
    pub fn acknowledge(self) {
        let _ = self.ack.send(());
    }
}

/// Surface that hands pending notices to an embedding UI over a channel.
///
/// The UI drains the receiver, renders each [`PendingNotice`], and calls
/// [`PendingNotice::acknowledge`] when the user confirms.
pub struct ChannelNoticeSurface {
    tx: mpsc::Sender<PendingNotice>,
}

impl ChannelNoticeSurface {
    /// Create a surface and the receiver the UI drains
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PendingNotice>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl NoticeSurface for ChannelNoticeSurface {
    async fn present(&self, notice: Notice, revoke: CancellationToken) -> NoticeOutcome {
        let kind = notice.kind;
        let (ack_tx, ack_rx) = oneshot::channel();
        let pending = PendingNotice {
            notice,
            ack: ack_tx,
        };

        if self.tx.send(pending).await.is_err() {
            warn!(kind = ?kind, "no notice receiver attached");
            return unattended_outcome(kind, &revoke).await;
        }

        tokio::select! {
            result = ack_rx => match result {
                Ok(()) => NoticeOutcome::Acknowledged,
                // UI dropped the pending notice without confirming
                Err(_) => unattended_outcome(kind, &revoke).await,
            },
            _ = revoke.cancelled() => NoticeOutcome::Revoked,
        }
    }
}

/// Headless surface: logs notices instead of rendering them.
///
/// A warning nobody can confirm must not extend the session, so warnings
/// stay pending until revoked. Logout notices auto-confirm so teardown
/// completes unattended.
#[derive(Debug, Default)]
pub struct SilentNoticeSurface;

impl SilentNoticeSurface {
    /// Create a silent surface
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NoticeSurface for SilentNoticeSurface {
    async fn present(&self, notice: Notice, revoke: CancellationToken) -> NoticeOutcome {
        info!(kind = ?notice.kind, title = %notice.title, body = %notice.body, "notice");
        unattended_outcome(notice.kind, &revoke).await
    }
}

/// Resolution policy when no user can confirm the notice
async fn unattended_outcome(kind: NoticeKind, revoke: &CancellationToken) -> NoticeOutcome {
    match kind {
        NoticeKind::Warning => {
            revoke.cancelled().await;
            NoticeOutcome::Revoked
        }
        NoticeKind::Logout => NoticeOutcome::Acknowledged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_notice_text() {
        let notice = Notice::warning(Duration::from_secs(600));
        assert_eq!(notice.kind, NoticeKind::Warning);
        assert!(notice.body.contains("10 minutes"));

        let notice = Notice::warning(Duration::from_secs(45));
        assert!(notice.body.contains("1 minute"));
    }

    #[test]
    fn test_logout_notice_text() {
        let notice = Notice::logout(LogoutReason::SessionExpired);
        assert_eq!(notice.kind, NoticeKind::Logout);
        assert!(notice.body.contains("expired"));
    }

    #[tokio::test]
    async fn test_channel_surface_acknowledge() {
        let (surface, mut rx) = ChannelNoticeSurface::new(4);
        let revoke = CancellationToken::new();

        let ui = tokio::spawn(async move {
            let pending = rx.recv().await.unwrap();
            assert_eq!(pending.notice.kind, NoticeKind::Warning);
            pending.acknowledge();
        });

        let outcome = surface
            .present(Notice::warning(Duration::from_secs(300)), revoke)
            .await;
        assert_eq!(outcome, NoticeOutcome::Acknowledged);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_channel_surface_revoked() {
        let (surface, mut rx) = ChannelNoticeSurface::new(4);
        let revoke = CancellationToken::new();
        let revoke_handle = revoke.clone();

        let ui = tokio::spawn(async move {
            // UI receives the notice but the user never confirms
            let _pending = rx.recv().await.unwrap();
            revoke_handle.cancel();
            // Hold the pending notice so the ack channel stays open
            std::future::pending::<()>().await;
        });

        let outcome = surface
            .present(Notice::warning(Duration::from_secs(300)), revoke)
            .await;
        assert_eq!(outcome, NoticeOutcome::Revoked);
        ui.abort();
    }

    #[tokio::test]
    async fn test_channel_surface_unattended_logout_acks() {
        let (surface, rx) = ChannelNoticeSurface::new(4);
        drop(rx);

        let outcome = surface
            .present(
                Notice::logout(LogoutReason::Inactivity),
                CancellationToken::new(),
            )
            .await;
        assert_eq!(outcome, NoticeOutcome::Acknowledged);
    }

    #[tokio::test]
    async fn test_silent_surface_warning_waits_for_revoke() {
        let surface = SilentNoticeSurface::new();
        let revoke = CancellationToken::new();
        revoke.cancel();

        let outcome = surface
            .present(Notice::warning(Duration::from_secs(60)), revoke)
            .await;
        assert_eq!(outcome, NoticeOutcome::Revoked);
    }

    #[tokio::test]
    async fn test_silent_surface_logout_auto_acks() {
        let surface = SilentNoticeSurface::new();
        let outcome = surface
            .present(
                Notice::logout(LogoutReason::SessionExpired),
                CancellationToken::new(),
            )
            .await;
        assert_eq!(outcome, NoticeOutcome::Acknowledged);
    }
}
