//! Remote session-validity probe
//!
//! Asks the backend whether the session behind a token is still live. The
//! HTTP implementation hits one status endpoint per role with the token as a
//! bearer credential and a bounded transport timeout, then classifies the
//! response into a [`PollResult`]. Classification is a pure function of the
//! status code and body so it can be tested without a server.
//!
//! Only two things may force a logout: an explicit 401 and an explicit
//! inactive signal in the payload. Everything else — 5xx, malformed bodies,
//! timeouts — is inconclusive.

use crate::policy::PollResult;
use crate::store::TokenRole;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Remote session-validity oracle
#[async_trait]
pub trait SessionProbe: Send + Sync {
    /// Check whether the session behind `token` is still valid for `role`.
    ///
    /// Never fails — all failure modes are folded into the returned
    /// [`PollResult`].
    async fn check(&self, role: TokenRole, token: &str) -> PollResult;
}

/// Status payload returned by the backend.
///
/// The probe inspects only the inactivity-signal field; everything else in
/// the payload belongs to other consumers of the endpoint.
#[derive(Debug, Deserialize)]
struct StatusPayload {
    /// False when the backend has invalidated the session
    session_active: Option<bool>,
}

/// Classify an HTTP response into a [`PollResult`].
#[must_use]
pub fn classify_response(status: u16, body: &str) -> PollResult {
    if status == 401 {
        return PollResult::Unauthorized;
    }
    if !(200..300).contains(&status) {
        // 5xx and friends are transport-grade failures, not session signals
        return PollResult::NetworkError;
    }
    match serde_json::from_str::<StatusPayload>(body) {
        Ok(payload) if payload.session_active == Some(false) => PollResult::ServerInvalid,
        Ok(_) => PollResult::Valid,
        Err(e) => {
            // A 2xx without a readable payload carries no inactive signal
            debug!(error = %e, "unparseable status payload, treating as valid");
            PollResult::Valid
        }
    }
}

/// HTTP-backed session probe
pub struct HttpSessionProbe {
    client: reqwest::Client,
    admin_url: String,
    user_url: String,
    timeout: Duration,
}

impl HttpSessionProbe {
    /// Create a probe for the given per-role status endpoints
    #[must_use]
    pub fn new(admin_url: impl Into<String>, user_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            admin_url: admin_url.into(),
            user_url: user_url.into(),
            timeout: Duration::from_millis(5_000),
        }
    }

    /// Set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url_for(&self, role: TokenRole) -> &str {
        match role {
            TokenRole::Admin => &self.admin_url,
            TokenRole::User => &self.user_url,
        }
    }
}

#[async_trait]
impl SessionProbe for HttpSessionProbe {
    async fn check(&self, role: TokenRole, token: &str) -> PollResult {
        let response = self
            .client
            .get(self.url_for(role))
            .bearer_auth(token)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status().as_u16();
                match resp.text().await {
                    Ok(body) => classify_response(status, &body),
                    Err(e) => {
                        debug!(role = %role, error = %e, "failed to read status body");
                        // The status line alone still decides 401
                        classify_response(status, "")
                    }
                }
            }
            Err(e) => {
                debug!(role = %role, error = %e, "session probe transport failure");
                PollResult::NetworkError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_active_session() {
        let poll = classify_response(200, r#"{"session_active": true, "user": "dana"}"#);
        assert_eq!(poll, PollResult::Valid);
    }

    #[test]
    fn test_classify_explicit_inactive() {
        let poll = classify_response(200, r#"{"session_active": false}"#);
        assert_eq!(poll, PollResult::ServerInvalid);
    }

    #[test]
    fn test_classify_unauthorized() {
        // Body is irrelevant on a 401
        let poll = classify_response(401, r#"{"session_active": true}"#);
        assert_eq!(poll, PollResult::Unauthorized);
    }

    #[test]
    fn test_classify_missing_signal_field() {
        // No inactive signal present — not a logout
        let poll = classify_response(200, r#"{"status": "ok"}"#);
        assert_eq!(poll, PollResult::Valid);
    }

    #[test]
    fn test_classify_server_error_is_inconclusive() {
        assert_eq!(classify_response(500, ""), PollResult::NetworkError);
        assert_eq!(classify_response(503, "busy"), PollResult::NetworkError);
        assert_eq!(classify_response(404, ""), PollResult::NetworkError);
    }

    #[test]
    fn test_classify_garbage_body_on_success() {
        assert_eq!(classify_response(200, "<html>"), PollResult::Valid);
    }

    #[test]
    fn test_url_per_role() {
        let probe = HttpSessionProbe::new("http://api/admin/status", "http://api/user/status");
        assert_eq!(probe.url_for(TokenRole::Admin), "http://api/admin/status");
        assert_eq!(probe.url_for(TokenRole::User), "http://api/user/status");
    }
}
