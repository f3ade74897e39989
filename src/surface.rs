//! Terminal notice surface
//!
//! Renders blocking notices on the terminal and confirms them with a line
//! of input — the daemon's stand-in for the dashboard's modal dialog.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use vigil_core::{Notice, NoticeOutcome, NoticeSurface};

/// Notice surface that prints to the terminal and waits for Enter
#[derive(Debug, Default)]
pub struct TerminalNoticeSurface;

impl TerminalNoticeSurface {
    /// Create a terminal surface
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NoticeSurface for TerminalNoticeSurface {
    async fn present(&self, notice: Notice, revoke: CancellationToken) -> NoticeOutcome {
        println!();
        println!("== {} ==", notice.title);
        println!("{}", notice.body);
        println!("[Enter] {}", notice.confirm_label);

        let mut reader = BufReader::new(tokio::io::stdin());
        let mut line = String::new();
        tokio::select! {
            result = reader.read_line(&mut line) => match result {
                // EOF counts as confirmation so teardown completes when
                // stdin is not a terminal
                Ok(_) => NoticeOutcome::Acknowledged,
                Err(_) => NoticeOutcome::Acknowledged,
            },
            _ = revoke.cancelled() => {
                println!("(dismissed)");
                NoticeOutcome::Revoked
            }
        }
    }
}
