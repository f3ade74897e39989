//! Vigil Core - Session-Inactivity Watchdog
//!
//! This crate provides the inactivity monitor for the Vigil dashboard,
//! including:
//! - Monitor: activity tracking, periodic validity checks, warning and
//!   logout sequences
//! - Policy: the pure decision state machine
//! - Store: role-keyed session token storage (memory and file backends)
//! - Probe: remote session-validity checks over HTTP
//! - Notice: blocking warning/logout prompts
//! - Events: broadcast stream of monitor events

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod activity;
pub mod config;
pub mod error;
pub mod events;
pub mod monitor;
pub mod nav;
pub mod notice;
pub mod policy;
pub mod probe;
pub mod store;

pub use activity::{ActivityKind, ActivityTracker};
pub use config::MonitorConfig;
pub use error::{Error, Result};
pub use events::{MonitorEvent, MonitorEvents};
pub use monitor::{InactivityMonitor, LogoutHook, MonitorBuilder, MonitorHandle};
pub use nav::{LogNavigator, Navigator};
pub use notice::{
    ChannelNoticeSurface, Notice, NoticeKind, NoticeOutcome, NoticeSurface, PendingNotice,
    SilentNoticeSurface,
};
pub use policy::{Action, LogoutReason, PollResult, Thresholds, WatchState};
pub use probe::{classify_response, HttpSessionProbe, SessionProbe};
pub use store::{FileTokenStore, MemoryTokenStore, TokenRole, TokenStore};
