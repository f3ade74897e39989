//! Error types for vigil-core
//!
//! Infrastructure errors only. Check outcomes (unauthorized, explicit
//! server-side invalidation, transport failures) are not errors — they are
//! classified as [`crate::policy::PollResult`] and handled inside the
//! monitor without propagating to callers.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// A required collaborator was not supplied to the builder
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),

    /// Token store backend failure
    #[error("token store error: {0}")]
    Store(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
