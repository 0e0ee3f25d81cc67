//! Furl error types

use thiserror::Error;

/// Errors raised at the edges of the scroll coordination core
///
/// The offset algorithm itself never fails: out-of-range values are clamped
/// and a missing dependency is a no-op. These variants cover configuration
/// and container lookups only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FurlError {
    /// Header or scenario configuration is invalid
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A view id was removed or never registered
    #[error("Unknown view")]
    UnknownView,

    /// The view exists but is not a header
    #[error("View is not a header")]
    NotAHeader,

    /// The view exists but is not a content view
    #[error("View is not a content view")]
    NotContent,
}

/// Result type for Furl operations
pub type Result<T> = std::result::Result<T, FurlError>;
