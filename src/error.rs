//! Error types for the meeting room application

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Device acquisition failures reported by a [`SourceProvider`].
///
/// Every variant is recovered locally by the session controller: the session
/// keeps running in a degraded, camera-off mode and stays joinable for chat.
/// A missing handle during a toggle is an internal no-op, not an error, and
/// deliberately has no variant here.
///
/// [`SourceProvider`]: crate::media::SourceProvider
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaError {
    #[error("Permission denied by the user or platform")]
    PermissionDenied,

    #[error("No usable capture device available")]
    DeviceUnavailable,

    #[error("Capture picker cancelled by the user")]
    UserCancelled,
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;
