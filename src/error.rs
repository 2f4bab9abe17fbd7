//! Unified error handling for the bangumi-score crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`BangumiErrorTrait`] - Common interface implemented by the unified error
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use bangumi_score::error::{BangumiErrorTrait, Error};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Retry later: {err}");
//!     } else {
//!         eprintln!("Fatal error ({}): {err}", err.category().description());
//!     }
//! }
//! ```

use thiserror::Error;

pub use crate::utils::error::{FetchError, ResolveError, ReviewError, ScoreError, StorageError};

/// Common trait for bangumi-score error types
pub trait BangumiErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, API envelope)
    Network,
    /// Identifier resolution failures
    Resolution,
    /// Empty or malformed review data
    Data,
    /// Snapshot and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Interrupted by the user
    Cancelled,
}

impl ErrorCategory {
    /// Short human readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Resolution => "resolution error",
            Self::Data => "data error",
            Self::Storage => "storage error",
            Self::Config => "configuration error",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Unified error type for the bangumi-score crate
#[derive(Error, Debug)]
pub enum Error {
    /// API transport and envelope errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Identifier cascade errors
    #[error("Resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Pagination errors
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Score calculation errors
    #[error("Score error: {0}")]
    Score(#[from] ScoreError),

    /// Snapshot errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl BangumiErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_transient(),
            Self::Resolve(ResolveError::Fetch(e)) => e.is_transient(),
            Self::Resolve(ResolveError::Cancelled) => true,
            Self::Resolve(_) => false,
            Self::Review(ReviewError::Fetch { source, .. }) => source.is_transient(),
            Self::Review(ReviewError::Cancelled) => true,
            Self::Score(_) => false,
            Self::Storage(StorageError::Io { .. }) => true,
            Self::Storage(StorageError::Json { .. }) => false,
            Self::Config(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) | Self::Resolve(ResolveError::Fetch(_)) => ErrorCategory::Network,
            Self::Resolve(ResolveError::Cancelled) => ErrorCategory::Cancelled,
            Self::Resolve(_) => ErrorCategory::Resolution,
            Self::Review(ReviewError::Fetch { .. }) => ErrorCategory::Network,
            Self::Review(ReviewError::Cancelled) => ErrorCategory::Cancelled,
            Self::Score(_) => ErrorCategory::Data,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
