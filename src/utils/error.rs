//! Error types for the bangumi score crawler
//!
//! This module defines the domain error types used throughout the crate.
//! Each layer has its own enum; [`crate::error::Error`] unifies them.

use std::path::PathBuf;
use thiserror::Error;

use crate::review::ReviewKind;

/// Errors that can occur while talking to the Bilibili API
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection refused, TLS, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response envelope carried a non-zero `code`
    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },

    /// Response body was not the expected JSON shape
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid base URL or endpoint
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Header value could not be encoded
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed
    ///
    /// Retry on:
    /// - timeouts and connection failures
    /// - 429 (Too Many Requests)
    /// - 500, 502, 503, 504
    ///
    /// An API envelope error is an authoritative answer and is never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::ServerError(status) => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { .. } | Self::Decode(_) | Self::InvalidUrl(_) | Self::InvalidHeader(_) => {
                false
            }
        }
    }

    /// Whether the API answered "no such resource" (`code != 0`)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Errors raised by the identifier resolution cascade
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input contained no episode, season or media link
    #[error("no bangumi link found; check that the URL contains an ep, ss or md id")]
    NoIdentifiers,

    /// Media id could not be recovered
    #[error("media id could not be resolved; check that the link is correct")]
    MediaUnresolved,

    /// Season id could not be recovered
    #[error("season id could not be resolved")]
    SeasonUnresolved,

    /// Season has no episode to anchor the triple
    #[error("season {season_id} has no episodes")]
    EpisodeUnresolved { season_id: u64 },

    /// Transport failure during a lookup
    #[error("lookup failed: {0}")]
    Fetch(#[from] FetchError),

    /// Cancelled before the identifiers were complete
    #[error("resolution cancelled")]
    Cancelled,
}

/// Errors raised while draining review pages
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A page could not be fetched
    #[error("failed to fetch {kind} reviews at cursor {cursor}: {source}")]
    Fetch {
        kind: ReviewKind,
        cursor: u64,
        #[source]
        source: FetchError,
    },

    /// Cancellation token fired between pages
    #[error("review fetch cancelled")]
    Cancelled,
}

/// Errors raised by the score calculator
#[derive(Error, Debug, PartialEq)]
pub enum ScoreError {
    /// Mean of an empty collection
    #[error("no comments to average")]
    Empty,

    /// One review category has no comments
    #[error("no {0} reviews to average")]
    NoReviews(ReviewKind),

    /// A comment lacks a numeric `score`
    #[error("comment #{index} has no numeric score")]
    MissingScore { index: usize },
}

/// Errors raised by the snapshot store
#[derive(Error, Debug)]
pub enum StorageError {
    /// File system failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot is not a JSON array of objects
    #[error("invalid snapshot {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
