//! Bangumi review collection and scoring
//!
//! Short and long reviews live behind two independent, cursor-paginated
//! endpoints. This module drains both and averages their `score` fields.
//!
//! - [`page`] - single-page fetch and the cursor state machine
//! - [`aggregate`] - drains a pager into an ordered collection
//! - [`progress`] - observer hook for fetch progress
//! - [`score`] - mean and overall score calculation

pub mod aggregate;
pub mod page;
pub mod progress;
pub mod score;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::bilibili::api::endpoints;

pub use aggregate::CommentAggregator;
pub use page::{PageOutcome, PageResult, PageState, ReviewPager};
pub use progress::{LogProgress, NoProgress, ProgressObserver};
pub use score::{mean, overall, AggregateResult, ScoreReport};

/// Review category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewKind {
    /// Short reviews (短评)
    Short,
    /// Long reviews (长评)
    Long,
}

impl ReviewKind {
    /// Both categories in fetch order
    pub const ALL: [ReviewKind; 2] = [ReviewKind::Short, ReviewKind::Long];

    /// Paginated list endpoint, relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Short => endpoints::SHORT_REVIEWS,
            Self::Long => endpoints::LONG_REVIEWS,
        }
    }

    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Long => "long",
        }
    }

    /// Chinese display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Short => "短评",
            Self::Long => "长评",
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user review, kept exactly as the API returned it
///
/// Only `score` is interpreted; every other field passes through untouched so
/// the snapshot files hold the original objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comment(Map<String, Value>);

impl Comment {
    /// Numeric score, integer or float
    pub fn score(&self) -> Option<f64> {
        self.0.get("score").and_then(Value::as_f64)
    }

    /// Raw field access
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
