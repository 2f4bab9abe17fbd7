//! Score calculation
//!
//! The mean of each review kind is a plain arithmetic mean of the `score`
//! fields. The overall score averages the short and long means without
//! weighting by their counts.

use serde::Serialize;

use crate::review::{Comment, ReviewKind};
use crate::utils::error::ScoreError;

/// Arithmetic mean of the `score` fields
///
/// # Errors
///
/// - `ScoreError::Empty` for an empty slice
/// - `ScoreError::MissingScore` for the first comment without a numeric score
///
/// # Examples
///
/// ```
/// use bangumi_score::review::{mean, Comment};
/// use serde_json::json;
///
/// let comments: Vec<Comment> =
///     serde_json::from_value(json!([{"score": 8}, {"score": 6}])).unwrap();
/// assert_eq!(mean(&comments).unwrap(), 7.0);
/// ```
pub fn mean(comments: &[Comment]) -> Result<f64, ScoreError> {
    if comments.is_empty() {
        return Err(ScoreError::Empty);
    }

    let mut sum = 0.0;
    for (index, comment) in comments.iter().enumerate() {
        sum += comment
            .score()
            .ok_or(ScoreError::MissingScore { index })?;
    }

    Ok(sum / comments.len() as f64)
}

/// Unweighted average of the short and long means
pub fn overall(short_mean: f64, long_mean: f64) -> f64 {
    (short_mean + long_mean) / 2.0
}

/// Count and mean of one collection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateResult {
    /// Number of comments
    pub total_count: usize,

    /// Mean score
    pub mean_score: f64,
}

impl AggregateResult {
    /// Summarize a collection
    pub fn from_comments(comments: &[Comment]) -> Result<Self, ScoreError> {
        Ok(Self {
            total_count: comments.len(),
            mean_score: mean(comments)?,
        })
    }

    /// Summarize one review kind; an empty collection names the kind
    pub fn for_kind(kind: ReviewKind, comments: &[Comment]) -> Result<Self, ScoreError> {
        Self::from_comments(comments).map_err(|e| match e {
            ScoreError::Empty => ScoreError::NoReviews(kind),
            other => other,
        })
    }
}

/// Final report for a title
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreReport {
    /// Short review summary
    pub short: AggregateResult,

    /// Long review summary
    pub long: AggregateResult,

    /// Average of the two means
    pub overall: f64,
}

impl ScoreReport {
    /// Compute the report from both collections
    pub fn compute(short: &[Comment], long: &[Comment]) -> Result<Self, ScoreError> {
        let short = AggregateResult::for_kind(ReviewKind::Short, short)?;
        let long = AggregateResult::for_kind(ReviewKind::Long, long)?;

        Ok(Self {
            short,
            long,
            overall: overall(short.mean_score, long.mean_score),
        })
    }

    /// Summary of one kind
    pub fn get(&self, kind: ReviewKind) -> &AggregateResult {
        match kind {
            ReviewKind::Short => &self.short,
            ReviewKind::Long => &self.long,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn comments(value: serde_json::Value) -> Vec<Comment> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&comments(json!([{"score": 8}, {"score": 6}]))), Ok(7.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), Err(ScoreError::Empty));
    }

    #[test]
    fn test_mean_missing_score() {
        let list = comments(json!([{"score": 8}, {"content": "没打分"}]));
        assert_eq!(mean(&list), Err(ScoreError::MissingScore { index: 1 }));
    }

    #[test]
    fn test_report() {
        let short = comments(json!([{"score": 10}, {"score": 8}]));
        let long = comments(json!([{"score": 6}]));

        let report = ScoreReport::compute(&short, &long).unwrap();

        assert_eq!(report.short.mean_score, 9.0);
        assert_eq!(report.short.total_count, 2);
        assert_eq!(report.long.mean_score, 6.0);
        assert_eq!(report.overall, 7.5);
        assert_eq!(report.get(ReviewKind::Long).total_count, 1);
    }

    #[test]
    fn test_report_names_empty_kind() {
        let short = comments(json!([{"score": 10}]));
        assert_eq!(
            ScoreReport::compute(&short, &[]),
            Err(ScoreError::NoReviews(ReviewKind::Long))
        );
    }

    proptest! {
        #[test]
        fn prop_mean_is_within_bounds(scores in prop::collection::vec(1u8..=10, 1..200)) {
            let list: Vec<Comment> = scores
                .iter()
                .map(|s| serde_json::from_value(json!({ "score": s })).unwrap())
                .collect();

            let value = mean(&list).unwrap();
            let min = *scores.iter().min().unwrap() as f64;
            let max = *scores.iter().max().unwrap() as f64;

            prop_assert!(value.is_finite());
            prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
        }
    }
}
