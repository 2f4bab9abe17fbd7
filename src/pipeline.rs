//! End-to-end scoring
//!
//! Wires the resolver, both review pagers and the score calculator into one
//! strictly sequential run: short reviews are drained completely before long
//! reviews start.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::bilibili::api::BangumiApi;
use crate::bilibili::resolve::{ResolvedIds, Resolver};
use crate::config::Config;
use crate::error::Result;
use crate::review::{
    Comment, CommentAggregator, ProgressObserver, ReviewKind, ReviewPager, ScoreReport,
};
use crate::storage::SnapshotStore;

/// Both review collections of one title
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewSet {
    /// Short reviews in API order
    pub short: Vec<Comment>,

    /// Long reviews in API order
    pub long: Vec<Comment>,
}

impl ReviewSet {
    /// Collection of `kind`
    pub fn get(&self, kind: ReviewKind) -> &[Comment] {
        match kind {
            ReviewKind::Short => &self.short,
            ReviewKind::Long => &self.long,
        }
    }

    /// Score both collections
    pub fn report(&self) -> Result<ScoreReport> {
        Ok(ScoreReport::compute(&self.short, &self.long)?)
    }

    /// Read both snapshots
    pub fn load(store: &SnapshotStore) -> Result<Self> {
        Ok(Self {
            short: store.load(ReviewKind::Short)?,
            long: store.load(ReviewKind::Long)?,
        })
    }

    /// Write both snapshots
    pub fn save(&self, store: &SnapshotStore) -> Result<()> {
        for kind in ReviewKind::ALL {
            store.save(kind, self.get(kind))?;
        }
        Ok(())
    }
}

/// Resolve-fetch-score driver over any [`BangumiApi`]
pub struct ScorePipeline<'a, A: BangumiApi + ?Sized> {
    api: &'a A,
    config: &'a Config,
    cancel: CancellationToken,
}

impl<'a, A: BangumiApi + ?Sized> ScorePipeline<'a, A> {
    /// Create a pipeline; cancelling `cancel` aborts resolution and stops review fetching between pages
    pub fn new(api: &'a A, config: &'a Config, cancel: CancellationToken) -> Self {
        Self { api, config, cancel }
    }

    /// Resolve a bangumi link to its full id triple
    pub async fn resolve(&self, url: &str) -> Result<ResolvedIds> {
        let resolver =
            Resolver::new(self.api, self.config.api.retry()).with_cancel(self.cancel.clone());
        Ok(resolver.resolve_text(url).await?)
    }

    /// Drain short, then long reviews of `media_id`
    pub async fn fetch_reviews(
        &self,
        media_id: u64,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ReviewSet> {
        let aggregator = CommentAggregator::from_config(
            &self.config.fetch,
            self.config.api.retry(),
            self.cancel.clone(),
        );

        let mut reviews = ReviewSet::default();
        for kind in ReviewKind::ALL {
            let pager = ReviewPager::new(self.api, kind, media_id, self.config.fetch.page_size);
            let comments = aggregator.drain(&pager, progress).await?;
            match kind {
                ReviewKind::Short => reviews.short = comments,
                ReviewKind::Long => reviews.long = comments,
            }
        }

        info!(
            media_id,
            short = reviews.short.len(),
            long = reviews.long.len(),
            "Fetched all reviews"
        );
        Ok(reviews)
    }

    /// Resolve `url`, fetch every review and score them
    pub async fn run(
        &self,
        url: &str,
        progress: &mut dyn ProgressObserver,
    ) -> Result<(ResolvedIds, ReviewSet, ScoreReport)> {
        let ids = self.resolve(url).await?;
        let reviews = self.fetch_reviews(ids.media_id, progress).await?;
        let report = reviews.report()?;
        Ok((ids, reviews, report))
    }
}
