//! Drains a review pager into one ordered collection
//!
//! Pages are exposed as a lazy, finite stream: each poll fetches at most one
//! page, the stream ends on the first empty page, and it cannot be restarted
//! once it ended or failed. [`CommentAggregator::drain`] concatenates the
//! pages in arrival order and reports progress along the way.

use futures::stream::{self, Stream, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bilibili::api::BangumiApi;
use crate::config::FetchConfig;
use crate::review::page::{PageOutcome, PageState, ReviewPager};
use crate::review::progress::ProgressObserver;
use crate::review::Comment;
use crate::utils::error::{FetchError, ReviewError};
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Pagination driver shared by both review kinds
#[derive(Debug, Clone)]
pub struct CommentAggregator {
    retry: RetryConfig,
    max_pages: u32,
    cancel: CancellationToken,
}

impl CommentAggregator {
    /// Create an aggregator
    ///
    /// `max_pages` bounds how many pages a single drain may fetch; the token is
    /// checked before every page and during retry backoff.
    pub fn new(retry: RetryConfig, max_pages: u32, cancel: CancellationToken) -> Self {
        Self {
            retry,
            max_pages,
            cancel,
        }
    }

    /// Create an aggregator from fetch configuration
    pub fn from_config(config: &FetchConfig, retry: RetryConfig, cancel: CancellationToken) -> Self {
        Self::new(retry, config.max_pages, cancel)
    }

    /// Cancellation token observed between pages
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Lazy stream of page item lists
    ///
    /// Ends after the first empty page or once `max_pages` pages were
    /// yielded. The first error ends the stream.
    pub fn pages<'s, A>(
        &'s self,
        pager: &'s ReviewPager<'s, A>,
    ) -> impl Stream<Item = Result<Vec<Comment>, ReviewError>> + 's
    where
        A: BangumiApi + ?Sized,
    {
        stream::try_unfold((PageState::start(), 0u32), move |(state, fetched_pages)| async move {
            let Some(cursor) = state.cursor() else {
                return Ok(None);
            };

            if fetched_pages >= self.max_pages {
                warn!(
                    kind = %pager.kind(),
                    media_id = pager.media_id(),
                    max_pages = self.max_pages,
                    cursor,
                    "Page limit reached, stopping early"
                );
                return Ok(None);
            }

            if self.cancel.is_cancelled() {
                return Err(ReviewError::Cancelled);
            }

            let outcome = self.settle(pager, cursor).await?;
            let next = state.advance(&outcome);

            match outcome {
                PageOutcome::Page(page) => Ok(Some((page.items, (next, fetched_pages + 1)))),
                PageOutcome::EndOfData => Ok(None),
                PageOutcome::Transient(source) | PageOutcome::Fatal(source) => {
                    Err(ReviewError::Fetch {
                        kind: pager.kind(),
                        cursor,
                        source,
                    })
                }
            }
        })
    }

    /// Fetch every review of the pager's kind
    ///
    /// The `ps=0` total is queried first to size progress reporting; a failed
    /// total query only loses the estimate. The token aborts the total query
    /// as well as the page loop.
    ///
    /// # Errors
    ///
    /// - `ReviewError::Fetch` on a fatal page or once transient retries run out
    /// - `ReviewError::Cancelled` if the token fires
    pub async fn drain<A>(
        &self,
        pager: &ReviewPager<'_, A>,
        progress: &mut dyn ProgressObserver,
    ) -> Result<Vec<Comment>, ReviewError>
    where
        A: BangumiApi + ?Sized,
    {
        let kind = pager.kind();

        let total = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ReviewError::Cancelled),
            total = with_retry_if(&self.retry, || pager.total(), FetchError::is_transient) => total,
        };
        let total = match total {
            Ok(total) => Some(total),
            Err(e) => {
                warn!(kind = %kind, media_id = pager.media_id(), error = %e, "Review total unavailable");
                None
            }
        };

        progress.on_start(kind, total);

        let mut comments: Vec<Comment> = Vec::new();
        let pages = self.pages(pager);
        futures::pin_mut!(pages);

        while let Some(batch) = pages.try_next().await? {
            comments.extend(batch);
            progress.on_progress(kind, comments.len() as u64);
        }

        let fetched = comments.len() as u64;
        progress.on_finish(kind, fetched);

        if let Some(total) = total.filter(|total| *total != fetched) {
            warn!(kind = %kind, total, fetched, "Fetched count differs from reported total");
        }
        info!(kind = %kind, media_id = pager.media_id(), fetched, "Drained reviews");

        Ok(comments)
    }

    /// Fetch `cursor`, retrying transient outcomes with backoff
    async fn settle<A>(&self, pager: &ReviewPager<'_, A>, cursor: u64) -> Result<PageOutcome, ReviewError>
    where
        A: BangumiApi + ?Sized,
    {
        let mut attempt = 0;
        loop {
            let outcome = pager.fetch_page(cursor).await;
            if !outcome.is_transient() || attempt >= self.retry.max_retries {
                return Ok(outcome);
            }

            attempt += 1;
            let delay = self.retry.delay_for(attempt);
            warn!(
                kind = %pager.kind(),
                cursor,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Transient page failure, will retry"
            );

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(ReviewError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
