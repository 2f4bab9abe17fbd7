//! Single-page review fetch and cursor state
//!
//! [`ReviewPager`] issues one list call per cursor and tags the result as a
//! [`PageOutcome`]. [`PageState::advance`] is the whole pagination state
//! machine: a pure function from the current state and an outcome to the next
//! state.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bilibili::api::BangumiApi;
use crate::review::{Comment, ReviewKind};
use crate::utils::error::FetchError;

/// One page of reviews
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Cursor to pass for the following page
    pub next_cursor: u64,

    /// Reviews in API order; empty once the list is exhausted
    pub items: Vec<Comment>,
}

impl PageResult {
    /// An empty item list ends pagination whatever the cursor says
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tagged result of a single page fetch
#[derive(Debug)]
pub enum PageOutcome {
    /// Non-empty page
    Page(PageResult),
    /// Empty page: nothing left to fetch
    EndOfData,
    /// Failure worth retrying (timeout, 429, 5xx)
    Transient(FetchError),
    /// Failure that ends pagination (API error, bad payload)
    Fatal(FetchError),
}

impl PageOutcome {
    /// Tag a raw fetch result
    pub fn classify(result: Result<PageResult, FetchError>) -> Self {
        match result {
            Ok(page) if page.is_empty() => Self::EndOfData,
            Ok(page) => Self::Page(page),
            Err(e) if e.is_transient() => Self::Transient(e),
            Err(e) => Self::Fatal(e),
        }
    }

    /// Whether another attempt at the same cursor may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Pagination state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Another page is expected at `cursor`
    More { cursor: u64 },
    /// Terminal
    Exhausted,
}

impl PageState {
    /// Initial state, cursor 0
    pub fn start() -> Self {
        Self::More { cursor: 0 }
    }

    /// Next state after observing `outcome`
    ///
    /// Only a non-empty page keeps pagination going; an empty page or any
    /// error is terminal, and `Exhausted` never leaves.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangumi_score::review::{PageOutcome, PageResult, PageState};
    ///
    /// let state = PageState::start();
    /// assert_eq!(state.advance(&PageOutcome::EndOfData), PageState::Exhausted);
    /// ```
    pub fn advance(&self, outcome: &PageOutcome) -> Self {
        match (self, outcome) {
            (Self::More { .. }, PageOutcome::Page(page)) => Self::More {
                cursor: page.next_cursor,
            },
            _ => Self::Exhausted,
        }
    }

    /// Cursor of the next fetch, if any
    pub fn cursor(&self) -> Option<u64> {
        match self {
            Self::More { cursor } => Some(*cursor),
            Self::Exhausted => None,
        }
    }
}

/// Page fetcher for one review kind of one media
pub struct ReviewPager<'a, A: BangumiApi + ?Sized> {
    api: &'a A,
    kind: ReviewKind,
    media_id: u64,
    page_size: u32,
}

impl<'a, A: BangumiApi + ?Sized> ReviewPager<'a, A> {
    /// Create a pager; `page_size` is the `ps` query parameter
    pub fn new(api: &'a A, kind: ReviewKind, media_id: u64, page_size: u32) -> Self {
        Self {
            api,
            kind,
            media_id,
            page_size,
        }
    }

    /// Review kind
    pub fn kind(&self) -> ReviewKind {
        self.kind
    }

    /// Media id
    pub fn media_id(&self) -> u64 {
        self.media_id
    }

    /// Fetch the page at `cursor` once
    pub async fn fetch_page(&self, cursor: u64) -> PageOutcome {
        let result = self
            .api
            .review_page(self.kind, self.media_id, self.page_size, cursor)
            .await;

        let outcome = PageOutcome::classify(result);
        match &outcome {
            PageOutcome::Page(page) => debug!(
                kind = %self.kind,
                media_id = self.media_id,
                cursor,
                items = page.items.len(),
                next_cursor = page.next_cursor,
                "Fetched review page"
            ),
            PageOutcome::EndOfData => debug!(
                kind = %self.kind,
                media_id = self.media_id,
                cursor,
                "Reached end of reviews"
            ),
            PageOutcome::Transient(e) | PageOutcome::Fatal(e) => debug!(
                kind = %self.kind,
                media_id = self.media_id,
                cursor,
                error = %e,
                "Review page failed"
            ),
        }
        outcome
    }

    /// Authoritative review count from the `ps=0` query
    pub async fn total(&self) -> Result<u64, FetchError> {
        self.api.review_total(self.kind, self.media_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(next_cursor: u64, n: usize) -> PageResult {
        let items = (0..n)
            .map(|i| serde_json::from_value(json!({"score": i})).unwrap())
            .collect();
        PageResult { next_cursor, items }
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            PageOutcome::classify(Ok(page(5, 2))),
            PageOutcome::Page(_)
        ));
        assert!(matches!(
            PageOutcome::classify(Ok(page(5, 0))),
            PageOutcome::EndOfData
        ));
        assert!(PageOutcome::classify(Err(FetchError::ServerError(503))).is_transient());
        assert!(matches!(
            PageOutcome::classify(Err(FetchError::Api {
                code: -400,
                message: "请求错误".to_string(),
            })),
            PageOutcome::Fatal(_)
        ));
    }

    #[test]
    fn test_advance_threads_cursor() {
        let state = PageState::start();
        assert_eq!(state.cursor(), Some(0));

        let state = state.advance(&PageOutcome::Page(page(78, 20)));
        assert_eq!(state, PageState::More { cursor: 78 });

        let state = state.advance(&PageOutcome::Page(page(0, 1)));
        assert_eq!(state, PageState::More { cursor: 0 });
    }

    #[test]
    fn test_advance_terminates() {
        let more = PageState::More { cursor: 3 };
        assert_eq!(more.advance(&PageOutcome::EndOfData), PageState::Exhausted);
        assert_eq!(
            more.advance(&PageOutcome::Fatal(FetchError::Decode("x".into()))),
            PageState::Exhausted
        );
        assert_eq!(
            more.advance(&PageOutcome::Transient(FetchError::Timeout)),
            PageState::Exhausted
        );
    }

    #[test]
    fn test_exhausted_is_terminal() {
        let done = PageState::Exhausted;
        assert_eq!(done.advance(&PageOutcome::Page(page(1, 1))), PageState::Exhausted);
        assert_eq!(done.cursor(), None);
    }
}
