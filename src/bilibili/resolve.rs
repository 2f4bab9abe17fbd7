//! Identifier resolution cascade
//!
//! Turns whatever subset of {media, season, episode} ids a link carried into a
//! complete triple by asking the API, in fixed precedence:
//!
//! 1. media, from the season/episode via one combined season-view lookup
//! 2. season, from the media metadata, else from the episode's season view
//! 3. episode, from the first entry of the season's episode list
//!
//! Every lookup yields a tagged [`Step`]. An API "not found" answer moves the
//! cascade to its next fallback; a transport failure aborts the whole
//! resolution after the configured retries.

use serde::Serialize;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bilibili::api::BangumiApi;
use crate::bilibili::model::SeasonView;
use crate::bilibili::url::{extract_id, IdKind};
use crate::utils::error::{FetchError, ResolveError};
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Partially known identifiers, as extracted from user input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IdentifierTriple {
    /// Media id
    pub media_id: Option<u64>,

    /// Season id
    pub season_id: Option<u64>,

    /// Episode id
    pub episode_id: Option<u64>,
}

impl IdentifierTriple {
    /// Extract every kind from free-form text; unmatched kinds stay absent
    ///
    /// # Examples
    ///
    /// ```
    /// use bangumi_score::bilibili::resolve::IdentifierTriple;
    ///
    /// let ids = IdentifierTriple::from_text("https://www.bilibili.com/bangumi/play/ep340066");
    /// assert_eq!(ids.episode_id, Some(340066));
    /// assert_eq!(ids.media_id, None);
    /// ```
    pub fn from_text(text: &str) -> Self {
        Self {
            media_id: extract_id(text, IdKind::Media),
            season_id: extract_id(text, IdKind::Season),
            episode_id: extract_id(text, IdKind::Episode),
        }
    }

    /// No id of any kind
    pub fn is_empty(&self) -> bool {
        self.media_id.is_none() && self.season_id.is_none() && self.episode_id.is_none()
    }

    /// All three ids, if already known
    pub fn complete(&self) -> Option<ResolvedIds> {
        Some(ResolvedIds {
            media_id: self.media_id?,
            season_id: self.season_id?,
            episode_id: self.episode_id?,
        })
    }
}

/// Fully resolved, mutually consistent identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedIds {
    /// Media id
    pub media_id: u64,

    /// Season id
    pub season_id: u64,

    /// Episode id
    pub episode_id: u64,
}

impl ResolvedIds {
    /// Canonical media page URL
    pub fn media_url(&self) -> String {
        IdKind::Media.canonical_url(self.media_id)
    }

    /// Canonical season page URL
    pub fn season_url(&self) -> String {
        IdKind::Season.canonical_url(self.season_id)
    }

    /// Canonical episode page URL
    pub fn episode_url(&self) -> String {
        IdKind::Episode.canonical_url(self.episode_id)
    }
}

impl From<ResolvedIds> for IdentifierTriple {
    fn from(ids: ResolvedIds) -> Self {
        Self {
            media_id: Some(ids.media_id),
            season_id: Some(ids.season_id),
            episode_id: Some(ids.episode_id),
        }
    }
}

/// Outcome of one cascade step
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// The lookup produced a value
    Resolved(T),
    /// The API has no answer for this input
    Unresolvable,
}

impl<T> Step<T> {
    /// Convert into an `Option`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Unresolvable => None,
        }
    }
}

/// Resolves partial identifiers against the API
pub struct Resolver<'a, A: BangumiApi + ?Sized> {
    api: &'a A,
    retry: RetryConfig,
    cancel: CancellationToken,
}

impl<'a, A: BangumiApi + ?Sized> Resolver<'a, A> {
    /// Create a resolver with the given retry policy for transient failures
    pub fn new(api: &'a A, retry: RetryConfig) -> Self {
        Self {
            api,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort resolution, including in-flight lookups and backoff, once `cancel` fires
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Extract ids from `text` and resolve them
    pub async fn resolve_text(&self, text: &str) -> Result<ResolvedIds, ResolveError> {
        let ids = IdentifierTriple::from_text(text);
        debug!(?ids, "Extracted identifiers");
        self.resolve(ids).await
    }

    /// Complete a partial triple
    ///
    /// A triple that is already complete is returned unchanged without any
    /// API call.
    ///
    /// # Errors
    ///
    /// - `ResolveError::NoIdentifiers` if no id is present
    /// - `ResolveError::MediaUnresolved` / `SeasonUnresolved` / `EpisodeUnresolved`
    ///   when every fallback for that id is exhausted
    /// - `ResolveError::Fetch` on transport failure
    /// - `ResolveError::Cancelled` if the cancellation token fires first
    pub async fn resolve(&self, ids: IdentifierTriple) -> Result<ResolvedIds, ResolveError> {
        if let Some(resolved) = ids.complete() {
            return Ok(resolved);
        }
        if ids.is_empty() {
            return Err(ResolveError::NoIdentifiers);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ResolveError::Cancelled),
            result = self.cascade(ids) => result,
        }
    }

    async fn cascade(&self, ids: IdentifierTriple) -> Result<ResolvedIds, ResolveError> {
        let mut ids = ids;
        let mut view: Option<SeasonView> = None;

        if ids.media_id.is_none() {
            let found = self
                .view_by(ids.season_id, ids.episode_id)
                .await?
                .into_option()
                .ok_or(ResolveError::MediaUnresolved)?;
            ids.media_id = Some(found.media_id);
            ids.season_id = Some(found.season_id);
            view = Some(found);
        }

        if ids.season_id.is_none() {
            let season_id = self
                .season_for(ids.media_id, ids.episode_id)
                .await?
                .into_option()
                .ok_or(ResolveError::SeasonUnresolved)?;
            ids.season_id = Some(season_id);
        }

        let season_id = ids.season_id.ok_or(ResolveError::SeasonUnresolved)?;
        if ids.episode_id.is_none() {
            let view = match view.filter(|v| v.season_id == season_id) {
                Some(view) => Step::Resolved(view),
                None => self.view_by(Some(season_id), None).await?,
            };
            let episode_id = match view {
                Step::Resolved(view) => view.episodes.first().map(|ep| ep.id),
                Step::Unresolvable => None,
            };
            ids.episode_id = Some(episode_id.ok_or(ResolveError::EpisodeUnresolved { season_id })?);
        }

        let resolved = ids.complete().ok_or(ResolveError::MediaUnresolved)?;
        info!(
            media_id = resolved.media_id,
            season_id = resolved.season_id,
            episode_id = resolved.episode_id,
            "Resolved identifiers"
        );
        Ok(resolved)
    }

    /// Season view by season and/or episode, cross-resolving media and season
    async fn view_by(
        &self,
        season_id: Option<u64>,
        episode_id: Option<u64>,
    ) -> Result<Step<SeasonView>, FetchError> {
        if season_id.is_none() && episode_id.is_none() {
            return Ok(Step::Unresolvable);
        }
        self.lookup("season view", || self.api.season_view(season_id, episode_id))
            .await
    }

    /// Season id from the media metadata, falling back to the episode
    async fn season_for(
        &self,
        media_id: Option<u64>,
        episode_id: Option<u64>,
    ) -> Result<Step<u64>, FetchError> {
        if let Some(media_id) = media_id {
            let media = self
                .lookup("media meta", || self.api.media_meta(media_id))
                .await?;
            match media {
                Step::Resolved(meta) => match meta.season_id {
                    Some(season_id) => return Ok(Step::Resolved(season_id)),
                    None => warn!(
                        media_id,
                        "Media metadata carries no season id; falling back to episode lookup"
                    ),
                },
                Step::Unresolvable => debug!(media_id, "Media lookup found nothing"),
            }
        }

        match episode_id {
            Some(episode_id) => Ok(match self.view_by(None, Some(episode_id)).await? {
                Step::Resolved(view) => Step::Resolved(view.season_id),
                Step::Unresolvable => Step::Unresolvable,
            }),
            None => Ok(Step::Unresolvable),
        }
    }

    /// Run one API lookup with retries, mapping "not found" to `Unresolvable`
    async fn lookup<T, F, Fut>(&self, what: &'static str, operation: F) -> Result<Step<T>, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        match with_retry_if(&self.retry, operation, FetchError::is_transient).await {
            Ok(value) => Ok(Step::Resolved(value)),
            Err(FetchError::Api { code, message }) => {
                debug!(lookup = what, code, message = %message, "Lookup not found");
                Ok(Step::Unresolvable)
            }
            Err(e) => Err(e),
        }
    }
}
