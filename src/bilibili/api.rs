//! Remote API contract
//!
//! [`BangumiApi`] is the seam between the resolution/pagination logic and the
//! HTTP transport. [`crate::bilibili::BiliClient`] implements it over reqwest;
//! tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::bilibili::model::{EpisodeStat, MediaMeta, SeasonStat, SeasonView};
use crate::review::{PageResult, ReviewKind};
use crate::utils::error::FetchError;

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    /// Season aggregate stats (`season_id`)
    pub const SEASON_STAT: &str = "pgc/web/season/stat";

    /// Media metadata (`media_id`)
    pub const MEDIA_META: &str = "pgc/review/user";

    /// Per-episode stats (`ep_id`)
    pub const EPISODE_INFO: &str = "pgc/season/episode/web/info";

    /// Season/collection info, cross-resolves ids (`season_id` and/or `ep_id`)
    pub const SEASON_VIEW: &str = "pgc/view/web/season";

    /// Short review list (`media_id`, `ps`, `cursor`)
    pub const SHORT_REVIEWS: &str = "pgc/review/short/list";

    /// Long review list (`media_id`, `ps`, `cursor`)
    pub const LONG_REVIEWS: &str = "pgc/review/long/list";
}

/// Bilibili PGC API operations used by this crate
///
/// Every method maps a `code != 0` envelope to [`FetchError::Api`], which
/// callers treat as "not found".
#[async_trait]
pub trait BangumiApi: Send + Sync {
    /// Season view by season id and/or episode id
    async fn season_view(
        &self,
        season_id: Option<u64>,
        episode_id: Option<u64>,
    ) -> Result<SeasonView, FetchError>;

    /// Media metadata (`result.media`)
    async fn media_meta(&self, media_id: u64) -> Result<MediaMeta, FetchError>;

    /// Season aggregate stats
    async fn season_stat(&self, season_id: u64) -> Result<SeasonStat, FetchError>;

    /// Per-episode stats
    async fn episode_stat(&self, episode_id: u64) -> Result<EpisodeStat, FetchError>;

    /// Authoritative review count (`ps=0` query)
    async fn review_total(&self, kind: ReviewKind, media_id: u64) -> Result<u64, FetchError>;

    /// One page of reviews starting at `cursor`
    async fn review_page(
        &self,
        kind: ReviewKind,
        media_id: u64,
        page_size: u32,
        cursor: u64,
    ) -> Result<PageResult, FetchError>;
}
