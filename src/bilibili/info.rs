//! Title metadata and statistics
//!
//! Collects what the `info` command prints: media metadata, the season view,
//! season-wide stats and per-episode stats. Metadata and the season view are
//! required; stats are best effort and come back as `None` when the API has
//! nothing for them.

use serde::Serialize;
use tracing::{debug, warn};

use crate::bilibili::api::BangumiApi;
use crate::bilibili::model::{EpisodeInfo, EpisodeStat, MediaMeta, SeasonStat, SeasonView};
use crate::bilibili::resolve::ResolvedIds;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryConfig};

/// Everything known about a resolved title
#[derive(Debug, Clone, Serialize)]
pub struct BangumiInfo {
    /// Identifiers the report was built for
    pub ids: ResolvedIds,

    /// Media metadata
    pub media: MediaMeta,

    /// Season view with the episode list
    pub season: SeasonView,

    /// Season aggregate stats
    pub season_stat: Option<SeasonStat>,

    /// Reported episodes with their stats
    pub episodes: Vec<EpisodeReport>,
}

impl BangumiInfo {
    /// Number of released episodes
    pub fn episode_count(&self) -> usize {
        self.season.episodes.len()
    }

    /// Display title, falling back from media to season
    pub fn title(&self) -> &str {
        if self.media.title.is_empty() {
            &self.season.title
        } else {
            &self.media.title
        }
    }
}

/// One episode and its stats
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport {
    /// Position in the season, starting at 1
    pub index: usize,

    /// Episode entry from the season view
    pub episode: EpisodeInfo,

    /// Stats, when available
    pub stat: Option<EpisodeStat>,
}

/// Fetch metadata and stats for a resolved title
///
/// With `detail` every episode of the season is reported, otherwise only the
/// resolved episode. Each lookup retries transient failures under `retry`.
///
/// # Errors
///
/// Returns the `FetchError` of the media or season lookup, or of any stat
/// lookup that failed for a reason other than "not found"
pub async fn collect_info<A: BangumiApi + ?Sized>(
    api: &A,
    ids: &ResolvedIds,
    detail: bool,
    retry: &RetryConfig,
) -> Result<BangumiInfo, FetchError> {
    let media = with_retry_if(retry, || api.media_meta(ids.media_id), FetchError::is_transient).await?;
    let season = with_retry_if(
        retry,
        || api.season_view(Some(ids.season_id), None),
        FetchError::is_transient,
    )
    .await?;

    let season_stat = optional(
        with_retry_if(retry, || api.season_stat(ids.season_id), FetchError::is_transient).await,
        "season stat",
    )?;

    let selected: Vec<(usize, &EpisodeInfo)> = season
        .episodes
        .iter()
        .enumerate()
        .filter(|(_, ep)| detail || ep.id == ids.episode_id)
        .map(|(i, ep)| (i + 1, ep))
        .collect();

    if selected.is_empty() {
        warn!(
            episode_id = ids.episode_id,
            season_id = ids.season_id,
            "Episode not listed in season view"
        );
    }

    let mut episodes = Vec::with_capacity(selected.len());
    for (index, episode) in selected {
        let stat = optional(
            with_retry_if(retry, || api.episode_stat(episode.id), FetchError::is_transient).await,
            "episode stat",
        )?;
        episodes.push(EpisodeReport {
            index,
            episode: episode.clone(),
            stat,
        });
    }

    debug!(
        media_id = ids.media_id,
        episodes = episodes.len(),
        "Collected title info"
    );

    Ok(BangumiInfo {
        ids: *ids,
        media,
        season,
        season_stat,
        episodes,
    })
}

/// Downgrade "not found" to `None`
fn optional<T>(result: Result<T, FetchError>, what: &str) -> Result<Option<T>, FetchError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            warn!(lookup = what, error = %e, "Stats unavailable");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
