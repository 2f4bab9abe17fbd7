//! Bilibili PGC API payloads
//!
//! Every response is wrapped in `{code, message, ...}`; the payload sits under
//! `result` or `data` depending on the endpoint. Only the fields this crate
//! reads are modelled, everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::review::Comment;

/// `pgc/view/web/season` result: season and its episode list
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeasonView {
    /// Media id (review/rating unit)
    pub media_id: u64,

    /// Canonical season id
    pub season_id: u64,

    /// Series title
    #[serde(default)]
    pub title: String,

    /// Season title (e.g. 第二季)
    #[serde(default)]
    pub season_title: String,

    /// Released episodes in broadcast order
    #[serde(default)]
    pub episodes: Vec<EpisodeInfo>,

    /// Latest episode summary
    #[serde(default)]
    pub new_ep: Option<NewEpisode>,
}

/// Episode entry of a season view
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EpisodeInfo {
    /// Episode id (`ep` in URLs)
    pub id: u64,

    /// Archive id
    #[serde(default)]
    pub aid: u64,

    /// BV id
    #[serde(default)]
    pub bvid: String,

    /// Episode number label
    #[serde(default)]
    pub title: String,

    /// Episode title
    #[serde(default)]
    pub long_title: String,

    /// Publish time (unix seconds)
    #[serde(default)]
    pub pub_time: i64,

    /// Duration in milliseconds
    #[serde(default)]
    pub duration: u64,
}

/// Latest-episode summary shared by media and season payloads
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewEpisode {
    /// Episode id
    #[serde(default)]
    pub id: Option<u64>,

    /// Update description (e.g. 已完结, 全12话)
    #[serde(default)]
    pub desc: String,

    /// Episode count label (e.g. 全12话)
    #[serde(default)]
    pub index_show: String,
}

/// `pgc/review/user` `result.media`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MediaMeta {
    /// Media id
    pub media_id: u64,

    /// Season the media page points at, when the payload carries it
    #[serde(default)]
    pub season_id: Option<u64>,

    /// Title
    #[serde(default)]
    pub title: String,

    /// Type name (番剧, 国创, ...)
    #[serde(default)]
    pub type_name: String,

    /// Latest episode summary
    #[serde(default)]
    pub new_ep: Option<NewEpisode>,

    /// Displayed rating; absent until enough users rated
    #[serde(default)]
    pub rating: Option<Rating>,
}

/// Displayed rating of a title
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct Rating {
    /// Score shown on the site
    #[serde(default)]
    pub score: f64,

    /// Number of ratings
    #[serde(default)]
    pub count: u64,
}

/// `pgc/web/season/stat` result
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct SeasonStat {
    /// Play count
    #[serde(default)]
    pub views: u64,

    /// Coins
    #[serde(default)]
    pub coins: u64,

    /// Danmaku count
    #[serde(default)]
    pub danmakus: u64,

    /// Followers of this season
    #[serde(default)]
    pub follow: u64,

    /// Followers of the whole series
    #[serde(default)]
    pub series_follow: u64,
}

/// `pgc/season/episode/web/info` `data.stat`
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct EpisodeStat {
    /// Play count
    #[serde(default)]
    pub view: u64,

    /// Likes
    #[serde(default)]
    pub like: u64,

    /// Coins
    #[serde(default)]
    pub coin: u64,

    /// Danmaku count
    #[serde(default)]
    pub dm: u64,

    /// Replies
    #[serde(default)]
    pub reply: u64,
}

/// `pgc/review/{short,long}/list` `data`
///
/// With `ps=0` only `total` is meaningful.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewListData {
    /// Cursor of the following page
    #[serde(default)]
    pub next: u64,

    /// Reviews on this page; `null` once exhausted
    #[serde(default)]
    pub list: Option<Vec<Comment>>,

    /// Total number of reviews
    #[serde(default)]
    pub total: u64,
}
