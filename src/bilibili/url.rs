//! Bangumi URL matching
//!
//! Pulls episode, season and media ids out of free-form text. Each kind is a
//! single best-effort search: the first match wins and matches of different
//! kinds are not checked against each other.
//!
//! Supported formats:
//! - Episode: `https://www.bilibili.com/bangumi/play/ep{id}`
//! - Season: `https://www.bilibili.com/bangumi/play/ss{id}`
//! - Media: `https://www.bilibili.com/bangumi/media/md{id}`
//!
//! The scheme is optional and the mobile host `m.bilibili.com` is accepted.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static EPISODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.|m\.)?bilibili\.com/bangumi/play/ep(?P<id>\d*)").unwrap()
});

static SEASON_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.|m\.)?bilibili\.com/bangumi/play/ss(?P<id>\d*)").unwrap()
});

static MEDIA_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.|m\.)?bilibili\.com/bangumi/media/md(?P<id>\d*)").unwrap()
});

/// Identifier granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    /// Media (review/rating unit), `md` prefix
    Media,
    /// Season (a release or cour), `ss` prefix
    Season,
    /// Episode (a single video), `ep` prefix
    Episode,
}

impl IdKind {
    /// All kinds in resolution precedence order
    pub const ALL: [IdKind; 3] = [IdKind::Media, IdKind::Season, IdKind::Episode];

    /// URL prefix in front of the numeric id
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Media => "md",
            Self::Season => "ss",
            Self::Episode => "ep",
        }
    }

    /// Canonical page URL for an id of this kind
    ///
    /// # Examples
    ///
    /// ```
    /// use bangumi_score::bilibili::url::IdKind;
    ///
    /// assert_eq!(
    ///     IdKind::Season.canonical_url(33802),
    ///     "https://www.bilibili.com/bangumi/play/ss33802"
    /// );
    /// ```
    pub fn canonical_url(&self, id: u64) -> String {
        match self {
            Self::Media => format!("https://www.bilibili.com/bangumi/media/md{id}"),
            Self::Season => format!("https://www.bilibili.com/bangumi/play/ss{id}"),
            Self::Episode => format!("https://www.bilibili.com/bangumi/play/ep{id}"),
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Media => &*MEDIA_PATTERN,
            Self::Season => &*SEASON_PATTERN,
            Self::Episode => &*EPISODE_PATTERN,
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Media => "media",
            Self::Season => "season",
            Self::Episode => "episode",
        };
        f.write_str(name)
    }
}

/// A matched URL fragment and the raw id string behind its prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatch {
    /// Matched URL text
    pub url: String,

    /// Digits after the prefix; may be empty
    pub id: String,
}

impl UrlMatch {
    /// Numeric id, `None` when empty or out of range
    pub fn parse_id(&self) -> Option<u64> {
        if self.id.is_empty() {
            return None;
        }
        self.id.parse().ok().filter(|id| *id != 0)
    }
}

/// Find the first URL of `kind` in `text`
///
/// # Examples
///
/// ```
/// use bangumi_score::bilibili::url::{match_kind, IdKind};
///
/// let found = match_kind("看这个 https://www.bilibili.com/bangumi/play/ep340066 !", IdKind::Episode)
///     .unwrap();
/// assert_eq!(found.id, "340066");
/// assert_eq!(found.url, "https://www.bilibili.com/bangumi/play/ep340066");
/// assert!(match_kind("https://www.bilibili.com/bangumi/play/ep1", IdKind::Season).is_none());
/// ```
pub fn match_kind(text: &str, kind: IdKind) -> Option<UrlMatch> {
    let captures = kind.pattern().captures(text)?;
    let url = captures.get(0)?.as_str().to_string();
    let id = captures
        .name("id")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(UrlMatch { url, id })
}

/// Extract the numeric id of `kind`, treating empty ids as absent
pub fn extract_id(text: &str, kind: IdKind) -> Option<u64> {
    match_kind(text, kind).and_then(|found| found.parse_id())
}
