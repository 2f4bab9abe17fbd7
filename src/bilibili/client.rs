//! HTTP client for the Bilibili PGC API
//!
//! This module provides the reqwest-backed implementation of [`BangumiApi`]
//! with:
//! - Browser-like default headers (user agent, referer)
//! - Client-side rate limiting with governor
//! - Response envelope validation (`code == 0`)
//! - Base URL override for mock servers
//!
//! Each call is a single attempt. Retry policy belongs to the caller, which
//! knows whether a failure should fall through a cascade or be retried.

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use url::Url;

use crate::bilibili::api::{endpoints, BangumiApi};
use crate::bilibili::headers::build_bilibili_headers;
use crate::bilibili::model::{
    EpisodeStat, MediaMeta, ReviewListData, SeasonStat, SeasonView,
};
use crate::config::ApiConfig;
use crate::review::{PageResult, ReviewKind};
use crate::utils::error::FetchError;

/// Bilibili API client
pub struct BiliClient {
    /// HTTP client with default headers and timeout
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// API base URL, always ending with `/`
    base_url: Url,
}

impl BiliClient {
    /// Create a client from API configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for a bad base URL, `FetchError::InvalidHeader`
    /// for an unencodable user agent or referer, and `FetchError::Http` if the
    /// HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let headers = build_bilibili_headers(&config.user_agent, &config.referer)?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .gzip(true)
            .build()?;

        let rate = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    /// Create a client against a custom base URL (mock servers)
    pub fn with_base_url(base_url: &str, config: &ApiConfig) -> Result<Self, FetchError> {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..config.clone()
        };
        Self::new(&config)
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a GET and return the validated response envelope
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` / `FetchError::Http` on transport failure
    /// - `FetchError::ServerError` on a non-2xx status
    /// - `FetchError::Decode` if the body is not a JSON envelope
    /// - `FetchError::Api` if the envelope `code` is non-zero
    pub async fn get_envelope(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;

        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %url, query = ?query, "Requesting API");

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "API request failed");
            return Err(FetchError::ServerError(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::Decode(format!("{endpoint}: {e}")))?;

        let code = body
            .get("code")
            .and_then(Value::as_i64)
            .ok_or_else(|| FetchError::Decode(format!("{endpoint}: missing `code`")))?;

        if code != 0 {
            let message = body
                .get("message")
                .or_else(|| body.get("msg"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            tracing::debug!(endpoint, code, message = %message, "API returned error code");
            return Err(FetchError::Api { code, message });
        }

        Ok(body)
    }

    /// Fetch an endpoint and deserialize the payload found at `path`
    async fn get_payload<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        path: &[&str],
    ) -> Result<T, FetchError> {
        let body = self.get_envelope(endpoint, query).await?;
        extract_payload(&body, endpoint, path)
    }
}

#[async_trait]
impl BangumiApi for BiliClient {
    async fn season_view(
        &self,
        season_id: Option<u64>,
        episode_id: Option<u64>,
    ) -> Result<SeasonView, FetchError> {
        let mut query = Vec::with_capacity(2);
        if let Some(season_id) = season_id {
            query.push(("season_id", season_id.to_string()));
        }
        if let Some(episode_id) = episode_id {
            query.push(("ep_id", episode_id.to_string()));
        }

        self.get_payload(endpoints::SEASON_VIEW, &query, &["result"])
            .await
    }

    async fn media_meta(&self, media_id: u64) -> Result<MediaMeta, FetchError> {
        self.get_payload(
            endpoints::MEDIA_META,
            &[("media_id", media_id.to_string())],
            &["result", "media"],
        )
        .await
    }

    async fn season_stat(&self, season_id: u64) -> Result<SeasonStat, FetchError> {
        self.get_payload(
            endpoints::SEASON_STAT,
            &[("season_id", season_id.to_string())],
            &["result"],
        )
        .await
    }

    async fn episode_stat(&self, episode_id: u64) -> Result<EpisodeStat, FetchError> {
        self.get_payload(
            endpoints::EPISODE_INFO,
            &[("ep_id", episode_id.to_string())],
            &["data", "stat"],
        )
        .await
    }

    async fn review_total(&self, kind: ReviewKind, media_id: u64) -> Result<u64, FetchError> {
        let data: ReviewListData = self
            .get_payload(
                kind.endpoint(),
                &[("media_id", media_id.to_string()), ("ps", "0".to_string())],
                &["data"],
            )
            .await?;
        Ok(data.total)
    }

    async fn review_page(
        &self,
        kind: ReviewKind,
        media_id: u64,
        page_size: u32,
        cursor: u64,
    ) -> Result<PageResult, FetchError> {
        let data: ReviewListData = self
            .get_payload(
                kind.endpoint(),
                &[
                    ("media_id", media_id.to_string()),
                    ("ps", page_size.to_string()),
                    ("cursor", cursor.to_string()),
                ],
                &["data"],
            )
            .await?;

        Ok(PageResult {
            next_cursor: data.next,
            items: data.list.unwrap_or_default(),
        })
    }
}

/// Parse a base URL and make sure relative endpoints join under it
fn parse_base_url(base_url: &str) -> Result<Url, FetchError> {
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    let url = Url::parse(&normalized).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

/// Walk `path` inside an envelope and deserialize what is there
fn extract_payload<T: DeserializeOwned>(
    body: &Value,
    endpoint: &str,
    path: &[&str],
) -> Result<T, FetchError> {
    let mut node = body;
    for key in path {
        node = node
            .get(*key)
            .filter(|value| !value.is_null())
            .ok_or_else(|| {
                FetchError::Decode(format!("{endpoint}: missing `{}`", path.join(".")))
            })?;
    }

    T::deserialize(node).map_err(|e| FetchError::Decode(format!("{endpoint}: {e}")))
}
