use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT,
};

use crate::utils::error::FetchError;

/// Build browser-like headers for the Bilibili API
///
/// # Arguments
///
/// * `user_agent` - User agent string (typically a modern browser UA)
/// * `referer` - Referer URL (typically `https://www.bilibili.com/`)
///
/// # Errors
///
/// Returns `FetchError::InvalidHeader` if either value is not a valid header
///
/// # Examples
///
/// ```
/// use bangumi_score::bilibili::headers::build_bilibili_headers;
///
/// let headers = build_bilibili_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     "https://www.bilibili.com/",
/// )
/// .unwrap();
/// assert!(headers.contains_key("referer"));
/// ```
pub fn build_bilibili_headers(user_agent: &str, referer: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, header_value(user_agent)?);
    headers.insert(REFERER, header_value(referer)?);
    headers.insert(ORIGIN, header_value(referer.trim_end_matches('/'))?);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
    );

    // Sec-Fetch headers for modern browser compatibility
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-site"),
    );

    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader(value.to_string()))
}
