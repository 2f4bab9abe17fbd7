//! Common test utilities

use bangumi_score::bilibili::BiliClient;
use bangumi_score::config::{ApiConfig, Config};
use bangumi_score::review::{Comment, ReviewKind};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// API config with fast retries and no effective rate limit
#[allow(dead_code)]
pub fn fast_api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_secs: 5,
        rate_limit: 1000,
        max_retries: 2,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 5,
        ..Default::default()
    }
}

/// Full config pointing at a mock server
#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        api: fast_api_config(&server.uri()),
        ..Default::default()
    }
}

/// Client pointing at a mock server
#[allow(dead_code)]
pub fn mock_client(server: &MockServer) -> BiliClient {
    BiliClient::new(&fast_api_config(&server.uri())).unwrap()
}

/// Successful envelope with the payload under `key`
#[allow(dead_code)]
pub fn envelope(key: &str, payload: Value) -> Value {
    let mut body = json!({"code": 0, "message": "success"});
    body[key] = payload;
    body
}

/// Error envelope as the API returns for unknown ids
#[allow(dead_code)]
pub fn api_error(code: i64) -> Value {
    json!({"code": code, "message": "啥都木有"})
}

/// 200 response with a JSON body
#[allow(dead_code)]
pub fn json_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

/// Review object with the given score
#[allow(dead_code)]
pub fn review(id: u64, score: u64) -> Value {
    json!({
        "review_id": id,
        "score": score,
        "content": format!("评论 {id}"),
        "author": {"mid": id, "uname": format!("user{id}")},
    })
}

/// Parse a JSON array into comments
#[allow(dead_code)]
pub fn comments(value: Value) -> Vec<Comment> {
    serde_json::from_value(value).unwrap()
}

/// Mount a complete paginated review list
///
/// Each page is served at the cursor the previous page pointed to, starting
/// at 0; the page after the last one is empty. The `ps=0` total query
/// answers with the number of scores.
#[allow(dead_code)]
pub async fn mount_reviews(server: &MockServer, kind: ReviewKind, media_id: u64, pages: &[&[u64]]) {
    let endpoint = format!("/{}", kind.endpoint());
    let total: usize = pages.iter().map(|p| p.len()).sum();

    Mock::given(method("GET"))
        .and(path(endpoint.as_str()))
        .and(query_param("media_id", media_id.to_string()))
        .and(query_param("ps", "0"))
        .respond_with(json_response(envelope("data", json!({"total": total}))))
        .mount(server)
        .await;

    let mut cursor = 0u64;
    let mut id = 1u64;
    for scores in pages {
        let next = cursor + 100;
        let list: Vec<Value> = scores
            .iter()
            .map(|s| {
                id += 1;
                review(id, *s)
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(endpoint.as_str()))
            .and(query_param("media_id", media_id.to_string()))
            .and(query_param("cursor", cursor.to_string()))
            .respond_with(json_response(envelope(
                "data",
                json!({"list": list, "next": next, "total": total}),
            )))
            .mount(server)
            .await;

        cursor = next;
    }

    Mock::given(method("GET"))
        .and(path(endpoint.as_str()))
        .and(query_param("media_id", media_id.to_string()))
        .and(query_param("cursor", cursor.to_string()))
        .respond_with(json_response(envelope(
            "data",
            json!({"list": null, "next": 0, "total": total}),
        )))
        .mount(server)
        .await;
}

/// Mount a season view answering both season and episode lookups
#[allow(dead_code)]
pub async fn mount_season_view(server: &MockServer, media_id: u64, season_id: u64, episodes: &[u64]) {
    let episode_list: Vec<Value> = episodes
        .iter()
        .enumerate()
        .map(|(i, id)| json!({"id": id, "title": (i + 1).to_string(), "long_title": format!("第{}话", i + 1)}))
        .collect();
    let body = envelope(
        "result",
        json!({
            "media_id": media_id,
            "season_id": season_id,
            "title": "测试番剧",
            "episodes": episode_list,
        }),
    );

    Mock::given(method("GET"))
        .and(path("/pgc/view/web/season"))
        .and(query_param("season_id", season_id.to_string()))
        .respond_with(json_response(body.clone()))
        .mount(server)
        .await;

    for episode in episodes {
        Mock::given(method("GET"))
            .and(path("/pgc/view/web/season"))
            .and(query_param("ep_id", episode.to_string()))
            .respond_with(json_response(body.clone()))
            .mount(server)
            .await;
    }
}
