//! Integration tests for the identifier resolution cascade

mod common;

use bangumi_score::bilibili::{IdentifierTriple, Resolver};
use bangumi_score::error::{FetchError, ResolveError};
use common::{api_error, envelope, fast_api_config, json_response, mock_client, mount_season_view};
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEDIA: u64 = 28229233;
const SEASON: u64 = 33802;

/// Episode link resolves media and season in one lookup
#[tokio::test]
async fn test_resolve_episode_link() {
    let mock_server = MockServer::start().await;
    mount_season_view(&mock_server, MEDIA, SEASON, &[340066, 340067]).await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let ids = resolver
        .resolve_text("https://www.bilibili.com/bangumi/play/ep340067?from=search")
        .await
        .unwrap();

    assert_eq!(ids.media_id, MEDIA);
    assert_eq!(ids.season_id, SEASON);
    assert_eq!(ids.episode_id, 340067);
    assert_eq!(ids.season_url(), "https://www.bilibili.com/bangumi/play/ss33802");
    assert_eq!(ids.media_url(), "https://www.bilibili.com/bangumi/media/md28229233");
}

/// Season link picks the first episode
#[tokio::test]
async fn test_resolve_season_link() {
    let mock_server = MockServer::start().await;
    mount_season_view(&mock_server, MEDIA, SEASON, &[340066, 340067]).await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let ids = resolver
        .resolve_text("https://www.bilibili.com/bangumi/play/ss33802")
        .await
        .unwrap();

    assert_eq!(ids.media_id, MEDIA);
    assert_eq!(ids.episode_id, 340066);
}

/// Media link reads the season id from the media metadata
#[tokio::test]
async fn test_resolve_media_link() {
    let mock_server = MockServer::start().await;
    mount_season_view(&mock_server, MEDIA, SEASON, &[340066]).await;

    Mock::given(method("GET"))
        .and(path("/pgc/review/user"))
        .and(query_param("media_id", MEDIA.to_string()))
        .respond_with(json_response(envelope(
            "result",
            json!({"media": {"media_id": MEDIA, "season_id": SEASON, "title": "测试番剧"}}),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let ids = resolver
        .resolve_text("https://www.bilibili.com/bangumi/media/md28229233/")
        .await
        .unwrap();

    assert_eq!(ids.season_id, SEASON);
    assert_eq!(ids.episode_id, 340066);
}

/// Media not found falls through to the episode lookup
#[tokio::test]
async fn test_media_not_found_falls_through() {
    let mock_server = MockServer::start().await;
    mount_season_view(&mock_server, MEDIA, SEASON, &[340066]).await;

    Mock::given(method("GET"))
        .and(path("/pgc/review/user"))
        .respond_with(json_response(api_error(-404)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let ids = resolver
        .resolve(IdentifierTriple {
            media_id: Some(MEDIA),
            season_id: None,
            episode_id: Some(340066),
        })
        .await
        .unwrap();

    assert_eq!(ids.season_id, SEASON);
}

/// Unknown episode is not found, and not found is never retried
#[tokio::test]
async fn test_unknown_episode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pgc/view/web/season"))
        .respond_with(json_response(api_error(-404)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let result = resolver
        .resolve_text("https://www.bilibili.com/bangumi/play/ep1")
        .await;

    assert!(matches!(result, Err(ResolveError::MediaUnresolved)));
}

/// Transient failures are retried within a step
#[tokio::test]
async fn test_transient_failure_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pgc/view/web/season"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_season_view(&mock_server, MEDIA, SEASON, &[340066]).await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let ids = resolver
        .resolve_text("https://www.bilibili.com/bangumi/play/ep340066")
        .await
        .unwrap();
    assert_eq!(ids.media_id, MEDIA);
}

/// Persistent transport failure aborts the cascade
#[tokio::test]
async fn test_transport_failure_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let result = resolver
        .resolve_text("https://www.bilibili.com/bangumi/play/ss33802")
        .await;

    assert!(matches!(
        result,
        Err(ResolveError::Fetch(FetchError::ServerError(500)))
    ));
}

/// Text without a bangumi link issues no request
#[tokio::test]
async fn test_no_identifiers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry());

    let result = resolver
        .resolve_text("https://www.bilibili.com/video/BV1xx411c7mD")
        .await;

    assert!(matches!(result, Err(ResolveError::NoIdentifiers)));
}

/// Cancelling interrupts a lookup that is still waiting on the API
#[tokio::test]
async fn test_cancel_interrupts_slow_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pgc/view/web/season"))
        .respond_with(
            json_response(envelope("result", json!({"media_id": MEDIA, "season_id": SEASON})))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let cancel = CancellationToken::new();
    let resolver = Resolver::new(&client, fast_api_config(&mock_server.uri()).retry())
        .with_cancel(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(2),
        resolver.resolve_text("https://www.bilibili.com/bangumi/play/ss33802"),
    )
    .await
    .expect("resolution should stop promptly after cancel");

    assert!(matches!(result, Err(ResolveError::Cancelled)));
}
