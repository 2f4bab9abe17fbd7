//! Snapshot round-trip tests

mod common;

use bangumi_score::config::StorageConfig;
use bangumi_score::review::{Comment, CommentAggregator, NoProgress, ReviewKind, ReviewPager};
use bangumi_score::storage::SnapshotStore;
use bangumi_score::utils::retry::RetryConfig;
use common::{comments, mock_client, review};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_in(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::new(&StorageConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    })
}

#[test]
fn test_round_trip_keeps_order_and_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let original = comments(json!([
        review(3, 10),
        review(1, 7),
        {"review_id": 2, "score": 8.5, "progress": "看到第5话", "likes": 12, "extra": null},
    ]));

    store.save(ReviewKind::Short, &original).unwrap();
    let loaded = store.load(ReviewKind::Short).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded[2].score(), Some(8.5));
}

#[test]
fn test_snapshot_is_a_plain_json_array() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .save(ReviewKind::Long, &comments(json!([review(1, 6)])))
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("long_comments.json")).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, json!([review(1, 6)]));
}

/// Saved objects are byte-for-byte what the list endpoint sent, key order included
#[tokio::test]
async fn test_snapshot_keeps_api_key_order() {
    const ITEM: &str =
        r#"{"score":10,"content":"good","author":{"uname":"u","mid":1},"review_id":7}"#;

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pgc/review/short/list"))
        .and(query_param("ps", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code":0,"message":"success","data":{"total":1}}"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pgc/review/short/list"))
        .and(query_param("cursor", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"code":0,"message":"success","data":{{"list":[{ITEM}],"next":5,"total":1}}}}"#
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pgc/review/short/list"))
        .and(query_param("cursor", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"code":0,"message":"success","data":{"list":null,"next":0,"total":1}}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = mock_client(&mock_server);
    let pager = ReviewPager::new(&client, ReviewKind::Short, 1, 20);
    let aggregator = CommentAggregator::new(RetryConfig::disabled(), 10, CancellationToken::new());
    let fetched = aggregator.drain(&pager, &mut NoProgress).await.unwrap();

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let saved = store.save(ReviewKind::Short, &fetched).unwrap();

    let raw = std::fs::read_to_string(saved).unwrap();
    assert_eq!(raw, format!("[{ITEM}]"));
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store
        .save(ReviewKind::Short, &comments(json!([review(1, 1), review(2, 2)])))
        .unwrap();
    store
        .save(ReviewKind::Short, &comments(json!([review(3, 3)])))
        .unwrap();

    let loaded = store.load(ReviewKind::Short).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].score(), Some(3.0));
}

proptest! {
    #[test]
    fn prop_round_trip(scores in prop::collection::vec(1u64..=10, 0..50)) {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let original: Vec<Comment> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| serde_json::from_value(review(i as u64, *s)).unwrap())
            .collect();

        store.save(ReviewKind::Short, &original).unwrap();
        let loaded = store.load(ReviewKind::Short).unwrap();

        prop_assert_eq!(loaded, original);
    }
}
