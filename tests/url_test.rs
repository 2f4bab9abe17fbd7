//! Tests for bangumi link matching

use bangumi_score::bilibili::{extract_id, match_kind, IdKind, IdentifierTriple};
use proptest::prelude::*;

#[test]
fn test_all_kinds_from_one_text() {
    let text = "ep: https://www.bilibili.com/bangumi/play/ep340066 \
                ss: https://www.bilibili.com/bangumi/play/ss33802 \
                md: https://www.bilibili.com/bangumi/media/md28229233";
    let ids = IdentifierTriple::from_text(text);

    assert_eq!(ids.episode_id, Some(340066));
    assert_eq!(ids.season_id, Some(33802));
    assert_eq!(ids.media_id, Some(28229233));
    assert!(ids.complete().is_some());
}

#[test]
fn test_mobile_and_plain_http_hosts() {
    assert_eq!(
        extract_id("https://m.bilibili.com/bangumi/play/ss33802", IdKind::Season),
        Some(33802)
    );
    assert_eq!(
        extract_id("http://www.bilibili.com/bangumi/play/ep1", IdKind::Episode),
        Some(1)
    );
    assert_eq!(
        extract_id("bilibili.com/bangumi/media/md9", IdKind::Media),
        Some(9)
    );
}

#[test]
fn test_other_sites_do_not_match() {
    assert!(match_kind("https://www.example.com/bangumi/play/ep1", IdKind::Episode).is_none());
    assert!(IdentifierTriple::from_text("no links here").is_empty());
}

#[test]
fn test_zero_id_is_absent() {
    assert_eq!(
        extract_id("https://www.bilibili.com/bangumi/play/ep0", IdKind::Episode),
        None
    );
}

proptest! {
    #[test]
    fn prop_canonical_url_round_trip(id in 1u64..=u64::MAX) {
        for kind in IdKind::ALL {
            let url = kind.canonical_url(id);
            prop_assert_eq!(extract_id(&url, kind), Some(id));
        }
    }

    #[test]
    fn prop_matcher_extracts_exact_digits(id in "[1-9][0-9]{0,15}", tail in "[?/#][a-z=&]{0,10}") {
        let text = format!("看 https://www.bilibili.com/bangumi/play/ep{id}{tail}");
        let found = match_kind(&text, IdKind::Episode).unwrap();
        prop_assert_eq!(found.id, id);
    }
}
