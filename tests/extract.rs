#[path = "common/mod.rs"]
mod common;

use common::image_child;
use redimg::{extract, Gildings};
use serde_json::json;

/// A matching child with every required field yields a fully populated
/// record; titles are title-cased on the way through.
#[test]
fn image_child_extracts_fully_populated_record() {
    let child = image_child("abc123", "t5_xyz", 10, 2);
    let record = extract(&child, 3, 1, "image").expect("child should qualify");

    assert_eq!(record.title, "A Cute Cat");
    assert_eq!(record.post_id, "abc123");
    assert_eq!(record.subreddit_id, "t5_xyz");
    assert_eq!(record.subreddit_name_prefixed, "r/pics");
    assert_eq!(record.subreddit_subscribers, 1234);
    assert_eq!(record.ups, 10);
    assert_eq!(record.num_comments, 2);
    assert_eq!(record.gildings, Gildings::default());
    assert_eq!(record.sort_code, 3);
    assert_eq!(record.time_code, 1);
    assert_eq!(record.domain, "i.redd.it");
    assert_eq!(record.url, "https://i.redd.it/abc123.jpg");
    assert_eq!(record.permalink, "/r/pics/comments/abc123/");
    assert_eq!(record.created_utc.unix_timestamp(), 1_700_000_000);
}

/// The same child declared as a video does not qualify for an image run.
#[test]
fn wrong_content_kind_is_rejected() {
    let mut child = image_child("abc123", "t5_xyz", 10, 2);
    child["data"]["post_hint"] = json!("video");
    assert!(extract(&child, 3, 1, "image").is_none());
}

/// Partial records never escape: dropping any required field rejects the
/// whole child.
#[test]
fn missing_required_field_rejects_child() {
    for missing in [
        "title",
        "id",
        "subreddit_id",
        "subreddit_name_prefixed",
        "subreddit_subscribers",
        "ups",
        "gildings",
        "num_comments",
        "domain",
        "url",
        "permalink",
        "created_utc",
    ] {
        let mut child = image_child("abc123", "t5_xyz", 10, 2);
        child["data"].as_object_mut().unwrap().remove(missing);
        assert!(
            extract(&child, 3, 1, "image").is_none(),
            "child without {missing} should be rejected"
        );
    }
}

/// The award map must be present, but any individual tier may be absent.
#[test]
fn gilding_tiers_default_to_absent() {
    let mut child = image_child("abc123", "t5_xyz", 10, 2);
    child["data"]["gildings"] = json!({ "gid_2": 1 });
    let record = extract(&child, 3, 1, "image").unwrap();
    assert_eq!(record.gildings.gid_1, None);
    assert_eq!(record.gildings.gid_2, Some(1));
    assert_eq!(record.gildings.gid_3, None);
}

/// Children with no declared content kind pass only when the wanted kind
/// is "text", the one legacy special case.
#[test]
fn missing_content_kind_passes_only_for_text_runs() {
    let mut child = image_child("abc123", "t5_xyz", 10, 2);
    child["data"].as_object_mut().unwrap().remove("post_hint");

    assert!(extract(&child, 3, 1, "image").is_none());
    assert!(extract(&child, 3, 1, "text").is_some());
}

#[test]
fn child_without_data_object_is_rejected() {
    assert!(extract(&json!({ "kind": "t3" }), 3, 1, "image").is_none());
}
