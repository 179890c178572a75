//! Child classification and field extraction. Children that do not match
//! the wanted content kind, or that miss any required field, are dropped
//! silently: a non-qualifying child is not an error.

use crate::util::title_case;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;

/// Tiered award counts. The award map may omit any tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Gildings {
    pub gid_1: Option<i64>,
    pub gid_2: Option<i64>,
    pub gid_3: Option<i64>,
}

/// Optional-field view of one child's `data` object for all-or-nothing
/// extraction. Extra fields are ignored by serde.
#[derive(Debug, Deserialize)]
struct ChildData {
    post_hint: Option<String>,
    title: Option<String>,
    id: Option<String>,
    subreddit_id: Option<String>,
    subreddit_name_prefixed: Option<String>,
    subreddit_subscribers: Option<i64>,
    ups: Option<i64>,
    gildings: Option<Gildings>,
    num_comments: Option<i64>,
    domain: Option<String>,
    url: Option<String>,
    permalink: Option<String>,
    created_utc: Option<f64>,
}

/// A fully populated image post. Every field was present in the source
/// child; only the gilding tiers inside [`Gildings`] may be absent.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRecord {
    pub title: String,
    pub post_id: String,
    pub subreddit_id: String,
    pub subreddit_name_prefixed: String,
    pub subreddit_subscribers: i64,
    pub ups: i64,
    pub gildings: Gildings,
    pub num_comments: i64,
    pub sort_code: i64,
    pub time_code: i64,
    pub domain: String,
    pub url: String,
    pub permalink: String,
    pub created_utc: OffsetDateTime,
}

/// Extract an [`ImageRecord`] from one raw listing child.
///
/// The child's declared content kind (`post_hint`) must equal
/// `wanted_kind`. Children lacking `post_hint` entirely pass only when the
/// wanted kind is "text", a legacy allowance kept as the single special
/// case; it is never hit by the default image pipeline.
pub fn extract(
    child: &Value,
    sort_code: i64,
    time_code: i64,
    wanted_kind: &str,
) -> Option<ImageRecord> {
    let data = child.get("data")?;
    let fields: ChildData = serde_json::from_value(data.clone()).ok()?;

    match fields.post_hint.as_deref() {
        Some(hint) if hint == wanted_kind => {}
        Some(_) => return None,
        None if wanted_kind == "text" => {}
        None => return None,
    }

    let (
        Some(title),
        Some(id),
        Some(subreddit_id),
        Some(subreddit_name_prefixed),
        Some(subreddit_subscribers),
        Some(ups),
        Some(gildings),
        Some(num_comments),
        Some(domain),
        Some(url),
        Some(permalink),
        Some(created_utc),
    ) = (
        fields.title,
        fields.id,
        fields.subreddit_id,
        fields.subreddit_name_prefixed,
        fields.subreddit_subscribers,
        fields.ups,
        fields.gildings,
        fields.num_comments,
        fields.domain,
        fields.url,
        fields.permalink,
        fields.created_utc,
    )
    else {
        tracing::debug!(kind = wanted_kind, "child missing required fields, skipped");
        return None;
    };

    let created_utc = OffsetDateTime::from_unix_timestamp(created_utc as i64).ok()?;

    Some(ImageRecord {
        title: title_case(&title),
        post_id: id,
        subreddit_id,
        subreddit_name_prefixed,
        subreddit_subscribers,
        ups,
        gildings,
        num_comments,
        sort_code,
        time_code,
        domain,
        url,
        permalink,
        created_utc,
    })
}
