//! Listing query construction. Pure: no side effects, no I/O.

use crate::vocab::is_time_qualified;

pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// A fully built listing request target. `sort`/`time` are kept alongside
/// the URL so downstream records can carry the tokens the request used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTarget {
    pub url: String,
    pub subreddit: String,
    pub sort: String,
    pub time: String,
}

/// Build the listing target for one subreddit. Time-qualified sorts
/// (`controversial`, `top`) get the `t=` parameter; all other sorts omit
/// it, though the nominal `time` value is still threaded through for
/// bookkeeping.
pub fn build(base_url: &str, subreddit: &str, sort: &str, time: &str) -> QueryTarget {
    let base = base_url.trim_end_matches('/');
    let url = if is_time_qualified(sort) {
        format!("{base}/r/{subreddit}/{sort}/.json?sort={sort}&t={time}")
    } else {
        format!("{base}/r/{subreddit}/{sort}/.json")
    };
    QueryTarget {
        url,
        subreddit: subreddit.to_string(),
        sort: sort.to_string(),
        time: time.to_string(),
    }
}
