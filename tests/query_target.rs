use redimg::{build_query, DEFAULT_BASE_URL};

/// Plain sorts ignore the time window in the URL, but the nominal value is
/// still carried on the target for downstream bookkeeping.
#[test]
fn plain_sort_omits_time_parameter() {
    let target = build_query(DEFAULT_BASE_URL, "pics", "hot", "year");
    assert_eq!(target.url, "https://www.reddit.com/r/pics/hot/.json");
    assert_eq!(target.sort, "hot");
    assert_eq!(target.time, "year");
}

/// Time-qualified sorts (controversial, top) carry both parameters.
#[test]
fn time_qualified_sort_includes_time_parameter() {
    let target = build_query(DEFAULT_BASE_URL, "pics", "top", "year");
    assert_eq!(
        target.url,
        "https://www.reddit.com/r/pics/top/.json?sort=top&t=year"
    );

    let target = build_query(DEFAULT_BASE_URL, "memes", "controversial", "all");
    assert_eq!(
        target.url,
        "https://www.reddit.com/r/memes/controversial/.json?sort=controversial&t=all"
    );
}

#[test]
fn trailing_slash_on_base_url_is_tolerated() {
    let target = build_query("http://localhost:8080/", "pics", "new", "hour");
    assert_eq!(target.url, "http://localhost:8080/r/pics/new/.json");
}
