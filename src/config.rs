use crate::fetch::DEFAULT_USER_AGENT;
use crate::query::DEFAULT_BASE_URL;
use std::time::Duration;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct IngestOptions {
    pub subreddits: Vec<String>,      // normalized, no "r/"
    pub sorts: Vec<String>,           // user tokens; misspellings tolerated
    pub times: Vec<String>,           // user tokens; misspellings tolerated
    pub wanted_kind: String,          // content kind to keep ("image")
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,            // per-request connect/read/write
    pub progress: bool,               // show progress bar
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            subreddits: Vec::new(),
            sorts: vec!["new".to_string()],
            times: vec!["hour".to_string()],
            wanted_kind: "image".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
            progress: true,
        }
    }
}

fn normalize_subreddit(s: &str) -> String {
    let s = s.trim();
    match s.strip_prefix("r/") {
        Some(rest) => rest.to_string(),
        None => s.to_string(),
    }
}

fn normalize_token(s: &str) -> String {
    s.trim().to_lowercase()
}

impl IngestOptions {
    pub fn with_subreddits<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.subreddits = subs
            .into_iter()
            .map(|s| normalize_subreddit(s.as_ref()))
            .filter(|s| !s.is_empty())
            .collect();
        self
    }
    pub fn with_sorts<I, S>(mut self, sorts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.sorts = sorts.into_iter().map(|s| normalize_token(s.as_ref())).collect();
        self
    }
    pub fn with_times<I, S>(mut self, times: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.times = times.into_iter().map(|s| normalize_token(s.as_ref())).collect();
        self
    }
    pub fn with_wanted_kind(mut self, kind: impl AsRef<str>) -> Self {
        self.wanted_kind = normalize_token(kind.as_ref());
        self
    }
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}
