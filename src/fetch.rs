//! Listing fetch boundary: a trait seam over the blocking HTTP transport,
//! plus response classification into the pipeline's fetch outcomes.

use crate::query::QueryTarget;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "redimg/0.1 (image ingest bot)";

/// Outcome of one listing request.
///
/// `InvalidQuery` means the remote answered but the response did not carry
/// the expected listing fields; the orchestrator reacts by correcting the
/// sort/time tokens and retrying once. `NotFound` means the subreddit does
/// not exist. `Transport` is a connection-level failure: the item is
/// skipped for this call but the subreddit is not blacklisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(Vec<Value>),
    InvalidQuery,
    NotFound,
    Transport(String),
}

/// The content-API boundary. Implementations perform one blocking request
/// for the first listing page and classify the result.
pub trait PageFetcher {
    fn fetch(&self, target: &QueryTarget) -> FetchOutcome;
}

/// Classify a parsed listing body.
///
/// Presence of `data.children` decides success; the remote also reports
/// nonexistent subreddits inside the body (`error: 404`) rather than by
/// HTTP status alone.
pub fn classify_listing(mut body: Value) -> FetchOutcome {
    if body.get("error").and_then(Value::as_i64) == Some(404) {
        return FetchOutcome::NotFound;
    }
    match body.pointer_mut("/data/children").map(Value::take) {
        Some(Value::Array(children)) => FetchOutcome::Success(children),
        _ => FetchOutcome::InvalidQuery,
    }
}

/// `ureq`-backed fetcher with fixed timeouts and User-Agent.
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self { agent, user_agent: user_agent.into() }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, target: &QueryTarget) -> FetchOutcome {
        let response = self
            .agent
            .get(&target.url)
            .set("User-Agent", &self.user_agent)
            .call();

        match response {
            Ok(resp) => match resp.into_json::<Value>() {
                Ok(body) => classify_listing(body),
                Err(e) => {
                    tracing::warn!(url = %target.url, error = %e, "listing body was not JSON");
                    FetchOutcome::InvalidQuery
                }
            },
            Err(ureq::Error::Status(404, _)) => FetchOutcome::NotFound,
            Err(ureq::Error::Status(code, _)) => {
                tracing::warn!(url = %target.url, code, "listing request rejected");
                FetchOutcome::InvalidQuery
            }
            Err(ureq::Error::Transport(t)) => FetchOutcome::Transport(t.to_string()),
        }
    }
}
