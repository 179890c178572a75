//! Best-effort reverse-image-search enrichment. Failures of any kind mean
//! "no information available"; the lookup never surfaces an error.

use crate::util::title_case;
use regex::Regex;
use std::time::Duration;

const SEARCH_BASE_URL: &str = "https://images.google.com/searchbyimage?image_url=";
const GUESS_SPLIT: &str = "style=\"font-style:italic\">";

// A browser-like User-Agent; the search frontend rejects obvious bots.
const SEARCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/61.0.3163.100 Safari/537.36";

/// Reverse-image-search result. Absent fields are an explicit, testable
/// state; the row formatter renders them as SQL NULL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub guess: Option<String>,
    pub permalink: Option<String>,
    pub first_result: Option<String>,
}

/// The enrichment boundary, queried once per distinct image post.
pub trait ReverseImageSearch {
    fn lookup(&mut self, image_url: &str) -> Enrichment;
}

/// Scrapes the reverse-image results page for a guess, the search
/// permalink, and the first organic result.
///
/// A 503 from the service means it has flagged us as a bot; the client
/// latches `blocked` and answers all later lookups locally with an empty
/// result instead of issuing further requests.
pub struct GoogleReverseSearch {
    agent: ureq::Agent,
    blocked: bool,
    guess_re: Regex,
    first_result_re: Regex,
}

impl GoogleReverseSearch {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout_read(timeout)
            .timeout_write(timeout)
            .build();
        Self {
            agent,
            blocked: false,
            guess_re: Regex::new(r#"<a class="fKDtNb" href="(.*?)</a>"#).unwrap(),
            first_result_re: Regex::new(r#"<div class="r"><a href="(.*?)""#).unwrap(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Pull the guess, search permalink, and first organic result out of a
    /// results page. Anything the page does not carry stays absent.
    pub fn parse_results_page(&self, page: &str) -> Enrichment {
        let mut result = Enrichment::default();

        if let Some(cap) = self.guess_re.captures(page) {
            // The capture holds "<permalink>" ... italic-marker ... "<guess>".
            let mut parts = cap[1].splitn(2, GUESS_SPLIT);
            result.permalink = parts
                .next()
                .map(|s| s.replace('"', "").trim().to_string())
                .filter(|s| !s.is_empty());
            result.guess = parts
                .next()
                .map(title_case)
                .filter(|s| !s.is_empty());
        }
        if let Some(cap) = self.first_result_re.captures(page) {
            result.first_result = Some(cap[1].to_string()).filter(|s| !s.is_empty());
        }

        result
    }
}

impl ReverseImageSearch for GoogleReverseSearch {
    fn lookup(&mut self, image_url: &str) -> Enrichment {
        if self.blocked {
            return Enrichment::default();
        }

        let url = format!("{SEARCH_BASE_URL}{image_url}");
        let response = self
            .agent
            .get(&url)
            .set("User-Agent", SEARCH_USER_AGENT)
            .set("Content-Type", "application/json")
            .call();

        match response {
            Ok(resp) => match resp.into_string() {
                Ok(page) => self.parse_results_page(&page),
                Err(e) => {
                    tracing::debug!(error = %e, "reverse image response unreadable");
                    Enrichment::default()
                }
            },
            Err(ureq::Error::Status(503, _)) => {
                tracing::warn!("reverse image search blocked us; disabling lookups for this run");
                self.blocked = true;
                Enrichment::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "reverse image lookup failed");
                Enrichment::default()
            }
        }
    }
}
