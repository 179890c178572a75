//! Ingestion orchestration: one listing query per (sort, time, subreddit)
//! combination, fully sequential, with a first-class retry/blacklist state
//! machine around each query.

use crate::config::IngestOptions;
use crate::enrich::{GoogleReverseSearch, ReverseImageSearch};
use crate::extract::extract;
use crate::fetch::{FetchOutcome, HttpFetcher, PageFetcher};
use crate::format::DedupFormatter;
use crate::progress::make_count_progress;
use crate::query;
use crate::spelling::SpellingResolver;
use crate::store::Store;
use crate::util::init_tracing_once;
use crate::vocab::{self, VocabEntry, SORTS, TIMES};
use ahash::AHashSet;
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::time::Duration;

/// Per-query protocol states. `Querying` with `attempt == 1` is the
/// post-correction retry; there is never a second correction.
enum QueryState {
    Querying { sort: String, time: String, attempt: u8 },
    Correcting { sort: String, time: String },
    Extracting { children: Vec<Value>, sort: String, time: String },
    Blacklisted,
    SkippedThisCall,
}

/// Terminal result of one query's state machine.
enum ListingOutcome {
    Children { children: Vec<Value>, sort: String, time: String },
    Blacklist,
    Skip,
}

/// Run summary returned by [`RedditIngest::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub records: u64,
    pub rows: u64,
    pub blacklisted: Vec<String>,
    pub skipped: u64,
}

/// Sequential image-post ingester.
///
/// Builder-style configuration, then `run` (real HTTP + reverse-image
/// collaborators) or `run_with` (any [`PageFetcher`]/[`ReverseImageSearch`],
/// used by tests).
#[derive(Clone, Debug, Default)]
pub struct RedditIngest {
    pub(crate) opts: IngestOptions,
}

impl RedditIngest {
    pub fn new() -> Self {
        Self { opts: IngestOptions::default() }
    }

    // -------- Builder methods --------
    pub fn subreddits<I, S>(mut self, subs: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> { self.opts = self.opts.with_subreddits(subs); self }
    pub fn sorts<I, S>(mut self, sorts: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> { self.opts = self.opts.with_sorts(sorts); self }
    pub fn times<I, S>(mut self, times: I) -> Self where I: IntoIterator<Item = S>, S: AsRef<str> { self.opts = self.opts.with_times(times); self }
    pub fn wanted_kind(mut self, kind: impl AsRef<str>) -> Self { self.opts = self.opts.with_wanted_kind(kind); self }
    pub fn base_url(mut self, url: impl Into<String>) -> Self { self.opts = self.opts.with_base_url(url); self }
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self { self.opts = self.opts.with_user_agent(ua); self }
    pub fn timeout(mut self, timeout: Duration) -> Self { self.opts = self.opts.with_timeout(timeout); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }

    /// Run against the real content API and reverse-image service.
    pub fn run(self, store: &mut dyn Store) -> Result<IngestReport> {
        let fetcher = HttpFetcher::new(self.opts.timeout, self.opts.user_agent.clone());
        let enricher = GoogleReverseSearch::new(self.opts.timeout);
        self.run_with(&fetcher, Box::new(enricher), store)
    }

    /// Run with caller-supplied collaborators at the two network seams.
    pub fn run_with(
        self,
        fetcher: &dyn PageFetcher,
        enricher: Box<dyn ReverseImageSearch>,
        store: &mut dyn Store,
    ) -> Result<IngestReport> {
        init_tracing_once();
        if self.opts.subreddits.is_empty() {
            return Err(anyhow!("at least one subreddit is required"));
        }

        let mut resolver = SpellingResolver::new();
        let mut formatter = DedupFormatter::new(enricher);
        let mut blacklist: AHashSet<String> = AHashSet::new();
        let mut report = IngestReport::default();

        let planned =
            (self.opts.sorts.len() * self.opts.times.len() * self.opts.subreddits.len()) as u64;
        let pb = if self.opts.progress {
            Some(make_count_progress(planned, "listings"))
        } else {
            None
        };

        for sort in &self.opts.sorts {
            for time in &self.opts.times {
                for subreddit in &self.opts.subreddits {
                    if let Some(pb) = &pb {
                        pb.inc(1);
                    }
                    if blacklist.contains(subreddit) {
                        continue;
                    }

                    match run_query(fetcher, &mut resolver, &self.opts.base_url, subreddit, sort, time) {
                        ListingOutcome::Children { children, sort, time } => {
                            let sort_code = resolve_code(&mut resolver, &sort, SORTS);
                            let time_code = resolve_code(&mut resolver, &time, TIMES);
                            tracing::info!(
                                subreddit = %subreddit, sort = %sort, time = %time,
                                children = children.len(), "listing fetched"
                            );
                            for child in &children {
                                let Some(record) =
                                    extract(child, sort_code, time_code, &self.opts.wanted_kind)
                                else {
                                    continue;
                                };
                                report.records += 1;
                                for row in formatter.rows_for(&record) {
                                    store.insert_row(&row)?;
                                    report.rows += 1;
                                }
                            }
                        }
                        ListingOutcome::Blacklist => {
                            tracing::warn!(subreddit = %subreddit, "subreddit not found; blacklisted for this run");
                            blacklist.insert(subreddit.clone());
                            report.blacklisted.push(subreddit.clone());
                        }
                        ListingOutcome::Skip => {
                            report.skipped += 1;
                        }
                    }
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_with_message("done");
        }
        Ok(report)
    }
}

/// Drive one query's state machine to a terminal outcome.
fn run_query(
    fetcher: &dyn PageFetcher,
    resolver: &mut SpellingResolver,
    base_url: &str,
    subreddit: &str,
    sort: &str,
    time: &str,
) -> ListingOutcome {
    let mut state = QueryState::Querying {
        sort: sort.to_string(),
        time: time.to_string(),
        attempt: 0,
    };

    loop {
        state = match state {
            QueryState::Querying { sort, time, attempt } => {
                let target = query::build(base_url, subreddit, &sort, &time);
                match fetcher.fetch(&target) {
                    FetchOutcome::Success(children) => {
                        QueryState::Extracting { children, sort, time }
                    }
                    FetchOutcome::InvalidQuery if attempt == 0 => {
                        QueryState::Correcting { sort, time }
                    }
                    FetchOutcome::InvalidQuery | FetchOutcome::NotFound => QueryState::Blacklisted,
                    FetchOutcome::Transport(reason) => {
                        tracing::warn!(
                            subreddit = %subreddit, sort = %sort, reason = %reason,
                            "transport failure; skipping this call"
                        );
                        QueryState::SkippedThisCall
                    }
                }
            }
            QueryState::Correcting { sort, time } => {
                let sort = resolver.resolve(&sort, SORTS);
                let time = resolver.resolve(&time, TIMES);
                QueryState::Querying { sort, time, attempt: 1 }
            }
            QueryState::Extracting { children, sort, time } => {
                return ListingOutcome::Children { children, sort, time };
            }
            QueryState::Blacklisted => return ListingOutcome::Blacklist,
            QueryState::SkippedThisCall => return ListingOutcome::Skip,
        };
    }
}

/// Storage code for the token the successful request used. Tokens the
/// remote tolerated despite not being in the vocabulary are resolved
/// through the spelling cache first.
fn resolve_code(resolver: &mut SpellingResolver, token: &str, vocabulary: &[VocabEntry]) -> i64 {
    if let Some(code) = vocab::code_of(vocabulary, token) {
        return code;
    }
    let corrected = resolver.resolve(token, vocabulary);
    vocab::code_of(vocabulary, &corrected).unwrap_or(vocabulary[0].code)
}
