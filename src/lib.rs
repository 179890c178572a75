mod config;
mod vocab;
mod spelling;
mod query;
mod fetch;
mod extract;
mod enrich;
mod format;
mod progress;
mod store;
mod util;
mod pipeline;

pub use crate::config::IngestOptions;
pub use crate::pipeline::{IngestReport, RedditIngest};

// Expose the vocabularies and the query builder for callers composing
// their own targets.
pub use crate::query::{build as build_query, QueryTarget, DEFAULT_BASE_URL};
pub use crate::vocab::{code_of, is_time_qualified, VocabEntry, SORTS, TIMES, TIME_QUALIFIED_SORTS};

// Spelling correction (usable standalone).
pub use crate::spelling::{similarity_ratio, SpellingResolver};

// Fetch/enrichment seams, so binaries and tests can supply collaborators.
pub use crate::fetch::{classify_listing, FetchOutcome, HttpFetcher, PageFetcher, DEFAULT_USER_AGENT};
pub use crate::enrich::{Enrichment, GoogleReverseSearch, ReverseImageSearch};

// Extraction and row shaping.
pub use crate::extract::{extract, Gildings, ImageRecord};
pub use crate::format::{DedupFormatter, Field, TableKind, TableRow};

// Persistence boundary.
pub use crate::store::{SqliteStore, Store, DEFAULT_SCHEMA};

// Misc helpers used by the binary and tests.
pub use crate::util::{init_tracing_once, title_case};
