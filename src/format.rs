//! Record → row-set shaping with run-scoped deduplication.
//!
//! One formatter per pipeline run. It owns the two membership sets for its
//! whole lifetime; reusing a formatter across independent runs would leak
//! dedup state between them.

use crate::enrich::{Enrichment, ReverseImageSearch};
use crate::extract::ImageRecord;
use crate::util::{render_elapsed, sql_timestamp};
use ahash::AHashSet;
use time::OffsetDateTime;

/// One stored cell. Absent optional data is an explicit `Null`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Text(String),
    Int(i64),
    Null,
}

impl Field {
    pub fn opt_text(v: Option<String>) -> Self {
        v.map_or(Field::Null, Field::Text)
    }
    pub fn opt_int(v: Option<i64>) -> Self {
        v.map_or(Field::Null, Field::Int)
    }
}

/// Destination tables, in foreign-key order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    Subreddits,
    Images,
    ImageProcessing,
    ImageSuccess,
}

impl TableKind {
    pub fn name(self) -> &'static str {
        match self {
            TableKind::Subreddits => "subreddits",
            TableKind::Images => "images",
            TableKind::ImageProcessing => "image_processing",
            TableKind::ImageSuccess => "image_success",
        }
    }
}

/// One row destined for one table: an ordered field → value list.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub table: TableKind,
    pub fields: Vec<(&'static str, Field)>,
}

/// Turns a stream of [`ImageRecord`]s into a stream of row-sets.
///
/// Per record, in this order (stores enforcing foreign keys depend on it):
/// a `subreddits` row if the subreddit id is new, an `images` plus an
/// `image_processing` row if the post id is new (the latter carries the
/// enrichment lookup for the image URL), and always an `image_success`
/// observation snapshot.
pub struct DedupFormatter {
    seen_subreddits: AHashSet<String>,
    seen_posts: AHashSet<String>,
    enricher: Box<dyn ReverseImageSearch>,
}

impl DedupFormatter {
    pub fn new(enricher: Box<dyn ReverseImageSearch>) -> Self {
        Self {
            seen_subreddits: AHashSet::new(),
            seen_posts: AHashSet::new(),
            enricher,
        }
    }

    /// Shape the row-set for one record, updating dedup state.
    pub fn rows_for(&mut self, record: &ImageRecord) -> Vec<TableRow> {
        let mut rows = Vec::with_capacity(4);

        if self.seen_subreddits.insert(record.subreddit_id.clone()) {
            rows.push(subreddits_row(record));
        }
        if self.seen_posts.insert(record.post_id.clone()) {
            rows.push(images_row(record));
            let enrichment = self.enricher.lookup(&record.url);
            rows.push(image_processing_row(record, enrichment));
        }
        rows.push(image_success_row(record, OffsetDateTime::now_utc()));

        rows
    }

    /// Lazy single-pass adapter over a record stream.
    pub fn format<'a, I>(&'a mut self, records: I) -> impl Iterator<Item = Vec<TableRow>> + 'a
    where
        I: IntoIterator<Item = ImageRecord> + 'a,
    {
        records.into_iter().map(move |rec| self.rows_for(&rec))
    }
}

fn subreddits_row(r: &ImageRecord) -> TableRow {
    TableRow {
        table: TableKind::Subreddits,
        fields: vec![
            ("id", Field::Text(r.subreddit_id.clone())),
            ("subreddit_name_prefixed", Field::Text(r.subreddit_name_prefixed.clone())),
            ("subreddit_subscribers", Field::Int(r.subreddit_subscribers)),
        ],
    }
}

fn images_row(r: &ImageRecord) -> TableRow {
    TableRow {
        table: TableKind::Images,
        fields: vec![
            ("id", Field::Text(r.post_id.clone())),
            ("subreddit_id", Field::Text(r.subreddit_id.clone())),
            ("image_url", Field::Text(r.url.clone())),
            ("permalink", Field::Text(r.permalink.clone())),
            ("upload_time", Field::Text(sql_timestamp(r.created_utc))),
        ],
    }
}

fn image_processing_row(r: &ImageRecord, enrichment: Enrichment) -> TableRow {
    TableRow {
        table: TableKind::ImageProcessing,
        fields: vec![
            ("image_id", Field::Text(r.post_id.clone())),
            ("title", Field::Text(r.title.clone())),
            ("guess", Field::opt_text(enrichment.guess)),
            ("google_permalink", Field::opt_text(enrichment.permalink)),
            ("first_result", Field::opt_text(enrichment.first_result)),
        ],
    }
}

fn image_success_row(r: &ImageRecord, now: OffsetDateTime) -> TableRow {
    TableRow {
        table: TableKind::ImageSuccess,
        fields: vec![
            ("image_id", Field::Text(r.post_id.clone())),
            ("ups", Field::Int(r.ups)),
            ("num_comments", Field::Int(r.num_comments)),
            ("reddit_sort", Field::Int(r.sort_code)),
            ("reddit_time", Field::Int(r.time_code)),
            ("last_checked", Field::Text(sql_timestamp(now))),
            ("time_passed", Field::Text(render_elapsed(now - r.created_utc))),
            ("gid_1", Field::opt_int(r.gildings.gid_1)),
            ("gid_2", Field::opt_int(r.gildings.gid_2)),
            ("gid_3", Field::opt_int(r.gildings.gid_3)),
        ],
    }
}
