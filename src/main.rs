use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use redimg::{init_tracing_once, RedditIngest, SqliteStore, Store, DEFAULT_SCHEMA};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "redimg",
    version,
    about = "Ingest image posts from subreddits into a relational store"
)]
struct Cli {
    /// Subreddit names to ingest (with or without the r/ prefix).
    #[arg(required = true)]
    subreddits: Vec<String>,

    /// Sort modes; misspellings are corrected automatically.
    #[arg(long = "sort", default_value = "new")]
    sorts: Vec<String>,

    /// Time windows (only used by controversial/top).
    #[arg(long = "time", default_value = "hour")]
    times: Vec<String>,

    /// Content kind to keep.
    #[arg(long, default_value = "image")]
    kind: String,

    /// Database file path.
    #[arg(long, default_value = "redimg.sqlite3")]
    database: PathBuf,

    /// Database kind.
    #[arg(long, value_enum, default_value_t = DbKind::Sqlite)]
    database_kind: DbKind,

    /// Create the schema before ingesting (idempotent).
    #[arg(long, default_value_t = false)]
    create_schema: bool,

    /// Schema DDL file; the embedded default is used when omitted.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// User-Agent header for listing requests.
    #[arg(long)]
    user_agent: Option<String>,

    /// Disable the progress bar.
    #[arg(long, default_value_t = false)]
    no_progress: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum DbKind {
    Sqlite,
}

fn main() {
    init_tracing_once();

    if let Err(err) = run() {
        tracing::error!(error = %err, "ingest failed");
        for cause in err.chain().skip(1) {
            tracing::error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut store = match cli.database_kind {
        DbKind::Sqlite => SqliteStore::open(&cli.database)?,
    };

    if cli.create_schema {
        let ddl = match &cli.schema {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("failed to read schema file {}", path.display()))?,
            None => DEFAULT_SCHEMA.to_string(),
        };
        store.create_schema(&ddl)?;
    }

    let mut ingest = RedditIngest::new()
        .subreddits(&cli.subreddits)
        .sorts(&cli.sorts)
        .times(&cli.times)
        .wanted_kind(&cli.kind)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .progress(!cli.no_progress);
    if let Some(ua) = &cli.user_agent {
        ingest = ingest.user_agent(ua.clone());
    }

    let report = ingest.run(&mut store)?;

    if !report.blacklisted.is_empty() {
        tracing::warn!(subreddits = ?report.blacklisted, "subreddits skipped as not found");
    }
    tracing::info!(
        records = report.records,
        rows = report.rows,
        skipped = report.skipped,
        "ingest complete"
    );

    if report.records == 0 && !report.blacklisted.is_empty() && report.blacklisted.len() == cli.subreddits.len() {
        bail!("no subreddit could be ingested");
    }
    Ok(())
}
