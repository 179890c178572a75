//! Accepted sort/time vocabularies and their stable storage codes.
//!
//! The vocabularies are explicit ordered slices so that fuzzy correction
//! ties break deterministically (first entry wins).

/// One accepted token with its stable small-integer storage code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VocabEntry {
    pub token: &'static str,
    pub code: i64,
}

/// Accepted sort tokens, in tie-break order.
pub const SORTS: &[VocabEntry] = &[
    VocabEntry { token: "controversial", code: 1 },
    VocabEntry { token: "hot", code: 2 },
    VocabEntry { token: "new", code: 3 },
    VocabEntry { token: "rising", code: 4 },
    VocabEntry { token: "top", code: 5 },
];

/// Accepted time-window tokens, in tie-break order.
pub const TIMES: &[VocabEntry] = &[
    VocabEntry { token: "hour", code: 1 },
    VocabEntry { token: "day", code: 2 },
    VocabEntry { token: "week", code: 3 },
    VocabEntry { token: "month", code: 4 },
    VocabEntry { token: "year", code: 5 },
    VocabEntry { token: "all", code: 6 },
];

/// Sorts whose listing accepts a `t=` time qualifier. Everything else
/// ignores time in the query (the nominal value is still recorded).
pub const TIME_QUALIFIED_SORTS: &[&str] = &["controversial", "top"];

pub fn contains(vocab: &[VocabEntry], token: &str) -> bool {
    vocab.iter().any(|e| e.token == token)
}

/// Storage code for a token, if it is in the vocabulary.
pub fn code_of(vocab: &[VocabEntry], token: &str) -> Option<i64> {
    vocab.iter().find(|e| e.token == token).map(|e| e.code)
}

pub fn is_time_qualified(sort: &str) -> bool {
    TIME_QUALIFIED_SORTS.contains(&sort)
}
