//! Fuzzy correction of user-supplied sort/time tokens against an accepted
//! vocabulary, with a per-resolver cache so repeated misspellings resolve
//! in O(1) after the first scan.

use crate::vocab::{contains, VocabEntry};
use ahash::AHashMap;

/// Similarity cutoff above which the first matching candidate is accepted
/// without scanning the rest of the vocabulary.
const EARLY_ACCEPT_RATIO: f64 = 0.9;

/// Length-normalized longest-common-subsequence ratio in [0, 1].
/// Symmetric: `similarity_ratio(a, b) == similarity_ratio(b, a)`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Two-row LCS table; the vocabularies are tiny so this stays cheap.
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];
    (2.0 * lcs as f64) / ((a.len() + b.len()) as f64)
}

/// Corrects misspelled tokens against an ordered vocabulary.
///
/// Known tokens pass through untouched (no scan, no cache write). Unknown
/// tokens are matched by `similarity_ratio`: the first candidate above 0.9
/// wins immediately, otherwise the highest-scoring candidate seen wins
/// (ties broken by vocabulary order, first wins). Corrections are cached
/// for the resolver's lifetime.
#[derive(Debug, Default)]
pub struct SpellingResolver {
    cache: AHashMap<String, String>,
}

impl SpellingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached corrections (distinct misspellings seen so far).
    pub fn corrections_seen(&self) -> usize {
        self.cache.len()
    }

    pub fn resolve(&mut self, token: &str, vocabulary: &[VocabEntry]) -> String {
        if contains(vocabulary, token) {
            return token.to_string();
        }
        if let Some(hit) = self.cache.get(token) {
            return hit.clone();
        }

        let mut best = vocabulary[0].token;
        let mut best_ratio = 0.0;
        for entry in vocabulary {
            let ratio = similarity_ratio(token, entry.token);
            if ratio > EARLY_ACCEPT_RATIO {
                best = entry.token;
                break;
            }
            if ratio > best_ratio {
                best = entry.token;
                best_ratio = ratio;
            }
        }

        tracing::info!(given = token, corrected = best, "corrected parameter spelling");
        self.cache.insert(token.to_string(), best.to_string());
        best.to_string()
    }
}
