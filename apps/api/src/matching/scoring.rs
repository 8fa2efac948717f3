//! Scoring: pluggable, trait-based relevance of one entry to a query.
//!
//! Default: `OverlapScorer` (number of shared tokens).
//! Alternative: `IdfScorer` (shared tokens weighted by rarity within the partition).
//!
//! The matcher holds an `Arc<dyn Scorer>`, chosen at startup via config.

use std::str::FromStr;
use std::sync::Arc;

use crate::matching::model::{Partition, TargetEntry};
use crate::matching::tokenizer::TokenSet;

/// Implement this to change the ranking formula without touching the matcher.
///
/// A score of `0.0` (or below) means "not relevant"; such entries are never
/// recommended. Implementations must return `0.0` whenever the query and the
/// entry share no token.
pub trait Scorer: Send + Sync {
    fn score(&self, query: &TokenSet, entry: &TargetEntry, partition: &Partition) -> f64;

    /// Short backend name, for logs and API transparency.
    fn name(&self) -> &'static str;
}

/// Raw intersection size `|query ∩ keywords|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapScorer;

impl Scorer for OverlapScorer {
    fn score(&self, query: &TokenSet, entry: &TargetEntry, _partition: &Partition) -> f64 {
        shared_tokens(query, entry).count() as f64
    }

    fn name(&self) -> &'static str {
        "overlap"
    }
}

/// Sum of `ln(1 + N / df)` over shared tokens, where `N` is the partition
/// size and `df` the number of entries carrying the token.
///
/// A keyword every entry carries still weighs `ln 2`, so any overlap keeps a
/// positive score.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdfScorer;

impl Scorer for IdfScorer {
    fn score(&self, query: &TokenSet, entry: &TargetEntry, partition: &Partition) -> f64 {
        let total = partition.len().max(1) as f64;
        shared_tokens(query, entry)
            .map(|token| {
                let df = partition.document_frequency(token).max(1) as f64;
                (total / df).ln_1p()
            })
            .sum()
    }

    fn name(&self) -> &'static str {
        "idf"
    }
}

fn shared_tokens<'a>(
    query: &'a TokenSet,
    entry: &'a TargetEntry,
) -> impl Iterator<Item = &'a String> + 'a {
    // Iterate the smaller set and probe the larger one.
    let (small, large) = if query.len() <= entry.keywords.len() {
        (query, &entry.keywords)
    } else {
        (&entry.keywords, query)
    };
    small.iter().filter(move |token| large.contains(*token))
}

/// Config-level name of a scorer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerKind {
    #[default]
    Overlap,
    Idf,
}

impl ScorerKind {
    pub fn build(self) -> Arc<dyn Scorer> {
        match self {
            ScorerKind::Overlap => Arc::new(OverlapScorer),
            ScorerKind::Idf => Arc::new(IdfScorer),
        }
    }
}

impl FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlap" => Ok(ScorerKind::Overlap),
            "idf" => Ok(ScorerKind::Idf),
            other => Err(format!("unknown scorer '{other}' (expected 'overlap' or 'idf')")),
        }
    }
}
