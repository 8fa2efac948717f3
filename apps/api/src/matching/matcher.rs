#![allow(dead_code)]

//! Matcher: ranks the entries of one target class against free text.
//!
//! Algorithm:
//! 1. Tokenize the text; no tokens → no recommendations.
//! 2. Score every entry of the requested partition; drop entries scoring 0.
//! 3. Sort by score descending, ties by identifier ascending.
//! 4. Keep at most `max_recommendations`.
//!
//! Pure: the result depends only on `(model, class, text)` and the matcher's
//! settings. Safe to call from any number of threads at once.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::matching::model::{Model, TargetClass, TargetEntry};
use crate::matching::scoring::{OverlapScorer, Scorer};
use crate::matching::tokenizer::Tokenizer;
use crate::matching::MatchError;

/// Default cap on recommendations per class.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 5;

/// A scored entry, borrowed from the model it was computed against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation<'a> {
    pub entry: &'a TargetEntry,
    pub score: f64,
}

#[derive(Clone)]
pub struct Matcher {
    tokenizer: Tokenizer,
    max_recommendations: usize,
    scorer: Arc<dyn Scorer>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            scorer: Arc::new(OverlapScorer),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("tokenizer", &self.tokenizer)
            .field("max_recommendations", &self.max_recommendations)
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

impl Matcher {
    pub fn new(tokenizer: Tokenizer, max_recommendations: usize, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            tokenizer,
            max_recommendations,
            scorer,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }

    pub fn scorer_name(&self) -> &'static str {
        self.scorer.name()
    }

    /// Ranked recommendations of `class` for `text`.
    pub fn recommend_for_class<'m>(
        &self,
        model: &'m Model,
        class: TargetClass,
        text: &str,
    ) -> Vec<Recommendation<'m>> {
        let query = self.tokenizer.tokenize(text);
        if query.is_empty() {
            return Vec::new();
        }

        let partition = model.partition(class);
        let mut ranked: Vec<Recommendation<'m>> = partition
            .entries()
            .iter()
            .filter_map(|entry| {
                let score = self.scorer.score(&query, entry, partition);
                (score > 0.0).then_some(Recommendation { entry, score })
            })
            .collect();

        ranked.sort_by(rank_order);
        ranked.truncate(self.max_recommendations);
        ranked
    }

    /// Like `recommend_for_class`, with the class given by name.
    /// Unknown names are rejected before any scoring work.
    pub fn recommend_for_class_name<'m>(
        &self,
        model: &'m Model,
        class_name: &str,
        text: &str,
    ) -> Result<Vec<Recommendation<'m>>, MatchError> {
        let class: TargetClass = class_name.parse()?;
        Ok(self.recommend_for_class(model, class, text))
    }

    pub fn recommend_labels(&self, model: &Model, class: TargetClass, text: &str) -> Vec<String> {
        self.recommend_for_class(model, class, text)
            .into_iter()
            .map(|r| r.entry.label.clone())
            .collect()
    }

    pub fn recommend_channels(&self, model: &Model, text: &str) -> Vec<String> {
        self.recommend_labels(model, TargetClass::Channel, text)
    }

    pub fn recommend_jobs(&self, model: &Model, text: &str) -> Vec<String> {
        self.recommend_labels(model, TargetClass::Job, text)
    }
}

fn rank_order(a: &Recommendation<'_>, b: &Recommendation<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.entry.identifier.cmp(&b.entry.identifier))
}

/// Channel labels for `text`, using the default matcher settings.
pub fn recommend_channels(model: &Model, text: &str) -> Vec<String> {
    Matcher::default().recommend_channels(model, text)
}

/// Job labels for `text`, using the default matcher settings.
pub fn recommend_jobs(model: &Model, text: &str) -> Vec<String> {
    Matcher::default().recommend_jobs(model, text)
}
