//! Model: the static knowledge base of recommendable channels and jobs.
//!
//! A `Model` is built once from a `ModelSource` and never mutated. Keywords
//! are normalized with the same `Tokenizer` used for queries so that a
//! keyword and a query token compare equal iff they would tokenize equally.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::matching::tokenizer::{TokenSet, Tokenizer};
use crate::matching::MatchError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model source {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("model source is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {class} identifier '{identifier}'")]
    DuplicateIdentifier {
        class: TargetClass,
        identifier: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Target classes
// ────────────────────────────────────────────────────────────────────────────

/// The partition a target belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetClass {
    Channel,
    Job,
}

impl TargetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetClass::Channel => "channel",
            TargetClass::Job => "job",
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetClass {
    type Err = MatchError;

    /// Accepts singular and plural names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "channel" | "channels" => Ok(TargetClass::Channel),
            "job" | "jobs" => Ok(TargetClass::Job),
            _ => Err(MatchError::InvalidTargetClass(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entries and partitions
// ────────────────────────────────────────────────────────────────────────────

/// A single recommendable channel or job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetEntry {
    pub identifier: String,
    /// Ready-to-display text, e.g. "#general" or "Warehouse Lead - Acme Co".
    pub label: String,
    pub keywords: TokenSet,
}

impl TargetEntry {
    /// Builds an entry, normalizing each raw keyword through `tokenizer`.
    ///
    /// A keyword that splits into several tokens contributes all of them.
    pub fn new<I, S>(
        identifier: impl Into<String>,
        label: impl Into<String>,
        raw_keywords: I,
        tokenizer: &Tokenizer,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifier = identifier.into();
        let mut keywords = TokenSet::new();
        for raw in raw_keywords {
            let tokens = tokenizer.tokenize(raw.as_ref());
            if tokens.is_empty() {
                warn!(
                    identifier = %identifier,
                    keyword = raw.as_ref(),
                    "Dropping keyword that normalizes to nothing"
                );
            }
            keywords.extend(tokens);
        }
        Self {
            identifier,
            label: label.into(),
            keywords,
        }
    }
}

/// All entries of one class plus per-keyword document frequencies.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    entries: Vec<TargetEntry>,
    document_frequency: HashMap<String, usize>,
}

impl Partition {
    fn build(class: TargetClass, entries: Vec<TargetEntry>) -> Result<Self, ModelError> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for entry in &entries {
            if !seen.insert(entry.identifier.as_str()) {
                return Err(ModelError::DuplicateIdentifier {
                    class,
                    identifier: entry.identifier.clone(),
                });
            }
            if entry.keywords.is_empty() {
                warn!(
                    %class,
                    identifier = %entry.identifier,
                    "Entry has no keywords and can never be recommended"
                );
            }
            for keyword in &entry.keywords {
                *document_frequency.entry(keyword.clone()).or_default() += 1;
            }
        }

        Ok(Self {
            entries,
            document_frequency,
        })
    }

    pub fn entries(&self) -> &[TargetEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in this partition carrying `keyword`.
    pub fn document_frequency(&self, keyword: &str) -> usize {
        self.document_frequency.get(keyword).copied().unwrap_or(0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

/// Immutable knowledge base. Share it as `Arc<Model>`.
#[derive(Debug, Clone, Default)]
pub struct Model {
    channels: Partition,
    jobs: Partition,
}

impl Model {
    /// Builds a model from already-constructed entries.
    /// Fails if an identifier repeats within a class.
    pub fn new(channels: Vec<TargetEntry>, jobs: Vec<TargetEntry>) -> Result<Self, ModelError> {
        Ok(Self {
            channels: Partition::build(TargetClass::Channel, channels)?,
            jobs: Partition::build(TargetClass::Job, jobs)?,
        })
    }

    pub fn from_source(source: ModelSource, tokenizer: &Tokenizer) -> Result<Self, ModelError> {
        let build = |entries: Vec<EntrySource>| -> Vec<TargetEntry> {
            entries
                .into_iter()
                .map(|e| TargetEntry::new(e.id, e.label, e.keywords, tokenizer))
                .collect()
        };
        Self::new(build(source.channels), build(source.jobs))
    }

    pub fn from_json(json: &str, tokenizer: &Tokenizer) -> Result<Self, ModelError> {
        let source: ModelSource = serde_json::from_str(json)?;
        Self::from_source(source, tokenizer)
    }

    pub fn partition(&self, class: TargetClass) -> &Partition {
        match class {
            TargetClass::Channel => &self.channels,
            TargetClass::Job => &self.jobs,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Source format
// ────────────────────────────────────────────────────────────────────────────

/// On-disk shape of the model file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSource {
    #[serde(default)]
    pub channels: Vec<EntrySource>,
    #[serde(default)]
    pub jobs: Vec<EntrySource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySource {
    #[serde(alias = "identifier")]
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}
