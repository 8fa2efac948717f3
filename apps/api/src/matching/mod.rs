// Recommendation matching: tokenizer, model, scorers, matcher, model store
// and the HTTP handlers on top. Tokenizer, model, scoring and matcher are
// pure and free of I/O.

pub mod handlers;
pub mod matcher;
pub mod model;
pub mod scoring;
pub mod store;
pub mod tokenizer;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid target class '{0}' (expected 'channels' or 'jobs')")]
    InvalidTargetClass(String),
}
