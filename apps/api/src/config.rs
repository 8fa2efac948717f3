use anyhow::{Context, Result};

use crate::matching::matcher::DEFAULT_MAX_RECOMMENDATIONS;
use crate::matching::scoring::ScorerKind;
use crate::matching::tokenizer::DEFAULT_MIN_TOKEN_LENGTH;

const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: String,
    pub template_path: String,
    pub port: u16,
    pub rust_log: String,
    pub max_recommendations: usize,
    pub min_token_length: usize,
    pub stopwords: Vec<String>,
    pub scorer: ScorerKind,
    /// When unset, replies are logged instead of posted.
    pub slack_api_token: Option<String>,
    pub slack_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            model_path: env_or("MODEL_PATH", "data/model.json"),
            template_path: env_or("TEMPLATE_PATH", "data/template.md"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            max_recommendations: env_or("MAX_RECOMMENDATIONS", &DEFAULT_MAX_RECOMMENDATIONS.to_string())
                .parse::<usize>()
                .context("MAX_RECOMMENDATIONS must be a non-negative integer")?,
            min_token_length: env_or("MIN_TOKEN_LENGTH", &DEFAULT_MIN_TOKEN_LENGTH.to_string())
                .parse::<usize>()
                .context("MIN_TOKEN_LENGTH must be a non-negative integer")?,
            stopwords: parse_list(&env_or("STOPWORDS", "")),
            scorer: env_or("SCORER", "overlap")
                .parse::<ScorerKind>()
                .map_err(anyhow::Error::msg)
                .context("SCORER is invalid")?,
            slack_api_token: std::env::var("SLACK_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            slack_api_url: env_or("SLACK_API_URL", DEFAULT_SLACK_API_URL),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_skips_blanks() {
        assert_eq!(parse_list(" the, and ,,a "), vec!["the", "and", "a"]);
        assert!(parse_list("").is_empty());
    }
}
