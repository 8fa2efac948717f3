//! Reply composition: renders recommendations into the outbound message.

use std::path::Path;

use anyhow::{Context, Result};

/// Placeholder the template must contain.
pub const SUGGESTION_PLACEHOLDER: &str = "{suggestion}";

const CHANNEL_KIND_HINT: &str = "(#skill channels have people with similar skills in them; \
#discussion channels talk about a topic; #project channels are working on a project)";

/// Message template with a `{suggestion}` slot.
#[derive(Debug, Clone)]
pub struct ReplyTemplate {
    template: String,
}

impl ReplyTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let template = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read reply template {}", path.display()))?;
        if !template.contains(SUGGESTION_PLACEHOLDER) {
            tracing::warn!(
                "Reply template {} has no {SUGGESTION_PLACEHOLDER} slot; recommendations will not appear",
                path.display()
            );
        }
        Ok(Self::new(template))
    }

    /// Renders the full message. Empty sections are omitted.
    pub fn render(&self, channels: &[String], jobs: &[String]) -> String {
        self.template
            .replace(SUGGESTION_PLACEHOLDER, &compose_suggestion(channels, jobs))
    }
}

/// Builds the "Recommended channels" / "Recommended jobs" block.
pub fn compose_suggestion(channels: &[String], jobs: &[String]) -> String {
    let mut suggestion = String::new();
    if !channels.is_empty() {
        suggestion.push_str("\n*Recommended channels*\n");
        suggestion.push_str(&channels.join("\n"));
        suggestion.push('\n');
        suggestion.push_str(CHANNEL_KIND_HINT);
        suggestion.push('\n');
    }
    if !jobs.is_empty() {
        suggestion.push_str("\n*Recommended jobs*\n");
        suggestion.push_str(&jobs.join("\n"));
        suggestion.push('\n');
    }
    suggestion
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_both_sections_rendered_in_order() {
        let text = compose_suggestion(&labels(&["#data", "#infra"]), &labels(&["Analyst"]));
        let channels_at = text.find("*Recommended channels*").unwrap();
        let jobs_at = text.find("*Recommended jobs*").unwrap();
        assert!(channels_at < jobs_at);
        assert!(text.contains("#data\n#infra\n"));
        assert!(text.contains(CHANNEL_KIND_HINT));
        assert!(text.ends_with("Analyst\n"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let only_jobs = compose_suggestion(&[], &labels(&["Analyst"]));
        assert!(!only_jobs.contains("Recommended channels"));
        assert!(!only_jobs.contains(CHANNEL_KIND_HINT));

        let only_channels = compose_suggestion(&labels(&["#data"]), &[]);
        assert!(!only_channels.contains("Recommended jobs"));

        assert_eq!(compose_suggestion(&[], &[]), "");
    }

    #[test]
    fn test_template_substitutes_placeholder() {
        let template = ReplyTemplate::new("Hello!\n{suggestion}\nBye.");
        assert_eq!(template.render(&[], &[]), "Hello!\n\nBye.");
        assert!(template
            .render(&labels(&["#data"]), &[])
            .starts_with("Hello!\n\n*Recommended channels*\n#data\n"));
    }

    #[tokio::test]
    async fn test_load_missing_template_fails() {
        assert!(ReplyTemplate::load(Path::new("/nonexistent/template.md"))
            .await
            .is_err());
    }
}
