//! Axum route handlers for the Recommendations API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::model::TargetClass;
use crate::matching::store::ModelInfo;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Free text, or the fields of an introduction form, or both.
#[derive(Debug, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profession: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub industries: Vec<String>,
}

impl RecommendRequest {
    /// All supplied fields joined into one query text.
    /// `None` when the request carries no field at all.
    pub fn query_text(&self) -> Option<String> {
        let has_profile = !self.skills.is_empty()
            || self.profession.is_some()
            || self.experience.is_some()
            || !self.industries.is_empty();
        if self.text.is_none() && !has_profile {
            return None;
        }

        let parts: Vec<&str> = self
            .text
            .iter()
            .map(String::as_str)
            .chain(self.skills.iter().map(String::as_str))
            .chain(self.profession.as_deref())
            .chain(self.experience.as_deref())
            .chain(self.industries.iter().map(String::as_str))
            .collect();
        Some(parts.join(" "))
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub channels: Vec<String>,
    pub jobs: Vec<String>,
    pub model_revision: Uuid,
    pub scorer_backend: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ClassRecommendRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ScoredRecommendation {
    pub identifier: String,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct ClassRecommendResponse {
    pub class: TargetClass,
    pub recommendations: Vec<ScoredRecommendation>,
    pub model_revision: Uuid,
    pub scorer_backend: &'static str,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations
///
/// Channel and job labels for a message or an introduction profile.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let text = request.query_text().ok_or_else(|| {
        AppError::Validation("provide 'text' or at least one profile field".to_string())
    })?;

    let snapshot = state.models.current();
    Ok(Json(RecommendResponse {
        channels: state.matcher.recommend_channels(&snapshot.model, &text),
        jobs: state.matcher.recommend_jobs(&snapshot.model, &text),
        model_revision: snapshot.info.revision,
        scorer_backend: state.matcher.scorer_name(),
    }))
}

/// POST /api/v1/recommendations/:class
///
/// Scored recommendations for one class named in the path.
pub async fn handle_recommend_class(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Json(request): Json<ClassRecommendRequest>,
) -> Result<Json<ClassRecommendResponse>, AppError> {
    let class: TargetClass = class_name.parse()?;

    let snapshot = state.models.current();
    let recommendations = state
        .matcher
        .recommend_for_class(&snapshot.model, class, &request.text)
        .into_iter()
        .map(|r| ScoredRecommendation {
            identifier: r.entry.identifier.clone(),
            label: r.entry.label.clone(),
            score: r.score,
        })
        .collect();

    Ok(Json(ClassRecommendResponse {
        class,
        recommendations,
        model_revision: snapshot.info.revision,
        scorer_backend: state.matcher.scorer_name(),
    }))
}

/// POST /api/v1/model/reload
///
/// Rebuilds the model from its source file and swaps it in.
/// On failure the previous model keeps serving.
pub async fn handle_reload(State(state): State<AppState>) -> Result<Json<ModelInfo>, AppError> {
    let info = state.models.reload().await?;
    Ok(Json(info))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text_none_when_empty() {
        assert_eq!(RecommendRequest::default().query_text(), None);
    }

    #[test]
    fn test_query_text_keeps_empty_text() {
        let request = RecommendRequest {
            text: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(request.query_text().as_deref(), Some(""));
    }

    #[test]
    fn test_query_text_joins_profile_fields_with_spaces() {
        let request = RecommendRequest {
            skills: vec!["Python".to_string(), "SQL".to_string()],
            profession: Some("Nurse".to_string()),
            experience: Some("ICU".to_string()),
            industries: vec!["Healthcare".to_string()],
            ..Default::default()
        };
        assert_eq!(
            request.query_text().as_deref(),
            Some("Python SQL Nurse ICU Healthcare")
        );
    }
}
