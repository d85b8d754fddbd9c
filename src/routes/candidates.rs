use crate::dto::candidate_dto::UpdateCandidatePayload;
use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateFilters, Stage};
use crate::models::pagination::Page;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListQuery {
    pub search: Option<String>,
    pub stage: Option<Stage>,
    pub job_id: Option<String>,
    pub archived: Option<bool>,
    /// Comma-separated list.
    pub skills: Option<String>,
    pub min_applied_at: Option<i64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn list_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateListQuery>,
) -> Result<Json<Page<Candidate>>> {
    let filters = CandidateFilters {
        search: query.search.unwrap_or_default(),
        stage: query.stage,
        job_id: query.job_id,
        archived: query.archived,
        skills: query
            .skills
            .map(|raw| {
                raw.split(',')
                    .map(|skill| skill.trim().to_string())
                    .filter(|skill| !skill.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        min_applied_at: query.min_applied_at,
        page: query.page.unwrap_or(1).max(1),
        page_size: query.page_size.unwrap_or(20),
    };

    let page = state.candidate_service.fetch_candidates(&filters).await?;
    Ok(Json(page))
}

/// A stage-only patch is a pipeline move and goes through the full
/// stage-change command (timeline entry + notification); anything else is a
/// plain field update.
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<UpdateCandidatePayload>,
) -> Result<Json<Candidate>> {
    let other_fields_untouched = patch.name.is_none()
        && patch.email.is_none()
        && patch.phone.is_none()
        && patch.skills.is_none()
        && patch.is_archived.is_none();

    let candidate = match patch.stage {
        Some(stage) if other_fields_untouched => {
            state.candidate_service.update_stage(&id, stage).await?
        }
        _ => state.candidate_service.update_candidate(&id, &patch).await?,
    };

    Ok(Json(candidate))
}
