use crate::error::Result;
use crate::models::job::{Job, JobFilters, JobSort, JobStatus};
use crate::models::pagination::Page;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    /// Comma-separated list.
    pub tags: Option<String>,
    pub sort: Option<JobSort>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Page<Job>>> {
    let filters = JobFilters {
        search: query.search.unwrap_or_default(),
        status: query.status,
        tags: query
            .tags
            .map(|raw| {
                raw.split(',')
                    .map(|tag| tag.trim().to_string())
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        sort: query.sort.unwrap_or_default(),
        page: query.page.unwrap_or(1).max(1),
        page_size: query.page_size.unwrap_or(10),
    };

    let page = state.job_service.fetch_jobs(&filters).await?;
    Ok(Json(page))
}
