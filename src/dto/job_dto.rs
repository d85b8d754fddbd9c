use crate::models::job::{EmploymentType, JobStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub slug: Option<String>,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: Option<JobStatus>,
}

/// Patch semantics: absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub employment_type: Option<EmploymentType>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderEntry {
    pub id: String,
    #[serde(rename = "order")]
    pub sort_order: i64,
}

/// The caller computes the order values; observed policy is index × 10,
/// leaving gaps for manual insertion without a full renumber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderPayload {
    pub order: Vec<ReorderEntry>,
    pub from_index: Option<usize>,
    pub to_index: Option<usize>,
}
