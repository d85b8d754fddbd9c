use crate::models::candidate::Stage;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub stage: Option<Stage>,
    pub skills: Option<Vec<String>>,
    pub is_archived: Option<bool>,
}
