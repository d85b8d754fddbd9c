use crate::models::question::Question;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum AssessmentStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentConfig {
    pub time_limit: u32,
    pub max_attempts: u32,
    pub allow_resume: bool,
    pub auto_grade: bool,
    pub pass_threshold: u32,
    pub instructions: Option<String>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            time_limit: 60,
            max_attempts: 1,
            allow_resume: true,
            auto_grade: true,
            pass_threshold: 70,
            instructions: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub job_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: AssessmentStatus,
    /// Incremented on every update.
    pub version: i64,
    pub config: AssessmentConfig,
    #[serde(default)]
    pub sections: Vec<AssessmentSection>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSection {
    pub id: String,
    pub assessment_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Dense, renumbered 0..n-1 on deletion.
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub config: JsonValue,
    #[serde(default)]
    pub questions: Vec<Question>,
}
