use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline position. Tie-break ordering for candidate listings is the
/// lexical order of the wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Stage {
    Applied,
    Screen,
    Tech,
    Offer,
    Hired,
    Rejected,
}

pub const ALL_STAGES: [Stage; 6] = [
    Stage::Applied,
    Stage::Screen,
    Stage::Tech,
    Stage::Offer,
    Stage::Hired,
    Stage::Rejected,
];

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Applied => "applied",
            Stage::Screen => "screen",
            Stage::Tech => "tech",
            Stage::Offer => "offer",
            Stage::Hired => "hired",
            Stage::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub stage: Stage,
    pub applied_at: i64,
    pub skills: Vec<String>,
    pub is_archived: bool,
    pub source: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateFilters {
    pub search: String,
    /// `None` means all stages.
    pub stage: Option<Stage>,
    pub job_id: Option<String>,
    pub archived: Option<bool>,
    /// ANY-of match, case-insensitive substring.
    pub skills: Vec<String>,
    pub min_applied_at: Option<i64>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for CandidateFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            stage: None,
            job_id: None,
            archived: None,
            skills: Vec::new(),
            min_applied_at: None,
            page: 1,
            page_size: 20,
        }
    }
}
