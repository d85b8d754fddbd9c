use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateNote {
    pub id: String,
    pub candidate_id: String,
    pub content: String,
    pub created_by: String,
    pub mentions: Vec<String>,
    pub created_at: i64,
}
