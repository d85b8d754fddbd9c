use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Sent,
    Completed,
}

/// The token is the bearer credential for unauthenticated candidate access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInvite {
    pub id: String,
    pub token: String,
    pub candidate_id: String,
    pub assessment_id: String,
    pub candidate_email: String,
    pub status: InviteStatus,
    pub attempts: i64,
    pub sent_at: Option<i64>,
    pub expires_at: i64,
    pub completed_at: Option<i64>,
}
