use crate::models::candidate::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TimelineKind {
    Application,
    StageChange,
    BulkStageChange,
    Archived,
    NoteAdded,
    EmailSent,
    Update,
}

/// One append-only audit row. Entries are never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: String,
    pub candidate_id: String,
    #[serde(rename = "type")]
    pub kind: TimelineKind,
    pub description: String,
    pub from_stage: Option<Stage>,
    pub to_stage: Option<Stage>,
    pub timestamp: i64,
}
