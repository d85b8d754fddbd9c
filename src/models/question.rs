use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum QuestionType {
    ShortText,
    LongText,
    Numeric,
    SingleChoice,
    MultiChoice,
    FileUpload,
    Mcq,
    TrueFalse,
    ShortAnswer,
    LongAnswer,
}

impl QuestionType {
    /// Only choice-style questions carry a meaningful `options` list.
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice
                | QuestionType::MultiChoice
                | QuestionType::Mcq
                | QuestionType::TrueFalse
        )
    }
}

/// Show this question only when another question's answer matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalLogic {
    pub question_id: String,
    pub show_when: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub section_id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: String,
    pub text: String,
    pub required: bool,
    pub options: Vec<String>,
    pub score: i64,
    /// Dense, renumbered 0..n-1 on deletion and reorder.
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub max_length: Option<i64>,
    pub accept: Option<String>,
    pub conditional: Option<ConditionalLogic>,
}
