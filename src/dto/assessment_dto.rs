use crate::models::assessment::AssessmentConfig;
use crate::models::question::{ConditionalLogic, QuestionType};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentPayload {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: Option<String>,
    pub config: Option<AssessmentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssessmentPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub config: Option<AssessmentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub config: Option<serde_json::Value>,
}

/// Everything except the type is defaulted, matching how the builder adds a
/// blank question and fills it in afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPayload {
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    pub score: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub max_length: Option<i64>,
    pub accept: Option<String>,
    pub conditional: Option<ConditionalLogic>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionPayload {
    pub title: Option<String>,
    pub text: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub score: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub max_length: Option<i64>,
    pub accept: Option<String>,
    pub conditional: Option<ConditionalLogic>,
}
