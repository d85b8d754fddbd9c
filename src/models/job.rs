use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Archived,
    Open,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Archived => "archived",
            JobStatus::Open => "open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub employment_type: EmploymentType,
    pub salary: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub tags: Vec<String>,
    pub status: JobStatus,
    /// Manual ranking, sparse by 10 so a job can be slotted in between two
    /// others without renumbering the whole board.
    #[serde(rename = "order")]
    pub sort_order: i64,
    pub candidate_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobSort {
    #[default]
    Order,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFilters {
    pub search: String,
    /// `None` means all statuses.
    pub status: Option<JobStatus>,
    /// ALL-of match.
    pub tags: Vec<String>,
    pub sort: JobSort,
    pub page: u32,
    pub page_size: u32,
}

impl Default for JobFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            tags: Vec::new(),
            sort: JobSort::Order,
            page: 1,
            page_size: 10,
        }
    }
}
