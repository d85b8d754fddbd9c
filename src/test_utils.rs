//! Fixtures shared by unit and end-to-end tests.

use crate::dto::assessment_dto::QuestionPayload;
use crate::dto::candidate_dto::ApplyPayload;
use crate::dto::job_dto::CreateJobPayload;
use crate::models::job::{EmploymentType, Job};
use crate::models::question::QuestionType;
use crate::services::assessment_service::AssessmentService;
use crate::services::candidate_service::CandidateService;
use crate::services::job_service::{JobService, ReorderSimulation};
use crate::services::notification_service::NotificationService;
use sqlx::SqlitePool;

/// In-memory SQLite with all migrations applied. A single connection so
/// every query sees the same database.
pub async fn setup_test_db() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                use sqlx::Executor;
                conn.execute("PRAGMA foreign_keys = ON").await?;
                Ok(())
            })
        })
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// Services wired without a delivery webhook (emails are simulated).
pub fn candidate_service(pool: &SqlitePool) -> CandidateService {
    CandidateService::new(pool.clone(), NotificationService::new(pool.clone(), None))
}

pub fn assessment_service(pool: &SqlitePool) -> AssessmentService {
    AssessmentService::new(pool.clone(), NotificationService::new(pool.clone(), None))
}

pub fn job_payload(title: &str) -> CreateJobPayload {
    CreateJobPayload {
        title: title.to_string(),
        slug: None,
        department: "Engineering".to_string(),
        location: "Remote".to_string(),
        employment_type: EmploymentType::FullTime,
        salary: String::new(),
        description: String::new(),
        requirements: Vec::new(),
        tags: Vec::new(),
        status: None,
    }
}

pub fn apply_payload(name: &str, email: &str) -> ApplyPayload {
    ApplyPayload {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        skills: Vec::new(),
        source: None,
    }
}

pub fn question_payload(question_type: QuestionType) -> QuestionPayload {
    QuestionPayload {
        question_type,
        title: None,
        text: None,
        required: false,
        options: Vec::new(),
        score: None,
        min: None,
        max: None,
        max_length: None,
        accept: None,
        conditional: None,
    }
}

pub async fn create_job(pool: &SqlitePool, title: &str) -> Job {
    JobService::with_simulation(pool.clone(), ReorderSimulation::off())
        .create_job(&job_payload(title))
        .await
        .expect("create job fixture")
}
