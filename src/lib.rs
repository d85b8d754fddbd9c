pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod test_utils;
pub mod utils;

use crate::services::{
    assessment_service::AssessmentService,
    candidate_service::CandidateService,
    job_service::{JobService, ReorderSimulation},
    notification_service::NotificationService,
};
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub job_service: JobService,
    pub candidate_service: CandidateService,
    pub assessment_service: AssessmentService,
    pub notification_service: NotificationService,
}

impl AppState {
    /// Wire services from the global config. Everything shares one pool;
    /// services are plain values, constructed here and nowhere else.
    pub fn new(pool: SqlitePool) -> Self {
        let config = crate::config::get_config();

        let notification_service =
            NotificationService::new(pool.clone(), config.email_webhook_url.clone());
        let job_service = JobService::with_simulation(
            pool.clone(),
            ReorderSimulation {
                base_latency_ms: config.reorder_latency_ms,
                jitter_ms: config.reorder_jitter_ms,
                fail_rate: config.reorder_fail_rate,
            },
        );
        let candidate_service = CandidateService::new(pool.clone(), notification_service.clone());
        let assessment_service = AssessmentService::new(pool.clone(), notification_service.clone());

        Self {
            pool,
            job_service,
            candidate_service,
            assessment_service,
            notification_service,
        }
    }

    /// Explicit wiring for tests and embedders; no global config involved.
    pub fn with_services(
        pool: SqlitePool,
        job_service: JobService,
        candidate_service: CandidateService,
        assessment_service: AssessmentService,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            pool,
            job_service,
            candidate_service,
            assessment_service,
            notification_service,
        }
    }
}
