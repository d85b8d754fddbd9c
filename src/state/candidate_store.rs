use crate::dto::candidate_dto::ApplyPayload;
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateFilters, Stage};
use crate::models::pagination::PageMeta;
use crate::models::timeline::TimelineEntry;
use crate::services::candidate_service::CandidateService;
use crate::state::{optimistic, LoadPhase};

/// Cached slice of the pipeline board. Stage changes and archiving are
/// optimistic; a failed durable write restores the pre-mutation slice.
pub struct CandidateStore {
    service: CandidateService,
    pub candidates: Vec<Candidate>,
    pub filters: CandidateFilters,
    pub pagination: Option<PageMeta>,
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub selected: Option<Candidate>,
    pub timeline: Vec<TimelineEntry>,
}

impl CandidateStore {
    pub fn new(service: CandidateService) -> Self {
        Self {
            service,
            candidates: Vec::new(),
            filters: CandidateFilters::default(),
            pagination: None,
            phase: LoadPhase::Idle,
            error: None,
            selected: None,
            timeline: Vec::new(),
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub async fn fetch(&mut self) {
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self.service.fetch_candidates(&self.filters).await {
            Ok(page) => {
                self.candidates = page.data;
                self.pagination = Some(page.meta);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.phase = LoadPhase::Idle;
    }

    pub async fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_stage_filter(&mut self, stage: Option<Stage>) {
        self.filters.stage = stage;
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_job_filter(&mut self, job_id: Option<String>) {
        self.filters.job_id = job_id;
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_archived_filter(&mut self, archived: Option<bool>) {
        self.filters.archived = archived;
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.filters.page = page.max(1);
        self.fetch().await;
    }

    pub async fn reset_filters(&mut self) {
        self.filters = CandidateFilters::default();
        self.fetch().await;
    }

    pub async fn apply_to_job(
        &mut self,
        job_id: &str,
        payload: &ApplyPayload,
    ) -> Result<Candidate> {
        match self.service.apply_to_job(job_id, payload).await {
            Ok(candidate) => {
                self.candidates.push(candidate.clone());
                Ok(candidate)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn update_stage(&mut self, candidate_id: &str, new_stage: Stage) -> bool {
        let service = self.service.clone();
        let id = candidate_id.to_string();
        let result = optimistic::run(
            &mut self.candidates,
            |candidates| {
                for candidate in candidates.iter_mut() {
                    if candidate.id == id {
                        candidate.stage = new_stage;
                    }
                }
            },
            {
                let id = candidate_id.to_string();
                async move { service.update_stage(&id, new_stage).await }
            },
        )
        .await;

        match result {
            Ok(candidate) => {
                if let Some(slot) = self
                    .candidates
                    .iter_mut()
                    .find(|c| c.id == candidate.id)
                {
                    *slot = candidate;
                }
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Applies the whole batch optimistically; if any item fails the slice is
    /// restored wholesale and the partial failure is surfaced as retryable.
    pub async fn bulk_update_stage(&mut self, candidate_ids: &[String], new_stage: Stage) -> bool {
        let service = self.service.clone();
        let ids = candidate_ids.to_vec();
        let result = optimistic::run(
            &mut self.candidates,
            |candidates| {
                for candidate in candidates.iter_mut() {
                    if ids.contains(&candidate.id) {
                        candidate.stage = new_stage;
                    }
                }
            },
            {
                let ids = candidate_ids.to_vec();
                async move {
                    let outcome = service.bulk_update_stage(&ids, new_stage).await?;
                    if outcome.failed.is_empty() {
                        Ok(outcome)
                    } else {
                        Err(Error::Transient(format!(
                            "{} of {} stage updates failed",
                            outcome.failed.len(),
                            ids.len()
                        )))
                    }
                }
            },
        )
        .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Archived candidates drop out of the visible slice immediately.
    pub async fn archive(&mut self, candidate_ids: &[String]) -> bool {
        let service = self.service.clone();
        let ids = candidate_ids.to_vec();
        let result = optimistic::run(
            &mut self.candidates,
            |candidates| candidates.retain(|c| !ids.contains(&c.id)),
            {
                let ids = candidate_ids.to_vec();
                async move {
                    let outcome = service.archive_candidates(&ids).await?;
                    if outcome.failed.is_empty() {
                        Ok(outcome)
                    } else {
                        Err(Error::Transient(format!(
                            "{} of {} archives failed",
                            outcome.failed.len(),
                            ids.len()
                        )))
                    }
                }
            },
        )
        .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    pub async fn load_candidate(&mut self, id: &str) {
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self.service.get_by_id(id).await {
            Ok(candidate) => self.selected = candidate,
            Err(err) => self.error = Some(err.to_string()),
        }
        self.phase = LoadPhase::Idle;
    }

    pub async fn load_timeline(&mut self, candidate_id: &str) {
        match self.service.get_timeline(candidate_id).await {
            Ok(timeline) => self.timeline = timeline,
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    pub async fn add_note(&mut self, candidate_id: &str, content: &str) -> bool {
        match self.service.add_note(candidate_id, content, "system").await {
            Ok(_) => {
                self.load_timeline(candidate_id).await;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply_payload, candidate_service, create_job, setup_test_db};

    async fn seeded_store() -> (CandidateStore, String) {
        let pool = setup_test_db().await;
        let job = create_job(&pool, "Backend Engineer").await;
        let mut store = CandidateStore::new(candidate_service(&pool));
        store
            .apply_to_job(&job.id, &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap();
        store
            .apply_to_job(&job.id, &apply_payload("John Roe", "john@x.com"))
            .await
            .unwrap();
        store.fetch().await;
        (store, job.id)
    }

    #[tokio::test]
    async fn optimistic_stage_change_reconciles_on_success() {
        let (mut store, _) = seeded_store().await;
        let id = store.candidates[0].id.clone();

        assert!(store.update_stage(&id, Stage::Tech).await);
        let moved = store.candidates.iter().find(|c| c.id == id).unwrap();
        assert_eq!(moved.stage, Stage::Tech);
        assert!(store.error.is_none());
    }

    #[tokio::test]
    async fn failed_stage_change_restores_the_exact_snapshot() {
        let (mut store, _) = seeded_store().await;
        let snapshot = store.candidates.clone();

        assert!(!store.update_stage("missing", Stage::Tech).await);
        assert_eq!(store.candidates, snapshot);
        assert!(store.error.as_deref().unwrap_or("").contains("not found"));
    }

    #[tokio::test]
    async fn bulk_failure_rolls_back_the_whole_slice() {
        let (mut store, _) = seeded_store().await;
        let snapshot = store.candidates.clone();
        let mut ids: Vec<String> = store.candidates.iter().map(|c| c.id.clone()).collect();
        ids.push("missing".to_string());

        assert!(!store.bulk_update_stage(&ids, Stage::Screen).await);
        assert_eq!(store.candidates, snapshot);
        assert!(store.error.is_some());
    }

    #[tokio::test]
    async fn archive_removes_rows_from_the_slice() {
        let (mut store, _) = seeded_store().await;
        let id = store.candidates[0].id.clone();

        assert!(store.archive(&[id.clone()]).await);
        assert!(store.candidates.iter().all(|c| c.id != id));

        // The durable row is archived, not gone.
        store.set_archived_filter(Some(true)).await;
        assert!(store.candidates.iter().any(|c| c.id == id));
    }
}
