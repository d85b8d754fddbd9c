use crate::dto::job_dto::{CreateJobPayload, ReorderEntry, ReorderPayload, UpdateJobPayload};
use crate::error::Result;
use crate::models::job::{Job, JobFilters, JobSort, JobStatus};
use crate::models::pagination::PageMeta;
use crate::services::job_service::JobService;
use crate::state::{optimistic, LoadPhase};
use crate::utils::time::now_ms;

/// Cached slice of the jobs board plus its filter state. Mutating commands
/// update the slice immediately and roll back if the durable write fails.
pub struct JobStore {
    service: JobService,
    pub jobs: Vec<Job>,
    pub filters: JobFilters,
    pub pagination: Option<PageMeta>,
    pub phase: LoadPhase,
    pub error: Option<String>,
}

impl JobStore {
    pub fn new(service: JobService) -> Self {
        Self {
            service,
            jobs: Vec::new(),
            filters: JobFilters::default(),
            pagination: None,
            phase: LoadPhase::Idle,
            error: None,
        }
    }

    pub fn get_job_by_id(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub async fn fetch(&mut self) {
        self.phase = LoadPhase::Loading;
        self.error = None;
        match self.service.fetch_jobs(&self.filters).await {
            Ok(page) => {
                self.jobs = page.data;
                self.pagination = Some(page.meta);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.phase = LoadPhase::Idle;
    }

    // Filter setters re-fetch; everything except the page itself resets the
    // page back to 1.

    pub async fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_status(&mut self, status: Option<JobStatus>) {
        self.filters.status = status;
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_sort(&mut self, sort: JobSort) {
        self.filters.sort = sort;
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn toggle_tag(&mut self, tag: &str) {
        if let Some(index) = self.filters.tags.iter().position(|t| t == tag) {
            self.filters.tags.remove(index);
        } else {
            self.filters.tags.push(tag.to_string());
        }
        self.filters.page = 1;
        self.fetch().await;
    }

    pub async fn set_page(&mut self, page: u32) {
        self.filters.page = page.max(1);
        self.fetch().await;
    }

    pub async fn clear_filters(&mut self) {
        self.filters = JobFilters::default();
        self.fetch().await;
    }

    pub async fn create(&mut self, payload: &CreateJobPayload) -> Result<Job> {
        match self.service.create_job(payload).await {
            Ok(job) => {
                self.jobs.insert(0, job.clone());
                Ok(job)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn update(&mut self, id: &str, patch: &UpdateJobPayload) -> Result<Job> {
        match self.service.update_job(id, patch).await {
            Ok(job) => {
                if let Some(slot) = self.jobs.iter_mut().find(|j| j.id == id) {
                    *slot = job.clone();
                }
                Ok(job)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Toggle a job between active and archived.
    pub async fn archive(&mut self, job_id: &str) -> bool {
        let Some(index) = self.jobs.iter().position(|j| j.id == job_id) else {
            return false;
        };
        let new_status = if self.jobs[index].status == JobStatus::Active {
            JobStatus::Archived
        } else {
            JobStatus::Active
        };

        let service = self.service.clone();
        let id = job_id.to_string();
        let result = optimistic::run(
            &mut self.jobs,
            |jobs| {
                jobs[index].status = new_status;
                jobs[index].updated_at = now_ms();
            },
            async move { service.archive_job(&id, new_status).await },
        )
        .await;

        match result {
            Ok(job) => {
                if let Some(slot) = self.jobs.iter_mut().find(|j| j.id == job.id) {
                    *slot = job;
                }
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Move a job within the board. The new order values (index × 10) are
    /// computed here; the durable write may fail intermittently and the user
    /// decides whether to retry.
    pub async fn reorder(&mut self, from_index: usize, to_index: usize) -> bool {
        if from_index == to_index || from_index >= self.jobs.len() || to_index >= self.jobs.len() {
            return false;
        }

        let mut rearranged: Vec<String> = self.jobs.iter().map(|j| j.id.clone()).collect();
        let moved = rearranged.remove(from_index);
        rearranged.insert(to_index, moved);
        let payload = ReorderPayload {
            order: rearranged
                .iter()
                .enumerate()
                .map(|(index, id)| ReorderEntry {
                    id: id.clone(),
                    sort_order: (index as i64) * 10,
                })
                .collect(),
            from_index: Some(from_index),
            to_index: Some(to_index),
        };

        let service = self.service.clone();
        let result = optimistic::run(
            &mut self.jobs,
            |jobs| {
                let moved = jobs.remove(from_index);
                jobs.insert(to_index, moved);
                for (index, job) in jobs.iter_mut().enumerate() {
                    job.sort_order = (index as i64) * 10;
                }
            },
            async move { service.reorder_jobs(&payload).await },
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

    pub async fn bulk_archive(&mut self, job_ids: &[String]) -> bool {
        if job_ids.is_empty() {
            return false;
        }

        let service = self.service.clone();
        let ids = job_ids.to_vec();
        let result = optimistic::run(
            &mut self.jobs,
            |jobs| {
                for job in jobs.iter_mut() {
                    if ids.contains(&job.id) {
                        job.status = JobStatus::Archived;
                        job.updated_at = now_ms();
                    }
                }
            },
            {
                let ids = job_ids.to_vec();
                async move { service.bulk_archive(&ids, JobStatus::Archived).await }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::job_service::ReorderSimulation;
    use crate::test_utils::{job_payload, setup_test_db};

    async fn store_with_jobs(titles: &[&str], sim: ReorderSimulation) -> JobStore {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, sim);
        let mut store = JobStore::new(service);
        for title in titles {
            store.create(&job_payload(title)).await.unwrap();
        }
        store.fetch().await;
        store
    }

    #[tokio::test]
    async fn reorder_applies_sparse_order_locally() {
        let mut store = store_with_jobs(&["A", "B", "C"], ReorderSimulation::off()).await;

        assert!(store.reorder(0, 2).await);
        let titles: Vec<&str> = store.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
        let orders: Vec<i64> = store.jobs.iter().map(|j| j.sort_order).collect();
        assert_eq!(orders, vec![0, 10, 20]);

        // The durable copy agrees after a refetch.
        store.fetch().await;
        let titles: Vec<&str> = store.jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C", "A"]);
    }

    #[tokio::test]
    async fn failed_reorder_rolls_back_to_the_snapshot() {
        let mut store = store_with_jobs(&["A", "B", "C"], ReorderSimulation::always_failing()).await;
        let before = store.jobs.clone();

        assert!(!store.reorder(0, 2).await);
        assert_eq!(store.jobs, before);
        assert!(store.error.is_some());
    }

    #[tokio::test]
    async fn archive_toggles_and_reconciles_with_the_durable_row() {
        let mut store = store_with_jobs(&["A"], ReorderSimulation::off()).await;
        let id = store.jobs[0].id.clone();

        assert!(store.archive(&id).await);
        assert_eq!(store.jobs[0].status, JobStatus::Archived);

        assert!(store.archive(&id).await);
        assert_eq!(store.jobs[0].status, JobStatus::Active);
    }

    #[tokio::test]
    async fn filter_changes_reset_the_page() {
        let mut store = store_with_jobs(&["A", "B", "C"], ReorderSimulation::off()).await;
        store.set_page(3).await;
        assert_eq!(store.filters.page, 3);

        store.set_search("a").await;
        assert_eq!(store.filters.page, 1);
    }
}
