use crate::dto::job_dto::{CreateJobPayload, ReorderPayload, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{Job, JobFilters, JobSort, JobStatus};
use crate::models::pagination::{paginate, Page};
use rand::{thread_rng, Rng};
use sqlx::SqlitePool;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

/// Reorder latency/failure injection, emulating backend flakiness so callers
/// exercise their retry and rollback paths. Rate 0 disables it.
#[derive(Debug, Clone, Copy)]
pub struct ReorderSimulation {
    pub base_latency_ms: u64,
    pub jitter_ms: u64,
    pub fail_rate: f64,
}

impl Default for ReorderSimulation {
    fn default() -> Self {
        Self {
            base_latency_ms: 300,
            jitter_ms: 700,
            fail_rate: 0.05,
        }
    }
}

impl ReorderSimulation {
    pub fn off() -> Self {
        Self {
            base_latency_ms: 0,
            jitter_ms: 0,
            fail_rate: 0.0,
        }
    }

    pub fn always_failing() -> Self {
        Self {
            base_latency_ms: 0,
            jitter_ms: 0,
            fail_rate: 1.0,
        }
    }
}

#[derive(Clone)]
pub struct JobService {
    pool: SqlitePool,
    reorder_sim: ReorderSimulation,
}

impl JobService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_simulation(pool, ReorderSimulation::default())
    }

    pub fn with_simulation(pool: SqlitePool, reorder_sim: ReorderSimulation) -> Self {
        Self { pool, reorder_sim }
    }

    pub async fn fetch_jobs(&self, filters: &JobFilters) -> Result<Page<Job>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, slug, department, location, employment_type, salary,
                   description, requirements, tags, status, sort_order, created_at, updated_at,
                   (SELECT COUNT(*) FROM candidates c WHERE c.job_id = jobs.id) AS candidate_count
            FROM jobs
            WHERE (?1 IS NULL OR status = ?1)
            "#,
        )
        .bind(filters.status)
        .fetch_all(&self.pool)
        .await?;

        let mut jobs: Vec<Job> = rows.iter().map(row_to_job).collect();

        let needle = filters.search.trim().to_lowercase();
        if !needle.is_empty() {
            jobs.retain(|job| {
                job.title.to_lowercase().contains(&needle)
                    || job.description.to_lowercase().contains(&needle)
                    || job.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            });
        }

        // Tags combine with ALL-of semantics, unlike candidate skills.
        if !filters.tags.is_empty() {
            jobs.retain(|job| filters.tags.iter().all(|t| job.tags.contains(t)));
        }

        match filters.sort {
            JobSort::Order => jobs.sort_by_key(|j| j.sort_order),
            JobSort::Title => {
                jobs.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
            JobSort::CreatedAt => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            JobSort::UpdatedAt => jobs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        }

        Ok(paginate(jobs, filters.page, filters.page_size))
    }

    pub async fn get_job(&self, id: &str) -> Result<Option<Job>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, slug, department, location, employment_type, salary,
                   description, requirements, tags, status, sort_order, created_at, updated_at,
                   (SELECT COUNT(*) FROM candidates c WHERE c.job_id = jobs.id) AS candidate_count
            FROM jobs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_job))
    }

    async fn require(&self, id: &str) -> Result<Job> {
        self.get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Job {} not found", id)))
    }

    /// New jobs land at the bottom of the board: order = count × 10.
    pub async fn create_job(&self, payload: &CreateJobPayload) -> Result<Job> {
        payload.validate()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, title, slug, department, location, employment_type, salary,
                 description, requirements, tags, status, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&id)
        .bind(&payload.title)
        .bind(payload.slug.as_deref())
        .bind(&payload.department)
        .bind(&payload.location)
        .bind(payload.employment_type)
        .bind(&payload.salary)
        .bind(&payload.description)
        .bind(serde_json::to_string(&payload.requirements)?)
        .bind(serde_json::to_string(&payload.tags)?)
        .bind(payload.status.unwrap_or(JobStatus::Active))
        .bind(count * 10)
        .execute(&self.pool)
        .await?;

        tracing::info!(job_id = %id, title = %payload.title, "created job");
        self.require(&id).await
    }

    pub async fn update_job(&self, id: &str, patch: &UpdateJobPayload) -> Result<Job> {
        let requirements_json = patch
            .requirements
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let tags_json = patch.tags.as_ref().map(serde_json::to_string).transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = COALESCE(?1, title),
                slug = COALESCE(?2, slug),
                department = COALESCE(?3, department),
                location = COALESCE(?4, location),
                employment_type = COALESCE(?5, employment_type),
                salary = COALESCE(?6, salary),
                description = COALESCE(?7, description),
                requirements = COALESCE(?8, requirements),
                tags = COALESCE(?9, tags),
                status = COALESCE(?10, status)
            WHERE id = ?11
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.slug.as_deref())
        .bind(patch.department.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.employment_type)
        .bind(patch.salary.as_deref())
        .bind(patch.description.as_deref())
        .bind(requirements_json)
        .bind(tags_json)
        .bind(patch.status)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Job {} not found", id)));
        }
        self.require(id).await
    }

    pub async fn archive_job(&self, id: &str, status: JobStatus) -> Result<Job> {
        self.require(id).await?;

        sqlx::query("UPDATE jobs SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.require(id).await
    }

    pub async fn bulk_archive(&self, ids: &[String], status: JobStatus) -> Result<u64> {
        let mut updated = 0;
        for id in ids {
            let result = sqlx::query("UPDATE jobs SET status = ?1 WHERE id = ?2")
                .bind(status)
                .bind(id)
                .execute(&self.pool)
                .await?;
            updated += result.rows_affected();
        }
        Ok(updated)
    }

    /// Write the caller-computed order values in one bulk operation. The
    /// simulated network makes this fail intermittently; the error is
    /// retryable by the user, never retried silently here.
    pub async fn reorder_jobs(&self, payload: &ReorderPayload) -> Result<u64> {
        self.simulate_reorder_network().await?;

        let mut tx = self.pool.begin().await?;
        let mut updated = 0;
        for entry in &payload.order {
            let result = sqlx::query("UPDATE jobs SET sort_order = ?1 WHERE id = ?2")
                .bind(entry.sort_order)
                .bind(&entry.id)
                .execute(&mut *tx)
                .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;

        Ok(updated)
    }

    async fn simulate_reorder_network(&self) -> Result<()> {
        let sim = self.reorder_sim;

        if sim.base_latency_ms > 0 || sim.jitter_ms > 0 {
            let jitter = if sim.jitter_ms > 0 {
                thread_rng().gen_range(0..sim.jitter_ms)
            } else {
                0
            };
            tokio::time::sleep(Duration::from_millis(sim.base_latency_ms + jitter)).await;
        }

        if sim.fail_rate > 0.0 && thread_rng().gen::<f64>() < sim.fail_rate {
            return Err(Error::Transient(
                "Simulated database timeout during reorder".to_string(),
            ));
        }
        Ok(())
    }
}

fn row_to_job(row: &sqlx::sqlite::SqliteRow) -> Job {
    use sqlx::Row;
    let requirements: String = row.get("requirements");
    let tags: String = row.get("tags");
    Job {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        department: row.get("department"),
        location: row.get("location"),
        employment_type: row.get("employment_type"),
        salary: row.get("salary"),
        description: row.get("description"),
        requirements: serde_json::from_str(&requirements).unwrap_or_default(),
        tags: serde_json::from_str(&tags).unwrap_or_default(),
        status: row.get("status"),
        sort_order: row.get("sort_order"),
        candidate_count: row.get("candidate_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::job_dto::ReorderEntry;
    use crate::test_utils::{job_payload, setup_test_db};

    #[tokio::test]
    async fn create_assigns_strictly_increasing_sparse_order() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());

        let first = service.create_job(&job_payload("Backend Engineer")).await.unwrap();
        let second = service.create_job(&job_payload("Data Scientist")).await.unwrap();
        let third = service.create_job(&job_payload("SRE")).await.unwrap();

        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 10);
        assert_eq!(third.sort_order, 20);
        assert_eq!(first.status, JobStatus::Active);
        assert_eq!(first.candidate_count, 0);
    }

    #[tokio::test]
    async fn archive_round_trip_restores_status_and_touches_updated_at() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());
        let job = service.create_job(&job_payload("Backend Engineer")).await.unwrap();

        let archived = service.archive_job(&job.id, JobStatus::Archived).await.unwrap();
        assert_eq!(archived.status, JobStatus::Archived);
        assert!(archived.updated_at >= job.updated_at);

        let restored = service.archive_job(&job.id, JobStatus::Active).await.unwrap();
        assert_eq!(restored.status, job.status);
        assert!(restored.updated_at >= archived.updated_at);
    }

    #[tokio::test]
    async fn archive_missing_job_is_not_found() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());

        let err = service
            .archive_job("missing", JobStatus::Archived)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn reorder_writes_explicit_order_values() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());
        let a = service.create_job(&job_payload("A")).await.unwrap();
        let b = service.create_job(&job_payload("B")).await.unwrap();

        let updated = service
            .reorder_jobs(&ReorderPayload {
                order: vec![
                    ReorderEntry { id: b.id.clone(), sort_order: 0 },
                    ReorderEntry { id: a.id.clone(), sort_order: 10 },
                ],
                from_index: Some(1),
                to_index: Some(0),
            })
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let page = service.fetch_jobs(&JobFilters::default()).await.unwrap();
        let titles: Vec<&str> = page.data.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn injected_reorder_failure_is_transient_and_retryable() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::always_failing());
        let job = service.create_job(&job_payload("A")).await.unwrap();

        let err = service
            .reorder_jobs(&ReorderPayload {
                order: vec![ReorderEntry { id: job.id.clone(), sort_order: 10 }],
                from_index: None,
                to_index: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());

        // Nothing was written.
        let unchanged = service.get_job(&job.id).await.unwrap().unwrap();
        assert_eq!(unchanged.sort_order, 0);
    }

    #[tokio::test]
    async fn search_and_tag_filters_combine() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());

        let mut remote = job_payload("Backend Engineer");
        remote.tags = vec!["remote".to_string(), "rust".to_string()];
        service.create_job(&remote).await.unwrap();

        let mut onsite = job_payload("Backend Lead");
        onsite.tags = vec!["rust".to_string()];
        service.create_job(&onsite).await.unwrap();

        service.create_job(&job_payload("Designer")).await.unwrap();

        let filters = JobFilters {
            search: "backend".to_string(),
            tags: vec!["remote".to_string(), "rust".to_string()],
            ..Default::default()
        };
        let page = service.fetch_jobs(&filters).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].title, "Backend Engineer");
    }

    #[tokio::test]
    async fn pagination_partitions_the_filtered_set() {
        let pool = setup_test_db().await;
        let service = JobService::with_simulation(pool, ReorderSimulation::off());
        for i in 0..7 {
            service.create_job(&job_payload(&format!("Job {}", i))).await.unwrap();
        }

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let filters = JobFilters { page, page_size: 3, ..Default::default() };
            let chunk = service.fetch_jobs(&filters).await.unwrap();
            assert_eq!(chunk.meta.total, 7);
            seen.extend(chunk.data.into_iter().map(|j| j.id));
            if !chunk.meta.has_next {
                break;
            }
            page += 1;
        }

        assert_eq!(seen.len(), 7);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 7, "pages must be disjoint");
    }
}
