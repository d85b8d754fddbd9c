use crate::dto::candidate_dto::{ApplyPayload, UpdateCandidatePayload};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateFilters, Stage};
use crate::models::note::CandidateNote;
use crate::models::outbox::EmailTemplate;
use crate::models::pagination::{paginate, Page};
use crate::models::timeline::{TimelineEntry, TimelineKind};
use crate::services::notification_service::NotificationService;
use crate::utils::time::now_ms;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

/// Per-item result of a bulk command. Failures are collected, never thrown,
/// so one bad row cannot abort the rest of the batch.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub updated: Vec<Candidate>,
    pub failed: Vec<BulkFailure>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub id: String,
    pub error: String,
}

#[derive(Clone)]
pub struct CandidateService {
    pool: SqlitePool,
    notifications: NotificationService,
}

impl CandidateService {
    pub fn new(pool: SqlitePool, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    pub async fn fetch_candidates(&self, filters: &CandidateFilters) -> Result<Page<Candidate>> {
        // Indexed predicates go to the store; set-valued filters (skills,
        // search) are evaluated over the result in memory.
        let rows = sqlx::query(
            r#"
            SELECT id, job_id, name, email, phone, stage, applied_at, skills,
                   is_archived, source, created_at, updated_at
            FROM candidates
            WHERE (?1 IS NULL OR job_id = ?1)
              AND (?2 IS NULL OR stage = ?2)
              AND (?3 IS NULL OR is_archived = ?3)
              AND (?4 IS NULL OR applied_at >= ?4)
            ORDER BY applied_at DESC, stage ASC
            "#,
        )
        .bind(filters.job_id.as_deref())
        .bind(filters.stage)
        .bind(filters.archived)
        .bind(filters.min_applied_at)
        .fetch_all(&self.pool)
        .await?;

        let mut candidates: Vec<Candidate> = rows.iter().map(row_to_candidate).collect();

        if !filters.skills.is_empty() {
            candidates.retain(|c| {
                filters.skills.iter().any(|wanted| {
                    let wanted = wanted.to_lowercase();
                    c.skills
                        .iter()
                        .any(|skill| skill.to_lowercase().contains(&wanted))
                })
            });
        }

        let needle = filters.search.trim().to_lowercase();
        if !needle.is_empty() {
            candidates.retain(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.skills.iter().any(|s| s.to_lowercase().contains(&needle))
            });
        }

        Ok(paginate(candidates, filters.page, filters.page_size))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Candidate>> {
        let row = sqlx::query(
            r#"
            SELECT id, job_id, name, email, phone, stage, applied_at, skills,
                   is_archived, source, created_at, updated_at
            FROM candidates
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_candidate))
    }

    async fn require(&self, id: &str) -> Result<Candidate> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", id)))
    }

    pub async fn get_candidates_by_job(&self, job_id: &str) -> Result<Vec<Candidate>> {
        let rows = sqlx::query(
            r#"
            SELECT id, job_id, name, email, phone, stage, applied_at, skills,
                   is_archived, source, created_at, updated_at
            FROM candidates
            WHERE job_id = ?1
            ORDER BY applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_candidate).collect())
    }

    /// Submit an application. The candidate starts in `applied` with an
    /// `application` timeline entry; the referenced job must exist or the
    /// store rejects the write.
    pub async fn apply_to_job(&self, job_id: &str, payload: &ApplyPayload) -> Result<Candidate> {
        payload.validate()?;
        if job_id.trim().is_empty() {
            return Err(Error::BadRequest("jobId is required".to_string()));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO candidates (id, job_id, name, email, phone, stage, applied_at, skills, source)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&id)
        .bind(job_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(payload.phone.as_deref())
        .bind(Stage::Applied)
        .bind(now_ms())
        .bind(serde_json::to_string(&payload.skills)?)
        .bind(payload.source.as_deref().unwrap_or("direct"))
        .execute(&self.pool)
        .await?;

        self.append_timeline(
            &id,
            TimelineKind::Application,
            "Application submitted",
            None,
            Some(Stage::Applied),
        )
        .await?;

        tracing::info!(candidate_id = %id, job_id, "candidate applied");
        self.require(&id).await
    }

    /// Stage change: read, write, append a timeline entry, then fire the
    /// notification. Email failure is logged and never fails the command.
    pub async fn update_stage(&self, id: &str, new_stage: Stage) -> Result<Candidate> {
        let before = self.require(id).await?;

        sqlx::query("UPDATE candidates SET stage = ?1 WHERE id = ?2")
            .bind(new_stage)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.append_timeline(
            id,
            TimelineKind::StageChange,
            &format!("Stage updated to {}", new_stage),
            Some(before.stage),
            Some(new_stage),
        )
        .await?;

        self.send_stage_change_email(id, new_stage).await;

        self.require(id).await
    }

    /// The same read/write/append triple per candidate, run concurrently and
    /// independently; the batch never aborts on a single failure.
    pub async fn bulk_update_stage(&self, ids: &[String], new_stage: Stage) -> Result<BulkOutcome> {
        // Matches the single-command path except for the timeline kind; bulk
        // emails are capped to avoid flooding the outbox.
        let notify = ids.len() <= 10;
        let tasks = ids.iter().map(|id| {
            let service = self.clone();
            let id = id.clone();
            async move {
                let result = service.bulk_stage_item(&id, new_stage, notify).await;
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(tasks).await {
            match result {
                Ok(candidate) => outcome.updated.push(candidate),
                Err(err) => {
                    tracing::warn!(candidate_id = %id, error = %err, "bulk stage update failed");
                    outcome.failed.push(BulkFailure {
                        id,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(outcome)
    }

    async fn bulk_stage_item(&self, id: &str, new_stage: Stage, notify: bool) -> Result<Candidate> {
        let before = self.require(id).await?;

        sqlx::query("UPDATE candidates SET stage = ?1 WHERE id = ?2")
            .bind(new_stage)
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.append_timeline(
            id,
            TimelineKind::BulkStageChange,
            &format!("Bulk moved to {}", new_stage),
            Some(before.stage),
            Some(new_stage),
        )
        .await?;

        if notify {
            self.send_stage_change_email(id, new_stage).await;
        }

        self.require(id).await
    }

    pub async fn archive_candidates(&self, ids: &[String]) -> Result<BulkOutcome> {
        let tasks = ids.iter().map(|id| {
            let service = self.clone();
            let id = id.clone();
            async move {
                let result = service.archive_item(&id).await;
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(tasks).await {
            match result {
                Ok(candidate) => outcome.updated.push(candidate),
                Err(err) => outcome.failed.push(BulkFailure {
                    id,
                    error: err.to_string(),
                }),
            }
        }
        Ok(outcome)
    }

    async fn archive_item(&self, id: &str) -> Result<Candidate> {
        let candidate = self.require(id).await?;

        sqlx::query("UPDATE candidates SET is_archived = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.append_timeline(
            id,
            TimelineKind::Archived,
            "Candidate archived",
            None,
            Some(candidate.stage),
        )
        .await?;

        self.require(id).await
    }

    pub async fn unarchive_candidates(&self, ids: &[String]) -> Result<BulkOutcome> {
        let tasks = ids.iter().map(|id| {
            let service = self.clone();
            let id = id.clone();
            async move {
                let result = async {
                    let candidate = service.require(&id).await?;
                    if candidate.is_archived {
                        sqlx::query("UPDATE candidates SET is_archived = 0 WHERE id = ?1")
                            .bind(&id)
                            .execute(&service.pool)
                            .await?;
                    }
                    service.require(&id).await
                }
                .await;
                (id, result)
            }
        });

        let mut outcome = BulkOutcome::default();
        for (id, result) in join_all(tasks).await {
            match result {
                Ok(candidate) => outcome.updated.push(candidate),
                Err(err) => outcome.failed.push(BulkFailure {
                    id,
                    error: err.to_string(),
                }),
            }
        }
        Ok(outcome)
    }

    pub async fn update_candidate(
        &self,
        id: &str,
        patch: &UpdateCandidatePayload,
    ) -> Result<Candidate> {
        let before = self.require(id).await?;

        let skills_json = patch
            .skills
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            UPDATE candidates
            SET name = COALESCE(?1, name),
                email = COALESCE(?2, email),
                phone = COALESCE(?3, phone),
                stage = COALESCE(?4, stage),
                skills = COALESCE(?5, skills),
                is_archived = COALESCE(?6, is_archived)
            WHERE id = ?7
            "#,
        )
        .bind(patch.name.as_deref())
        .bind(patch.email.as_deref())
        .bind(patch.phone.as_deref())
        .bind(patch.stage)
        .bind(skills_json)
        .bind(patch.is_archived)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if let Some(stage) = patch.stage {
            self.append_timeline(
                id,
                TimelineKind::Update,
                "Candidate details updated",
                Some(before.stage),
                Some(stage),
            )
            .await?;
        }

        self.require(id).await
    }

    pub async fn get_timeline(&self, candidate_id: &str) -> Result<Vec<TimelineEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT id, candidate_id, kind, description, from_stage, to_stage, timestamp
            FROM candidate_timeline
            WHERE candidate_id = ?1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_timeline).collect())
    }

    pub async fn get_notes(&self, candidate_id: &str) -> Result<Vec<CandidateNote>> {
        let rows = sqlx::query(
            r#"
            SELECT id, candidate_id, content, created_by, mentions, created_at
            FROM candidate_notes
            WHERE candidate_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_note).collect())
    }

    pub async fn add_note(
        &self,
        candidate_id: &str,
        content: &str,
        created_by: &str,
    ) -> Result<CandidateNote> {
        let candidate = self.require(candidate_id).await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO candidate_notes (id, candidate_id, content, created_by, mentions)
            VALUES (?1, ?2, ?3, ?4, '[]')
            "#,
        )
        .bind(&id)
        .bind(candidate_id)
        .bind(content)
        .bind(created_by)
        .execute(&self.pool)
        .await?;

        let preview: String = content.chars().take(50).collect();
        let suffix = if content.chars().count() > 50 { "..." } else { "" };
        self.append_timeline(
            candidate_id,
            TimelineKind::NoteAdded,
            &format!("Note added: {}{}", preview, suffix),
            None,
            Some(candidate.stage),
        )
        .await?;

        let row = sqlx::query(
            r#"
            SELECT id, candidate_id, content, created_by, mentions, created_at
            FROM candidate_notes WHERE id = ?1
            "#,
        )
        .bind(&id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row_to_note(&row))
    }

    pub async fn delete_note(&self, note_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM candidate_notes WHERE id = ?1")
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }

    /// Timeline entries and notes go first, then the candidate row.
    pub async fn delete_candidate(&self, id: &str) -> Result<()> {
        self.require(id).await?;

        sqlx::query("DELETE FROM candidate_timeline WHERE candidate_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM candidate_notes WHERE candidate_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM candidates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(candidate_id = %id, "deleted candidate");
        Ok(())
    }

    pub async fn stage_counts(&self) -> Result<HashMap<Stage, i64>> {
        let rows = sqlx::query(
            r#"
            SELECT stage, COUNT(*) AS count
            FROM candidates
            GROUP BY stage
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut counts = HashMap::new();
        for row in rows {
            use sqlx::Row;
            counts.insert(row.get::<Stage, _>("stage"), row.get::<i64, _>("count"));
        }
        Ok(counts)
    }

    async fn append_timeline(
        &self,
        candidate_id: &str,
        kind: TimelineKind,
        description: &str,
        from_stage: Option<Stage>,
        to_stage: Option<Stage>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidate_timeline
                (id, candidate_id, kind, description, from_stage, to_stage, timestamp)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(candidate_id)
        .bind(kind)
        .bind(description)
        .bind(from_stage)
        .bind(to_stage)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn send_stage_change_email(&self, candidate_id: &str, new_stage: Stage) {
        if let Err(err) = self.try_send_stage_change_email(candidate_id, new_stage).await {
            tracing::warn!(candidate_id, error = %err, "failed to send stage change email");
        }
    }

    async fn try_send_stage_change_email(
        &self,
        candidate_id: &str,
        new_stage: Stage,
    ) -> Result<()> {
        let Some(candidate) = self.get_by_id(candidate_id).await? else {
            return Ok(());
        };

        let job_title: Option<String> =
            sqlx::query_scalar("SELECT title FROM jobs WHERE id = ?1")
                .bind(&candidate.job_id)
                .fetch_optional(&self.pool)
                .await?;

        self.notifications
            .enqueue(
                &candidate.email,
                EmailTemplate::StageUpdate,
                json!({
                    "candidateName": candidate.name,
                    "jobTitle": job_title.unwrap_or_else(|| "position".to_string()),
                    "nextStage": new_stage,
                }),
            )
            .await?;

        self.append_timeline(
            candidate_id,
            TimelineKind::EmailSent,
            &format!("Status update email sent for {}", new_stage),
            None,
            Some(new_stage),
        )
        .await?;
        Ok(())
    }
}

fn row_to_candidate(row: &sqlx::sqlite::SqliteRow) -> Candidate {
    use sqlx::Row;
    let skills: String = row.get("skills");
    Candidate {
        id: row.get("id"),
        job_id: row.get("job_id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        stage: row.get("stage"),
        applied_at: row.get("applied_at"),
        skills: serde_json::from_str(&skills).unwrap_or_default(),
        is_archived: row.get("is_archived"),
        source: row.get("source"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_timeline(row: &sqlx::sqlite::SqliteRow) -> TimelineEntry {
    use sqlx::Row;
    TimelineEntry {
        id: row.get("id"),
        candidate_id: row.get("candidate_id"),
        kind: row.get("kind"),
        description: row.get("description"),
        from_stage: row.get("from_stage"),
        to_stage: row.get("to_stage"),
        timestamp: row.get("timestamp"),
    }
}

fn row_to_note(row: &sqlx::sqlite::SqliteRow) -> CandidateNote {
    use sqlx::Row;
    let mentions: String = row.get("mentions");
    CandidateNote {
        id: row.get("id"),
        candidate_id: row.get("candidate_id"),
        content: row.get("content"),
        created_by: row.get("created_by"),
        mentions: serde_json::from_str(&mentions).unwrap_or_default(),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply_payload, candidate_service, create_job, setup_test_db};

    #[tokio::test]
    async fn apply_starts_in_applied_with_application_entry() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;

        let candidate = service
            .apply_to_job(&job.id, &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap();

        assert_eq!(candidate.stage, Stage::Applied);
        assert!(!candidate.is_archived);

        let timeline = service.get_timeline(&candidate.id).await.unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].kind, TimelineKind::Application);
        assert_eq!(timeline[0].to_stage, Some(Stage::Applied));
    }

    #[tokio::test]
    async fn apply_with_dangling_job_is_an_integrity_error() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);

        let err = service
            .apply_to_job("no-such-job", &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Integrity(_)), "got {:?}", err);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn stage_change_appends_timeline_and_email_entries() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;
        let candidate = service
            .apply_to_job(&job.id, &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap();

        let moved = service.update_stage(&candidate.id, Stage::Tech).await.unwrap();
        assert_eq!(moved.stage, Stage::Tech);

        let timeline = service.get_timeline(&candidate.id).await.unwrap();
        let change = timeline
            .iter()
            .find(|e| e.kind == TimelineKind::StageChange)
            .expect("stage_change entry");
        assert_eq!(change.from_stage, Some(Stage::Applied));
        assert_eq!(change.to_stage, Some(Stage::Tech));

        // The application entry is untouched.
        let application = timeline
            .iter()
            .find(|e| e.kind == TimelineKind::Application)
            .expect("application entry");
        assert_eq!(application.description, "Application submitted");

        // Email enqueue succeeded, so its breadcrumb is on the timeline too.
        assert!(timeline.iter().any(|e| e.kind == TimelineKind::EmailSent));
    }

    #[tokio::test]
    async fn raw_store_write_with_invalid_stage_is_rejected() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;
        let candidate = service
            .apply_to_job(&job.id, &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap();

        // Bypass the service entirely; the store's own hook still rejects it.
        let err: Error = sqlx::query("UPDATE candidates SET stage = 'promoted' WHERE id = ?1")
            .bind(&candidate.id)
            .execute(&pool)
            .await
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Integrity(_)), "got {:?}", err);

        let unchanged = service.get_by_id(&candidate.id).await.unwrap().unwrap();
        assert_eq!(unchanged.stage, Stage::Applied);
    }

    #[tokio::test]
    async fn bulk_update_collects_per_item_failures() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;

        let a = service
            .apply_to_job(&job.id, &apply_payload("A", "a@x.com"))
            .await
            .unwrap();
        let b = service
            .apply_to_job(&job.id, &apply_payload("B", "b@x.com"))
            .await
            .unwrap();

        let ids = vec![a.id.clone(), "missing".to_string(), b.id.clone()];
        let outcome = service.bulk_update_stage(&ids, Stage::Screen).await.unwrap();

        assert_eq!(outcome.updated.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, "missing");
        assert!(outcome.updated.iter().all(|c| c.stage == Stage::Screen));
    }

    #[tokio::test]
    async fn delete_candidate_cascades_to_timeline_and_notes() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;
        let candidate = service
            .apply_to_job(&job.id, &apply_payload("Jane Doe", "jane@x.com"))
            .await
            .unwrap();
        service
            .add_note(&candidate.id, "Strong portfolio", "recruiter")
            .await
            .unwrap();
        service.update_stage(&candidate.id, Stage::Screen).await.unwrap();

        service.delete_candidate(&candidate.id).await.unwrap();

        assert!(service.get_by_id(&candidate.id).await.unwrap().is_none());
        assert!(service.get_timeline(&candidate.id).await.unwrap().is_empty());
        assert!(service.get_notes(&candidate.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_sorts_by_applied_at_desc_then_stage() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;

        let a = service
            .apply_to_job(&job.id, &apply_payload("A", "a@x.com"))
            .await
            .unwrap();
        let b = service
            .apply_to_job(&job.id, &apply_payload("B", "b@x.com"))
            .await
            .unwrap();

        // Same applied_at forces the stage tie-break.
        sqlx::query("UPDATE candidates SET applied_at = 1000")
            .execute(&pool)
            .await
            .unwrap();
        service.update_stage(&b.id, Stage::Tech).await.unwrap();
        service.update_stage(&a.id, Stage::Offer).await.unwrap();

        let page = service
            .fetch_candidates(&CandidateFilters::default())
            .await
            .unwrap();
        let stages: Vec<Stage> = page.data.iter().map(|c| c.stage).collect();
        assert_eq!(stages, vec![Stage::Offer, Stage::Tech]);
    }

    #[tokio::test]
    async fn skills_filter_is_any_of_and_case_insensitive() {
        let pool = setup_test_db().await;
        let service = candidate_service(&pool);
        let job = create_job(&pool, "Backend Engineer").await;

        let mut rustacean = apply_payload("A", "a@x.com");
        rustacean.skills = vec!["Rust".to_string(), "SQL".to_string()];
        service.apply_to_job(&job.id, &rustacean).await.unwrap();

        let mut pythonista = apply_payload("B", "b@x.com");
        pythonista.skills = vec!["Python".to_string()];
        service.apply_to_job(&job.id, &pythonista).await.unwrap();

        let filters = CandidateFilters {
            skills: vec!["rust".to_string(), "go".to_string()],
            ..Default::default()
        };
        let page = service.fetch_candidates(&filters).await.unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "A");
    }
}
