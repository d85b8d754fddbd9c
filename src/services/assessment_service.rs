use crate::dto::assessment_dto::{
    CreateAssessmentPayload, QuestionPayload, UpdateAssessmentPayload, UpdateQuestionPayload,
    UpdateSectionPayload,
};
use crate::error::{Error, Result};
use crate::models::assessment::{Assessment, AssessmentSection, AssessmentStatus};
use crate::models::invite::AssessmentInvite;
use crate::models::outbox::EmailTemplate;
use crate::models::question::Question;
use crate::services::notification_service::NotificationService;
use crate::utils::time::days_from_now_ms;
use crate::utils::token::generate_invite_token;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

const INVITE_TOKEN_LEN: usize = 32;
const INVITE_EXPIRY_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AssessmentService {
    pool: SqlitePool,
    notifications: NotificationService,
}

impl AssessmentService {
    pub fn new(pool: SqlitePool, notifications: NotificationService) -> Self {
        Self {
            pool,
            notifications,
        }
    }

    pub async fn get_all(
        &self,
        job_id: Option<&str>,
        status: Option<AssessmentStatus>,
    ) -> Result<Vec<Assessment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, job_id, title, description, status, version, config, created_at, updated_at
            FROM assessments
            WHERE (?1 IS NULL OR job_id = ?1)
              AND (?2 IS NULL OR status = ?2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(job_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        let mut assessments = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut assessment = row_to_assessment(row);
            assessment.sections = self.load_sections(&assessment.id).await?;
            assessments.push(assessment);
        }
        Ok(assessments)
    }

    pub async fn get_by_id(&self, assessment_id: &str) -> Result<Option<Assessment>> {
        let row = sqlx::query(
            r#"
            SELECT id, job_id, title, description, status, version, config, created_at, updated_at
            FROM assessments
            WHERE id = ?1
            "#,
        )
        .bind(assessment_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        let mut assessment = row_to_assessment(&row);
        assessment.sections = self.load_sections(&assessment.id).await?;
        Ok(Some(assessment))
    }

    pub async fn get_for_job(&self, job_id: &str) -> Result<Option<Assessment>> {
        let row = sqlx::query(
            r#"
            SELECT id, job_id, title, description, status, version, config, created_at, updated_at
            FROM assessments
            WHERE job_id = ?1
            LIMIT 1
            "#,
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else { return Ok(None) };
        let mut assessment = row_to_assessment(&row);
        assessment.sections = self.load_sections(&assessment.id).await?;
        Ok(Some(assessment))
    }

    /// Every assessment is born with one "Default Section"; a zero-section
    /// assessment is an invalid intermediate state that never escapes here.
    pub async fn create_for_job(
        &self,
        job_id: &str,
        payload: &CreateAssessmentPayload,
    ) -> Result<Assessment> {
        if job_id.trim().is_empty() {
            return Err(Error::BadRequest("jobId is required".to_string()));
        }
        payload.validate()?;

        let config = payload.config.clone().unwrap_or_default();
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO assessments (id, job_id, title, description, status, version, config)
            VALUES (?1, ?2, ?3, ?4, 'draft', 1, ?5)
            "#,
        )
        .bind(&id)
        .bind(job_id)
        .bind(&payload.title)
        .bind(payload.description.as_deref())
        .bind(serde_json::to_string(&config)?)
        .execute(&self.pool)
        .await?;

        self.add_section(&id, "Default Section", Some("Add your questions here"))
            .await?;

        tracing::info!(assessment_id = %id, job_id, "created assessment");
        self.get_by_id(&id)
            .await?
            .ok_or_else(|| Error::Internal("assessment missing after insert".to_string()))
    }

    /// Every edit bumps the version counter.
    pub async fn update_for_job(
        &self,
        job_id: &str,
        patch: &UpdateAssessmentPayload,
    ) -> Result<Assessment> {
        if job_id.trim().is_empty() {
            return Err(Error::BadRequest("jobId is required".to_string()));
        }

        let config_json = patch
            .config
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE assessments
            SET title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                config = COALESCE(?3, config),
                version = version + 1
            WHERE job_id = ?4
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(config_json)
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Assessment not found".to_string()));
        }
        self.get_for_job(job_id)
            .await?
            .ok_or_else(|| Error::NotFound("Assessment not found".to_string()))
    }

    pub async fn add_section(
        &self,
        assessment_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<AssessmentSection> {
        if assessment_id.trim().is_empty() {
            return Err(Error::BadRequest("assessmentId is required".to_string()));
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assessment_sections WHERE assessment_id = ?1")
                .bind(assessment_id)
                .fetch_one(&self.pool)
                .await?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO assessment_sections (id, assessment_id, title, description, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&id)
        .bind(assessment_id)
        .bind(title)
        .bind(description)
        .bind(count)
        .execute(&self.pool)
        .await?;

        self.require_section(&id).await
    }

    pub async fn update_section(
        &self,
        section_id: &str,
        patch: &UpdateSectionPayload,
    ) -> Result<AssessmentSection> {
        let config_json = patch
            .config
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE assessment_sections
            SET title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                config = COALESCE(?3, config)
            WHERE id = ?4
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.description.as_deref())
        .bind(config_json)
        .bind(section_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Section {} not found", section_id)));
        }
        self.require_section(section_id).await
    }

    /// Questions go first, then the section, then the surviving siblings are
    /// renumbered back to a dense 0..n-1.
    pub async fn delete_section(&self, section_id: &str) -> Result<()> {
        let section = self.require_section(section_id).await?;

        sqlx::query("DELETE FROM questions WHERE section_id = ?1")
            .bind(section_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM assessment_sections WHERE id = ?1")
            .bind(section_id)
            .execute(&self.pool)
            .await?;

        self.renumber_sections(&section.assessment_id).await
    }

    pub async fn add_question(
        &self,
        section_id: &str,
        payload: &QuestionPayload,
    ) -> Result<Question> {
        if section_id.trim().is_empty() {
            return Err(Error::BadRequest("sectionId is required".to_string()));
        }
        self.require_section(section_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE section_id = ?1")
            .bind(section_id)
            .fetch_one(&self.pool)
            .await?;

        let conditional_json = payload
            .conditional
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO questions
                (id, section_id, question_type, title, text, required, options,
                 score, sort_order, min, max, max_length, accept, conditional)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&id)
        .bind(section_id)
        .bind(payload.question_type)
        .bind(payload.title.as_deref().unwrap_or("New Question"))
        .bind(payload.text.as_deref().unwrap_or(""))
        .bind(payload.required)
        .bind(serde_json::to_string(&payload.options)?)
        .bind(payload.score.unwrap_or(10))
        .bind(count)
        .bind(payload.min)
        .bind(payload.max)
        .bind(payload.max_length)
        .bind(payload.accept.as_deref())
        .bind(conditional_json)
        .execute(&self.pool)
        .await?;

        self.require_question(&id).await
    }

    pub async fn update_question(
        &self,
        question_id: &str,
        patch: &UpdateQuestionPayload,
    ) -> Result<Question> {
        let options_json = patch
            .options
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let conditional_json = patch
            .conditional
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE questions
            SET title = COALESCE(?1, title),
                text = COALESCE(?2, text),
                required = COALESCE(?3, required),
                options = COALESCE(?4, options),
                score = COALESCE(?5, score),
                min = COALESCE(?6, min),
                max = COALESCE(?7, max),
                max_length = COALESCE(?8, max_length),
                accept = COALESCE(?9, accept),
                conditional = COALESCE(?10, conditional)
            WHERE id = ?11
            "#,
        )
        .bind(patch.title.as_deref())
        .bind(patch.text.as_deref())
        .bind(patch.required)
        .bind(options_json)
        .bind(patch.score)
        .bind(patch.min)
        .bind(patch.max)
        .bind(patch.max_length)
        .bind(patch.accept.as_deref())
        .bind(conditional_json)
        .bind(question_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Question {} not found",
                question_id
            )));
        }
        self.require_question(question_id).await
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<()> {
        let question = self.require_question(question_id).await?;

        sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;

        self.renumber_questions(&question.section_id).await
    }

    /// Splice-and-reinsert, then renumber the whole sibling set 0..n-1.
    pub async fn reorder_questions(
        &self,
        section_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<()> {
        if section_id.trim().is_empty() {
            return Err(Error::BadRequest("sectionId is required".to_string()));
        }

        let mut ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM questions WHERE section_id = ?1 ORDER BY sort_order",
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;

        if from_index >= ids.len() || to_index >= ids.len() {
            return Err(Error::BadRequest(format!(
                "Reorder indices ({}, {}) out of range for {} questions",
                from_index,
                to_index,
                ids.len()
            )));
        }

        let moved = ids.remove(from_index);
        ids.insert(to_index, moved);

        for (index, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE questions SET sort_order = ?1 WHERE id = ?2")
                .bind(index as i64)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    pub async fn publish(&self, assessment_id: &str) -> Result<Assessment> {
        if assessment_id.trim().is_empty() {
            return Err(Error::BadRequest("assessmentId is required".to_string()));
        }

        let result = sqlx::query("UPDATE assessments SET status = 'published' WHERE id = ?1")
            .bind(assessment_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Assessment not found".to_string()));
        }

        self.get_by_id(assessment_id)
            .await?
            .ok_or_else(|| Error::NotFound("Assessment not found".to_string()))
    }

    /// Issue a bearer invite for a candidate. The email send is best-effort
    /// and not part of the invite's success contract.
    pub async fn send_invite(
        &self,
        candidate_id: &str,
        assessment_id: &str,
    ) -> Result<AssessmentInvite> {
        if candidate_id.trim().is_empty() {
            return Err(Error::BadRequest("candidateId is required".to_string()));
        }
        if assessment_id.trim().is_empty() {
            return Err(Error::BadRequest("assessmentId is required".to_string()));
        }

        let candidate_email: String =
            sqlx::query_scalar("SELECT email FROM candidates WHERE id = ?1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound(format!("Candidate {} not found", candidate_id)))?;

        let id = Uuid::new_v4().to_string();
        let token = generate_invite_token(INVITE_TOKEN_LEN);
        sqlx::query(
            r#"
            INSERT INTO assessment_invites
                (id, token, candidate_id, assessment_id, candidate_email,
                 status, attempts, sent_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 'pending', 0, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&token)
        .bind(candidate_id)
        .bind(assessment_id)
        .bind(&candidate_email)
        .bind(crate::utils::time::now_ms())
        .bind(days_from_now_ms(INVITE_EXPIRY_DAYS))
        .execute(&self.pool)
        .await?;

        if let Err(err) = self
            .try_send_invite_email(candidate_id, assessment_id, &candidate_email, &token)
            .await
        {
            tracing::warn!(candidate_id, error = %err, "failed to send invite email");
        }

        self.require_invite(&id).await
    }

    async fn try_send_invite_email(
        &self,
        candidate_id: &str,
        assessment_id: &str,
        candidate_email: &str,
        token: &str,
    ) -> Result<()> {
        let candidate_name: Option<String> =
            sqlx::query_scalar("SELECT name FROM candidates WHERE id = ?1")
                .bind(candidate_id)
                .fetch_optional(&self.pool)
                .await?;
        let assessment_title: Option<String> =
            sqlx::query_scalar("SELECT title FROM assessments WHERE id = ?1")
                .bind(assessment_id)
                .fetch_optional(&self.pool)
                .await?;

        let (Some(name), Some(title)) = (candidate_name, assessment_title) else {
            return Ok(());
        };

        self.notifications
            .enqueue(
                candidate_email,
                EmailTemplate::AssessmentInvite,
                json!({
                    "candidateName": name,
                    "assessmentTitle": title,
                    "inviteLink": format!("/take-assessment/{}", token),
                    "expiresIn": format!("{} days", INVITE_EXPIRY_DAYS),
                }),
            )
            .await?;
        Ok(())
    }

    async fn load_sections(&self, assessment_id: &str) -> Result<Vec<AssessmentSection>> {
        let rows = sqlx::query(
            r#"
            SELECT id, assessment_id, title, description, sort_order, config
            FROM assessment_sections
            WHERE assessment_id = ?1
            ORDER BY sort_order
            "#,
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await?;

        let mut sections: Vec<AssessmentSection> = rows.iter().map(row_to_section).collect();
        for section in &mut sections {
            section.questions = self.load_questions(&section.id).await?;
        }
        Ok(sections)
    }

    async fn load_questions(&self, section_id: &str) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            r#"
            SELECT id, section_id, question_type, title, text, required, options,
                   score, sort_order, min, max, max_length, accept, conditional
            FROM questions
            WHERE section_id = ?1
            ORDER BY sort_order
            "#,
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_question).collect())
    }

    async fn require_section(&self, section_id: &str) -> Result<AssessmentSection> {
        let row = sqlx::query(
            r#"
            SELECT id, assessment_id, title, description, sort_order, config
            FROM assessment_sections
            WHERE id = ?1
            "#,
        )
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(Error::NotFound(format!("Section {} not found", section_id)));
        };
        let mut section = row_to_section(&row);
        section.questions = self.load_questions(&section.id).await?;
        Ok(section)
    }

    async fn require_question(&self, question_id: &str) -> Result<Question> {
        let row = sqlx::query(
            r#"
            SELECT id, section_id, question_type, title, text, required, options,
                   score, sort_order, min, max, max_length, accept, conditional
            FROM questions
            WHERE id = ?1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(row_to_question)
            .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))
    }

    async fn require_invite(&self, invite_id: &str) -> Result<AssessmentInvite> {
        let row = sqlx::query(
            r#"
            SELECT id, token, candidate_id, assessment_id, candidate_email,
                   status, attempts, sent_at, expires_at, completed_at
            FROM assessment_invites
            WHERE id = ?1
            "#,
        )
        .bind(invite_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref()
            .map(row_to_invite)
            .ok_or_else(|| Error::NotFound(format!("Invite {} not found", invite_id)))
    }

    async fn renumber_sections(&self, assessment_id: &str) -> Result<()> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM assessment_sections WHERE assessment_id = ?1 ORDER BY sort_order",
        )
        .bind(assessment_id)
        .fetch_all(&self.pool)
        .await?;

        for (index, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE assessment_sections SET sort_order = ?1 WHERE id = ?2")
                .bind(index as i64)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    async fn renumber_questions(&self, section_id: &str) -> Result<()> {
        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM questions WHERE section_id = ?1 ORDER BY sort_order",
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;

        for (index, id) in ids.iter().enumerate() {
            sqlx::query("UPDATE questions SET sort_order = ?1 WHERE id = ?2")
                .bind(index as i64)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

fn row_to_assessment(row: &sqlx::sqlite::SqliteRow) -> Assessment {
    use sqlx::Row;
    let config: String = row.get("config");
    Assessment {
        id: row.get("id"),
        job_id: row.get("job_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: row.get("status"),
        version: row.get("version"),
        config: serde_json::from_str(&config).unwrap_or_default(),
        sections: Vec::new(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn row_to_section(row: &sqlx::sqlite::SqliteRow) -> AssessmentSection {
    use sqlx::Row;
    let config: String = row.get("config");
    AssessmentSection {
        id: row.get("id"),
        assessment_id: row.get("assessment_id"),
        title: row.get("title"),
        description: row.get("description"),
        sort_order: row.get("sort_order"),
        config: serde_json::from_str(&config).unwrap_or(serde_json::Value::Null),
        questions: Vec::new(),
    }
}

fn row_to_question(row: &sqlx::sqlite::SqliteRow) -> Question {
    use sqlx::Row;
    let options: String = row.get("options");
    let conditional: Option<String> = row.get("conditional");
    Question {
        id: row.get("id"),
        section_id: row.get("section_id"),
        question_type: row.get("question_type"),
        title: row.get("title"),
        text: row.get("text"),
        required: row.get("required"),
        options: serde_json::from_str(&options).unwrap_or_default(),
        score: row.get("score"),
        sort_order: row.get("sort_order"),
        min: row.get("min"),
        max: row.get("max"),
        max_length: row.get("max_length"),
        accept: row.get("accept"),
        conditional: conditional.and_then(|raw| serde_json::from_str(&raw).ok()),
    }
}

fn row_to_invite(row: &sqlx::sqlite::SqliteRow) -> AssessmentInvite {
    use sqlx::Row;
    AssessmentInvite {
        id: row.get("id"),
        token: row.get("token"),
        candidate_id: row.get("candidate_id"),
        assessment_id: row.get("assessment_id"),
        candidate_email: row.get("candidate_email"),
        status: row.get("status"),
        attempts: row.get("attempts"),
        sent_at: row.get("sent_at"),
        expires_at: row.get("expires_at"),
        completed_at: row.get("completed_at"),
    }
}
