use crate::error::Result;
use crate::models::outbox::{EmailTemplate, OutboxEmail, OutboxStatus};
use crate::utils::time::now_ms;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Email delivery goes through an outbox table so the primary commands that
/// trigger notifications never depend on delivery succeeding. A background
/// worker drains the table via `run_once`.
#[derive(Clone)]
pub struct NotificationService {
    pool: SqlitePool,
    client: Client,
    webhook_url: Option<String>,
}

impl NotificationService {
    pub fn new(pool: SqlitePool, webhook_url: Option<String>) -> Self {
        Self {
            pool,
            client: Client::new(),
            webhook_url,
        }
    }

    pub async fn enqueue(
        &self,
        recipient: &str,
        template: EmailTemplate,
        variables: JsonValue,
    ) -> Result<OutboxEmail> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO email_outbox (id, recipient, template, variables, status)
            VALUES (?1, ?2, ?3, ?4, 'pending')
            "#,
        )
        .bind(&id)
        .bind(recipient)
        .bind(template)
        .bind(variables.to_string())
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    pub async fn get_by_id(&self, id: &str) -> Result<OutboxEmail> {
        let row = sqlx::query(
            r#"
            SELECT id, recipient, template, variables, status, attempts, max_attempts,
                   next_retry_at, http_status, last_error, created_at, updated_at
            FROM email_outbox
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_outbox(&row))
    }

    pub async fn deliver_once(&self, id: &str) -> Result<()> {
        let email = self.get_by_id(id).await?;

        let Some(url) = self.webhook_url.as_deref() else {
            tracing::warn!(
                outbox_id = %email.id,
                "no email webhook configured; delivery simulated"
            );
            sqlx::query(
                r#"
                UPDATE email_outbox
                SET status = 'skipped', attempts = attempts + 1
                WHERE id = ?1
                "#,
            )
            .bind(id)
            .execute(&self.pool)
            .await?;
            return Ok(());
        };

        let payload = json!({
            "to": email.recipient,
            "template": email.template,
            "variables": email.variables,
        });

        let res = self.client.post(url).json(&payload).send().await;
        match res {
            Ok(resp) => {
                let status = resp.status().as_u16() as i64;
                sqlx::query(
                    r#"
                    UPDATE email_outbox
                    SET http_status = ?1,
                        status = CASE WHEN ?1 BETWEEN 200 AND 299 THEN 'delivered' ELSE 'failed' END,
                        attempts = attempts + 1
                    WHERE id = ?2
                    "#,
                )
                .bind(status)
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
            Err(err) => {
                sqlx::query(
                    r#"
                    UPDATE email_outbox
                    SET last_error = ?1, status = 'failed', attempts = attempts + 1
                    WHERE id = ?2
                    "#,
                )
                .bind(err.to_string())
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    /// Claim the oldest due pending email, deliver it, and schedule a retry
    /// with exponential backoff if it failed. Returns whether work was found.
    pub async fn run_once(&self) -> Result<bool> {
        let now = now_ms();
        let row_opt = sqlx::query(
            r#"
            SELECT id FROM email_outbox
            WHERE status = 'pending' AND (next_retry_at IS NULL OR next_retry_at <= ?1)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row_opt else { return Ok(false) };
        let id: String = row.try_get("id")?;

        let _ = self.deliver_once(&id).await;

        let email = self.get_by_id(&id).await?;
        if email.status == OutboxStatus::Failed && email.attempts < email.max_attempts {
            let backoff_secs = (30_i64 << (email.attempts - 1).max(0)).min(3600);
            sqlx::query(
                r#"
                UPDATE email_outbox SET status = 'pending', next_retry_at = ?1 WHERE id = ?2
                "#,
            )
            .bind(now_ms() + backoff_secs * 1000)
            .bind(&id)
            .execute(&self.pool)
            .await?;
        }

        Ok(true)
    }
}

fn row_to_outbox(row: &sqlx::sqlite::SqliteRow) -> OutboxEmail {
    let variables: String = row.get("variables");
    OutboxEmail {
        id: row.get("id"),
        recipient: row.get("recipient"),
        template: row.get("template"),
        variables: serde_json::from_str(&variables).unwrap_or(JsonValue::Null),
        status: row.get("status"),
        attempts: row.get("attempts"),
        max_attempts: row.get("max_attempts"),
        next_retry_at: row.get("next_retry_at"),
        http_status: row.get("http_status"),
        last_error: row.get("last_error"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
