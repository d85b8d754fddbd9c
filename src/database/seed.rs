use crate::error::Result;
use crate::utils::time::{now_ms, DAY_MS};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// Seed a small demo pipeline. Only runs against an empty store, and runs in
/// one transaction so a partial seed never survives.
pub async fn seed_demo_data(pool: &SqlitePool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let jobs = [
        ("Backend Engineer", "Engineering", "Remote", "full-time", r#"["rust","backend"]"#),
        ("Frontend Engineer", "Engineering", "Remote", "full-time", r#"["typescript","react"]"#),
        ("Product Designer", "Design", "Berlin", "contract", r#"["figma"]"#),
        ("Data Analyst", "Data", "London", "part-time", r#"["sql"]"#),
        ("Engineering Manager", "Engineering", "Amsterdam", "full-time", r#"["leadership"]"#),
    ];

    let mut job_ids = Vec::new();
    for (index, (title, department, location, employment_type, tags)) in jobs.iter().enumerate() {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO jobs (id, title, department, location, employment_type, tags, status, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7)
            "#,
        )
        .bind(&id)
        .bind(title)
        .bind(department)
        .bind(location)
        .bind(employment_type)
        .bind(tags)
        .bind((index as i64) * 10)
        .execute(&mut *tx)
        .await?;
        job_ids.push(id);
    }

    let candidates = [
        ("Amara Osei", "amara@example.com", "applied", 0usize),
        ("Bruno Keller", "bruno@example.com", "screen", 0),
        ("Chloe Dubois", "chloe@example.com", "tech", 0),
        ("Daniyar Akhmetov", "daniyar@example.com", "applied", 1),
        ("Elif Demir", "elif@example.com", "offer", 1),
        ("Farid Rahimov", "farid@example.com", "applied", 2),
        ("Greta Lindqvist", "greta@example.com", "hired", 3),
        ("Hiro Tanaka", "hiro@example.com", "rejected", 4),
    ];

    for (index, (name, email, stage, job_index)) in candidates.iter().enumerate() {
        let id = Uuid::new_v4().to_string();
        let applied_at = now_ms() - (index as i64) * DAY_MS;
        sqlx::query(
            r#"
            INSERT INTO candidates (id, job_id, name, email, stage, applied_at, skills, source)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, '[]', 'seed')
            "#,
        )
        .bind(&id)
        .bind(&job_ids[*job_index])
        .bind(name)
        .bind(email)
        .bind(stage)
        .bind(applied_at)
        .execute(&mut *tx)
        .await?;

        append_application_entry(&mut tx, &id, applied_at).await?;
    }

    let assessment_id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO assessments (id, job_id, title, description, status, version, config)
        VALUES (?1, ?2, 'Backend Screen', 'Initial technical screen', 'draft', 1, '{}')
        "#,
    )
    .bind(&assessment_id)
    .bind(&job_ids[0])
    .execute(&mut *tx)
    .await?;

    let section_id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO assessment_sections (id, assessment_id, title, description, sort_order)
        VALUES (?1, ?2, 'Default Section', 'Add your questions here', 0)
        "#,
    )
    .bind(&section_id)
    .bind(&assessment_id)
    .execute(&mut *tx)
    .await?;

    let questions = [
        ("mcq", "Ownership basics", r#"["moves","borrows","copies"]"#),
        ("short-text", "Describe a system you scaled", "[]"),
    ];
    for (index, (question_type, title, options)) in questions.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO questions (id, section_id, question_type, title, options, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&section_id)
        .bind(question_type)
        .bind(title)
        .bind(options)
        .bind(index as i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!("seeded demo data");
    Ok(())
}

async fn append_application_entry(
    tx: &mut Transaction<'_, Sqlite>,
    candidate_id: &str,
    timestamp: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO candidate_timeline (id, candidate_id, kind, description, to_stage, timestamp)
        VALUES (?1, ?2, 'application', 'Application submitted', 'applied', ?3)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(candidate_id)
    .bind(timestamp)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let pool = setup_test_db().await;

        seed_demo_data(&pool).await.unwrap();
        let jobs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(jobs, 5);

        // Second run is a no-op against a non-empty store.
        seed_demo_data(&pool).await.unwrap();
        let jobs_again: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(jobs_again, jobs);

        let candidates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(candidates, 8);
    }
}
