//! The store enforces its own integrity: schema versions apply once and
//! reopening is a no-op, and constraint hooks fire for any write path.

use sqlx::error::ErrorKind;
use talentflow::database::pool::connect_pool;
use talentflow::error::Error;
use talentflow::test_utils::setup_test_db;

#[tokio::test]
async fn reopening_an_up_to_date_store_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("talentflow.db");
    let url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = connect_pool(&url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    sqlx::query(
        "INSERT INTO jobs (id, title, department, location, employment_type)
         VALUES ('job-1', 'Backend Engineer', 'Engineering', 'Remote', 'full-time')",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    // Second open replays nothing and loses nothing.
    let pool = connect_pool(&url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // The column added by the later schema version is queryable.
    let source: Option<String> =
        sqlx::query_scalar("SELECT source FROM candidates LIMIT 1")
            .fetch_optional(&pool)
            .await
            .unwrap();
    assert!(source.is_none(), "no candidates exist yet");
}

#[tokio::test]
async fn enum_domain_is_enforced_on_create() {
    let pool = setup_test_db().await;

    let err = sqlx::query(
        "INSERT INTO jobs (id, title, department, location, employment_type, status)
         VALUES ('job-1', 'X', 'Eng', 'Remote', 'full-time', 'Open')",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db) => {
            assert!(matches!(db.kind(), ErrorKind::CheckViolation), "got {:?}", db)
        }
        other => panic!("expected check violation, got {:?}", other),
    }
}

#[tokio::test]
async fn foreign_keys_are_enforced_for_raw_writes() {
    let pool = setup_test_db().await;

    let raw = sqlx::query(
        "INSERT INTO candidates (id, job_id, name, email, stage, applied_at)
         VALUES ('c-1', 'no-such-job', 'Jane', 'jane@x.com', 'applied', 0)",
    )
    .execute(&pool)
    .await
    .unwrap_err();

    let err: Error = raw.into();
    assert!(matches!(err, Error::Integrity(_)), "got {:?}", err);
}

#[tokio::test]
async fn update_hook_overrides_caller_supplied_updated_at() {
    let pool = setup_test_db().await;

    sqlx::query(
        "INSERT INTO jobs (id, title, department, location, employment_type)
         VALUES ('job-1', 'X', 'Eng', 'Remote', 'full-time')",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("UPDATE jobs SET title = 'Y', updated_at = 123 WHERE id = 'job-1'")
        .execute(&pool)
        .await
        .unwrap();

    let updated_at: i64 = sqlx::query_scalar("SELECT updated_at FROM jobs WHERE id = 'job-1'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_ne!(updated_at, 123, "stale caller timestamp must be overridden");
}

#[tokio::test]
async fn timestamps_are_stamped_when_absent() {
    let pool = setup_test_db().await;

    sqlx::query(
        "INSERT INTO jobs (id, title, department, location, employment_type)
         VALUES ('job-1', 'X', 'Eng', 'Remote', 'full-time')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let (created_at, updated_at): (i64, i64) =
        sqlx::query_as("SELECT created_at, updated_at FROM jobs WHERE id = 'job-1'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(created_at > 0);
    assert!(updated_at > 0);
}
