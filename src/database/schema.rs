use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// DDL for every table the service owns, applied in order. Each statement is
/// idempotent so `migrate` can be re-run safely.
pub const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        student_id  TEXT,
        role        TEXT NOT NULL DEFAULT 'student',
        department  TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS departments (
        id          UUID PRIMARY KEY,
        code        TEXT NOT NULL UNIQUE,
        name        TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS grievances (
        id            UUID PRIMARY KEY,
        title         TEXT NOT NULL CHECK (title <> ''),
        description   TEXT NOT NULL CHECK (description <> ''),
        category      TEXT NOT NULL,
        priority      TEXT NOT NULL,
        status        TEXT NOT NULL DEFAULT 'Pending',
        submitted_by  UUID NOT NULL,
        assigned_to   UUID,
        department    UUID REFERENCES departments (id),
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS grievances_submitted_by_idx ON grievances (submitted_by)",
    "CREATE INDEX IF NOT EXISTS grievances_department_idx ON grievances (department)",
    r#"CREATE TABLE IF NOT EXISTS grievance_attachments (
        seq            BIGSERIAL PRIMARY KEY,
        grievance_id   UUID NOT NULL REFERENCES grievances (id) ON DELETE CASCADE,
        reference      TEXT NOT NULL UNIQUE,
        original_name  TEXT NOT NULL,
        content_type   TEXT NOT NULL,
        size           BIGINT NOT NULL,
        uploaded_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS grievance_comments (
        seq           BIGSERIAL PRIMARY KEY,
        id            UUID NOT NULL UNIQUE,
        grievance_id  UUID NOT NULL REFERENCES grievances (id) ON DELETE CASCADE,
        text          TEXT NOT NULL,
        user_id       UUID NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS grievance_comments_grievance_idx ON grievance_comments (grievance_id, seq)",
    r#"CREATE TABLE IF NOT EXISTS attachment_blobs (
        reference      TEXT PRIMARY KEY,
        original_name  TEXT NOT NULL,
        content_type   TEXT NOT NULL,
        size           BIGINT NOT NULL,
        sha256         TEXT NOT NULL,
        data           BYTEA NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    info!("Applied {} schema statements", SCHEMA.len());
    Ok(())
}
