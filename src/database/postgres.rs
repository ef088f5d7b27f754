use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Attachment, Comment, Department, Grievance, GrievanceChanges, NewAttachment, NewComment, NewGrievance, User,
    UserSummary,
};
use crate::database::repository::GrievanceStore;
use crate::filter::{Filter, SqlParam};

const GRIEVANCE_COLUMNS: &str = "\"id\", \"title\", \"description\", \"category\", \"priority\", \"status\", \
    \"submitted_by\", \"assigned_to\", \"department\", \"created_at\", \"updated_at\"";

#[derive(Debug, FromRow)]
struct GrievanceRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    submitted_by: Uuid,
    assigned_to: Option<Uuid>,
    department: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GrievanceRow {
    fn into_grievance(self, attachments: Vec<Attachment>, comments: Vec<Comment>) -> Result<Grievance, DatabaseError> {
        let category = self
            .category
            .parse()
            .map_err(|e| DatabaseError::QueryError(format!("grievance {}: {}", self.id, e)))?;
        let status = self
            .status
            .parse()
            .map_err(|e| DatabaseError::QueryError(format!("grievance {}: {}", self.id, e)))?;

        Ok(Grievance {
            id: self.id,
            title: self.title,
            description: self.description,
            category,
            priority: self.priority,
            status,
            submitted_by: self.submitted_by,
            assigned_to: self.assigned_to,
            department: self.department,
            attachments,
            comments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttachmentRow {
    grievance_id: Uuid,
    reference: String,
    original_name: String,
    content_type: String,
    size: i64,
    uploaded_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct CommentRow {
    grievance_id: Uuid,
    id: Uuid,
    text: String,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

/// Grievance store over Postgres. Attachments and comments live in child
/// tables ordered by a serial column, so appends are plain inserts.
#[derive(Clone)]
pub struct PgGrievanceStore {
    pool: PgPool,
}

impl PgGrievanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach child rows to a batch of grievance rows, preserving row order
    async fn hydrate(&self, rows: Vec<GrievanceRow>) -> Result<Vec<Grievance>, DatabaseError> {
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let attachment_rows = sqlx::query_as::<_, AttachmentRow>(
            "SELECT grievance_id, reference, original_name, content_type, size, uploaded_at
             FROM grievance_attachments WHERE grievance_id = ANY($1) ORDER BY seq",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let comment_rows = sqlx::query_as::<_, CommentRow>(
            "SELECT grievance_id, id, text, user_id, created_at
             FROM grievance_comments WHERE grievance_id = ANY($1) ORDER BY seq",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut attachments: HashMap<Uuid, Vec<Attachment>> = HashMap::new();
        for row in attachment_rows {
            attachments.entry(row.grievance_id).or_default().push(Attachment {
                reference: row.reference,
                original_name: row.original_name,
                content_type: row.content_type,
                size: row.size,
                uploaded_at: row.uploaded_at,
            });
        }

        let mut comments: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in comment_rows {
            comments.entry(row.grievance_id).or_default().push(Comment {
                id: row.id,
                text: row.text,
                user: row.user_id,
                created_at: row.created_at,
            });
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_grievance(
                    attachments.remove(&id).unwrap_or_default(),
                    comments.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }

    async fn load(&self, id: Uuid) -> Result<Option<Grievance>, DatabaseError> {
        let row = sqlx::query_as::<_, GrievanceRow>(&format!(
            "SELECT {} FROM grievances WHERE id = $1",
            GRIEVANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert_attachments(
        tx: &mut Transaction<'_, Postgres>,
        grievance_id: Uuid,
        attachments: &[NewAttachment],
    ) -> Result<(), DatabaseError> {
        for attachment in attachments {
            sqlx::query(
                "INSERT INTO grievance_attachments (grievance_id, reference, original_name, content_type, size)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(grievance_id)
            .bind(&attachment.reference)
            .bind(&attachment.original_name)
            .bind(&attachment.content_type)
            .bind(attachment.size)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    async fn require(&self, id: Uuid) -> Result<Grievance, DatabaseError> {
        self.load(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("grievance {}", id)))
    }
}

#[async_trait]
impl GrievanceStore for PgGrievanceStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert(&self, new: NewGrievance) -> Result<Grievance, DatabaseError> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO grievances (id, title, description, category, priority, status, submitted_by, department)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.category.as_str())
        .bind(&new.priority)
        .bind(crate::types::Status::default().as_str())
        .bind(new.submitted_by)
        .bind(new.department)
        .execute(&mut *tx)
        .await?;

        Self::insert_attachments(&mut tx, id, &new.attachments).await?;
        tx.commit().await?;

        self.require(id).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Grievance>, DatabaseError> {
        self.load(id).await
    }

    async fn find_by_attachment(&self, reference: &str) -> Result<Option<Grievance>, DatabaseError> {
        let owner: Option<(Uuid,)> =
            sqlx::query_as("SELECT grievance_id FROM grievance_attachments WHERE reference = $1")
                .bind(reference)
                .fetch_optional(&self.pool)
                .await?;

        match owner {
            Some((id,)) => self.load(id).await,
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<Grievance>, DatabaseError> {
        let sql_result = filter.to_sql(GRIEVANCE_COLUMNS);
        let mut q = sqlx::query_as::<_, GrievanceRow>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = match p {
                SqlParam::Text(s) => q.bind(s.clone()),
                SqlParam::Uuid(u) => q.bind(*u),
            };
        }
        let rows = q.fetch_all(&self.pool).await?;
        self.hydrate(rows).await
    }

    async fn update(&self, id: Uuid, changes: GrievanceChanges) -> Result<Grievance, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE grievances SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                assigned_to = COALESCE($7, assigned_to),
                updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.category.map(|c| c.as_str()))
        .bind(changes.priority.as_deref())
        .bind(changes.status.map(|s| s.as_str()))
        .bind(changes.assigned_to)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("grievance {}", id)));
        }

        Self::insert_attachments(&mut tx, id, &changes.attachments).await?;
        tx.commit().await?;

        self.require(id).await
    }

    async fn push_comment(&self, id: Uuid, comment: NewComment) -> Result<Grievance, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE grievances SET updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("grievance {}", id)));
        }

        sqlx::query("INSERT INTO grievance_comments (id, grievance_id, text, user_id) VALUES ($1, $2, $3, $4)")
            .bind(Uuid::new_v4())
            .bind(id)
            .bind(&comment.text)
            .bind(comment.user)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.require(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM grievances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, student_id, role, department, created_at FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    async fn upsert_user(&self, user: User) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, student_id, role, department, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                student_id = EXCLUDED.student_id,
                role = EXCLUDED.role,
                department = EXCLUDED.department",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.student_id)
        .bind(&user.role)
        .bind(&user.department)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn department_by_code(&self, code: &str) -> Result<Option<Department>, DatabaseError> {
        let department =
            sqlx::query_as::<_, Department>("SELECT id, code, name, created_at FROM departments WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(department)
    }

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        let departments =
            sqlx::query_as::<_, Department>("SELECT id, code, name, created_at FROM departments ORDER BY code")
                .fetch_all(&self.pool)
                .await?;
        Ok(departments)
    }

    async fn ensure_department(&self, code: &str, name: &str) -> Result<Department, DatabaseError> {
        sqlx::query("INSERT INTO departments (id, code, name) VALUES ($1, $2, $3) ON CONFLICT (code) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(code)
            .bind(name)
            .execute(&self.pool)
            .await?;

        self.department_by_code(code)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("department {}", code)))
    }
}
