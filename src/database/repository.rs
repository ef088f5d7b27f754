use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Department, Grievance, GrievanceChanges, NewComment, NewGrievance, User, UserSummary};
use crate::filter::Filter;

pub const GRIEVANCE_TABLE: &str = "grievances";

/// Persistence capability for grievances and the reference data they point at.
///
/// Every method is a single atomic store operation; comment and attachment
/// appends never rewrite the existing sequence.
#[async_trait]
pub trait GrievanceStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    async fn insert(&self, new: NewGrievance) -> Result<Grievance, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Grievance>, DatabaseError>;

    async fn find_by_attachment(&self, reference: &str) -> Result<Option<Grievance>, DatabaseError>;

    async fn list(&self, filter: &Filter) -> Result<Vec<Grievance>, DatabaseError>;

    /// Apply `changes` and return the stored record, or `NotFound`
    async fn update(&self, id: Uuid, changes: GrievanceChanges) -> Result<Grievance, DatabaseError>;

    async fn push_comment(&self, id: Uuid, comment: NewComment) -> Result<Grievance, DatabaseError>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, DatabaseError>;

    async fn upsert_user(&self, user: User) -> Result<(), DatabaseError>;

    async fn department_by_code(&self, code: &str) -> Result<Option<Department>, DatabaseError>;

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError>;

    /// Insert the department if its code is not yet present; returns the stored row
    async fn ensure_department(&self, code: &str, name: &str) -> Result<Department, DatabaseError>;
}
