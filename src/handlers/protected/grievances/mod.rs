// handlers/protected/grievances/mod.rs - Grievance routes (/api/grievances/*)
pub mod attachment;
pub mod comment;
pub mod create;
pub mod delete;
pub mod form;
pub mod list;
pub mod show;
pub mod update;

pub use attachment::attachment_get;
pub use comment::comment_post;
pub use create::grievance_post;
pub use delete::grievance_delete;
pub use list::grievances_get;
pub use show::grievance_get;
pub use update::grievance_put;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that are not UUIDs can never name a stored grievance
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("Grievance {} not found", raw)))
}
