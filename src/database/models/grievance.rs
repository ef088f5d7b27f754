use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserSummary;
use crate::types::{Category, Status};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grievance {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: String,
    pub status: Status,
    pub submitted_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub department: Option<Uuid>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub reference: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub user: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewGrievance {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: String,
    pub submitted_by: Uuid,
    pub department: Option<Uuid>,
    pub attachments: Vec<NewAttachment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub reference: String,
    pub original_name: String,
    pub content_type: String,
    pub size: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub user: Uuid,
}

/// Field-level changes for a single update. `None` leaves the stored value
/// untouched; attachments are appended.
#[derive(Debug, Clone, Default)]
pub struct GrievanceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<String>,
    pub status: Option<Status>,
    pub assigned_to: Option<Uuid>,
    pub attachments: Vec<NewAttachment>,
}

impl GrievanceChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
            && self.attachments.is_empty()
    }

    pub fn apply(self, grievance: &mut Grievance, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            grievance.title = title;
        }
        if let Some(description) = self.description {
            grievance.description = description;
        }
        if let Some(category) = self.category {
            grievance.category = category;
        }
        if let Some(priority) = self.priority {
            grievance.priority = priority;
        }
        if let Some(status) = self.status {
            grievance.status = status;
        }
        if let Some(assignee) = self.assigned_to {
            grievance.assigned_to = Some(assignee);
        }
        grievance
            .attachments
            .extend(self.attachments.into_iter().map(|a| a.into_attachment(now)));
        grievance.updated_at = now;
    }
}

impl NewAttachment {
    pub fn into_attachment(self, uploaded_at: DateTime<Utc>) -> Attachment {
        Attachment {
            reference: self.reference,
            original_name: self.original_name,
            content_type: self.content_type,
            size: self.size,
            uploaded_at,
        }
    }
}

/// Grievance with every user reference replaced by its identity projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrievanceView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: String,
    pub status: Status,
    pub submitted_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
    pub department: Option<Uuid>,
    pub attachments: Vec<Attachment>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub user: UserSummary,
    pub created_at: DateTime<Utc>,
}

impl Grievance {
    /// Every user id this record references, for batch projection lookups
    pub fn user_refs(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.submitted_by)
            .chain(self.assigned_to)
            .chain(self.comments.iter().map(|c| c.user))
    }

    pub fn has_attachment(&self, reference: &str) -> bool {
        self.attachments.iter().any(|a| a.reference == reference)
    }

    pub fn into_view(self, lookup: impl Fn(Uuid) -> UserSummary) -> GrievanceView {
        GrievanceView {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            priority: self.priority,
            status: self.status,
            submitted_by: lookup(self.submitted_by).as_submitter(),
            assigned_to: self.assigned_to.map(|id| lookup(id).as_assignee()),
            department: self.department,
            attachments: self.attachments,
            comments: self
                .comments
                .into_iter()
                .map(|c| CommentView {
                    id: c.id,
                    text: c.text,
                    user: lookup(c.user).as_author(),
                    created_at: c.created_at,
                })
                .collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
