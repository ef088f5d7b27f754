use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub student_id: Option<String>,
    pub role: String,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Identity projection inlined into grievance responses.
///
/// A reference to a user that no longer exists projects to the bare id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl UserSummary {
    pub fn unknown(id: Uuid) -> Self {
        Self {
            id,
            name: None,
            email: None,
            student_id: None,
            role: None,
            department: None,
        }
    }

    /// Submitter entry: name, email, student id and department
    pub fn as_submitter(self) -> Self {
        Self { role: None, ..self }
    }

    /// Assignee entry: name and email
    pub fn as_assignee(self) -> Self {
        Self {
            name: self.name,
            email: self.email,
            ..Self::unknown(self.id)
        }
    }

    /// Comment author entry: name, email and role
    pub fn as_author(self) -> Self {
        Self {
            name: self.name,
            email: self.email,
            role: self.role,
            ..Self::unknown(self.id)
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: Some(user.name),
            email: Some(user.email),
            student_id: user.student_id,
            role: Some(user.role),
            department: user.department,
        }
    }
}
