/// Shared domain types used across handlers, services and stores

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Authenticated identity making a request.
///
/// Decoded from the bearer token by the auth middleware and handed explicitly
/// to every service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Student { id: Uuid },
    Admin { id: Uuid },
    Department { id: Uuid },
}

impl Principal {
    pub fn id(&self) -> Uuid {
        match self {
            Principal::Student { id } | Principal::Admin { id } | Principal::Department { id } => *id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Principal::Student { .. } => Role::Student,
            Principal::Admin { .. } => Role::Admin,
            Principal::Department { .. } => Role::Department,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin { .. })
    }

    pub fn from_role(role: Role, id: Uuid) -> Self {
        match role {
            Role::Student => Principal::Student { id },
            Role::Admin => Principal::Admin { id },
            Role::Department => Principal::Department { id },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
    Department,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Department => "department",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" | "user" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "department" => Ok(Role::Department),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Academic,
    Administration,
    Infrastructure,
    Hostel,
    General,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Academic,
        Category::Administration,
        Category::Infrastructure,
        Category::Hostel,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Academic => "Academic",
            Category::Administration => "Administration",
            Category::Infrastructure => "Infrastructure",
            Category::Hostel => "Hostel",
            Category::General => "General",
        }
    }

    /// Code of the department that owns grievances of this category.
    pub fn department_code(&self) -> &'static str {
        match self {
            Category::Academic => "ACAD001",
            Category::Administration => "ADMIN001",
            Category::Infrastructure => "INFRA001",
            Category::Hostel => "HOSTEL001",
            Category::General => "GEN001",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "category must be one of: {}",
                    Category::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Pending,
    #[serde(rename = "In Progress", alias = "InProgress")]
    InProgress,
    Resolved,
    Rejected,
}

impl Status {
    pub const ALL: [Status; 4] = [Status::Pending, Status::InProgress, Status::Resolved, Status::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Resolved => "Resolved",
            Status::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace() && *c != '_' && *c != '-').collect();
        match normalized.to_ascii_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "inprogress" => Ok(Status::InProgress),
            "resolved" => Ok(Status::Resolved),
            "rejected" => Ok(Status::Rejected),
            _ => Err(format!(
                "status must be one of: {}",
                Status::ALL.map(|s| s.as_str()).join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_maps_to_department_code() {
        assert_eq!(Category::Hostel.department_code(), "HOSTEL001");
        assert_eq!(Category::Academic.department_code(), "ACAD001");
        assert_eq!("general".parse::<Category>().unwrap(), Category::General);
        assert!("Sports".parse::<Category>().is_err());
    }

    #[test]
    fn status_accepts_common_spellings() {
        assert_eq!("In Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("in_progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("REJECTED".parse::<Status>().unwrap(), Status::Rejected);
        assert!("Closed".parse::<Status>().is_err());
        assert_eq!(serde_json::to_value(Status::InProgress).unwrap(), "In Progress");
    }

    #[test]
    fn principal_exposes_id_and_role() {
        let id = Uuid::new_v4();
        let p = Principal::from_role(Role::Department, id);
        assert_eq!(p.id(), id);
        assert_eq!(p.role(), Role::Department);
        assert!(!p.is_admin());
    }
}
