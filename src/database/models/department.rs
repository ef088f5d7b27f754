use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Category;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Department {
    /// The static directory: one department per grievance category.
    pub fn directory() -> Vec<(&'static str, &'static str)> {
        Category::ALL
            .iter()
            .map(|c| {
                let name = match c {
                    Category::Academic => "Academic Affairs",
                    Category::Administration => "Administration Office",
                    Category::Infrastructure => "Infrastructure & Maintenance",
                    Category::Hostel => "Hostel Management",
                    Category::General => "General Services",
                };
                (c.department_code(), name)
            })
            .collect()
    }
}
