use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::GrievanceStore;
use crate::services::ServiceError;
use crate::types::Role;

pub const DEMO_STUDENT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0001);
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_4000_8000_0000_0000_0002);

/// User directory maintenance
pub struct UserService {
    store: Arc<dyn GrievanceStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn GrievanceStore>) -> Self {
        Self { store }
    }

    /// Fixed-id student and admin for the in-memory development mode, so
    /// identity projections have something to resolve against.
    pub async fn seed_demo(&self) -> Result<Vec<User>, ServiceError> {
        let now = Utc::now();
        let users = vec![
            User {
                id: DEMO_STUDENT_ID,
                name: "Demo Student".to_string(),
                email: "demo.student@campus.local".to_string(),
                student_id: Some("DEMO-0001".to_string()),
                role: Role::Student.as_str().to_string(),
                department: None,
                created_at: now,
            },
            User {
                id: DEMO_ADMIN_ID,
                name: "Demo Admin".to_string(),
                email: "demo.admin@campus.local".to_string(),
                student_id: None,
                role: Role::Admin.as_str().to_string(),
                department: None,
                created_at: now,
            },
        ];

        for user in &users {
            self.store.upsert_user(user.clone()).await?;
            tracing::info!("Demo {} {} ({})", user.role, user.id, user.email);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryGrievanceStore;

    #[tokio::test]
    async fn demo_users_resolve_for_projections() {
        let store = Arc::new(MemoryGrievanceStore::new());
        UserService::new(store.clone()).seed_demo().await.unwrap();
        UserService::new(store.clone()).seed_demo().await.unwrap();

        let mut found = store.users_by_ids(&[DEMO_STUDENT_ID, DEMO_ADMIN_ID]).await.unwrap();
        found.sort_by_key(|u| u.id);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name.as_deref(), Some("Demo Student"));
        assert_eq!(found[0].student_id.as_deref(), Some("DEMO-0001"));
        assert_eq!(found[1].role.as_deref(), Some("admin"));
    }
}
