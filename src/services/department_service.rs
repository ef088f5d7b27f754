use std::sync::Arc;

use crate::database::models::Department;
use crate::database::GrievanceStore;
use crate::services::ServiceError;

/// Department directory maintenance
pub struct DepartmentService {
    store: Arc<dyn GrievanceStore>,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn GrievanceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Department>, ServiceError> {
        Ok(self.store.list_departments().await?)
    }

    /// Register one department per category. Existing codes are left as they are.
    pub async fn seed_directory(&self) -> Result<Vec<Department>, ServiceError> {
        let mut seeded = Vec::new();
        for (code, name) in Department::directory() {
            let department = self.store.ensure_department(code, name).await?;
            tracing::info!("Department {} ({}) -> {}", department.code, department.name, department.id);
            seeded.push(department);
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryGrievanceStore;
    use crate::types::Category;

    #[tokio::test]
    async fn seeding_twice_keeps_ids_stable() {
        let svc = DepartmentService::new(Arc::new(MemoryGrievanceStore::new()));
        let first = svc.seed_directory().await.unwrap();
        let second = svc.seed_directory().await.unwrap();

        assert_eq!(first.len(), Category::ALL.len());
        assert_eq!(
            first.iter().map(|d| d.id).collect::<Vec<_>>(),
            second.iter().map(|d| d.id).collect::<Vec<_>>()
        );
        assert_eq!(svc.list().await.unwrap().len(), Category::ALL.len());
    }
}
