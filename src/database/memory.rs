use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Comment, Department, Grievance, GrievanceChanges, NewComment, NewGrievance, User, UserSummary,
};
use crate::database::repository::GrievanceStore;
use crate::filter::{Filter, FilterOrderInfo, FilterScope, FilterWhereInfo, SortDirection, SortField};

#[derive(Default)]
struct MemoryState {
    grievances: Vec<Grievance>,
    users: HashMap<Uuid, User>,
    departments: Vec<Department>,
}

/// Process-local grievance store. Used for local development
/// (`DATABASE_BACKEND=memory`) and by the HTTP tests.
#[derive(Default)]
pub struct MemoryGrievanceStore {
    state: RwLock<MemoryState>,
}

impl MemoryGrievanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(filter: &Filter, grievance: &Grievance) -> bool {
    let in_scope = match filter.scope() {
        FilterScope::All => true,
        FilterScope::SubmittedBy(id) => grievance.submitted_by == *id,
        FilterScope::Department(id) => grievance.department == Some(*id),
    };

    in_scope
        && filter.conditions().iter().all(|condition| match condition {
            FilterWhereInfo::Status(s) => grievance.status == *s,
            FilterWhereInfo::Category(c) => grievance.category == *c,
            FilterWhereInfo::Priority(p) => grievance.priority == *p,
        })
}

fn compare(order: &[FilterOrderInfo], a: &Grievance, b: &Grievance) -> Ordering {
    for info in order {
        let ordering = match info.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::Priority => a.priority.cmp(&b.priority),
        };
        let ordering = match info.sort {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl GrievanceStore for MemoryGrievanceStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn insert(&self, new: NewGrievance) -> Result<Grievance, DatabaseError> {
        let now = Utc::now();
        let grievance = Grievance {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            status: Default::default(),
            submitted_by: new.submitted_by,
            assigned_to: None,
            department: new.department,
            attachments: new.attachments.into_iter().map(|a| a.into_attachment(now)).collect(),
            comments: vec![],
            created_at: now,
            updated_at: now,
        };

        self.state.write().await.grievances.push(grievance.clone());
        Ok(grievance)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Grievance>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.grievances.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_attachment(&self, reference: &str) -> Result<Option<Grievance>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.grievances.iter().find(|g| g.has_attachment(reference)).cloned())
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<Grievance>, DatabaseError> {
        let state = self.state.read().await;
        let mut found: Vec<Grievance> = state.grievances.iter().filter(|g| matches(filter, g)).cloned().collect();
        found.sort_by(|a, b| compare(filter.ordering(), a, b));
        Ok(found)
    }

    async fn update(&self, id: Uuid, changes: GrievanceChanges) -> Result<Grievance, DatabaseError> {
        let mut state = self.state.write().await;
        let grievance = state
            .grievances
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("grievance {}", id)))?;

        changes.apply(grievance, Utc::now());
        Ok(grievance.clone())
    }

    async fn push_comment(&self, id: Uuid, comment: NewComment) -> Result<Grievance, DatabaseError> {
        let mut state = self.state.write().await;
        let grievance = state
            .grievances
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("grievance {}", id)))?;

        let now = Utc::now();
        grievance.comments.push(Comment {
            id: Uuid::new_v4(),
            text: comment.text,
            user: comment.user,
            created_at: now,
        });
        grievance.updated_at = now;
        Ok(grievance.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.grievances.len();
        state.grievances.retain(|g| g.id != id);
        Ok(state.grievances.len() != before)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<UserSummary>, DatabaseError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).cloned())
            .map(UserSummary::from)
            .collect())
    }

    async fn upsert_user(&self, user: User) -> Result<(), DatabaseError> {
        self.state.write().await.users.insert(user.id, user);
        Ok(())
    }

    async fn department_by_code(&self, code: &str) -> Result<Option<Department>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.departments.iter().find(|d| d.code == code).cloned())
    }

    async fn list_departments(&self) -> Result<Vec<Department>, DatabaseError> {
        let mut departments = self.state.read().await.departments.clone();
        departments.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(departments)
    }

    async fn ensure_department(&self, code: &str, name: &str) -> Result<Department, DatabaseError> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.departments.iter().find(|d| d.code == code) {
            return Ok(existing.clone());
        }
        let department = Department {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.departments.push(department.clone());
        Ok(department)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterData;
    use crate::types::{Category, Status};

    fn new_grievance(owner: Uuid, title: &str, category: Category) -> NewGrievance {
        NewGrievance {
            title: title.into(),
            description: "details".into(),
            category,
            priority: "Medium".into(),
            submitted_by: owner,
            department: None,
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn list_scopes_filters_and_sorts() {
        let store = MemoryGrievanceStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert(new_grievance(alice, "b-wifi", Category::Infrastructure)).await.unwrap();
        store.insert(new_grievance(alice, "a-mess", Category::Hostel)).await.unwrap();
        store.insert(new_grievance(bob, "c-exam", Category::Academic)).await.unwrap();

        let mut filter = Filter::new("grievances", FilterScope::SubmittedBy(alice)).unwrap();
        filter.assign(FilterData { sort: Some("title".into()), ..Default::default() }).unwrap();
        let titles: Vec<_> = store.list(&filter).await.unwrap().into_iter().map(|g| g.title).collect();
        assert_eq!(titles, ["a-mess", "b-wifi"]);

        let mut filter = Filter::new("grievances", FilterScope::All).unwrap();
        filter.assign(FilterData { category: Some("Academic".into()), ..Default::default() }).unwrap();
        let found = store.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].submitted_by, bob);
    }

    #[tokio::test]
    async fn comments_append_in_order() {
        let store = MemoryGrievanceStore::new();
        let owner = Uuid::new_v4();
        let g = store.insert(new_grievance(owner, "leak", Category::Hostel)).await.unwrap();
        assert_eq!(g.status, Status::Pending);

        for text in ["first", "second", "third"] {
            store.push_comment(g.id, NewComment { text: text.into(), user: owner }).await.unwrap();
        }
        let stored = store.find_by_id(g.id).await.unwrap().unwrap();
        let texts: Vec<_> = stored.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["first", "second", "third"]);

        let missing = store.push_comment(Uuid::new_v4(), NewComment { text: "x".into(), user: owner }).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn ensure_department_is_idempotent() {
        let store = MemoryGrievanceStore::new();
        let first = store.ensure_department("HOSTEL001", "Hostel Management").await.unwrap();
        let second = store.ensure_department("HOSTEL001", "Renamed").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(store.list_departments().await.unwrap().len(), 1);
    }
}
