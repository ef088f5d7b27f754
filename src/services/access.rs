//! Authorization predicate for single-grievance operations.

use crate::database::models::Grievance;
use crate::services::ServiceError;
use crate::types::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Update,
    Comment,
    Download,
}

impl Action {
    fn verb(&self) -> &'static str {
        match self {
            Action::Read => "access",
            Action::Update => "update",
            Action::Comment => "comment on",
            Action::Download => "download attachments of",
        }
    }
}

/// Admins may act on every grievance; students only on their own.
/// Department accounts work through their scoped queue instead.
pub fn can_access(principal: &Principal, grievance: &Grievance) -> bool {
    match principal {
        Principal::Admin { .. } => true,
        Principal::Student { id } => grievance.submitted_by == *id,
        Principal::Department { .. } => false,
    }
}

/// Department accounts have no submissions of their own; only students and
/// admins may file or list grievances.
pub fn require_submitter(principal: &Principal) -> Result<(), ServiceError> {
    match principal {
        Principal::Department { id } => {
            tracing::warn!("Department {} denied submitter route", id);
            Err(ServiceError::Forbidden("Department accounts use the department queue".to_string()))
        }
        _ => Ok(()),
    }
}

pub fn authorize(principal: &Principal, grievance: &Grievance, action: Action) -> Result<(), ServiceError> {
    if can_access(principal, grievance) {
        return Ok(());
    }
    tracing::warn!(
        "{:?} {} denied {:?} on grievance {}",
        principal.role(),
        principal.id(),
        action,
        grievance.id
    );
    Err(ServiceError::Forbidden(format!("Not authorized to {} this grievance", action.verb())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Status};
    use chrono::Utc;
    use uuid::Uuid;

    fn owned_by(owner: Uuid) -> Grievance {
        let now = Utc::now();
        Grievance {
            id: Uuid::new_v4(),
            title: "Broken AC".into(),
            description: "Not cooling".into(),
            category: Category::Hostel,
            priority: "High".into(),
            status: Status::Pending,
            submitted_by: owner,
            assigned_to: None,
            department: Some(Uuid::new_v4()),
            attachments: vec![],
            comments: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_and_admin_pass_everyone_else_is_forbidden() {
        let owner = Uuid::new_v4();
        let g = owned_by(owner);

        assert!(can_access(&Principal::Student { id: owner }, &g));
        assert!(can_access(&Principal::Admin { id: Uuid::new_v4() }, &g));
        assert!(!can_access(&Principal::Student { id: Uuid::new_v4() }, &g));
        assert!(!can_access(&Principal::Department { id: g.department.unwrap() }, &g));
    }

    #[test]
    fn department_accounts_are_not_submitters() {
        assert!(require_submitter(&Principal::Student { id: Uuid::new_v4() }).is_ok());
        assert!(require_submitter(&Principal::Admin { id: Uuid::new_v4() }).is_ok());
        assert!(matches!(
            require_submitter(&Principal::Department { id: Uuid::new_v4() }),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn denial_is_forbidden_with_action_in_message() {
        let g = owned_by(Uuid::new_v4());
        let err = authorize(&Principal::Student { id: Uuid::new_v4() }, &g, Action::Comment).unwrap_err();
        match err {
            ServiceError::Forbidden(msg) => assert_eq!(msg, "Not authorized to comment on this grievance"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
