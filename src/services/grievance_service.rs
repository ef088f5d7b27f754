use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::database::models::{
    Grievance, GrievanceChanges, GrievanceView, NewAttachment, NewComment, NewGrievance, UserSummary,
};
use crate::database::{DatabaseError, GrievanceStore, GRIEVANCE_TABLE};
use crate::filter::{Filter, FilterData, FilterScope};
use crate::services::access::{authorize, require_submitter, Action};
use crate::services::ServiceError;
use crate::state::AppState;
use crate::storage::{self, AttachmentStore, StoredFile, Upload};
use crate::types::{Category, Principal, Status};

pub const DEFAULT_PRIORITY: &str = "Medium";

/// Create payload after transport decoding (multipart or JSON)
#[derive(Debug, Clone, Default)]
pub struct CreateGrievance {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub uploads: Vec<Upload>,
}

/// Partial update payload. `None` means the field was absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateGrievance {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub uploads: Vec<Upload>,
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(GrievanceView),
    /// The record was removed under the delete-on-reject policy
    Deleted(Uuid),
}

/// Grievance lifecycle operations. Every call takes the caller's principal
/// explicitly and checks it against the record it touches.
#[derive(Clone)]
pub struct GrievanceService {
    store: Arc<dyn GrievanceStore>,
    attachments: Arc<dyn AttachmentStore>,
    policy: PolicyConfig,
}

impl GrievanceService {
    pub fn new(store: Arc<dyn GrievanceStore>, attachments: Arc<dyn AttachmentStore>, policy: PolicyConfig) -> Self {
        Self {
            store,
            attachments,
            policy,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.attachments.clone(), state.policy.clone())
    }

    pub async fn create(&self, principal: &Principal, input: CreateGrievance) -> Result<GrievanceView, ServiceError> {
        require_submitter(principal)?;
        let title = required_text("title", input.title)?;
        let description = required_text("description", input.description)?;
        let category = parse_category(
            input
                .category
                .ok_or_else(|| ServiceError::validation("category", "is required"))?,
        )?;
        let priority = match input.priority.map(|p| p.trim().to_string()) {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_PRIORITY.to_string(),
        };
        if input.uploads.len() > 1 {
            return Err(ServiceError::validation("photo", "at most one file may be attached on create"));
        }

        let department = self.resolve_department(category).await;
        let attachments = self.store_uploads(input.uploads).await?;
        let references = references_of(&attachments);

        let inserted = self
            .store
            .insert(NewGrievance {
                title,
                description,
                category,
                priority,
                submitted_by: principal.id(),
                department,
                attachments,
            })
            .await;
        let grievance = match inserted {
            Ok(grievance) => grievance,
            Err(e) => {
                self.discard_uploads(&references).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            "Grievance {} created by {} ({}, department {:?})",
            grievance.id,
            principal.id(),
            category,
            department
        );
        self.project_one(grievance).await
    }

    pub async fn list(&self, principal: &Principal, query: FilterData) -> Result<Vec<GrievanceView>, ServiceError> {
        require_submitter(principal)?;
        let scope = if principal.is_admin() {
            FilterScope::All
        } else {
            FilterScope::SubmittedBy(principal.id())
        };
        let mut filter = Filter::new(GRIEVANCE_TABLE, scope)?;
        filter.assign(query)?;

        let grievances = self.store.list(&filter).await?;
        tracing::debug!("Listed {} grievances for {}", grievances.len(), principal.id());
        self.project(grievances).await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> Result<GrievanceView, ServiceError> {
        let grievance = self.load(id).await?;
        authorize(principal, &grievance, Action::Read)?;
        self.project_one(grievance).await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateGrievance,
    ) -> Result<UpdateOutcome, ServiceError> {
        let current = self.load(id).await?;
        authorize(principal, &current, Action::Update)?;

        let mut changes = GrievanceChanges::default();
        if principal.is_admin() {
            if let Some(status) = input.status {
                changes.status = Some(
                    status
                        .parse::<Status>()
                        .map_err(|e| ServiceError::validation("status", e))?,
                );
            }
            if let Some(assignee) = input.assigned_to {
                changes.assigned_to = Some(
                    Uuid::parse_str(assignee.trim())
                        .map_err(|_| ServiceError::validation("assignedTo", "must be a user id"))?,
                );
            }

            if changes.status == Some(Status::Rejected) && self.policy.delete_on_reject {
                self.store.delete(id).await?;
                tracing::info!("Grievance {} rejected by {} and removed", id, principal.id());
                return Ok(UpdateOutcome::Deleted(id));
            }
        } else {
            changes.title = input.title.map(|t| required_text("title", Some(t))).transpose()?;
            changes.description = input
                .description
                .map(|d| required_text("description", Some(d)))
                .transpose()?;
            changes.category = input.category.map(parse_category).transpose()?;
            changes.priority = input
                .priority
                .map(|p| required_text("priority", Some(p)))
                .transpose()?;
        }

        changes.attachments = self.store_uploads(input.uploads).await?;
        let references = references_of(&changes.attachments);

        if changes.is_empty() {
            return self.project_one(current).await.map(UpdateOutcome::Updated);
        }

        let updated = match self.store.update(id, changes).await {
            Ok(updated) => updated,
            Err(e) => {
                self.discard_uploads(&references).await;
                return Err(not_found_as_service(e));
            }
        };
        tracing::info!("Grievance {} updated by {} (status {})", id, principal.id(), updated.status);
        self.project_one(updated).await.map(UpdateOutcome::Updated)
    }

    pub async fn add_comment(&self, principal: &Principal, id: Uuid, text: Option<String>) -> Result<GrievanceView, ServiceError> {
        let grievance = self.load(id).await?;
        authorize(principal, &grievance, Action::Comment)?;

        let text = required_text("text", text)?;
        let updated = self
            .store
            .push_comment(
                id,
                NewComment {
                    text,
                    user: principal.id(),
                },
            )
            .await
            .map_err(not_found_as_service)?;

        tracing::debug!("Comment added to grievance {} by {}", id, principal.id());
        self.project_one(updated).await
    }

    /// Admin-only removal. Stored attachment files are left in place.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<Uuid, ServiceError> {
        if !principal.is_admin() {
            return Err(ServiceError::Forbidden("Only administrators may delete grievances".to_string()));
        }
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(format!("Grievance {} not found", id)));
        }
        tracing::info!("Grievance {} deleted by {}", id, principal.id());
        Ok(id)
    }

    pub async fn attachment(&self, principal: &Principal, reference: &str) -> Result<StoredFile, ServiceError> {
        storage::validate_reference(reference).map_err(|_| attachment_not_found(reference))?;

        let owner = self
            .store
            .find_by_attachment(reference)
            .await?
            .ok_or_else(|| attachment_not_found(reference))?;
        authorize(principal, &owner, Action::Download)?;

        self.attachments
            .get(reference)
            .await?
            .ok_or_else(|| attachment_not_found(reference))
    }

    /// Grievances routed to the caller's department, newest first
    pub async fn list_for_department(&self, principal: &Principal) -> Result<Vec<GrievanceView>, ServiceError> {
        let department = match principal {
            Principal::Department { id } => *id,
            _ => return Err(ServiceError::Forbidden("Department account required".to_string())),
        };
        let filter = Filter::new(GRIEVANCE_TABLE, FilterScope::Department(department))?;
        let grievances = self.store.list(&filter).await?;
        self.project(grievances).await
    }

    async fn load(&self, id: Uuid) -> Result<Grievance, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Grievance {} not found", id)))
    }

    /// Best-effort: a missing directory entry or a lookup failure leaves the
    /// grievance unrouted rather than failing the create.
    async fn resolve_department(&self, category: Category) -> Option<Uuid> {
        let code = category.department_code();
        match self.store.department_by_code(code).await {
            Ok(Some(department)) => Some(department.id),
            Ok(None) => {
                tracing::warn!("No department registered for code {}", code);
                None
            }
            Err(e) => {
                tracing::warn!("Department lookup for {} failed: {}", code, e);
                None
            }
        }
    }

    async fn store_uploads(&self, uploads: Vec<Upload>) -> Result<Vec<NewAttachment>, ServiceError> {
        let mut stored = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.attachments.put(upload).await {
                Ok(attachment) => {
                    tracing::debug!("Stored attachment {} ({} bytes)", attachment.reference, attachment.size);
                    stored.push(attachment);
                }
                Err(e) => {
                    self.discard_uploads(&references_of(&stored)).await;
                    return Err(e.into());
                }
            }
        }
        Ok(stored)
    }

    /// Remove files stored for a record write that did not happen. Failures are
    /// logged and otherwise ignored; the write error is what the caller sees.
    async fn discard_uploads(&self, references: &[String]) {
        for reference in references {
            match self.attachments.delete(reference).await {
                Ok(_) => tracing::debug!("Discarded unreferenced attachment {}", reference),
                Err(e) => tracing::warn!("Could not discard attachment {}: {}", reference, e),
            }
        }
    }

    async fn project_one(&self, grievance: Grievance) -> Result<GrievanceView, ServiceError> {
        let mut views = self.project(vec![grievance]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::NotFound("Grievance not found".to_string()))
    }

    /// Replace user ids with identity projections using one batched lookup
    async fn project(&self, grievances: Vec<Grievance>) -> Result<Vec<GrievanceView>, ServiceError> {
        let ids: Vec<Uuid> = grievances
            .iter()
            .flat_map(|g| g.user_refs())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let users: HashMap<Uuid, UserSummary> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.store
                .users_by_ids(&ids)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect()
        };

        Ok(grievances
            .into_iter()
            .map(|g| g.into_view(|id| users.get(&id).cloned().unwrap_or_else(|| UserSummary::unknown(id))))
            .collect())
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ServiceError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        Some(_) => Err(ServiceError::validation(field, "must not be empty")),
        None => Err(ServiceError::validation(field, "is required")),
    }
}

fn parse_category(raw: String) -> Result<Category, ServiceError> {
    raw.parse::<Category>()
        .map_err(|e| ServiceError::validation("category", e))
}

fn references_of(attachments: &[NewAttachment]) -> Vec<String> {
    attachments.iter().map(|a| a.reference.clone()).collect()
}

fn attachment_not_found(reference: &str) -> ServiceError {
    ServiceError::NotFound(format!("Attachment {} not found", reference))
}

fn not_found_as_service(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
        other => ServiceError::Database(other),
    }
}
