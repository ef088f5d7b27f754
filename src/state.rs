use std::sync::Arc;

use crate::config::{AppConfig, DatabaseBackend, PolicyConfig, SecurityConfig};
use crate::database::{DatabaseManager, GrievanceStore, MemoryGrievanceStore, PgGrievanceStore};
use crate::storage::{self, AttachmentStore};

/// Shared handles every handler can reach. Both stores are safe to share
/// across requests; nothing else here is mutable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GrievanceStore>,
    pub attachments: Arc<dyn AttachmentStore>,
    pub security: Arc<SecurityConfig>,
    pub policy: PolicyConfig,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn GrievanceStore>,
        attachments: Arc<dyn AttachmentStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            attachments,
            security: Arc::new(config.security.clone()),
            policy: config.policy.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }

    /// Build the record store and attachment store the configuration asks for
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let (store, pool): (Arc<dyn GrievanceStore>, _) = match config.database.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database).await?;
                (Arc::new(PgGrievanceStore::new(pool.clone())), Some(pool))
            }
            DatabaseBackend::Memory => {
                tracing::warn!("Using in-memory grievance store; data is lost on restart");
                (Arc::new(MemoryGrievanceStore::new()), None)
            }
        };

        let attachments = storage::from_config(&config.storage, pool)?;
        Ok(Self::new(store, attachments, config))
    }
}
