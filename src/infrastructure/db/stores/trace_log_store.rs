use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::TraceEventRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for TraceStoreError {
    fn from(_: DatabaseError) -> Self {
        TraceStoreError::StorageUnavailable
    }
}

/// The analytical trace/log store, always queried through a fixed
/// `entity_type` discriminator.
#[async_trait]
pub trait TraceLogStore: Send + Sync {
    /// One batched fetch for every entity in the set, ascending by creation
    /// time. Never called per-entity.
    async fn list_by_entities(
        &self,
        scope: &TenantScope,
        entity_type: &str,
        entity_ids: &[String],
    ) -> Result<Vec<TraceEventRow>, TraceStoreError>;
}
