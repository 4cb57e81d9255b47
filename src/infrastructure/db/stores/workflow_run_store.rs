use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::WorkflowRunRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowRunStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for WorkflowRunStoreError {
    fn from(_: DatabaseError) -> Self {
        WorkflowRunStoreError::StorageUnavailable
    }
}

/// The workflow-run analytical store.
#[async_trait]
pub trait WorkflowRunStore: Send + Sync {
    /// Most recent write for the given run id, if any.
    async fn latest_by_run_id(
        &self,
        scope: &TenantScope,
        run_id: &str,
    ) -> Result<Option<WorkflowRunRow>, WorkflowRunStoreError>;
}
