use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::StepRunRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepRunStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for StepRunStoreError {
    fn from(_: DatabaseError) -> Self {
        StepRunStoreError::StorageUnavailable
    }
}

/// The step-run analytical store.
#[async_trait]
pub trait StepRunStore: Send + Sync {
    /// All step-run writes for a transaction, ascending by write order.
    /// Duplicate writes per logical step are the caller's to collapse.
    async fn list_by_transaction(
        &self,
        scope: &TenantScope,
        transaction_id: &str,
    ) -> Result<Vec<StepRunRow>, StepRunStoreError>;
}
