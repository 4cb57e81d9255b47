use crate::domain::value_objects::ids::OrganizationId;
use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::dto::TenantRow;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for TenantStoreError {
    fn from(_: DatabaseError) -> Self {
        TenantStoreError::StorageUnavailable
    }
}

#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Fetch tenant metadata. Returns `None` if the organization is
    /// unknown; callers on the list path treat that as an integrity fault.
    async fn get(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<TenantRow>, TenantStoreError>;
}
