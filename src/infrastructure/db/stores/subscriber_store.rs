use crate::domain::value_objects::ids::EnvironmentId;
use crate::infrastructure::db::database::DatabaseError;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for SubscriberStoreError {
    fn from(_: DatabaseError) -> Self {
        SubscriberStoreError::StorageUnavailable
    }
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Resolve id/email/free-text predicates to a concrete subscriber-id
    /// set. All supplied predicates are AND'd.
    async fn search_ids(
        &self,
        environment_id: &EnvironmentId,
        ids: &[String],
        emails: &[String],
        free_text: Option<&str>,
    ) -> Result<Vec<String>, SubscriberStoreError>;
}
