use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::database::DatabaseError;
use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStoreError {
    StorageUnavailable,
}

impl From<DatabaseError> for FeedStoreError {
    fn from(_: DatabaseError) -> Self {
        FeedStoreError::StorageUnavailable
    }
}

/// Store-level predicates for the paginated list query. All predicates are
/// optional and AND'd together; empty vecs mean "no constraint".
#[derive(Debug, Clone, Default)]
pub struct FeedListFilters {
    pub channels: Vec<String>,
    pub template_ids: Vec<String>,
    pub subscriber_ids: Vec<String>,
    pub severities: Vec<String>,
    pub transaction_id: Option<String>,
    pub topic_key: Option<String>,
    pub after: Option<OffsetDateTime>,
    pub before: Option<OffsetDateTime>,
}

/// The legacy document store. Returns raw document values; decoding (and
/// dropping undecodable entries) is the caller's concern.
#[async_trait]
pub trait LegacyFeedStore: Send + Sync {
    /// Fetch the full document, embedded jobs included.
    async fn get_full(&self, scope: &TenantScope, id: &str)
    -> Result<Option<Value>, FeedStoreError>;
    /// Fetch the document envelope without its embedded jobs (cheap
    /// existence check plus metadata).
    async fn get_metadata(
        &self,
        scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Value>, FeedStoreError>;
    /// Page through documents matching the filter set, newest first.
    async fn list(
        &self,
        scope: &TenantScope,
        filters: &FeedListFilters,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Value>, FeedStoreError>;
}
