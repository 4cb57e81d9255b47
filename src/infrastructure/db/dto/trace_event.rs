use crate::domain::entities::feed::{DetailSource, ExecutionDetail, ExecutionStatus};
use crate::domain::value_objects::timestamps::Timestamp;
use serde_json::Value;
use time::OffsetDateTime;

/// One structured trace row from the analytical log store.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TraceEventRow {
    pub trace_id: String,
    pub entity_id: String,
    pub entity_type: String,
    pub environment_id: String,
    pub detail: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub is_test: bool,
    pub is_retry: bool,
    pub raw_payload: Option<String>,
    pub seq: i64,
    pub created_at: OffsetDateTime,
}

impl TraceEventRow {
    /// Build an execution detail. Provider id stays unset here; callers
    /// holding step-level provider metadata overlay it afterwards.
    pub fn into_detail(self) -> ExecutionDetail {
        ExecutionDetail {
            id: self.trace_id,
            job_id: self.entity_id,
            detail: self.detail.unwrap_or_default(),
            source: DetailSource::from_raw(self.source.as_deref().unwrap_or_default()),
            status: ExecutionStatus::from_raw(self.status.as_deref().unwrap_or_default()),
            provider_id: None,
            is_test: self.is_test,
            is_retry: self.is_retry,
            created_at: Timestamp::from(self.created_at),
            raw: self
                .raw_payload
                .as_deref()
                .and_then(|raw| serde_json::from_str::<Value>(raw).ok()),
        }
    }
}
