// Batched join of execution trace rows onto their owning entities.

use crate::domain::entities::feed::ExecutionDetail;
use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::stores::trace_log_store::{TraceLogStore, TraceStoreError};
use std::collections::HashMap;

/// Trace rows for this subsystem are always written under one entity type,
/// whichever store the owning entity was read from.
pub const TRACE_ENTITY_TYPE: &str = "step_run";

pub struct TraceEnrichment;

impl TraceEnrichment {
    /// Fetch and group execution details for a set of owning entities in a
    /// single batched query. Provider id is left unset; callers with
    /// step-level provider metadata overlay it afterwards.
    pub async fn enrich(
        store: &dyn TraceLogStore,
        scope: &TenantScope,
        entity_ids: &[String],
    ) -> Result<HashMap<String, Vec<ExecutionDetail>>, TraceStoreError> {
        // Step 1: Empty input never touches the store.
        if entity_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Step 2: One batched query for the whole entity set.
        let rows = store
            .list_by_entities(scope, TRACE_ENTITY_TYPE, entity_ids)
            .await?;

        // Step 3: Group by owning entity, preserving the store's ascending
        // creation order.
        let mut grouped: HashMap<String, Vec<ExecutionDetail>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.entity_id.clone())
                .or_default()
                .push(row.into_detail());
        }

        Ok(grouped)
    }
}
