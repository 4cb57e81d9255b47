// Use case: list_activities (paginated feed listing).

use crate::application::context::AppContext;
use crate::application::shared::trace_enrichment::TraceEnrichment;
use crate::domain::entities::feed::FeedRecord;
use crate::domain::services::retention_policy::{RetentionError, RetentionPolicy};
use crate::domain::value_objects::ids::TenantScope;
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::FeedDocument;
use crate::infrastructure::db::stores::legacy_feed_store::FeedListFilters;
use crate::infrastructure::flags::FeatureFlag;
use tracing::warn;

/// Lists feed records for a tenant, newest first, with optional trace
/// enrichment behind a flag.
pub struct ListActivitiesUseCase;

#[derive(Debug)]
pub enum ListActivitiesError {
    /// The organization has no tenant record. An integrity fault, not a
    /// caller mistake.
    TenantMissing,
    Retention(RetentionError),
    Storage(String),
}

/// Caller-level predicates. Search/email/subscriber predicates are resolved
/// to concrete subscriber ids before the feed store is queried.
#[derive(Debug, Clone, Default)]
pub struct ListActivitiesQuery {
    pub channels: Vec<String>,
    pub template_ids: Vec<String>,
    pub subscriber_ids: Vec<String>,
    pub emails: Vec<String>,
    pub search: Option<String>,
    pub transaction_id: Option<String>,
    pub topic_key: Option<String>,
    pub severities: Vec<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ActivityPage {
    pub data: Vec<FeedRecord>,
    pub has_more: bool,
    pub page: u32,
}

impl ListActivitiesUseCase {
    pub async fn execute(
        ctx: &AppContext,
        scope: &TenantScope,
        query: &ListActivitiesQuery,
        page: u32,
        limit: u32,
    ) -> Result<ActivityPage, ListActivitiesError> {
        // Step 1: Load tenant metadata; listing without a tenant record is
        // an integrity violation.
        let tenant = ctx
            .stores
            .tenants
            .get(&scope.organization_id)
            .await
            .map_err(|e| ListActivitiesError::Storage(format!("{e:?}")))?
            .ok_or(ListActivitiesError::TenantMissing)?
            .into_tenant();

        // Step 2: Normalize and validate the date range against retention.
        let window = RetentionPolicy::resolve(
            &tenant,
            query.after.as_deref(),
            query.before.as_deref(),
            Timestamp::now_utc(),
            ctx.self_hosted,
        )
        .map_err(ListActivitiesError::Retention)?;

        // Step 3: Resolve subscriber predicates to a concrete id set. An
        // empty match can never match any record, so skip the feed store.
        let wants_subscriber_narrowing = !query.subscriber_ids.is_empty()
            || !query.emails.is_empty()
            || query.search.is_some();
        let subscriber_ids = if wants_subscriber_narrowing {
            let ids = ctx
                .stores
                .subscribers
                .search_ids(
                    &scope.environment_id,
                    &query.subscriber_ids,
                    &query.emails,
                    query.search.as_deref(),
                )
                .await
                .map_err(|e| ListActivitiesError::Storage(format!("{e:?}")))?;
            if ids.is_empty() {
                return Ok(ActivityPage {
                    data: Vec::new(),
                    has_more: false,
                    page,
                });
            }
            ids
        } else {
            Vec::new()
        };

        // Step 4: Page through the legacy store with the full filter set.
        let filters = FeedListFilters {
            channels: query.channels.clone(),
            template_ids: query.template_ids.clone(),
            subscriber_ids,
            severities: query.severities.clone(),
            transaction_id: query.transaction_id.clone(),
            topic_key: query.topic_key.clone(),
            after: Some(window.after.as_inner()),
            before: Some(window.before.as_inner()),
        };
        let raw = ctx
            .stores
            .feed
            .list(scope, &filters, page.saturating_mul(limit), limit)
            .await
            .map_err(|e| ListActivitiesError::Storage(format!("{e:?}")))?;

        // Step 5: Page-probe heuristic, counted before dropping entries.
        let has_more = raw.len() == limit as usize;

        // Step 6: Decode, dropping undecodable entries instead of failing
        // the page.
        let mut records: Vec<FeedRecord> = Vec::with_capacity(raw.len());
        for value in raw {
            match FeedDocument::decode(value) {
                Ok(doc) => records.push(doc.into_record()),
                Err(err) => warn!(
                    environment_id = scope.environment_id.as_str(),
                    error = %err,
                    "feed_list_entry_dropped"
                ),
            }
        }

        // Step 7: Optional trace enrichment. Failure degrades the page to
        // its un-enriched form rather than failing it.
        if ctx
            .flags
            .is_enabled(FeatureFlag::ListTraceEnrichment, scope, false)
            .await
        {
            let job_ids: Vec<String> = records
                .iter()
                .flat_map(|record| record.jobs.iter().map(|job| job.id.clone()))
                .collect();
            match TraceEnrichment::enrich(ctx.stores.traces.as_ref(), scope, &job_ids).await {
                Ok(mut details) => {
                    for record in &mut records {
                        for job in &mut record.jobs {
                            if let Some(list) = details.remove(&job.id) {
                                job.execution_details = list;
                            }
                        }
                    }
                }
                Err(err) => warn!(
                    environment_id = scope.environment_id.as_str(),
                    error = ?err,
                    "feed_list_enrichment_failed"
                ),
            }
        }

        Ok(ActivityPage {
            data: records,
            has_more,
            page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ListActivitiesError, ListActivitiesQuery, ListActivitiesUseCase};
    use crate::application::context::test_support::test_context;
    use crate::config::Flags;
    use crate::domain::services::retention_policy::RetentionError;
    use crate::domain::value_objects::ids::{EnvironmentId, OrganizationId, TenantScope};
    use crate::infrastructure::db::dto::{TenantRow, TraceEventRow};
    use crate::infrastructure::db::stores::legacy_feed_store::{
        FeedListFilters, FeedStoreError, LegacyFeedStore,
    };
    use crate::infrastructure::db::stores::subscriber_store::{
        SubscriberStore, SubscriberStoreError,
    };
    use crate::infrastructure::db::stores::tenant_store::{TenantStore, TenantStoreError};
    use crate::infrastructure::db::stores::trace_log_store::{TraceLogStore, TraceStoreError};
    use crate::infrastructure::flags::SettingsFlagService;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use time::OffsetDateTime;

    struct DummyTenantStore {
        row: Mutex<Option<TenantRow>>,
    }

    #[async_trait]
    impl TenantStore for DummyTenantStore {
        async fn get(
            &self,
            _organization_id: &OrganizationId,
        ) -> Result<Option<TenantRow>, TenantStoreError> {
            Ok(self.row.lock().unwrap().clone())
        }
    }

    struct DummyFeedStore {
        docs: Mutex<Vec<Value>>,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl LegacyFeedStore for DummyFeedStore {
        async fn get_full(
            &self,
            _scope: &TenantScope,
            _id: &str,
        ) -> Result<Option<Value>, FeedStoreError> {
            Err(FeedStoreError::StorageUnavailable)
        }

        async fn get_metadata(
            &self,
            _scope: &TenantScope,
            _id: &str,
        ) -> Result<Option<Value>, FeedStoreError> {
            Err(FeedStoreError::StorageUnavailable)
        }

        async fn list(
            &self,
            _scope: &TenantScope,
            _filters: &FeedListFilters,
            _offset: u32,
            _limit: u32,
        ) -> Result<Vec<Value>, FeedStoreError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.docs.lock().unwrap().clone())
        }
    }

    struct DummySubscriberStore {
        ids: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SubscriberStore for DummySubscriberStore {
        async fn search_ids(
            &self,
            _environment_id: &EnvironmentId,
            _ids: &[String],
            _emails: &[String],
            _free_text: Option<&str>,
        ) -> Result<Vec<String>, SubscriberStoreError> {
            Ok(self.ids.lock().unwrap().clone())
        }
    }

    struct DummyTraceStore {
        rows: Mutex<Vec<TraceEventRow>>,
        fail: bool,
    }

    #[async_trait]
    impl TraceLogStore for DummyTraceStore {
        async fn list_by_entities(
            &self,
            _scope: &TenantScope,
            _entity_type: &str,
            _entity_ids: &[String],
        ) -> Result<Vec<TraceEventRow>, TraceStoreError> {
            if self.fail {
                return Err(TraceStoreError::StorageUnavailable);
            }
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    fn scope() -> TenantScope {
        TenantScope::new(EnvironmentId::new("env_1"), OrganizationId::new("org_1"))
    }

    fn tenant_row() -> TenantRow {
        TenantRow {
            organization_id: "org_1".to_string(),
            tier: "business".to_string(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn doc(id: &str) -> Value {
        json!({
            "_id": id,
            "organization_id": "org_1",
            "environment_id": "env_1",
            "jobs": [{ "_id": format!("{id}_job"), "status": "success" }]
        })
    }

    fn trace_row(entity_id: &str) -> TraceEventRow {
        TraceEventRow {
            trace_id: format!("tr_{entity_id}"),
            entity_id: entity_id.to_string(),
            entity_type: "step_run".to_string(),
            environment_id: "env_1".to_string(),
            detail: Some("dispatched".to_string()),
            source: Some("internal".to_string()),
            status: Some("success".to_string()),
            is_test: false,
            is_retry: false,
            raw_payload: None,
            seq: 1,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn base_context() -> crate::application::context::AppContext {
        let mut ctx = test_context();
        ctx.stores.tenants = Arc::new(DummyTenantStore {
            row: Mutex::new(Some(tenant_row())),
        });
        ctx
    }

    #[tokio::test]
    async fn given_matching_documents_when_execute_should_return_projected_page() {
        let mut ctx = base_context();
        ctx.stores.feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1"), doc("ntf_2")]),
            calls: Mutex::new(0),
        });

        let page = ListActivitiesUseCase::execute(
            &ctx,
            &scope(),
            &ListActivitiesQuery::default(),
            0,
            10,
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].id, "ntf_1");
        assert!(!page.has_more);
        assert_eq!(page.page, 0);
    }

    #[tokio::test]
    async fn given_full_page_when_execute_should_report_has_more() {
        let mut ctx = base_context();
        ctx.stores.feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1"), doc("ntf_2")]),
            calls: Mutex::new(0),
        });

        let page =
            ListActivitiesUseCase::execute(&ctx, &scope(), &ListActivitiesQuery::default(), 0, 2)
                .await
                .unwrap();

        assert!(page.has_more);
    }

    #[tokio::test]
    async fn given_undecodable_entries_when_execute_should_drop_them_not_fail() {
        let mut ctx = base_context();
        ctx.stores.feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1"), Value::Null, json!({"junk": true})]),
            calls: Mutex::new(0),
        });

        let page = ListActivitiesUseCase::execute(
            &ctx,
            &scope(),
            &ListActivitiesQuery::default(),
            0,
            10,
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "ntf_1");
    }

    #[tokio::test]
    async fn given_subscriber_filter_matching_nobody_when_execute_should_short_circuit() {
        let mut ctx = base_context();
        let feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1")]),
            calls: Mutex::new(0),
        });
        ctx.stores.feed = feed.clone();
        ctx.stores.subscribers = Arc::new(DummySubscriberStore {
            ids: Mutex::new(Vec::new()),
        });
        let query = ListActivitiesQuery {
            subscriber_ids: vec!["ghost-id".to_string()],
            ..ListActivitiesQuery::default()
        };

        let page = ListActivitiesUseCase::execute(&ctx, &scope(), &query, 0, 10)
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert!(!page.has_more);
        // The feed store was never queried.
        assert_eq!(*feed.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn given_enrichment_flag_on_when_execute_should_splice_details_onto_jobs() {
        let mut ctx = base_context();
        ctx.flags = Arc::new(SettingsFlagService::new(Flags {
            workflow_run_reads: false,
            step_run_reads: false,
            trace_log_reads: false,
            list_trace_enrichment: true,
        }));
        ctx.stores.feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1")]),
            calls: Mutex::new(0),
        });
        ctx.stores.traces = Arc::new(DummyTraceStore {
            rows: Mutex::new(vec![trace_row("ntf_1_job")]),
            fail: false,
        });

        let page = ListActivitiesUseCase::execute(
            &ctx,
            &scope(),
            &ListActivitiesQuery::default(),
            0,
            10,
        )
        .await
        .unwrap();

        assert_eq!(page.data[0].jobs[0].execution_details.len(), 1);
        assert_eq!(page.data[0].jobs[0].execution_details[0].id, "tr_ntf_1_job");
    }

    #[tokio::test]
    async fn given_enrichment_failure_when_execute_should_return_unenriched_page() {
        let mut ctx = base_context();
        ctx.flags = Arc::new(SettingsFlagService::new(Flags {
            workflow_run_reads: false,
            step_run_reads: false,
            trace_log_reads: false,
            list_trace_enrichment: true,
        }));
        ctx.stores.feed = Arc::new(DummyFeedStore {
            docs: Mutex::new(vec![doc("ntf_1")]),
            calls: Mutex::new(0),
        });
        ctx.stores.traces = Arc::new(DummyTraceStore {
            rows: Mutex::new(Vec::new()),
            fail: true,
        });

        let page = ListActivitiesUseCase::execute(
            &ctx,
            &scope(),
            &ListActivitiesQuery::default(),
            0,
            10,
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 1);
        assert!(page.data[0].jobs[0].execution_details.is_empty());
    }

    #[tokio::test]
    async fn given_range_older_than_retention_when_execute_should_propagate_retention_error() {
        let ctx = base_context();
        let query = ListActivitiesQuery {
            after: Some("1995-01-01T00:00:00Z".to_string()),
            ..ListActivitiesQuery::default()
        };

        let result = ListActivitiesUseCase::execute(&ctx, &scope(), &query, 0, 10).await;

        assert!(matches!(
            result,
            Err(ListActivitiesError::Retention(
                RetentionError::RetentionExceeded { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn given_inverted_range_when_execute_should_propagate_invalid_range() {
        let ctx = base_context();
        let query = ListActivitiesQuery {
            after: Some("2024-03-02T00:00:00Z".to_string()),
            before: Some("2024-03-01T00:00:00Z".to_string()),
            ..ListActivitiesQuery::default()
        };

        let result = ListActivitiesUseCase::execute(&ctx, &scope(), &query, 0, 10).await;

        assert!(matches!(
            result,
            Err(ListActivitiesError::Retention(
                RetentionError::InvalidDateRange
            ))
        ));
    }

    #[tokio::test]
    async fn given_missing_tenant_when_execute_should_fail_with_tenant_missing() {
        let mut ctx = test_context();
        ctx.stores.tenants = Arc::new(DummyTenantStore {
            row: Mutex::new(None),
        });

        let result = ListActivitiesUseCase::execute(
            &ctx,
            &scope(),
            &ListActivitiesQuery::default(),
            0,
            10,
        )
        .await;

        assert!(matches!(result, Err(ListActivitiesError::TenantMissing)));
    }
}
