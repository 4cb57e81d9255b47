// Black-box tests for the feed read API, driven through the full router
// with in-memory stores.

use activity_feed::application::context::AppContext;
use activity_feed::config::{Db, Deployment, Flags, Pagination, Server, Settings};
use activity_feed::domain::value_objects::ids::{EnvironmentId, OrganizationId, TenantScope};
use activity_feed::infrastructure::db::dto::{StepRunRow, TenantRow, TraceEventRow, WorkflowRunRow};
use activity_feed::infrastructure::db::stores::Stores;
use activity_feed::infrastructure::db::stores::legacy_feed_store::{
    FeedListFilters, FeedStoreError, LegacyFeedStore,
};
use activity_feed::infrastructure::db::stores::step_run_store::{StepRunStore, StepRunStoreError};
use activity_feed::infrastructure::db::stores::subscriber_store::{
    SubscriberStore, SubscriberStoreError,
};
use activity_feed::infrastructure::db::stores::tenant_store::{TenantStore, TenantStoreError};
use activity_feed::infrastructure::db::stores::trace_log_store::{TraceLogStore, TraceStoreError};
use activity_feed::infrastructure::db::stores::workflow_run_store::{
    WorkflowRunStore, WorkflowRunStoreError,
};
use activity_feed::infrastructure::flags::SettingsFlagService;
use activity_feed::interface::http;
use activity_feed::interface::http::state::AppState;
use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower::util::ServiceExt;

struct InMemoryFeedStore {
    docs: HashMap<String, Value>,
}

#[async_trait]
impl LegacyFeedStore for InMemoryFeedStore {
    async fn get_full(
        &self,
        _scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Value>, FeedStoreError> {
        Ok(self.docs.get(id).cloned())
    }

    async fn get_metadata(
        &self,
        _scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Value>, FeedStoreError> {
        Ok(self.docs.get(id).cloned().map(|mut doc| {
            if let Some(map) = doc.as_object_mut() {
                map.remove("jobs");
            }
            doc
        }))
    }

    async fn list(
        &self,
        _scope: &TenantScope,
        _filters: &FeedListFilters,
        _offset: u32,
        _limit: u32,
    ) -> Result<Vec<Value>, FeedStoreError> {
        let mut docs: Vec<Value> = self.docs.values().cloned().collect();
        docs.sort_by_key(|doc| doc["_id"].as_str().map(str::to_string));
        Ok(docs)
    }
}

struct InMemoryTenantStore {
    row: Option<TenantRow>,
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn get(
        &self,
        _organization_id: &OrganizationId,
    ) -> Result<Option<TenantRow>, TenantStoreError> {
        Ok(self.row.clone())
    }
}

struct EmptySubscriberStore;

#[async_trait]
impl SubscriberStore for EmptySubscriberStore {
    async fn search_ids(
        &self,
        _environment_id: &EnvironmentId,
        _ids: &[String],
        _emails: &[String],
        _free_text: Option<&str>,
    ) -> Result<Vec<String>, SubscriberStoreError> {
        Ok(Vec::new())
    }
}

struct EmptyWorkflowRunStore;

#[async_trait]
impl WorkflowRunStore for EmptyWorkflowRunStore {
    async fn latest_by_run_id(
        &self,
        _scope: &TenantScope,
        _run_id: &str,
    ) -> Result<Option<WorkflowRunRow>, WorkflowRunStoreError> {
        Ok(None)
    }
}

struct EmptyStepRunStore;

#[async_trait]
impl StepRunStore for EmptyStepRunStore {
    async fn list_by_transaction(
        &self,
        _scope: &TenantScope,
        _transaction_id: &str,
    ) -> Result<Vec<StepRunRow>, StepRunStoreError> {
        Ok(Vec::new())
    }
}

struct EmptyTraceStore;

#[async_trait]
impl TraceLogStore for EmptyTraceStore {
    async fn list_by_entities(
        &self,
        _scope: &TenantScope,
        _entity_type: &str,
        _entity_ids: &[String],
    ) -> Result<Vec<TraceEventRow>, TraceStoreError> {
        Ok(Vec::new())
    }
}

fn settings() -> Settings {
    Settings {
        server: Server {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        db: Db {
            url: "postgres://unused".to_string(),
        },
        deployment: Deployment { self_hosted: false },
        flags: Flags {
            workflow_run_reads: false,
            step_run_reads: false,
            trace_log_reads: false,
            list_trace_enrichment: false,
        },
        pagination: Pagination {
            default_limit: 10,
            max_limit: 50,
        },
    }
}

fn sample_doc(id: &str) -> Value {
    json!({
        "_id": id,
        "organization_id": "org_1",
        "environment_id": "env_1",
        "transaction_id": "txn_1",
        "channels": ["email"],
        "jobs": [{ "_id": format!("{id}_job"), "status": "success" }],
        "created_at": "2026-08-01T10:00:00Z",
        "updated_at": "2026-08-01T10:00:00Z"
    })
}

fn app_with_docs(docs: Vec<Value>) -> axum::Router {
    let docs: HashMap<String, Value> = docs
        .into_iter()
        .map(|doc| (doc["_id"].as_str().unwrap().to_string(), doc))
        .collect();
    let stores = Stores {
        db: None,
        feed: Arc::new(InMemoryFeedStore { docs }),
        workflow_runs: Arc::new(EmptyWorkflowRunStore),
        step_runs: Arc::new(EmptyStepRunStore),
        traces: Arc::new(EmptyTraceStore),
        tenants: Arc::new(InMemoryTenantStore {
            row: Some(TenantRow {
                organization_id: "org_1".to_string(),
                tier: "business".to_string(),
                created_at: OffsetDateTime::now_utc(),
            }),
        }),
        subscribers: Arc::new(EmptySubscriberStore),
    };
    let settings = settings();
    let ctx = AppContext::new(
        stores,
        Arc::new(SettingsFlagService::new(settings.flags.clone())),
        settings.deployment.self_hosted,
    );
    http::app(AppState {
        ctx: Arc::new(ctx),
        settings,
        metrics: None,
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn given_existing_activity_when_get_should_return_record() {
    let app = app_with_docs(vec![sample_doc("ntf_1")]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities/ntf_1?organization_id=org_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["_id"], "ntf_1");
    assert_eq!(body["jobs"][0]["status"], "success");
    assert!(body["jobs"][0]["execution_details"].is_array());
}

#[tokio::test]
async fn given_missing_activity_when_get_should_return_problem_not_found() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities/ghost?organization_id=org_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()["content-type"],
        "application/problem+json"
    );
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_ACTIVITY_NOT_FOUND");
}

#[tokio::test]
async fn given_missing_organization_id_when_get_should_return_problem_malformed() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities/ntf_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_REQUEST_MALFORMED");
}

#[tokio::test]
async fn given_documents_when_list_should_return_page_envelope() {
    let app = app_with_docs(vec![sample_doc("ntf_1"), sample_doc("ntf_2")]);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities?organization_id=org_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["has_more"], false);
    assert_eq!(body["page"], 0);
}

#[tokio::test]
async fn given_range_older_than_retention_when_list_should_return_payment_required() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri(
                    "/environments/env_1/activities?organization_id=org_1&after=1995-01-01T00:00:00Z",
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_RETENTION_EXCEEDED");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("earliest accessible date")
    );
}

#[tokio::test]
async fn given_inverted_range_when_list_should_return_invalid_range() {
    let app = app_with_docs(Vec::new());
    let now = OffsetDateTime::now_utc().format(&Rfc3339).unwrap();
    let uri = format!(
        "/environments/env_1/activities?organization_id=org_1&after={now}&before=2020-01-01T00:00:00Z"
    );

    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_INVALID_DATE_RANGE");
}

#[tokio::test]
async fn given_unparsable_date_when_list_should_return_invalid_format() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities?organization_id=org_1&after=yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_INVALID_DATE_FORMAT");
}

#[tokio::test]
async fn given_limit_above_maximum_when_list_should_return_problem_malformed() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/environments/env_1/activities?organization_id=org_1&limit=500")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FEED_REQUEST_MALFORMED");
}

#[tokio::test]
async fn given_no_database_when_ready_should_return_service_unavailable() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn given_any_request_when_handled_should_carry_request_id_header() {
    let app = app_with_docs(Vec::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
