use std::sync::Arc;

use crate::infrastructure::db::database::{Database, DatabaseError};
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::postgres::legacy_feed_store_postgres::LegacyFeedStorePostgres;
use crate::infrastructure::db::postgres::step_run_store_postgres::StepRunStorePostgres;
use crate::infrastructure::db::postgres::subscriber_store_postgres::SubscriberStorePostgres;
use crate::infrastructure::db::postgres::tenant_store_postgres::TenantStorePostgres;
use crate::infrastructure::db::postgres::trace_log_store_postgres::TraceLogStorePostgres;
use crate::infrastructure::db::postgres::workflow_run_store_postgres::WorkflowRunStorePostgres;
use crate::infrastructure::db::stores::legacy_feed_store::LegacyFeedStore;
use crate::infrastructure::db::stores::step_run_store::StepRunStore;
use crate::infrastructure::db::stores::subscriber_store::SubscriberStore;
use crate::infrastructure::db::stores::tenant_store::TenantStore;
use crate::infrastructure::db::stores::trace_log_store::TraceLogStore;
use crate::infrastructure::db::stores::workflow_run_store::WorkflowRunStore;

/// Every backing store the retrieval engine reads from, behind trait
/// objects so tests can swap in dummies per store.
#[derive(Clone)]
pub struct Stores {
    pub db: Option<Arc<PostgresDatabase>>,
    pub feed: Arc<dyn LegacyFeedStore>,
    pub workflow_runs: Arc<dyn WorkflowRunStore>,
    pub step_runs: Arc<dyn StepRunStore>,
    pub traces: Arc<dyn TraceLogStore>,
    pub tenants: Arc<dyn TenantStore>,
    pub subscribers: Arc<dyn SubscriberStore>,
}

impl Stores {
    /// Build all stores backed by Postgres.
    pub fn postgres(db: Arc<PostgresDatabase>) -> Self {
        Self {
            db: Some(db.clone()),
            feed: Arc::new(LegacyFeedStorePostgres::new(db.clone())),
            workflow_runs: Arc::new(WorkflowRunStorePostgres::new(db.clone())),
            step_runs: Arc::new(StepRunStorePostgres::new(db.clone())),
            traces: Arc::new(TraceLogStorePostgres::new(db.clone())),
            tenants: Arc::new(TenantStorePostgres::new(db.clone())),
            subscribers: Arc::new(SubscriberStorePostgres::new(db)),
        }
    }

    /// Execute a raw SQL statement (readiness probes).
    pub async fn execute(&self, query: &str) -> Result<u64, DatabaseError> {
        let Some(db) = self.db.as_ref() else {
            return Err(DatabaseError::Connection("db_unavailable".to_string()));
        };
        db.execute(query).await
    }
}
