use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::dto::WorkflowRunRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::workflow_run_store::{
    WorkflowRunStore, WorkflowRunStoreError,
};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct WorkflowRunStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl WorkflowRunStorePostgres {
    /// Build a Postgres-backed workflow-run store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn latest_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        run_id: &str,
    ) -> Result<Option<WorkflowRunRow>, WorkflowRunStoreError> {
        let row = sqlx::query_as::<_, WorkflowRunRow>(
            "SELECT
                run_id,
                organization_id,
                environment_id,
                workflow_id,
                workflow_name,
                subscriber_id,
                transaction_id,
                payload,
                to_recipient,
                channels,
                topics,
                seq,
                created_at,
                updated_at
            FROM workflow_runs
            WHERE environment_id = $1 AND run_id = $2
            ORDER BY created_at DESC, seq DESC
            LIMIT 1",
        )
        .bind(env_id)
        .bind(run_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| WorkflowRunStoreError::StorageUnavailable)?;

        Ok(row)
    }
}

#[async_trait]
impl WorkflowRunStore for WorkflowRunStorePostgres {
    /// Most recent write for the given run id, if any.
    async fn latest_by_run_id(
        &self,
        scope: &TenantScope,
        run_id: &str,
    ) -> Result<Option<WorkflowRunRow>, WorkflowRunStoreError> {
        let env_id = scope.environment_id.0.clone();
        let run_id = run_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::latest_impl_conn(conn, &env_id, &run_id).await })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::WorkflowRunStorePostgres;
    use crate::domain::value_objects::ids::{EnvironmentId, OrganizationId, TenantScope};
    use crate::infrastructure::db::postgres::PostgresDatabase;
    use crate::infrastructure::db::stores::workflow_run_store::WorkflowRunStore;

    fn test_db_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    #[tokio::test]
    async fn given_missing_run_when_latest_by_run_id_should_return_none() {
        let Some(url) = test_db_url() else {
            return;
        };
        let db = std::sync::Arc::new(PostgresDatabase::connect(&url).await.unwrap());
        let store = WorkflowRunStorePostgres::new(db);
        let scope = TenantScope::new(
            EnvironmentId::new("env_test"),
            OrganizationId::new("org_test"),
        );

        let row = store.latest_by_run_id(&scope, "missing").await.unwrap();

        assert!(row.is_none());
    }
}
