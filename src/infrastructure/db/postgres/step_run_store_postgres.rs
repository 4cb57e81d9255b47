use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::dto::StepRunRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::step_run_store::{StepRunStore, StepRunStoreError};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct StepRunStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl StepRunStorePostgres {
    /// Build a Postgres-backed step-run store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn list_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        transaction_id: &str,
    ) -> Result<Vec<StepRunRow>, StepRunStoreError> {
        let rows = sqlx::query_as::<_, StepRunRow>(
            "SELECT
                step_run_id,
                step_id,
                environment_id,
                transaction_id,
                status,
                step_name,
                channel,
                provider_id,
                payload,
                overrides,
                seq,
                created_at,
                updated_at
            FROM step_runs
            WHERE environment_id = $1 AND transaction_id = $2
            ORDER BY created_at ASC, seq ASC",
        )
        .bind(env_id)
        .bind(transaction_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|_| StepRunStoreError::StorageUnavailable)?;

        Ok(rows)
    }
}

#[async_trait]
impl StepRunStore for StepRunStorePostgres {
    /// All step-run writes for a transaction, ascending by write order.
    async fn list_by_transaction(
        &self,
        scope: &TenantScope,
        transaction_id: &str,
    ) -> Result<Vec<StepRunRow>, StepRunStoreError> {
        let env_id = scope.environment_id.0.clone();
        let transaction_id = transaction_id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::list_impl_conn(conn, &env_id, &transaction_id).await })
            })
            .await
    }
}
