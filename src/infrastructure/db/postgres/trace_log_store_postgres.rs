use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::dto::TraceEventRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::trace_log_store::{TraceLogStore, TraceStoreError};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct TraceLogStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl TraceLogStorePostgres {
    /// Build a Postgres-backed trace log store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn list_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        entity_type: &str,
        entity_ids: &[String],
    ) -> Result<Vec<TraceEventRow>, TraceStoreError> {
        let rows = sqlx::query_as::<_, TraceEventRow>(
            "SELECT
                trace_id,
                entity_id,
                entity_type,
                environment_id,
                detail,
                source,
                status,
                is_test,
                is_retry,
                raw_payload,
                seq,
                created_at
            FROM trace_events
            WHERE environment_id = $1 AND entity_type = $2 AND entity_id = ANY($3)
            ORDER BY created_at ASC, seq ASC",
        )
        .bind(env_id)
        .bind(entity_type)
        .bind(entity_ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|_| TraceStoreError::StorageUnavailable)?;

        Ok(rows)
    }
}

#[async_trait]
impl TraceLogStore for TraceLogStorePostgres {
    /// One batched fetch for every entity in the set.
    async fn list_by_entities(
        &self,
        scope: &TenantScope,
        entity_type: &str,
        entity_ids: &[String],
    ) -> Result<Vec<TraceEventRow>, TraceStoreError> {
        let env_id = scope.environment_id.0.clone();
        let entity_type = entity_type.to_string();
        let entity_ids = entity_ids.to_vec();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move {
                    Self::list_impl_conn(conn, &env_id, &entity_type, &entity_ids).await
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::TraceLogStorePostgres;
    use crate::domain::value_objects::ids::{EnvironmentId, OrganizationId, TenantScope};
    use crate::infrastructure::db::postgres::PostgresDatabase;
    use crate::infrastructure::db::stores::trace_log_store::TraceLogStore;

    fn test_db_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    #[tokio::test]
    async fn given_unknown_entities_when_list_by_entities_should_return_empty() {
        let Some(url) = test_db_url() else {
            return;
        };
        let db = std::sync::Arc::new(PostgresDatabase::connect(&url).await.unwrap());
        let store = TraceLogStorePostgres::new(db);
        let scope = TenantScope::new(
            EnvironmentId::new("env_test"),
            OrganizationId::new("org_test"),
        );

        let rows = store
            .list_by_entities(&scope, "step_run", &["missing".to_string()])
            .await
            .unwrap();

        assert!(rows.is_empty());
    }
}
