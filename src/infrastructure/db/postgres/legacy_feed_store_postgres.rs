use crate::domain::value_objects::ids::TenantScope;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::legacy_feed_store::{
    FeedListFilters, FeedStoreError, LegacyFeedStore,
};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgConnection, Postgres, QueryBuilder};

/// Legacy documents live in a JSONB column; `environment_id`,
/// `organization_id`, and `created_at` are mirrored into plain columns so
/// scoping and range filters stay indexable.
#[derive(Clone)]
pub struct LegacyFeedStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl LegacyFeedStorePostgres {
    /// Build a Postgres-backed legacy feed store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        org_id: &str,
        id: &str,
        with_jobs: bool,
    ) -> Result<Option<Value>, FeedStoreError> {
        let projection = if with_jobs { "doc" } else { "doc - 'jobs'" };
        let sql = format!(
            "SELECT {projection}
            FROM feed_documents
            WHERE environment_id = $1 AND organization_id = $2 AND id = $3"
        );

        let doc = sqlx::query_scalar::<_, Value>(&sql)
            .bind(env_id)
            .bind(org_id)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|_| FeedStoreError::StorageUnavailable)?;

        Ok(doc)
    }

    async fn list_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        org_id: &str,
        filters: &FeedListFilters,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Value>, FeedStoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT doc FROM feed_documents WHERE environment_id = ");
        qb.push_bind(env_id);
        qb.push(" AND organization_id = ");
        qb.push_bind(org_id);

        if !filters.channels.is_empty() {
            qb.push(" AND doc->'channels' ?| ");
            qb.push_bind(filters.channels.clone());
        }
        if !filters.template_ids.is_empty() {
            qb.push(" AND doc->>'template_id' = ANY(");
            qb.push_bind(filters.template_ids.clone());
            qb.push(")");
        }
        if !filters.subscriber_ids.is_empty() {
            qb.push(" AND doc->>'subscriber_id' = ANY(");
            qb.push_bind(filters.subscriber_ids.clone());
            qb.push(")");
        }
        if !filters.severities.is_empty() {
            qb.push(" AND doc->>'severity' = ANY(");
            qb.push_bind(filters.severities.clone());
            qb.push(")");
        }
        if let Some(transaction_id) = &filters.transaction_id {
            qb.push(" AND doc->>'transaction_id' = ");
            qb.push_bind(transaction_id.clone());
        }
        if let Some(topic_key) = &filters.topic_key {
            qb.push(" AND doc->'topics' ? ");
            qb.push_bind(topic_key.clone());
        }
        if let Some(after) = filters.after {
            qb.push(" AND created_at >= ");
            qb.push_bind(after);
        }
        if let Some(before) = filters.before {
            qb.push(" AND created_at <= ");
            qb.push_bind(before);
        }

        qb.push(" ORDER BY created_at DESC OFFSET ");
        qb.push_bind(i64::from(offset));
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(limit));

        let docs = qb
            .build_query_scalar::<Value>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|_| FeedStoreError::StorageUnavailable)?;

        Ok(docs)
    }
}

#[async_trait]
impl LegacyFeedStore for LegacyFeedStorePostgres {
    /// Fetch the full document, embedded jobs included.
    async fn get_full(
        &self,
        scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Value>, FeedStoreError> {
        let env_id = scope.environment_id.0.clone();
        let org_id = scope.organization_id.0.clone();
        let id = id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(
                    async move { Self::get_impl_conn(conn, &env_id, &org_id, &id, true).await },
                )
            })
            .await
    }

    /// Fetch the document envelope without its embedded jobs.
    async fn get_metadata(
        &self,
        scope: &TenantScope,
        id: &str,
    ) -> Result<Option<Value>, FeedStoreError> {
        let env_id = scope.environment_id.0.clone();
        let org_id = scope.organization_id.0.clone();
        let id = id.to_string();
        self.db
            .with_conn(move |conn| {
                Box::pin(
                    async move { Self::get_impl_conn(conn, &env_id, &org_id, &id, false).await },
                )
            })
            .await
    }

    /// Page through documents matching the filter set, newest first.
    async fn list(
        &self,
        scope: &TenantScope,
        filters: &FeedListFilters,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Value>, FeedStoreError> {
        let env_id = scope.environment_id.0.clone();
        let org_id = scope.organization_id.0.clone();
        let filters = filters.clone();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move {
                    Self::list_impl_conn(conn, &env_id, &org_id, &filters, offset, limit).await
                })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::LegacyFeedStorePostgres;
    use crate::domain::value_objects::ids::{EnvironmentId, OrganizationId, TenantScope};
    use crate::infrastructure::db::postgres::PostgresDatabase;
    use crate::infrastructure::db::stores::legacy_feed_store::{FeedListFilters, LegacyFeedStore};

    fn test_db_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    async fn setup_store() -> Option<LegacyFeedStorePostgres> {
        let url = test_db_url()?;
        let db = std::sync::Arc::new(PostgresDatabase::connect(&url).await.ok()?);
        Some(LegacyFeedStorePostgres::new(db))
    }

    fn scope() -> TenantScope {
        TenantScope::new(
            EnvironmentId::new("env_test"),
            OrganizationId::new("org_test"),
        )
    }

    #[tokio::test]
    async fn given_missing_document_when_get_full_should_return_none() {
        let Some(store) = setup_store().await else {
            return;
        };

        let doc = store.get_full(&scope(), "missing").await.unwrap();

        assert!(doc.is_none());
    }

    #[tokio::test]
    async fn given_no_matching_documents_when_list_should_return_empty() {
        let Some(store) = setup_store().await else {
            return;
        };
        let filters = FeedListFilters {
            transaction_id: Some("txn_that_does_not_exist".to_string()),
            ..FeedListFilters::default()
        };

        let docs = store.list(&scope(), &filters, 0, 10).await.unwrap();

        assert!(docs.is_empty());
    }
}
