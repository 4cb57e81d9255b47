use crate::domain::value_objects::ids::EnvironmentId;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::subscriber_store::{SubscriberStore, SubscriberStoreError};
use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};

#[derive(Clone)]
pub struct SubscriberStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl SubscriberStorePostgres {
    /// Build a Postgres-backed subscriber store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn search_impl_conn(
        conn: &mut PgConnection,
        env_id: &str,
        ids: &[String],
        emails: &[String],
        free_text: Option<&str>,
    ) -> Result<Vec<String>, SubscriberStoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT subscriber_id FROM subscribers WHERE environment_id = ");
        qb.push_bind(env_id.to_string());

        if !ids.is_empty() {
            qb.push(" AND subscriber_id = ANY(");
            qb.push_bind(ids.to_vec());
            qb.push(")");
        }
        if !emails.is_empty() {
            let lowered: Vec<String> = emails.iter().map(|e| e.to_lowercase()).collect();
            qb.push(" AND lower(email) = ANY(");
            qb.push_bind(lowered);
            qb.push(")");
        }
        if let Some(text) = free_text {
            let pattern = format!("%{text}%");
            qb.push(" AND (subscriber_id ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR email ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR first_name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR last_name ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        let ids = qb
            .build_query_scalar::<String>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|_| SubscriberStoreError::StorageUnavailable)?;

        Ok(ids)
    }
}

#[async_trait]
impl SubscriberStore for SubscriberStorePostgres {
    /// Resolve id/email/free-text predicates to a concrete subscriber-id set.
    async fn search_ids(
        &self,
        environment_id: &EnvironmentId,
        ids: &[String],
        emails: &[String],
        free_text: Option<&str>,
    ) -> Result<Vec<String>, SubscriberStoreError> {
        let env_id = environment_id.0.clone();
        let ids = ids.to_vec();
        let emails = emails.to_vec();
        let free_text = free_text.map(str::to_string);
        self.db
            .with_conn(move |conn| {
                Box::pin(async move {
                    Self::search_impl_conn(conn, &env_id, &ids, &emails, free_text.as_deref()).await
                })
            })
            .await
    }
}
