use crate::domain::value_objects::ids::OrganizationId;
use crate::infrastructure::db::dto::TenantRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::tenant_store::{TenantStore, TenantStoreError};
use async_trait::async_trait;
use sqlx::PgConnection;

#[derive(Clone)]
pub struct TenantStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

impl TenantStorePostgres {
    /// Build a Postgres-backed tenant store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        organization_id: &str,
    ) -> Result<Option<TenantRow>, TenantStoreError> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT
                organization_id,
                tier,
                created_at
            FROM tenants
            WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|_| TenantStoreError::StorageUnavailable)?;

        Ok(row)
    }
}

#[async_trait]
impl TenantStore for TenantStorePostgres {
    /// Fetch tenant metadata. Returns `None` if the organization is unknown.
    async fn get(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<TenantRow>, TenantStoreError> {
        let organization_id = organization_id.0.clone();
        self.db
            .with_conn(move |conn| {
                Box::pin(async move { Self::get_impl_conn(conn, &organization_id).await })
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::TenantStorePostgres;
    use crate::domain::value_objects::ids::OrganizationId;
    use crate::infrastructure::db::postgres::PostgresDatabase;
    use crate::infrastructure::db::stores::tenant_store::TenantStore;

    fn test_db_url() -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }

    #[tokio::test]
    async fn given_unknown_organization_when_get_should_return_none() {
        let Some(url) = test_db_url() else {
            return;
        };
        let db = std::sync::Arc::new(PostgresDatabase::connect(&url).await.unwrap());
        let store = TenantStorePostgres::new(db);

        let row = store.get(&OrganizationId::new("org_missing")).await.unwrap();

        assert!(row.is_none());
    }
}
