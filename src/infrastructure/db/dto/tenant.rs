use crate::domain::entities::tenant::{ServiceTier, Tenant};
use crate::domain::value_objects::timestamps::Timestamp;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenantRow {
    pub organization_id: String,
    pub tier: String,
    pub created_at: OffsetDateTime,
}

impl TenantRow {
    pub fn into_tenant(self) -> Tenant {
        Tenant {
            tier: ServiceTier::from_raw(&self.tier),
            created_at: Timestamp::from(self.created_at),
        }
    }
}
