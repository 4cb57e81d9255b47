/// Identifiers in this subsystem are opaque strings minted by the legacy
/// document store, not UUIDs generated here.
macro_rules! id_type {
    ($name:ident) => {
        #[derive(Clone, Debug, Eq, PartialEq, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type!(EnvironmentId);
id_type!(OrganizationId);
id_type!(ActivityId);

/// The tenant boundary every store query is scoped to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TenantScope {
    pub environment_id: EnvironmentId,
    pub organization_id: OrganizationId,
}

impl TenantScope {
    pub fn new(environment_id: EnvironmentId, organization_id: OrganizationId) -> Self {
        Self {
            environment_id,
            organization_id,
        }
    }
}
