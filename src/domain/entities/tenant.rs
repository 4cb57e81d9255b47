use crate::domain::value_objects::timestamps::Timestamp;
use time::Duration;
use time::macros::datetime;

/// Service tiers, lowest first. The retention table below keys off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceTier {
    Free,
    Pro,
    Business,
    Enterprise,
}

impl ServiceTier {
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pro" => ServiceTier::Pro,
            "business" => ServiceTier::Business,
            "enterprise" => ServiceTier::Enterprise,
            _ => ServiceTier::Free,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTier::Free => "free",
            ServiceTier::Pro => "pro",
            ServiceTier::Business => "business",
            ServiceTier::Enterprise => "enterprise",
        }
    }

    /// Tier -> maximum feed retention.
    pub fn retention(&self) -> Duration {
        match self {
            ServiceTier::Free => Duration::days(30),
            ServiceTier::Pro => Duration::days(90),
            ServiceTier::Business => Duration::days(180),
            ServiceTier::Enterprise => Duration::days(730),
        }
    }
}

/// Free-tier accounts created before this date keep the fixed 30-day
/// allowance they signed up with, regardless of later tier-table changes.
pub const FREE_TIER_CUTOVER: Timestamp = Timestamp(datetime!(2024-02-28 00:00 UTC));

pub const LEGACY_FREE_RETENTION: Duration = Duration::days(30);

/// Large-but-finite stand-in for "unlimited" so date arithmetic stays safe.
pub const UNLIMITED_RETENTION: Duration = Duration::days(36_500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant {
    pub tier: ServiceTier,
    pub created_at: Timestamp,
}

impl Tenant {
    /// Maximum retention for this tenant. `self_hosted` installs are
    /// effectively unlimited.
    pub fn max_retention(&self, self_hosted: bool) -> Duration {
        if self_hosted {
            return UNLIMITED_RETENTION;
        }
        if self.tier == ServiceTier::Free && self.created_at < FREE_TIER_CUTOVER {
            return LEGACY_FREE_RETENTION;
        }
        self.tier.retention()
    }

    pub fn has_unlimited_retention(&self, self_hosted: bool) -> bool {
        self.max_retention(self_hosted) == UNLIMITED_RETENTION
    }
}
