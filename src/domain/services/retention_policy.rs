// Retention window resolution (tier policy applied to a requested range).

use crate::domain::entities::tenant::Tenant;
use crate::domain::value_objects::timestamps::Timestamp;
use time::Duration;

/// Skew allowance subtracted from the retention floor so a request computed
/// a moment before the clock ticked past the boundary still succeeds.
const RETENTION_GRACE: Duration = Duration::hours(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionError {
    /// A supplied bound was not a parsable RFC 3339 timestamp.
    InvalidDateFormat(String),
    /// `after` was later than `before`.
    InvalidDateRange,
    /// A bound reached further back than the tenant's plan allows. Carries
    /// the earliest accessible date so callers can prompt an upgrade.
    RetentionExceeded { earliest: Timestamp },
}

/// The `[after, before]` bound a tenant is permitted to query. Recomputed
/// per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionWindow {
    pub after: Timestamp,
    pub before: Timestamp,
}

pub struct RetentionPolicy;

impl RetentionPolicy {
    /// Normalize and validate a requested time range against the tenant's
    /// retention allowance. Pure function of tenant state plus `now`.
    pub fn resolve(
        tenant: &Tenant,
        requested_after: Option<&str>,
        requested_before: Option<&str>,
        now: Timestamp,
        self_hosted: bool,
    ) -> Result<RetentionWindow, RetentionError> {
        // Step 1: Compute the tenant's maximum retention.
        let max_retention = tenant.max_retention(self_hosted);
        let earliest_allowed = now.saturating_sub(max_retention);

        // Step 2: Parse supplied bounds, defaulting to the full window.
        let after = match requested_after {
            Some(raw) => parse_bound(raw)?,
            None => earliest_allowed,
        };
        let before = match requested_before {
            Some(raw) => parse_bound(raw)?,
            None => now,
        };

        // Step 3: Ordering holds on every path.
        if after > before {
            return Err(RetentionError::InvalidDateRange);
        }

        // Step 4: Unlimited retention skips the floor check entirely.
        if tenant.has_unlimited_retention(self_hosted) {
            return Ok(RetentionWindow { after, before });
        }

        // Step 5: Both bounds must sit inside the allowance, minus grace.
        let floor = earliest_allowed.saturating_sub(RETENTION_GRACE);
        if after < floor || before < floor {
            return Err(RetentionError::RetentionExceeded {
                earliest: earliest_allowed,
            });
        }

        Ok(RetentionWindow { after, before })
    }
}

fn parse_bound(raw: &str) -> Result<Timestamp, RetentionError> {
    Timestamp::parse_rfc3339(raw).map_err(|_| RetentionError::InvalidDateFormat(raw.to_string()))
}
