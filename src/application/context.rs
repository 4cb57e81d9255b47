use std::sync::Arc;

use crate::infrastructure::db::stores::Stores;
use crate::infrastructure::flags::FeatureFlagService;

/// Shared application resources used by the feed use cases.
pub struct AppContext {
    pub stores: Stores,
    pub flags: Arc<dyn FeatureFlagService>,
    /// Self-hosted installs are exempt from tier-based retention.
    pub self_hosted: bool,
}

impl AppContext {
    /// Build a new application context with shared stores and flags.
    pub fn new(stores: Stores, flags: Arc<dyn FeatureFlagService>, self_hosted: bool) -> Self {
        Self {
            stores,
            flags,
            self_hosted,
        }
    }
}
