pub mod factory;
pub mod legacy_feed_store;
pub mod step_run_store;
pub mod subscriber_store;
pub mod tenant_store;
pub mod trace_log_store;
pub mod workflow_run_store;

pub use factory::Stores;
