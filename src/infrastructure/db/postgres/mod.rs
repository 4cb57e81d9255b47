mod database;
pub mod legacy_feed_store_postgres;
pub mod step_run_store_postgres;
pub mod subscriber_store_postgres;
pub mod tenant_store_postgres;
pub mod trace_log_store_postgres;
pub mod workflow_run_store_postgres;

pub use database::PostgresDatabase;
