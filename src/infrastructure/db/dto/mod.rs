pub mod feed_document;
pub mod json_columns;
pub mod step_run;
pub mod tenant;
pub mod trace_event;
pub mod workflow_run;

pub use feed_document::FeedDocument;
pub use step_run::StepRunRow;
pub use tenant::TenantRow;
pub use trace_event::TraceEventRow;
pub use workflow_run::WorkflowRunRow;
