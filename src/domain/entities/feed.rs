use crate::domain::value_objects::timestamps::Timestamp;
use serde_json::Value;

/// The closed status vocabulary for jobs and execution details. Raw store
/// values outside this set never leak through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
    Warning,
    Pending,
    Queued,
}

impl ExecutionStatus {
    /// Translate a free-text status from any backing store. Unrecognized
    /// values map to `Pending` instead of aborting the feed.
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "success" => ExecutionStatus::Success,
            "error" | "failed" => ExecutionStatus::Failed,
            "warning" => ExecutionStatus::Warning,
            "queued" => ExecutionStatus::Queued,
            _ => ExecutionStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Warning => "warning",
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Queued => "queued",
        }
    }
}

/// Whether an execution detail was produced inside the pipeline or reported
/// back by an external provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailSource {
    Internal,
    External,
}

impl DetailSource {
    pub fn from_raw(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "external" => DetailSource::External,
            _ => DetailSource::Internal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailSource::Internal => "internal",
            DetailSource::External => "external",
        }
    }
}

/// Denormalized subscriber snapshot carried on a feed record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberSnapshot {
    pub subscriber_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Denormalized workflow/template snapshot carried on a feed record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepDescriptor {
    pub step_id: String,
    pub name: Option<String>,
    pub channel: Option<String>,
}

/// One fine-grained trace line attached to a job. Always built fresh from
/// trace rows; never merged across stores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionDetail {
    pub id: String,
    pub job_id: String,
    pub detail: String,
    pub source: DetailSource,
    pub status: ExecutionStatus,
    pub provider_id: Option<String>,
    pub is_test: bool,
    pub is_retry: bool,
    pub created_at: Timestamp,
    pub raw: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: String,
    pub status: ExecutionStatus,
    pub step: StepDescriptor,
    pub provider_id: Option<String>,
    pub payload: Value,
    pub overrides: Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub execution_details: Vec<ExecutionDetail>,
}

/// The canonical external representation of one notification/workflow run,
/// whichever backing store it was assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRecord {
    pub id: String,
    pub organization_id: String,
    pub environment_id: String,
    pub template_id: Option<String>,
    pub subscriber_id: Option<String>,
    pub transaction_id: String,
    pub subscriber: SubscriberSnapshot,
    pub template: WorkflowSnapshot,
    pub payload: Value,
    pub jobs: Vec<JobRecord>,
    pub channels: Vec<String>,
    pub topics: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The empty-object default used wherever a source store does not track a
/// payload. Output shapes never contain nulls in place of objects.
pub fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
