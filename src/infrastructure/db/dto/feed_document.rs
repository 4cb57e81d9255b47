use crate::domain::entities::feed::{
    ExecutionStatus, FeedRecord, JobRecord, StepDescriptor, SubscriberSnapshot, WorkflowSnapshot,
    empty_object,
};
use crate::domain::value_objects::timestamps::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A raw document from the legacy store. Field names follow the documents
/// as they were written, `_id` included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub organization_id: String,
    pub environment_id: String,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub subscriber_id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub subscriber: Option<SubscriberDoc>,
    #[serde(default)]
    pub template: Option<TemplateDoc>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub jobs: Vec<JobDoc>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriberDoc {
    #[serde(default)]
    pub subscriber_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDoc {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDoc {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub step: Option<StepDoc>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
    #[serde(default)]
    pub overrides: Option<Value>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDoc {
    #[serde(default)]
    pub step_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

impl FeedDocument {
    /// Decode a raw store value. The caller decides whether a failure is
    /// dropped (list path) or treated as absence (single-record path).
    pub fn decode(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn into_record(self) -> FeedRecord {
        FeedRecord {
            id: self.id,
            organization_id: self.organization_id,
            environment_id: self.environment_id,
            template_id: self.template_id,
            subscriber_id: self.subscriber_id,
            transaction_id: self.transaction_id.unwrap_or_default(),
            subscriber: self.subscriber.map(SubscriberDoc::into_snapshot).unwrap_or_default(),
            template: self.template.map(TemplateDoc::into_snapshot).unwrap_or_default(),
            payload: object_or_empty(self.payload),
            jobs: self.jobs.into_iter().map(JobDoc::into_job).collect(),
            channels: self.channels,
            topics: self.topics,
            created_at: timestamp_or_epoch(self.created_at),
            updated_at: timestamp_or_epoch(self.updated_at),
        }
    }
}

impl SubscriberDoc {
    fn into_snapshot(self) -> SubscriberSnapshot {
        SubscriberSnapshot {
            subscriber_id: self.subscriber_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
        }
    }
}

impl TemplateDoc {
    fn into_snapshot(self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            name: self.name,
            tags: self.tags,
        }
    }
}

impl JobDoc {
    pub fn into_job(self) -> JobRecord {
        JobRecord {
            id: self.id,
            status: ExecutionStatus::from_raw(self.status.as_deref().unwrap_or_default()),
            step: self
                .step
                .map(|s| StepDescriptor {
                    step_id: s.step_id,
                    name: s.name,
                    channel: s.channel,
                })
                .unwrap_or_default(),
            provider_id: self.provider_id,
            payload: object_or_empty(self.payload),
            overrides: object_or_empty(self.overrides),
            created_at: timestamp_or_epoch(self.created_at),
            updated_at: timestamp_or_epoch(self.updated_at),
            execution_details: Vec::new(),
        }
    }
}

fn object_or_empty(value: Option<Value>) -> Value {
    match value {
        Some(v @ Value::Object(_)) => v,
        _ => empty_object(),
    }
}

fn timestamp_or_epoch(value: Option<OffsetDateTime>) -> Timestamp {
    value.map(Timestamp::from).unwrap_or(Timestamp(OffsetDateTime::UNIX_EPOCH))
}
