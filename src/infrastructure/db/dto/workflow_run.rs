use crate::domain::entities::feed::{FeedRecord, SubscriberSnapshot, WorkflowSnapshot};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::json_columns::{parse_object, parse_string_array};
use time::OffsetDateTime;

/// One row from the workflow-run analytical store. Sub-objects arrive as
/// JSON-encoded text columns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkflowRunRow {
    pub run_id: String,
    pub organization_id: String,
    pub environment_id: String,
    pub workflow_id: Option<String>,
    pub workflow_name: Option<String>,
    pub subscriber_id: Option<String>,
    pub transaction_id: Option<String>,
    pub payload: Option<String>,
    pub to_recipient: Option<String>,
    pub channels: Option<String>,
    pub topics: Option<String>,
    pub seq: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl WorkflowRunRow {
    /// Seed a feed record from this row's columnar fields. Jobs are filled
    /// in afterwards from the step-run store.
    pub fn seed_record(self) -> FeedRecord {
        let recipient = parse_object(self.to_recipient.as_deref());
        let subscriber = SubscriberSnapshot {
            subscriber_id: json_str(&recipient, "subscriber_id")
                .or_else(|| self.subscriber_id.clone())
                .unwrap_or_default(),
            first_name: json_str(&recipient, "first_name"),
            last_name: json_str(&recipient, "last_name"),
            email: json_str(&recipient, "email"),
            phone: json_str(&recipient, "phone"),
        };

        FeedRecord {
            id: self.run_id,
            organization_id: self.organization_id,
            environment_id: self.environment_id,
            template_id: self.workflow_id,
            subscriber_id: self.subscriber_id,
            transaction_id: self.transaction_id.unwrap_or_default(),
            subscriber,
            template: WorkflowSnapshot {
                name: self.workflow_name.unwrap_or_default(),
                tags: Vec::new(),
            },
            payload: parse_object(self.payload.as_deref()),
            jobs: Vec::new(),
            channels: parse_string_array(self.channels.as_deref()),
            topics: parse_string_array(self.topics.as_deref()),
            created_at: Timestamp::from(self.created_at),
            updated_at: Timestamp::from(self.updated_at),
        }
    }
}

fn json_str(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
