use crate::domain::entities::feed::{ExecutionStatus, JobRecord, StepDescriptor};
use crate::domain::value_objects::timestamps::Timestamp;
use crate::infrastructure::db::dto::json_columns::parse_object;
use std::collections::HashMap;
use time::OffsetDateTime;

/// One write to the step-run analytical store. The same logical step may
/// appear several times; readers collapse to the final write.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StepRunRow {
    pub step_run_id: String,
    pub step_id: String,
    pub environment_id: String,
    pub transaction_id: String,
    pub status: Option<String>,
    pub step_name: Option<String>,
    pub channel: Option<String>,
    pub provider_id: Option<String>,
    pub payload: Option<String>,
    pub overrides: Option<String>,
    pub seq: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl StepRunRow {
    /// Collapse duplicate writes to one row per logical step: newest
    /// `created_at` wins, highest `seq` breaking timestamp ties. The
    /// surviving rows come back in ascending write order.
    pub fn collapse_latest(rows: Vec<StepRunRow>) -> Vec<StepRunRow> {
        let mut latest: HashMap<String, StepRunRow> = HashMap::new();
        for row in rows {
            let supersedes = match latest.get(&row.step_id) {
                Some(kept) => (row.created_at, row.seq) > (kept.created_at, kept.seq),
                None => true,
            };
            if supersedes {
                latest.insert(row.step_id.clone(), row);
            }
        }

        let mut collapsed: Vec<StepRunRow> = latest.into_values().collect();
        collapsed.sort_by_key(|row| (row.created_at, row.seq));
        collapsed
    }

    pub fn into_job(self) -> JobRecord {
        JobRecord {
            id: self.step_run_id,
            status: ExecutionStatus::from_raw(self.status.as_deref().unwrap_or_default()),
            step: StepDescriptor {
                step_id: self.step_id,
                name: self.step_name,
                channel: self.channel,
            },
            provider_id: self.provider_id,
            payload: parse_object(self.payload.as_deref()),
            overrides: parse_object(self.overrides.as_deref()),
            created_at: Timestamp::from(self.created_at),
            updated_at: Timestamp::from(self.updated_at),
            execution_details: Vec::new(),
        }
    }
}
