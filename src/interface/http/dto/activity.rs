use crate::application::usecases::list_activities::ActivityPage;
use crate::domain::entities::feed::{
    ExecutionDetail, FeedRecord, JobRecord, StepDescriptor, SubscriberSnapshot, WorkflowSnapshot,
};
use serde::Serialize;
use serde_json::Value;

/// Wire shape of one feed record. Arrays are always present, never null.
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub organization_id: String,
    pub environment_id: String,
    pub template_id: Option<String>,
    pub subscriber_id: Option<String>,
    pub transaction_id: String,
    pub subscriber: SubscriberResponse,
    pub template: TemplateResponse,
    pub payload: Value,
    pub channels: Vec<String>,
    pub topics: Vec<String>,
    pub jobs: Vec<JobResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriberResponse {
    pub subscriber_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub step_id: String,
    pub name: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: &'static str,
    pub step: StepResponse,
    pub provider_id: Option<String>,
    pub payload: Value,
    pub overrides: Value,
    pub execution_details: Vec<ExecutionDetailResponse>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ExecutionDetailResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_id: String,
    pub detail: String,
    pub source: &'static str,
    pub status: &'static str,
    pub provider_id: Option<String>,
    pub is_test: bool,
    pub is_retry: bool,
    pub created_at: String,
    pub raw: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ActivityListResponse {
    pub data: Vec<ActivityResponse>,
    pub has_more: bool,
    pub page: u32,
}

impl ActivityResponse {
    pub fn from_record(record: FeedRecord) -> Self {
        Self {
            id: record.id,
            organization_id: record.organization_id,
            environment_id: record.environment_id,
            template_id: record.template_id,
            subscriber_id: record.subscriber_id,
            transaction_id: record.transaction_id,
            subscriber: SubscriberResponse::from_snapshot(record.subscriber),
            template: TemplateResponse::from_snapshot(record.template),
            payload: record.payload,
            channels: record.channels,
            topics: record.topics,
            jobs: record.jobs.into_iter().map(JobResponse::from_job).collect(),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}

impl SubscriberResponse {
    fn from_snapshot(snapshot: SubscriberSnapshot) -> Self {
        Self {
            subscriber_id: snapshot.subscriber_id,
            first_name: snapshot.first_name,
            last_name: snapshot.last_name,
            email: snapshot.email,
            phone: snapshot.phone,
        }
    }
}

impl TemplateResponse {
    fn from_snapshot(snapshot: WorkflowSnapshot) -> Self {
        Self {
            name: snapshot.name,
            tags: snapshot.tags,
        }
    }
}

impl StepResponse {
    fn from_descriptor(step: StepDescriptor) -> Self {
        Self {
            step_id: step.step_id,
            name: step.name,
            channel: step.channel,
        }
    }
}

impl JobResponse {
    fn from_job(job: JobRecord) -> Self {
        Self {
            id: job.id,
            status: job.status.as_str(),
            step: StepResponse::from_descriptor(job.step),
            provider_id: job.provider_id,
            payload: job.payload,
            overrides: job.overrides,
            execution_details: job
                .execution_details
                .into_iter()
                .map(ExecutionDetailResponse::from_detail)
                .collect(),
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

impl ExecutionDetailResponse {
    fn from_detail(detail: ExecutionDetail) -> Self {
        Self {
            id: detail.id,
            job_id: detail.job_id,
            detail: detail.detail,
            source: detail.source.as_str(),
            status: detail.status.as_str(),
            provider_id: detail.provider_id,
            is_test: detail.is_test,
            is_retry: detail.is_retry,
            created_at: detail.created_at.to_rfc3339(),
            raw: detail.raw,
        }
    }
}

impl ActivityListResponse {
    pub fn from_page(page: ActivityPage) -> Self {
        Self {
            data: page
                .data
                .into_iter()
                .map(ActivityResponse::from_record)
                .collect(),
            has_more: page.has_more,
            page: page.page,
        }
    }
}
