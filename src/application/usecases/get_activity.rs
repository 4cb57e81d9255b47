// Use case: get_activity (single-record tiered resolution).

use crate::application::context::AppContext;
use crate::application::shared::trace_enrichment::TraceEnrichment;
use crate::domain::entities::feed::{FeedRecord, JobRecord};
use crate::domain::value_objects::ids::{ActivityId, TenantScope};
use crate::infrastructure::db::dto::{FeedDocument, StepRunRow};
use crate::infrastructure::flags::FeatureFlag;
use metrics::counter;
use tracing::warn;

/// Resolves one activity by walking an ordered fallback chain across the
/// backing stores, richest first.
pub struct GetActivityUseCase;

#[derive(Debug)]
pub enum GetActivityError {
    NotFound,
    Storage(String),
}

/// The four backing data sources, ordered richest to legacy. Entry is
/// selected once per request from the read flags; fallback never re-checks
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    WorkflowRun,
    StepRun,
    TraceLog,
    Legacy,
}

static TIER_CHAIN: [Tier; 4] = [Tier::WorkflowRun, Tier::StepRun, Tier::TraceLog, Tier::Legacy];

impl Tier {
    fn name(&self) -> &'static str {
        match self {
            Tier::WorkflowRun => "workflow_run",
            Tier::StepRun => "step_run",
            Tier::TraceLog => "trace_log",
            Tier::Legacy => "legacy",
        }
    }

    fn chain_from(entry: Tier) -> &'static [Tier] {
        let start = TIER_CHAIN
            .iter()
            .position(|tier| *tier == entry)
            .unwrap_or(TIER_CHAIN.len() - 1);
        &TIER_CHAIN[start..]
    }
}

impl GetActivityUseCase {
    pub async fn execute(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
    ) -> Result<FeedRecord, GetActivityError> {
        // Step 1: Select the entry tier once from the read flags.
        let entry = Self::entry_tier(ctx, scope).await;
        let chain = Tier::chain_from(entry);

        // Step 2: Walk the chain. A non-terminal miss or error only moves
        // resolution one tier down; the terminal tier decides the outcome.
        for (position, tier) in chain.iter().enumerate() {
            let terminal = position == chain.len() - 1;
            match Self::attempt(ctx, scope, activity_id, *tier).await {
                Ok(Some(record)) => return Ok(record),
                Ok(None) if terminal => return Err(GetActivityError::NotFound),
                Err(err) if terminal => return Err(GetActivityError::Storage(err)),
                Ok(None) => {
                    warn!(
                        activity_id = activity_id.as_str(),
                        environment_id = scope.environment_id.as_str(),
                        tier = tier.name(),
                        "feed_tier_miss"
                    );
                    counter!("feed_tier_fallback_total", "tier" => tier.name(), "reason" => "miss")
                        .increment(1);
                }
                Err(err) => {
                    warn!(
                        activity_id = activity_id.as_str(),
                        environment_id = scope.environment_id.as_str(),
                        tier = tier.name(),
                        error = %err,
                        "feed_tier_error"
                    );
                    counter!("feed_tier_fallback_total", "tier" => tier.name(), "reason" => "error")
                        .increment(1);
                }
            }
        }

        // The chain always ends with the legacy tier, which returns above.
        Err(GetActivityError::NotFound)
    }

    async fn entry_tier(ctx: &AppContext, scope: &TenantScope) -> Tier {
        let workflow_runs = ctx
            .flags
            .is_enabled(FeatureFlag::WorkflowRunReads, scope, false)
            .await;
        let step_runs = ctx
            .flags
            .is_enabled(FeatureFlag::StepRunReads, scope, false)
            .await;
        let traces = ctx
            .flags
            .is_enabled(FeatureFlag::TraceLogReads, scope, false)
            .await;

        if workflow_runs && step_runs && traces {
            Tier::WorkflowRun
        } else if step_runs && traces {
            Tier::StepRun
        } else if traces {
            Tier::TraceLog
        } else {
            Tier::Legacy
        }
    }

    async fn attempt(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
        tier: Tier,
    ) -> Result<Option<FeedRecord>, String> {
        match tier {
            Tier::WorkflowRun => Self::resolve_from_workflow_run(ctx, scope, activity_id).await,
            Tier::StepRun => Self::resolve_from_step_runs(ctx, scope, activity_id).await,
            Tier::TraceLog => Self::resolve_from_trace_logs(ctx, scope, activity_id).await,
            Tier::Legacy => Self::resolve_legacy_only(ctx, scope, activity_id).await,
        }
    }

    /// Workflow-run tier: seed the record from the workflow-run store, then
    /// build its jobs from step runs exactly as the step-run tier does.
    async fn resolve_from_workflow_run(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
    ) -> Result<Option<FeedRecord>, String> {
        let row = ctx
            .stores
            .workflow_runs
            .latest_by_run_id(scope, activity_id.as_str())
            .await
            .map_err(|e| format!("{e:?}"))?;
        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = row.seed_record();
        let transaction_id = effective_transaction_id(&record, activity_id);
        record.jobs = Self::step_run_jobs(ctx, scope, &transaction_id).await?;
        Ok(Some(record))
    }

    /// Step-run tier: cheap envelope from the legacy store, jobs rebuilt
    /// from the step-run store with trace enrichment.
    async fn resolve_from_step_runs(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
    ) -> Result<Option<FeedRecord>, String> {
        let value = ctx
            .stores
            .feed
            .get_metadata(scope, activity_id.as_str())
            .await
            .map_err(|e| format!("{e:?}"))?;
        let Some(doc) = decode_document(value, activity_id, scope) else {
            return Ok(None);
        };

        let mut record = doc.into_record();
        let transaction_id = effective_transaction_id(&record, activity_id);
        record.jobs = Self::step_run_jobs(ctx, scope, &transaction_id).await?;
        Ok(Some(record))
    }

    /// Trace-log tier: full legacy document with embedded jobs, each
    /// enriched with trace detail keyed by job id.
    async fn resolve_from_trace_logs(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
    ) -> Result<Option<FeedRecord>, String> {
        let value = ctx
            .stores
            .feed
            .get_full(scope, activity_id.as_str())
            .await
            .map_err(|e| format!("{e:?}"))?;
        let Some(doc) = decode_document(value, activity_id, scope) else {
            return Ok(None);
        };

        let mut record = doc.into_record();
        let job_ids: Vec<String> = record.jobs.iter().map(|job| job.id.clone()).collect();
        let mut details = TraceEnrichment::enrich(ctx.stores.traces.as_ref(), scope, &job_ids)
            .await
            .map_err(|e| format!("{e:?}"))?;
        for job in &mut record.jobs {
            job.execution_details = details.remove(&job.id).unwrap_or_default();
        }
        Ok(Some(record))
    }

    /// Legacy tier: the document as-is. This is the hard floor.
    async fn resolve_legacy_only(
        ctx: &AppContext,
        scope: &TenantScope,
        activity_id: &ActivityId,
    ) -> Result<Option<FeedRecord>, String> {
        let value = ctx
            .stores
            .feed
            .get_full(scope, activity_id.as_str())
            .await
            .map_err(|e| format!("{e:?}"))?;
        Ok(decode_document(value, activity_id, scope).map(FeedDocument::into_record))
    }

    /// Shared by tiers A and B: collapsed step runs become jobs, each with
    /// its trace details joined in one batched query. The step run is
    /// authoritative for the provider id; trace rows are not.
    async fn step_run_jobs(
        ctx: &AppContext,
        scope: &TenantScope,
        transaction_id: &str,
    ) -> Result<Vec<JobRecord>, String> {
        let rows = ctx
            .stores
            .step_runs
            .list_by_transaction(scope, transaction_id)
            .await
            .map_err(|e| format!("{e:?}"))?;
        let collapsed = StepRunRow::collapse_latest(rows);

        let entity_ids: Vec<String> = collapsed.iter().map(|r| r.step_run_id.clone()).collect();
        let mut details = TraceEnrichment::enrich(ctx.stores.traces.as_ref(), scope, &entity_ids)
            .await
            .map_err(|e| format!("{e:?}"))?;

        let mut jobs = Vec::with_capacity(collapsed.len());
        for row in collapsed {
            let provider_id = row.provider_id.clone();
            let mut job = row.into_job();
            let mut job_details = details.remove(&job.id).unwrap_or_default();
            for detail in &mut job_details {
                detail.provider_id = provider_id.clone();
            }
            job.execution_details = job_details;
            jobs.push(job);
        }
        Ok(jobs)
    }
}

/// Older records predate run-scoped transactions; fall back to the record
/// id so step-run lookups still have a key.
fn effective_transaction_id(record: &FeedRecord, activity_id: &ActivityId) -> String {
    if record.transaction_id.is_empty() {
        activity_id.as_str().to_string()
    } else {
        record.transaction_id.clone()
    }
}

fn decode_document(
    value: Option<serde_json::Value>,
    activity_id: &ActivityId,
    scope: &TenantScope,
) -> Option<FeedDocument> {
    let value = value?;
    match FeedDocument::decode(value) {
        Ok(doc) => Some(doc),
        Err(err) => {
            warn!(
                activity_id = activity_id.as_str(),
                environment_id = scope.environment_id.as_str(),
                error = %err,
                "feed_document_decode_failed"
            );
            None
        }
    }
}
