// Feature flags gating which backing stores feed reads come from.

use crate::config::Flags;
use crate::domain::value_objects::ids::TenantScope;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureFlag {
    /// Seed single-record reads from the workflow-run store.
    WorkflowRunReads,
    /// Build jobs from the step-run store.
    StepRunReads,
    /// Attach execution details from the trace log store.
    TraceLogReads,
    /// Enrich paginated list results with execution details.
    ListTraceEnrichment,
}

impl FeatureFlag {
    pub fn key(&self) -> &'static str {
        match self {
            FeatureFlag::WorkflowRunReads => "workflow_run_reads",
            FeatureFlag::StepRunReads => "step_run_reads",
            FeatureFlag::TraceLogReads => "trace_log_reads",
            FeatureFlag::ListTraceEnrichment => "list_trace_enrichment",
        }
    }
}

/// Flag lookup is async and tenant-scoped so a remote flag provider can sit
/// behind this trait; the default implementation is settings-backed.
#[async_trait]
pub trait FeatureFlagService: Send + Sync {
    async fn is_enabled(&self, flag: FeatureFlag, scope: &TenantScope, default_value: bool)
    -> bool;
}

/// Flags resolved from static configuration, identical for every tenant.
pub struct SettingsFlagService {
    flags: Flags,
}

impl SettingsFlagService {
    pub fn new(flags: Flags) -> Self {
        Self { flags }
    }
}

#[async_trait]
impl FeatureFlagService for SettingsFlagService {
    async fn is_enabled(
        &self,
        flag: FeatureFlag,
        _scope: &TenantScope,
        _default_value: bool,
    ) -> bool {
        match flag {
            FeatureFlag::WorkflowRunReads => self.flags.workflow_run_reads,
            FeatureFlag::StepRunReads => self.flags.step_run_reads,
            FeatureFlag::TraceLogReads => self.flags.trace_log_reads,
            FeatureFlag::ListTraceEnrichment => self.flags.list_trace_enrichment,
        }
    }
}
