use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::providers::Provider;

/// Full output of one prober run. Field names and nesting are a stable
/// contract for downstream consumers of the JSON report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProbeReport {
    pub generated_at: DateTime<Utc>,
    pub total_probes: usize,
    pub results: Vec<ProbeResult>,
    pub providers: IndexMap<Provider, ProviderSummary>,
    pub recommendations: Vec<Recommendation>,
}

impl ProbeReport {
    pub fn has_working_provider(&self) -> bool {
        self.providers.values().any(ProviderSummary::is_working)
    }
}

/// Outcome of a single HTTP probe. Latency is recorded even on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub provider: Provider,
    pub endpoint: String,
    pub requested_at: DateTime<Utc>,
    pub latency_ms: u64,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success {
        status_code: u16,
        payload_summary: String,
        quality: QualityAssessment,
    },
    Failed {
        status_code: Option<u16>,
        error_message: String,
        error_code: Option<String>,
        error_body: Option<String>,
    },
}

/// Shape-quality verdict for one successful payload, computed once and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub has_required_fields: bool,
    pub field_count: usize,
    /// 0 = no fields, 50 = fields present but required missing,
    /// 100 = required fields present.
    pub completeness_score: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub total_calls: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// None iff total_calls == 0.
    pub success_rate_percent: Option<f64>,
    /// Mean over successful calls only; None iff success_count == 0.
    pub average_latency_ms: Option<f64>,
    /// Per-endpoint outcomes in test order.
    pub endpoints: Vec<EndpointOutcome>,
}

impl ProviderSummary {
    /// A provider qualifies as working with a success rate of at least 50%.
    pub fn is_working(&self) -> bool {
        self.success_rate_percent.is_some_and(|rate| rate >= 50.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointOutcome {
    pub endpoint: String,
    pub succeeded: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    NoWorkingProviders,
    UsePrimary {
        provider: Provider,
        success_rate_percent: f64,
        average_latency_ms: Option<f64>,
    },
    UseFallbackChain {
        providers: Vec<Provider>,
    },
    RateLimitAdvice {
        provider: Provider,
        note: String,
    },
    GeoBlockWarning {
        provider: Provider,
        note: String,
    },
}
