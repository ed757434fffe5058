use indexmap::IndexMap;

use crate::providers::Provider;
use crate::report::{EndpointOutcome, ProbeOutcome, ProbeResult, ProviderSummary};

/// One working provider with the fields ranking and recommendations need.
#[derive(Debug, Clone)]
pub struct RankedProvider {
    pub provider: Provider,
    pub success_rate_percent: f64,
    pub average_latency_ms: Option<f64>,
}

/// Groups probe results by provider in test order and computes per-provider
/// aggregates. Rebuilt from scratch on each run.
pub fn summarize(results: &[ProbeResult]) -> IndexMap<Provider, ProviderSummary> {
    let mut summaries: IndexMap<Provider, ProviderSummary> = IndexMap::new();

    for result in results {
        let summary = summaries
            .entry(result.provider)
            .or_insert_with(|| ProviderSummary {
                total_calls: 0,
                success_count: 0,
                failure_count: 0,
                success_rate_percent: None,
                average_latency_ms: None,
                endpoints: Vec::new(),
            });

        summary.total_calls += 1;
        if result.succeeded() {
            summary.success_count += 1;
        } else {
            summary.failure_count += 1;
        }

        let completeness_score = match &result.outcome {
            ProbeOutcome::Success { quality, .. } => Some(quality.completeness_score),
            ProbeOutcome::Failed { .. } => None,
        };
        summary.endpoints.push(EndpointOutcome {
            endpoint: result.endpoint.clone(),
            succeeded: result.succeeded(),
            latency_ms: result.latency_ms,
            completeness_score,
        });
    }

    for summary in summaries.values_mut() {
        if summary.total_calls > 0 {
            #[allow(clippy::cast_precision_loss)]
            let rate = summary.success_count as f64 / summary.total_calls as f64 * 100.0;
            summary.success_rate_percent = Some(rate);
        }

        if summary.success_count > 0 {
            let successful_latency: u64 = summary
                .endpoints
                .iter()
                .filter(|endpoint| endpoint.succeeded)
                .map(|endpoint| endpoint.latency_ms)
                .sum();

            #[allow(clippy::cast_precision_loss)]
            let average = successful_latency as f64 / summary.success_count as f64;
            summary.average_latency_ms = Some(average);
        }
    }

    summaries
}

/// Splits providers into working (success rate >= 50%) and failed, ranking
/// working providers by success rate descending with latency ascending as
/// the tie-breaker.
pub fn rank(
    summaries: &IndexMap<Provider, ProviderSummary>,
) -> (Vec<RankedProvider>, Vec<Provider>) {
    let mut working = Vec::new();
    let mut failed = Vec::new();

    for (provider, summary) in summaries {
        if summary.is_working() {
            working.push(RankedProvider {
                provider: *provider,
                success_rate_percent: summary.success_rate_percent.unwrap_or(0.0),
                average_latency_ms: summary.average_latency_ms,
            });
        } else {
            failed.push(*provider);
        }
    }

    working.sort_by(|a, b| {
        b.success_rate_percent
            .partial_cmp(&a.success_rate_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let a_latency = a.average_latency_ms.unwrap_or(f64::INFINITY);
                let b_latency = b.average_latency_ms.unwrap_or(f64::INFINITY);
                a_latency
                    .partial_cmp(&b_latency)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    (working, failed)
}
