use chrono::Utc;
use futures::future::join_all;
use log::{info, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::battery::ProbeSpec;
use super::{quality, recommend, summary};
use crate::error::{MarketLensError, Result};
use crate::report::{ProbeOutcome, ProbeReport, ProbeResult, QualityAssessment};

/// Independent timeout per probe; a slow endpoint is bounded by this, not by
/// the run as a whole.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ProbeRunner {
    client: Client,
}

impl ProbeRunner {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("MarketLens/0.1.0")
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| MarketLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Issues one GET and records the outcome as data. Nothing escapes this
    /// boundary: transport errors, bad statuses, and malformed payloads all
    /// land in the ProbeResult. Latency is measured to settle, success or not.
    pub async fn probe_endpoint(&self, spec: &ProbeSpec) -> ProbeResult {
        let requested_at = Utc::now();
        let started = Instant::now();

        let mut request = self.client.get(&spec.url).query(&spec.query);
        for (name, value) in &spec.headers {
            request = request.header(name, value);
        }

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) if status.is_success() => {
                        success_outcome(spec, status.as_u16(), &body)
                    }
                    Ok(body) => ProbeOutcome::Failed {
                        status_code: Some(status.as_u16()),
                        error_message: format!("upstream returned status {status}"),
                        error_code: None,
                        error_body: Some(quality::truncate_payload(&body)),
                    },
                    Err(err) => ProbeOutcome::Failed {
                        status_code: Some(status.as_u16()),
                        error_message: err.to_string(),
                        error_code: error_code(&err),
                        error_body: None,
                    },
                }
            }
            Err(err) => ProbeOutcome::Failed {
                status_code: err.status().map(|status| status.as_u16()),
                error_message: err.to_string(),
                error_code: error_code(&err),
                error_body: None,
            },
        };

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = started.elapsed().as_millis() as u64;

        ProbeResult {
            provider: spec.provider,
            endpoint: spec.endpoint.clone(),
            requested_at,
            latency_ms,
            outcome,
        }
    }

    /// Runs the whole battery, aggregates per provider, ranks, and derives
    /// recommendations. One endpoint's failure never aborts the run.
    pub async fn run(&self, battery: &[ProbeSpec]) -> ProbeReport {
        let provider_count = battery
            .iter()
            .map(|spec| spec.provider)
            .collect::<HashSet<_>>()
            .len();
        info!(
            "Probing {} endpoints across {provider_count} providers...",
            battery.len()
        );

        let probes: Vec<_> = battery.iter().map(|spec| self.probe_endpoint(spec)).collect();
        let results = join_all(probes).await;

        for result in &results {
            let status = if result.succeeded() { "success" } else { "failed" };
            info!(
                "{}/{}: {status} in {}ms",
                result.provider, result.endpoint, result.latency_ms
            );
        }

        let providers = summary::summarize(&results);
        let (working, failed) = summary::rank(&providers);
        if working.is_empty() {
            warn!("No working providers found");
        }
        let recommendations = recommend::recommend(&working, &failed);

        ProbeReport {
            generated_at: Utc::now(),
            total_probes: results.len(),
            results,
            providers,
            recommendations,
        }
    }
}

fn success_outcome(spec: &ProbeSpec, status_code: u16, body: &str) -> ProbeOutcome {
    let quality = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(payload) => quality::assess(spec.provider, &spec.endpoint, &payload),
        Err(err) => QualityAssessment {
            has_required_fields: false,
            field_count: 0,
            completeness_score: 0,
            issues: vec![format!("payload is not valid JSON: {err}")],
        },
    };

    ProbeOutcome::Success {
        status_code,
        payload_summary: quality::truncate_payload(body),
        quality,
    }
}

fn error_code(err: &reqwest::Error) -> Option<String> {
    if err.is_timeout() {
        Some("timeout".to_string())
    } else if err.is_connect() {
        Some("connect".to_string())
    } else {
        None
    }
}
