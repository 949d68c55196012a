//! Client seam for the optional external predictive service.
//!
//! The service is best effort: every failure mode collapses into
//! `Availability::Unavailable` with a reason, and the snapshot assembler
//! falls back to rule-based insights. Nothing in here returns a hard error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::enums::{Severity, Timeframe};

/// Outcome of a best-effort external call. `Unavailable` is an expected
/// state, not an error: callers must handle it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Availability<T> {
    Available(T),
    Unavailable(String),
}

/// Trend summary returned by the predictive service. Every field defaults
/// so a sparse or older service response still parses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictiveSummary {
    #[serde(default)]
    pub trends: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub concern_level: Option<Severity>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub early_warnings: Vec<String>,
}

/// External trend-analysis capability.
#[allow(async_fn_in_trait)]
pub trait PredictiveClient {
    /// Submit serialized patient history for analysis over `timeframe`.
    async fn analyze_trends(
        &self,
        patient_data: &serde_json::Value,
        timeframe: Timeframe,
    ) -> Availability<PredictiveSummary>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// HTTP client for a remote analytics service.
pub struct HttpPredictiveClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpPredictiveClient {
    /// Create a client pointing at the service root.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Probe the service's health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "predictive service health check failed");
                false
            }
        }
    }
}

/// Request body for POST /api/v1/analytics/health-analysis
#[derive(Serialize)]
struct HealthAnalysisRequest<'a> {
    patient_data: &'a serde_json::Value,
    timeframe: &'a str,
}

impl PredictiveClient for HttpPredictiveClient {
    async fn analyze_trends(
        &self,
        patient_data: &serde_json::Value,
        timeframe: Timeframe,
    ) -> Availability<PredictiveSummary> {
        let url = format!("{}/api/v1/analytics/health-analysis", self.base_url);
        let body = HealthAnalysisRequest {
            patient_data,
            timeframe: timeframe.as_str(),
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                let reason = if e.is_connect() {
                    format!("cannot reach predictive service at {}", self.base_url)
                } else if e.is_timeout() {
                    format!("request timed out after {}s", self.timeout_secs)
                } else {
                    e.to_string()
                };
                warn!(error = %reason, "predictive service request failed");
                return Availability::Unavailable(reason);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "predictive service returned an error");
            return Availability::Unavailable(format!(
                "predictive service returned status {}",
                status.as_u16(),
            ));
        }

        match response.json::<PredictiveSummary>().await {
            Ok(summary) => Availability::Available(summary),
            Err(e) => {
                warn!(error = %e, "predictive service response did not parse");
                Availability::Unavailable(format!("unparseable response: {}", e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Stand-ins
// ---------------------------------------------------------------------------

/// Placeholder for deployments with no predictive service wired in.
pub struct NoopPredictive;

impl PredictiveClient for NoopPredictive {
    async fn analyze_trends(
        &self,
        _patient_data: &serde_json::Value,
        _timeframe: Timeframe,
    ) -> Availability<PredictiveSummary> {
        Availability::Unavailable("no predictive client configured".to_string())
    }
}

/// Mock client for tests: returns a configurable outcome, optionally after
/// an artificial delay.
pub struct MockPredictiveClient {
    response: Availability<PredictiveSummary>,
    delay: Option<std::time::Duration>,
}

impl MockPredictiveClient {
    pub fn new(summary: PredictiveSummary) -> Self {
        Self {
            response: Availability::Available(summary),
            delay: None,
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            response: Availability::Unavailable(reason.to_string()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl PredictiveClient for MockPredictiveClient {
    async fn analyze_trends(
        &self,
        _patient_data: &serde_json::Value,
        _timeframe: Timeframe,
    ) -> Availability<PredictiveSummary> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mock_client_returns_configured_summary() {
        let summary = PredictiveSummary {
            concern_level: Some(Severity::Medium),
            recommendations: vec!["Check blood pressure weekly".into()],
            ..PredictiveSummary::default()
        };
        let client = MockPredictiveClient::new(summary.clone());
        let result = client.analyze_trends(&json!({}), Timeframe::Week).await;
        assert_eq!(result, Availability::Available(summary));
    }

    #[tokio::test]
    async fn mock_client_reports_unavailable() {
        let client = MockPredictiveClient::unavailable("maintenance window");
        let result = client.analyze_trends(&json!({}), Timeframe::Week).await;
        assert_eq!(
            result,
            Availability::Unavailable("maintenance window".to_string()),
        );
    }

    #[tokio::test]
    async fn noop_client_is_never_available() {
        let result = NoopPredictive.analyze_trends(&json!({}), Timeframe::Day).await;
        assert!(matches!(result, Availability::Unavailable(_)));
    }

    #[test]
    fn http_client_constructor() {
        let client = HttpPredictiveClient::new("http://localhost:8000", 30);
        assert_eq!(client.base_url, "http://localhost:8000");
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn http_client_trims_trailing_slash() {
        let client = HttpPredictiveClient::new("http://localhost:8000/", 30);
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn summary_parses_with_missing_fields() {
        let parsed: PredictiveSummary = serde_json::from_value(json!({
            "concern_level": "high",
            "recommendations": ["Schedule urgent medical consultation"],
        }))
        .unwrap();
        assert_eq!(parsed.concern_level, Some(Severity::High));
        assert!(parsed.trends.is_empty());
        assert_eq!(parsed.confidence, 0.0);
    }
}
