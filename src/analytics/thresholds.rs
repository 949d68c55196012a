//! Tunable cutoffs for the analytics passes.
//!
//! Every number the detectors compare against lives here, so a deployment
//! can tighten or relax screening without touching detector code.

use serde::{Deserialize, Serialize};

use crate::models::enums::HealthStatus;

/// One row of the critical-lab screen: a test whose value strictly above
/// `above` escalates the patient's status and emits the paired messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalLabRule {
    /// Matched case-insensitively against `LabResult::test_name`.
    pub test_name: String,
    pub above: f64,
    pub escalate_to: HealthStatus,
    pub risk: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsThresholds {
    /// Recent-half average must exceed the earlier-half average by this
    /// ratio before a series counts as increasing.
    pub trend_increase_ratio: f64,
    /// Recent-half average below the earlier-half average by this ratio
    /// counts as decreasing.
    pub trend_decrease_ratio: f64,
    /// An outbreak needs strictly more than this many reports of a symptom
    /// inside the window, on top of an increasing trend.
    pub outbreak_min_count: u32,
    /// A location cluster needs at least this many symptom/location pairs.
    pub cluster_min_pairs: usize,
    /// A seasonal alert needs at least this many distinct respiratory
    /// symptoms present in the window.
    pub seasonal_min_matches: usize,
    /// Predictive passes refuse to run on fewer longitudinal records.
    pub min_history_for_predictions: usize,
    /// A category score at or above this maps to high overall risk.
    pub risk_high_cutoff: f64,
    /// A category score at or above this maps to medium overall risk.
    pub risk_medium_cutoff: f64,
    /// Potential conditions below this confidence are suppressed.
    pub condition_confidence_cutoff: f64,
    /// Days of symptom history treated as recent for status assessment.
    pub recent_report_window_days: i64,
    /// Days of lab history screened by the critical-lab rules.
    pub recent_lab_window_days: i64,
    pub critical_lab_rules: Vec<CriticalLabRule>,
    /// Canonical (lowercase) symptom names counted toward seasonal alerts.
    pub respiratory_symptoms: Vec<String>,
}

impl Default for AnalyticsThresholds {
    fn default() -> Self {
        Self {
            trend_increase_ratio: 1.2,
            trend_decrease_ratio: 0.8,
            outbreak_min_count: 10,
            cluster_min_pairs: 3,
            seasonal_min_matches: 3,
            min_history_for_predictions: 3,
            risk_high_cutoff: 0.7,
            risk_medium_cutoff: 0.4,
            condition_confidence_cutoff: 0.7,
            recent_report_window_days: 7,
            recent_lab_window_days: 30,
            critical_lab_rules: vec![
                CriticalLabRule {
                    test_name: "Blood Sugar".into(),
                    above: 120.0,
                    escalate_to: HealthStatus::Critical,
                    risk: "High blood sugar detected. Potential for diabetes complications."
                        .into(),
                    recommendation: "Consult a doctor immediately for blood sugar management."
                        .into(),
                },
                CriticalLabRule {
                    test_name: "Cholesterol".into(),
                    above: 200.0,
                    escalate_to: HealthStatus::NeedsAttention,
                    risk: "High cholesterol detected. Increased risk of cardiovascular disease."
                        .into(),
                    recommendation:
                        "Consider dietary changes and consult a doctor for cholesterol management."
                            .into(),
                },
            ],
            respiratory_symptoms: vec![
                "cough".into(),
                "fever".into(),
                "sore throat".into(),
                "runny nose".into(),
                "headache".into(),
            ],
        }
    }
}

impl AnalyticsThresholds {
    /// Critical-lab rule for a test name, matched case-insensitively.
    pub fn lab_rule_for(&self, test_name: &str) -> Option<&CriticalLabRule> {
        let needle = test_name.to_lowercase();
        self.critical_lab_rules
            .iter()
            .find(|rule| rule.test_name.to_lowercase() == needle)
    }

    /// Whether a canonical symptom name counts toward the seasonal screen.
    pub fn is_respiratory(&self, symptom: &str) -> bool {
        self.respiratory_symptoms.iter().any(|s| s == symptom)
    }
}
