//! Health twin assembly: one call pulls a patient's records, runs the risk
//! and insight passes, folds in population alerts and the optional external
//! predictive service, and returns a self-contained snapshot.
//!
//! The snapshot is derived fresh on every call; nothing in here caches or
//! mutates shared state.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::insight::{
    synthesize, EarlyWarning, InsightReport, NextAction, PotentialCondition,
};
use super::population::ClusterAlert;
use super::risk::{assess_risk, RiskProfile};
use super::thresholds::AnalyticsThresholds;
use crate::accessor::RecordAccessor;
use crate::error::AnalyticsError;
use crate::models::enums::{HealthStatus, Severity, Timeframe};
use crate::models::{
    Appointment, AppointmentStats, LabResult, PatientProfile, SymptomReport,
};
use crate::predictive::{Availability, NoopPredictive, PredictiveClient, PredictiveSummary};

/// How long the assembler waits on the external predictive service before
/// falling back to rule-based insights only.
const DEFAULT_PREDICTIVE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// How many trailing appointments the snapshot carries.
const RECENT_APPOINTMENTS: usize = 5;

/// How many top symptoms the summary lists.
const TOP_SYMPTOMS: usize = 5;

// ---------------------------------------------------------------------------
// Snapshot types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomCount {
    pub symptom: String,
    pub count: u32,
}

/// Compact view over a patient's whole symptom history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomSummary {
    pub total_reports: usize,
    pub unique_symptoms: usize,
    /// Most frequent symptoms, count descending, at most five.
    pub top_symptoms: Vec<SymptomCount>,
    pub last_reported: Option<DateTime<Utc>>,
}

impl SymptomSummary {
    pub fn from_reports(reports: &[SymptomReport]) -> Self {
        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for report in reports {
            for symptom in &report.symptoms {
                *counts.entry(symptom).or_insert(0) += 1;
            }
        }
        let unique_symptoms = counts.len();

        let mut top: Vec<SymptomCount> = counts
            .into_iter()
            .map(|(symptom, count)| SymptomCount {
                symptom: symptom.to_string(),
                count,
            })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count));
        top.truncate(TOP_SYMPTOMS);

        Self {
            total_reports: reports.len(),
            unique_symptoms,
            top_symptoms: top,
            last_reported: reports.iter().map(|r| r.reported_at).max(),
        }
    }
}

/// State of the external predictive pass for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PredictiveAnalysis {
    /// The external service answered inside the timeout.
    Ready(PredictiveSummary),
    /// Too little history to ask for predictions at all.
    InsufficientData,
    /// Service missing, unreachable, or over the timeout; the snapshot
    /// carries rule-based insights only.
    Unavailable { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthTwinSnapshot {
    pub patient: PatientProfile,
    pub recent_symptoms: Vec<SymptomReport>,
    pub recent_labs: Vec<LabResult>,
    pub recent_appointments: Vec<Appointment>,
    pub risk_profile: RiskProfile,
    pub health_status: HealthStatus,
    pub potential_risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub key_insights: Vec<String>,
    pub next_actions: Vec<NextAction>,
    pub early_warnings: Vec<EarlyWarning>,
    pub potential_conditions: Vec<PotentialCondition>,
    pub symptom_summary: SymptomSummary,
    pub appointment_stats: AppointmentStats,
    pub predictive_analysis: PredictiveAnalysis,
    /// Set when malformed records were skipped during assembly.
    pub partial_data: bool,
    pub generated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Assembler
// ---------------------------------------------------------------------------

/// Builds [`HealthTwinSnapshot`]s from a record accessor, with an optional
/// external predictive client.
pub struct TwinAssembler<A, P = NoopPredictive> {
    records: A,
    predictive: Option<P>,
    thresholds: AnalyticsThresholds,
    predictive_timeout: std::time::Duration,
}

impl<A> TwinAssembler<A, NoopPredictive> {
    pub fn new(records: A, thresholds: AnalyticsThresholds) -> Self {
        Self {
            records,
            predictive: None,
            thresholds,
            predictive_timeout: DEFAULT_PREDICTIVE_TIMEOUT,
        }
    }
}

impl<A, P> TwinAssembler<A, P> {
    /// Wire in an external predictive client, bounded by `timeout`.
    pub fn with_predictive<Q>(
        self,
        client: Q,
        timeout: std::time::Duration,
    ) -> TwinAssembler<A, Q> {
        TwinAssembler {
            records: self.records,
            predictive: Some(client),
            thresholds: self.thresholds,
            predictive_timeout: timeout,
        }
    }
}

impl<A: RecordAccessor, P: PredictiveClient> TwinAssembler<A, P> {
    /// Assemble a snapshot for one patient.
    ///
    /// `population_alerts` is the latest population scan output; pass an
    /// empty slice when no scan feeds this deployment. The only hard error
    /// is an unknown patient id; malformed individual records are skipped
    /// and flagged through `partial_data`.
    pub async fn assemble(
        &self,
        patient_id: Uuid,
        timeframe: Timeframe,
        population_alerts: &[ClusterAlert],
    ) -> Result<HealthTwinSnapshot, AnalyticsError> {
        let now = Utc::now();

        let patient = self.records.get_patient(patient_id).await?;
        let (reports, labs, appointments) = tokio::try_join!(
            self.records.list_symptom_reports(patient_id, None),
            self.records.list_lab_results(patient_id),
            self.records.list_appointments(patient_id),
        )?;

        let (reports, malformed): (Vec<SymptomReport>, Vec<SymptomReport>) =
            reports.into_iter().partition(|r| !r.symptoms.is_empty());
        let partial_data = !malformed.is_empty();
        if partial_data {
            warn!(
                patient_id = %patient_id,
                skipped = malformed.len(),
                "skipping symptom reports with no symptoms"
            );
        }

        let risk_profile = assess_risk(&patient, &reports, &labs, &self.thresholds, now);
        let insight = synthesize(
            &patient,
            &reports,
            &labs,
            &risk_profile,
            population_alerts,
            &self.thresholds,
            now,
        );

        let symptom_summary = SymptomSummary::from_reports(&reports);
        let appointment_stats = AppointmentStats::from_appointments(&appointments);

        let symptom_cutoff = now - timeframe.duration();
        let recent_symptoms: Vec<SymptomReport> = reports
            .iter()
            .filter(|r| r.reported_at >= symptom_cutoff)
            .cloned()
            .collect();
        let lab_cutoff = now - Duration::days(self.thresholds.recent_lab_window_days);
        let recent_labs: Vec<LabResult> = labs
            .iter()
            .filter(|l| l.collected_at >= lab_cutoff)
            .cloned()
            .collect();
        let trailing = appointments.len().saturating_sub(RECENT_APPOINTMENTS);
        let recent_appointments = appointments[trailing..].to_vec();

        let InsightReport {
            status,
            potential_risks,
            mut recommendations,
            key_insights,
            mut early_warnings,
            next_actions,
            potential_conditions,
            insufficient_history,
            ..
        } = insight;
        let mut health_status = status;

        let predictive_analysis = if insufficient_history {
            PredictiveAnalysis::InsufficientData
        } else if let Some(client) = &self.predictive {
            let payload = serde_json::json!({
                "patient": patient,
                "reports": reports,
                "labs": labs,
            });
            match tokio::time::timeout(
                self.predictive_timeout,
                client.analyze_trends(&payload, timeframe),
            )
            .await
            {
                Ok(Availability::Available(summary)) => {
                    if let Some(level) = summary.concern_level {
                        health_status = health_status.escalate(match level {
                            Severity::High => HealthStatus::Critical,
                            Severity::Medium => HealthStatus::NeedsAttention,
                            Severity::Low => HealthStatus::Good,
                        });
                    }
                    recommendations.extend(summary.recommendations.iter().cloned());
                    let urgency = summary.concern_level.unwrap_or(Severity::Medium);
                    early_warnings.extend(summary.early_warnings.iter().map(|message| {
                        EarlyWarning {
                            message: message.clone(),
                            urgency,
                        }
                    }));
                    PredictiveAnalysis::Ready(summary)
                }
                Ok(Availability::Unavailable(reason)) => {
                    warn!(patient_id = %patient_id, reason = %reason, "predictive service unavailable");
                    PredictiveAnalysis::Unavailable { reason }
                }
                Err(_) => {
                    let reason = format!(
                        "predictive service timed out after {}ms",
                        self.predictive_timeout.as_millis(),
                    );
                    warn!(patient_id = %patient_id, reason = %reason, "predictive service unavailable");
                    PredictiveAnalysis::Unavailable { reason }
                }
            }
        } else {
            PredictiveAnalysis::Unavailable {
                reason: "no predictive client configured".to_string(),
            }
        };

        info!(
            patient_id = %patient_id,
            status = health_status.as_str(),
            reports = reports.len(),
            labs = labs.len(),
            "assembled health twin snapshot"
        );

        Ok(HealthTwinSnapshot {
            patient,
            recent_symptoms,
            recent_labs,
            recent_appointments,
            risk_profile,
            health_status,
            potential_risks,
            recommendations,
            key_insights,
            next_actions,
            early_warnings,
            potential_conditions,
            symptom_summary,
            appointment_stats,
            predictive_analysis,
            partial_data,
            generated_at: now,
        })
    }
}
