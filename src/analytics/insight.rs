//! Insight synthesis: folds the risk profile, longitudinal history, and
//! population alerts into the patient-facing status, risks, recommendations,
//! warnings, and next actions.
//!
//! Status starts at `Good` and moves through `escalate` only, so the order
//! the rules run in can add findings but never soften an earlier one.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::messages::MessageTemplates;
use super::population::{ClusterAlert, ClusterDetail};
use super::risk::RiskProfile;
use super::thresholds::AnalyticsThresholds;
use super::trend::classify_values;
use crate::models::enums::{
    HealthStatus, MonitoringCadence, RiskLevel, Severity, SymptomCourse, Trajectory,
    TrendDirection,
};
use crate::models::{LabResult, PatientProfile, SymptomReport};

/// Lab test feeding the pre-diabetic screen, matched case-insensitively.
const GLUCOSE_TEST: &str = "blood sugar";
const PRE_DIABETIC_CUTOFF: f64 = 120.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarning {
    pub message: String,
    pub urgency: Severity,
}

/// A symptom reported more than once, with its interval-derived course.
/// `course` is `None` below three occurrences; intervals tell nothing yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSymptom {
    pub name: String,
    pub frequency: u32,
    pub course: Option<SymptomCourse>,
}

/// A symptom pair reported together in at least two check-ins.
/// `first` and `second` are in lexical order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoOccurrence {
    pub first: String,
    pub second: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialCondition {
    pub condition: String,
    pub confidence: f64,
    pub based_on: String,
    /// Estimated development window, e.g. "3-6 months".
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NextAction {
    Monitoring {
        cadence: MonitoringCadence,
        description: String,
    },
    Consultation {
        urgent: bool,
        description: String,
    },
}

/// Everything the synthesis pass derives for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub status: HealthStatus,
    pub potential_risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub key_insights: Vec<String>,
    pub early_warnings: Vec<EarlyWarning>,
    pub next_actions: Vec<NextAction>,
    pub potential_conditions: Vec<PotentialCondition>,
    pub recurring_symptoms: Vec<RecurringSymptom>,
    pub co_occurrences: Vec<CoOccurrence>,
    pub concern: Severity,
    pub trajectory: Trajectory,
    /// Below the minimum history for predictive passes; the predictive
    /// fields above are empty rather than fabricated.
    pub insufficient_history: bool,
}

// ---------------------------------------------------------------------------
// Synthesis
// ---------------------------------------------------------------------------

/// Fold every signal into one report. `reports` and `labs` are the patient's
/// full history, oldest first; recency windows are applied in here relative
/// to `now`. `population_alerts` is the current population scan output (pass
/// an empty slice when no scan feeds this deployment).
pub fn synthesize(
    patient: &PatientProfile,
    reports: &[SymptomReport],
    labs: &[LabResult],
    risk: &RiskProfile,
    population_alerts: &[ClusterAlert],
    thresholds: &AnalyticsThresholds,
    now: DateTime<Utc>,
) -> InsightReport {
    let mut status = HealthStatus::Good;
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();
    let mut key_insights = Vec::new();

    // [1] Chronic conditions.
    if !patient.chronic_conditions.is_empty() {
        status = status.escalate(HealthStatus::NeedsAttention);
        for condition in &patient.chronic_conditions {
            risks.push(MessageTemplates::chronic_condition_risk(condition));
        }
        recommendations.push(MessageTemplates::chronic_condition_advice().to_string());
    }

    // [2] Declared risk factors.
    if !patient.risk_factors.is_empty() {
        status = status.escalate(HealthStatus::NeedsAttention);
        for factor in &patient.risk_factors {
            risks.push(MessageTemplates::risk_factor_risk(factor));
        }
        recommendations.push(MessageTemplates::risk_factor_advice().to_string());
    }

    // [3] Recent symptom reports.
    let report_cutoff = now - Duration::days(thresholds.recent_report_window_days);
    let recent_reports: Vec<&SymptomReport> = reports
        .iter()
        .filter(|r| r.reported_at >= report_cutoff)
        .collect();
    if !recent_reports.is_empty() {
        status = status.escalate(HealthStatus::NeedsAttention);
        risks.push(MessageTemplates::recent_symptoms_risk().to_string());
        recommendations.push(MessageTemplates::recent_symptoms_advice().to_string());
    }

    // [4] Critical-lab screen over the recent window, one hit per rule.
    let lab_cutoff = now - Duration::days(thresholds.recent_lab_window_days);
    let mut tripped: Vec<&str> = Vec::new();
    for lab in labs.iter().filter(|l| l.collected_at >= lab_cutoff) {
        if let Some(rule) = thresholds.lab_rule_for(&lab.test_name) {
            if lab.value > rule.above && !tripped.contains(&rule.test_name.as_str()) {
                tripped.push(rule.test_name.as_str());
                status = status.escalate(rule.escalate_to);
                risks.push(rule.risk.clone());
                recommendations.push(rule.recommendation.clone());
            }
        }
    }

    // [5] Population alerts touching this patient.
    for alert in population_alerts {
        if alert_touches_patient(alert, patient, &recent_reports) {
            status = status.escalate(escalation_for(alert.severity));
            risks.push(alert.message.clone());
        }
    }

    // [6] Predictive pass, gated on history size.
    let history = reports.len() + labs.len();
    let insufficient_history = history < thresholds.min_history_for_predictions;

    let mut early_warnings = Vec::new();
    let mut next_actions = Vec::new();
    let mut potential_conditions = Vec::new();
    let mut recurring = Vec::new();
    let mut co_occurrences = Vec::new();
    let mut concern = Severity::Low;
    let mut trajectory = Trajectory::Stable;

    if insufficient_history {
        key_insights.push(MessageTemplates::insufficient_history().to_string());
        recommendations.push(MessageTemplates::keep_recording().to_string());
    } else {
        recurring = recurring_symptoms(reports);
        co_occurrences = co_occurring_pairs(reports);
        trajectory = overall_trajectory(&recurring);
        concern = concern_level(&recurring, &co_occurrences).max(risk_concern(risk.overall));

        let worsening: Vec<String> = recurring
            .iter()
            .filter(|s| s.course == Some(SymptomCourse::Worsening))
            .map(|s| s.name.clone())
            .collect();

        if concern == Severity::High {
            early_warnings.push(EarlyWarning {
                message: MessageTemplates::concerning_patterns().to_string(),
                urgency: Severity::High,
            });
        }
        if !worsening.is_empty() {
            early_warnings.push(EarlyWarning {
                message: MessageTemplates::worsening_symptoms(&worsening),
                urgency: if worsening.len() > 2 {
                    Severity::High
                } else {
                    Severity::Medium
                },
            });
        }
        let elderly_decline = patient.age > 65 && trajectory == Trajectory::Declining;
        if elderly_decline {
            early_warnings.push(EarlyWarning {
                message: MessageTemplates::elderly_decline().to_string(),
                urgency: Severity::High,
            });
        }

        recommendations.extend(
            MessageTemplates::concern_recommendations(concern)
                .iter()
                .map(|s| s.to_string()),
        );
        if !worsening.is_empty() {
            recommendations.push(MessageTemplates::track_symptoms(&worsening));
        }
        if elderly_decline {
            recommendations.push(MessageTemplates::geriatric_assessment().to_string());
        }
        if patient.has_risk_factor("smoking") || patient.has_risk_factor("alcohol") {
            recommendations.push(MessageTemplates::lifestyle_changes().to_string());
        }

        next_actions = plan_next_actions(concern);
        potential_conditions = predict_conditions(&co_occurrences, labs, concern, thresholds);

        for symptom in &recurring {
            key_insights.push(MessageTemplates::recurring_symptom(
                &symptom.name,
                symptom.frequency,
            ));
        }
        for pair in &co_occurrences {
            key_insights.push(MessageTemplates::co_occurring(
                &pair.first,
                &pair.second,
                pair.frequency,
            ));
        }

        status = status.escalate(escalation_for(concern));
    }

    InsightReport {
        status,
        potential_risks: risks,
        recommendations,
        key_insights,
        early_warnings,
        next_actions,
        potential_conditions,
        recurring_symptoms: recurring,
        co_occurrences,
        concern,
        trajectory,
        insufficient_history,
    }
}

/// Status a finding of the given severity escalates to.
fn escalation_for(severity: Severity) -> HealthStatus {
    match severity {
        Severity::High => HealthStatus::Critical,
        Severity::Medium => HealthStatus::NeedsAttention,
        Severity::Low => HealthStatus::Good,
    }
}

fn risk_concern(overall: RiskLevel) -> Severity {
    match overall {
        RiskLevel::High | RiskLevel::Critical => Severity::High,
        RiskLevel::Medium => Severity::Medium,
        RiskLevel::Low => Severity::Low,
    }
}

/// An alert touches a patient when it names a symptom they recently
/// reported, or clusters on their declared location or a location they
/// recently reported from.
fn alert_touches_patient(
    alert: &ClusterAlert,
    patient: &PatientProfile,
    recent_reports: &[&SymptomReport],
) -> bool {
    match &alert.detail {
        ClusterDetail::Outbreak { symptoms } | ClusterDetail::Seasonal { symptoms } => {
            symptoms.iter().any(|trend| {
                recent_reports
                    .iter()
                    .any(|r| r.symptoms.contains(&trend.symptom))
            })
        }
        ClusterDetail::LocationCluster { location, .. } => {
            patient.location.as_deref() == Some(location)
                || recent_reports
                    .iter()
                    .any(|r| r.location.as_deref() == Some(location))
        }
    }
}

// ---------------------------------------------------------------------------
// History analysis
// ---------------------------------------------------------------------------

fn recurring_symptoms(reports: &[SymptomReport]) -> Vec<RecurringSymptom> {
    let mut frequency: BTreeMap<&str, u32> = BTreeMap::new();
    for report in reports {
        for symptom in &report.symptoms {
            *frequency.entry(symptom).or_insert(0) += 1;
        }
    }

    frequency
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(&name, &count)| RecurringSymptom {
            name: name.to_string(),
            frequency: count,
            course: symptom_course(name, reports),
        })
        .collect()
}

/// Interval-based course of one symptom: consecutive gaps shrinking means
/// the symptom comes back faster (worsening), growing gaps mean relief.
fn symptom_course(symptom: &str, reports: &[SymptomReport]) -> Option<SymptomCourse> {
    let occurrences: Vec<DateTime<Utc>> = reports
        .iter()
        .filter(|r| r.symptoms.iter().any(|s| s == symptom))
        .map(|r| r.reported_at)
        .collect();
    if occurrences.len() < 3 {
        return None;
    }

    let intervals: Vec<i64> = occurrences
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .collect();

    let mut shorter = 0;
    let mut longer = 0;
    for pair in intervals.windows(2) {
        if pair[1] < pair[0] {
            shorter += 1;
        } else if pair[1] > pair[0] {
            longer += 1;
        }
    }

    Some(if shorter > longer {
        SymptomCourse::Worsening
    } else if longer > shorter {
        SymptomCourse::Improving
    } else {
        SymptomCourse::Stable
    })
}

fn co_occurring_pairs(reports: &[SymptomReport]) -> Vec<CoOccurrence> {
    let mut pairs: BTreeMap<(String, String), u32> = BTreeMap::new();
    for report in reports {
        if report.symptoms.len() < 2 {
            continue;
        }
        for i in 0..report.symptoms.len() {
            for j in (i + 1)..report.symptoms.len() {
                let a = &report.symptoms[i];
                let b = &report.symptoms[j];
                let key = if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                *pairs.entry(key).or_insert(0) += 1;
            }
        }
    }

    pairs
        .into_iter()
        .filter(|(_, count)| *count >= 2)
        .map(|((first, second), frequency)| CoOccurrence {
            first,
            second,
            frequency,
        })
        .collect()
}

fn overall_trajectory(recurring: &[RecurringSymptom]) -> Trajectory {
    let worsening = recurring
        .iter()
        .filter(|s| s.course == Some(SymptomCourse::Worsening))
        .count();
    let improving = recurring
        .iter()
        .filter(|s| s.course == Some(SymptomCourse::Improving))
        .count();

    if worsening > improving {
        Trajectory::Declining
    } else if improving > worsening {
        Trajectory::Improving
    } else {
        Trajectory::Stable
    }
}

fn concern_level(recurring: &[RecurringSymptom], pairs: &[CoOccurrence]) -> Severity {
    let worsening = recurring
        .iter()
        .filter(|s| s.course == Some(SymptomCourse::Worsening))
        .count();
    let strong_patterns = pairs.iter().filter(|p| p.frequency >= 3).count();

    if worsening >= 2 || strong_patterns >= 2 {
        Severity::High
    } else if worsening >= 1 || strong_patterns >= 1 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn plan_next_actions(concern: Severity) -> Vec<NextAction> {
    let cadence = match concern {
        Severity::High => MonitoringCadence::Daily,
        Severity::Medium => MonitoringCadence::Weekly,
        Severity::Low => MonitoringCadence::Monthly,
    };
    let mut actions = vec![NextAction::Monitoring {
        cadence,
        description: MessageTemplates::monitoring_description(concern).to_string(),
    }];

    match concern {
        Severity::High => actions.push(NextAction::Consultation {
            urgent: true,
            description: MessageTemplates::urgent_consultation().to_string(),
        }),
        Severity::Medium => actions.push(NextAction::Consultation {
            urgent: false,
            description: MessageTemplates::routine_consultation().to_string(),
        }),
        Severity::Low => {}
    }

    actions
}

// ---------------------------------------------------------------------------
// Condition prediction
// ---------------------------------------------------------------------------

fn predict_conditions(
    pairs: &[CoOccurrence],
    labs: &[LabResult],
    concern: Severity,
    thresholds: &AnalyticsThresholds,
) -> Vec<PotentialCondition> {
    let timeframe = match concern {
        Severity::High => "1-3 months",
        Severity::Medium => "3-6 months",
        Severity::Low => "6-12 months",
    };

    let mut conditions = Vec::new();

    for pair in pairs {
        let names = [pair.first.as_str(), pair.second.as_str()];
        if names.contains(&"chest pain") && names.contains(&"shortness of breath") {
            conditions.push(PotentialCondition {
                condition: "Potential cardiovascular issue".to_string(),
                confidence: 0.7,
                based_on: MessageTemplates::co_occurrence_evidence(&pair.first, &pair.second),
                timeframe: timeframe.to_string(),
            });
        }
        if names.contains(&"headache") && names.contains(&"dizziness") {
            conditions.push(PotentialCondition {
                condition: "Potential hypertension".to_string(),
                confidence: 0.6,
                based_on: MessageTemplates::co_occurrence_evidence(&pair.first, &pair.second),
                timeframe: timeframe.to_string(),
            });
        }
    }

    // Longitudinal glucose screen: last value per day, split-half trend.
    let glucose_series: BTreeMap<NaiveDate, f64> = labs
        .iter()
        .filter(|l| l.test_name.eq_ignore_ascii_case(GLUCOSE_TEST))
        .map(|l| (l.collected_at.date_naive(), l.value))
        .collect();
    let latest_glucose = labs
        .iter()
        .filter(|l| l.test_name.eq_ignore_ascii_case(GLUCOSE_TEST))
        .last()
        .map(|l| l.value);
    if let Some(latest) = latest_glucose {
        let trend = classify_values(&glucose_series, thresholds);
        if trend.direction == TrendDirection::Increasing && latest > PRE_DIABETIC_CUTOFF {
            conditions.push(PotentialCondition {
                condition: "Pre-diabetic condition".to_string(),
                confidence: 0.65,
                based_on: "Increasing glucose levels".to_string(),
                timeframe: timeframe.to_string(),
            });
        }
    }

    conditions.retain(|c| c.confidence >= thresholds.condition_confidence_cutoff);
    conditions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::population::{LocationTally, SymptomTrend};
    use crate::analytics::risk::assess_risk;
    use crate::models::enums::AlertKind;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn base_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn patient(age: u32) -> PatientProfile {
        PatientProfile {
            id: Uuid::new_v4(),
            name: "Test Patient".into(),
            age,
            gender: None,
            location: Some("Lagos".into()),
            chronic_conditions: vec![],
            allergies: vec![],
            medications: vec![],
            risk_factors: vec![],
            is_pregnant: false,
        }
    }

    fn report(symptoms: &[&str], days_ago: i64) -> SymptomReport {
        SymptomReport {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            severity: Severity::Low,
            location: Some("Lagos".into()),
            reported_at: base_now() - Duration::days(days_ago),
        }
    }

    fn lab(test_name: &str, value: f64, days_ago: i64) -> LabResult {
        LabResult {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            test_name: test_name.into(),
            value,
            unit: Some("mg/dL".into()),
            normal_range: None,
            collected_at: base_now() - Duration::days(days_ago),
        }
    }

    fn run(
        patient: &PatientProfile,
        reports: &[SymptomReport],
        labs: &[LabResult],
        alerts: &[ClusterAlert],
    ) -> InsightReport {
        run_with(patient, reports, labs, alerts, &AnalyticsThresholds::default())
    }

    fn run_with(
        patient: &PatientProfile,
        reports: &[SymptomReport],
        labs: &[LabResult],
        alerts: &[ClusterAlert],
        thresholds: &AnalyticsThresholds,
    ) -> InsightReport {
        let risk = assess_risk(patient, reports, labs, thresholds, base_now());
        synthesize(patient, reports, labs, &risk, alerts, thresholds, base_now())
    }

    #[test]
    fn clean_patient_with_no_history_stays_good() {
        let result = run(&patient(30), &[], &[], &[]);
        assert_eq!(result.status, HealthStatus::Good);
        assert!(result.potential_risks.is_empty());
        assert!(result.insufficient_history);
        assert!(result
            .recommendations
            .contains(&MessageTemplates::keep_recording().to_string()));
        assert!(result
            .key_insights
            .contains(&MessageTemplates::insufficient_history().to_string()));
    }

    #[test]
    fn chronic_condition_needs_attention() {
        let mut chronic = patient(30);
        chronic.chronic_conditions = vec!["asthma".into()];
        let result = run(&chronic, &[], &[], &[]);
        assert_eq!(result.status, HealthStatus::NeedsAttention);
        assert!(result
            .potential_risks
            .contains(&"Risk of complications from asthma".to_string()));
        assert!(result
            .recommendations
            .contains(&"Regular monitoring of chronic conditions.".to_string()));
    }

    #[test]
    fn declared_risk_factor_needs_attention() {
        let mut smoker = patient(30);
        smoker.risk_factors = vec!["smoking".into()];
        let result = run(&smoker, &[], &[], &[]);
        assert_eq!(result.status, HealthStatus::NeedsAttention);
        assert!(result
            .potential_risks
            .contains(&"Increased risk due to smoking".to_string()));
    }

    #[test]
    fn recent_symptom_reports_need_attention() {
        let reports = vec![report(&["cough"], 2)];
        let result = run(&patient(30), &reports, &[], &[]);
        assert_eq!(result.status, HealthStatus::NeedsAttention);
        assert!(result
            .potential_risks
            .contains(&MessageTemplates::recent_symptoms_risk().to_string()));
    }

    #[test]
    fn old_reports_do_not_trip_the_recent_rule() {
        let reports = vec![report(&["cough"], 12)];
        let result = run(&patient(30), &reports, &[], &[]);
        assert_eq!(result.status, HealthStatus::Good);
    }

    #[test]
    fn high_blood_sugar_is_critical() {
        let labs = vec![lab("Blood Sugar", 130.0, 5)];
        let result = run(&patient(30), &[], &labs, &[]);
        assert_eq!(result.status, HealthStatus::Critical);
        assert!(result.potential_risks.iter().any(|r| r.contains("High blood sugar")));
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("Consult a doctor immediately")));
    }

    #[test]
    fn later_rules_cannot_downgrade_critical() {
        // Cholesterol alone maps to NeedsAttention; it must not soften the
        // blood sugar escalation no matter the evaluation order.
        let labs = vec![
            lab("Blood Sugar", 130.0, 5),
            lab("Cholesterol", 250.0, 4),
        ];
        let result = run(&patient(30), &[], &labs, &[]);
        assert_eq!(result.status, HealthStatus::Critical);
        assert!(result.potential_risks.iter().any(|r| r.contains("cholesterol")));
    }

    #[test]
    fn stale_labs_are_outside_the_screen() {
        let labs = vec![lab("Blood Sugar", 130.0, 45)];
        let result = run(&patient(30), &[], &labs, &[]);
        assert_eq!(result.status, HealthStatus::Good);
    }

    #[test]
    fn repeated_high_labs_trip_a_rule_once() {
        let labs = vec![
            lab("Blood Sugar", 130.0, 5),
            lab("Blood Sugar", 140.0, 3),
            lab("Blood Sugar", 150.0, 1),
        ];
        let result = run(&patient(30), &[], &labs, &[]);
        let sugar_risks = result
            .potential_risks
            .iter()
            .filter(|r| r.contains("High blood sugar"))
            .count();
        assert_eq!(sugar_risks, 1);
    }

    fn outbreak_alert(symptom: &str) -> ClusterAlert {
        ClusterAlert {
            kind: AlertKind::Outbreak,
            severity: Severity::High,
            message: MessageTemplates::outbreak(&[symptom.to_string()]),
            detail: ClusterDetail::Outbreak {
                symptoms: vec![SymptomTrend {
                    symptom: symptom.to_string(),
                    count: 12,
                    percentage: 60.0,
                    trend: TrendDirection::Increasing,
                }],
            },
        }
    }

    #[test]
    fn outbreak_touching_the_patient_is_critical() {
        let reports = vec![report(&["cough"], 1)];
        let result = run(&patient(30), &reports, &[], &[outbreak_alert("cough")]);
        assert_eq!(result.status, HealthStatus::Critical);
        assert!(result
            .potential_risks
            .iter()
            .any(|r| r.contains("Potential outbreak detected")));
    }

    #[test]
    fn unrelated_outbreak_is_ignored() {
        let reports = vec![report(&["fatigue"], 1)];
        let result = run(&patient(30), &reports, &[], &[outbreak_alert("measles")]);
        assert_eq!(result.status, HealthStatus::NeedsAttention); // recent report only
        assert!(!result
            .potential_risks
            .iter()
            .any(|r| r.contains("outbreak")));
    }

    #[test]
    fn location_cluster_on_the_patients_location_needs_attention() {
        let alert = ClusterAlert {
            kind: AlertKind::LocationCluster,
            severity: Severity::Medium,
            message: MessageTemplates::location_cluster("Lagos"),
            detail: ClusterDetail::LocationCluster {
                location: "Lagos".into(),
                pairs: vec![LocationTally {
                    symptom: "rash".into(),
                    location: "Lagos".into(),
                    count: 4,
                }],
            },
        };
        let reports = vec![report(&["fatigue"], 1)];
        let result = run(&patient(30), &reports, &[], &[alert]);
        assert!(result.status >= HealthStatus::NeedsAttention);
        assert!(result
            .potential_risks
            .iter()
            .any(|r| r.contains("Health cluster detected in Lagos")));
    }

    #[test]
    fn declared_location_alone_matches_a_cluster() {
        let alert = ClusterAlert {
            kind: AlertKind::LocationCluster,
            severity: Severity::Medium,
            message: MessageTemplates::location_cluster("Lagos"),
            detail: ClusterDetail::LocationCluster {
                location: "Lagos".into(),
                pairs: vec![LocationTally {
                    symptom: "rash".into(),
                    location: "Lagos".into(),
                    count: 4,
                }],
            },
        };
        // The patient lives in Lagos but their recent report came from Abuja.
        let mut away = report(&["fatigue"], 1);
        away.location = Some("Abuja".into());
        let result = run(&patient(30), &[away], &[], &[alert]);
        assert!(result
            .potential_risks
            .iter()
            .any(|r| r.contains("Health cluster detected in Lagos")));
    }

    #[test]
    fn shrinking_intervals_mark_a_symptom_worsening() {
        // Gaps of 10, 6, then 3 days: each shorter than the last.
        let reports = vec![
            report(&["cough"], 19),
            report(&["cough"], 9),
            report(&["cough"], 3),
            report(&["cough"], 0),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        let cough = result
            .recurring_symptoms
            .iter()
            .find(|s| s.name == "cough")
            .unwrap();
        assert_eq!(cough.frequency, 4);
        assert_eq!(cough.course, Some(SymptomCourse::Worsening));
        assert_eq!(result.trajectory, Trajectory::Declining);
        assert!(result
            .early_warnings
            .iter()
            .any(|w| w.message == "Worsening symptoms detected: cough"));
        assert!(result
            .recommendations
            .contains(&"Track cough symptoms daily".to_string()));
    }

    #[test]
    fn growing_intervals_mark_a_symptom_improving() {
        // Gaps of 2 then 7 days.
        let reports = vec![
            report(&["cough"], 9),
            report(&["cough"], 7),
            report(&["cough"], 0),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        let cough = result
            .recurring_symptoms
            .iter()
            .find(|s| s.name == "cough")
            .unwrap();
        assert_eq!(cough.course, Some(SymptomCourse::Improving));
        assert_eq!(result.trajectory, Trajectory::Improving);
    }

    #[test]
    fn two_occurrences_say_nothing_about_course() {
        let reports = vec![
            report(&["cough"], 9),
            report(&["cough"], 1),
            report(&["fatigue"], 2),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        let cough = result
            .recurring_symptoms
            .iter()
            .find(|s| s.name == "cough")
            .unwrap();
        assert_eq!(cough.course, None);
    }

    #[test]
    fn two_worsening_symptoms_raise_concern_to_high() {
        let reports = vec![
            report(&["cough", "fatigue"], 19),
            report(&["cough", "fatigue"], 9),
            report(&["cough", "fatigue"], 3),
            report(&["cough", "fatigue"], 0),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        assert_eq!(result.concern, Severity::High);
        assert_eq!(result.status, HealthStatus::Critical);
        assert!(result
            .early_warnings
            .iter()
            .any(|w| w.message == MessageTemplates::concerning_patterns()));
        assert!(result
            .recommendations
            .contains(&"Schedule medical consultation within 1-2 days".to_string()));
        assert_eq!(result.next_actions.len(), 2);
        assert!(matches!(
            result.next_actions[0],
            NextAction::Monitoring {
                cadence: MonitoringCadence::Daily,
                ..
            }
        ));
        assert!(matches!(
            result.next_actions[1],
            NextAction::Consultation { urgent: true, .. }
        ));
    }

    #[test]
    fn frequent_co_occurrence_is_a_strong_pattern() {
        // Same pair three times at even spacing: one strong pattern,
        // concern medium.
        let reports = vec![
            report(&["headache", "nausea"], 6),
            report(&["headache", "nausea"], 3),
            report(&["headache", "nausea"], 0),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        let pair = &result.co_occurrences[0];
        assert_eq!((pair.first.as_str(), pair.second.as_str()), ("headache", "nausea"));
        assert_eq!(pair.frequency, 3);
        assert_eq!(result.concern, Severity::Medium);
        assert!(result
            .key_insights
            .contains(&"headache and nausea reported together 3 times".to_string()));
        assert!(matches!(
            result.next_actions[1],
            NextAction::Consultation { urgent: false, .. }
        ));
    }

    #[test]
    fn rare_co_occurrence_keeps_concern_low() {
        // Spread beyond the recent window so report frequency does not
        // feed back through the risk profile.
        let reports = vec![
            report(&["headache", "nausea"], 20),
            report(&["headache", "nausea"], 15),
            report(&["fatigue"], 10),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        assert_eq!(result.co_occurrences[0].frequency, 2);
        assert_eq!(result.concern, Severity::Low);
        assert_eq!(result.next_actions.len(), 1);
    }

    #[test]
    fn cardiovascular_pair_predicts_a_condition() {
        let reports = vec![
            report(&["chest pain", "shortness of breath"], 6),
            report(&["chest pain", "shortness of breath"], 3),
            report(&["chest pain", "shortness of breath"], 1),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        let condition = result
            .potential_conditions
            .iter()
            .find(|c| c.condition == "Potential cardiovascular issue")
            .unwrap();
        assert_eq!(condition.confidence, 0.7);
        assert_eq!(
            condition.based_on,
            "Co-occurring symptoms: chest pain, shortness of breath"
        );
        // Chest pain drives clinical risk high, which folds into concern.
        assert_eq!(condition.timeframe, "1-3 months");
    }

    #[test]
    fn low_confidence_conditions_are_suppressed_by_default() {
        let reports = vec![
            report(&["headache", "dizziness"], 6),
            report(&["headache", "dizziness"], 3),
            report(&["fatigue"], 1),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        assert!(result.potential_conditions.is_empty());

        let relaxed = AnalyticsThresholds {
            condition_confidence_cutoff: 0.6,
            ..AnalyticsThresholds::default()
        };
        let surfaced = run_with(&patient(30), &reports, &[], &[], &relaxed);
        assert!(surfaced
            .potential_conditions
            .iter()
            .any(|c| c.condition == "Potential hypertension"));
    }

    #[test]
    fn rising_glucose_predicts_pre_diabetes_when_cutoff_allows() {
        let labs = vec![
            lab("Blood Sugar", 95.0, 20),
            lab("Blood Sugar", 100.0, 15),
            lab("Blood Sugar", 125.0, 5),
            lab("Blood Sugar", 130.0, 1),
        ];
        let relaxed = AnalyticsThresholds {
            condition_confidence_cutoff: 0.6,
            ..AnalyticsThresholds::default()
        };
        let result = run_with(&patient(30), &[], &labs, &[], &relaxed);
        let condition = result
            .potential_conditions
            .iter()
            .find(|c| c.condition == "Pre-diabetic condition")
            .unwrap();
        assert_eq!(condition.confidence, 0.65);
        assert_eq!(condition.based_on, "Increasing glucose levels");
    }

    #[test]
    fn elderly_patient_with_declining_trajectory_gets_a_warning() {
        let reports = vec![
            report(&["cough"], 19),
            report(&["cough"], 9),
            report(&["cough"], 3),
            report(&["cough"], 0),
        ];
        let result = run(&patient(72), &reports, &[], &[]);
        assert!(result
            .early_warnings
            .iter()
            .any(|w| w.message == MessageTemplates::elderly_decline() && w.urgency == Severity::High));
        assert!(result
            .recommendations
            .contains(&MessageTemplates::geriatric_assessment().to_string()));
    }

    #[test]
    fn lifestyle_recommendation_follows_declared_factors() {
        let mut smoker = patient(30);
        smoker.risk_factors = vec!["smoking".into()];
        let reports = vec![
            report(&["cough"], 6),
            report(&["fatigue"], 3),
            report(&["cough"], 1),
        ];
        let result = run(&smoker, &reports, &[], &[]);
        assert!(result
            .recommendations
            .contains(&MessageTemplates::lifestyle_changes().to_string()));
    }

    #[test]
    fn exactly_three_records_pass_the_gate() {
        let reports = vec![
            report(&["cough"], 20),
            report(&["fatigue"], 15),
            report(&["nausea"], 10),
        ];
        let result = run(&patient(30), &reports, &[], &[]);
        assert!(!result.insufficient_history);
        assert!(result
            .recommendations
            .contains(&"Maintain regular health monitoring".to_string()));
        assert!(matches!(
            result.next_actions[0],
            NextAction::Monitoring {
                cadence: MonitoringCadence::Monthly,
                ..
            }
        ));
    }
}
