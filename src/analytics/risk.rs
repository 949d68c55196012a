//! Four-category risk scoring over a patient's profile and history.
//!
//! Each category accumulates weighted contributions, clamps to 1.0, and
//! keeps the human-readable factor behind every contribution. The overall
//! band looks at categories individually, so one alarming category is
//! enough to raise it even when the others dilute the average.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::thresholds::AnalyticsThresholds;
use crate::models::enums::{RiskLevel, Severity};
use crate::models::{LabResult, PatientProfile, SymptomReport};

const AGE_OVER_65_WEIGHT: f64 = 0.3;
const AGE_UNDER_18_WEIGHT: f64 = 0.2;
const PREGNANCY_WEIGHT: f64 = 0.2;
const SMOKING_WEIGHT: f64 = 0.4;
const ALCOHOL_WEIGHT: f64 = 0.3;
const OBESITY_WEIGHT: f64 = 0.3;
const CHRONIC_CONDITION_WEIGHT: f64 = 0.2;
const HIGH_RISK_SYMPTOM_WEIGHT: f64 = 0.3;
const ABNORMAL_LAB_WEIGHT: f64 = 0.15;
const REPORT_FREQUENCY_WEIGHT: f64 = 0.15;
const HIGH_SEVERITY_WEIGHT: f64 = 0.1;

/// Symptom names that mark a report as high risk, matched as lowercase
/// substrings.
const HIGH_RISK_SYMPTOMS: [&str; 3] = ["chest pain", "difficulty breathing", "severe headache"];

/// How many of the most recent reports the high-risk symptom screen reads.
const RECENT_REPORTS_SCANNED: usize = 5;

/// One category's score in `0.0..=1.0` plus the factors that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub factors: Vec<String>,
}

impl CategoryScore {
    fn new(score: f64, factors: Vec<String>) -> Self {
        Self {
            score: score.min(1.0),
            factors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub demographic: CategoryScore,
    pub clinical: CategoryScore,
    pub behavioral: CategoryScore,
    pub environmental: CategoryScore,
    pub overall: RiskLevel,
}

/// Score a patient across the four risk categories.
///
/// `reports` and `labs` are the patient's full history, oldest first; the
/// behavioral window and the recent-report screen are applied in here
/// relative to `now`. A patient with no history at all scores baseline
/// (demographics and declared factors only) and the clinical category says
/// so explicitly instead of pretending the assessment is complete.
pub fn assess_risk(
    patient: &PatientProfile,
    reports: &[SymptomReport],
    labs: &[LabResult],
    thresholds: &AnalyticsThresholds,
    now: DateTime<Utc>,
) -> RiskProfile {
    let demographic = demographic_risk(patient);
    let clinical = clinical_risk(patient, reports, labs);
    let behavioral = behavioral_risk(reports, thresholds, now);
    let environmental = environmental_risk(patient);

    let overall = overall_level(
        [&demographic, &clinical, &behavioral, &environmental],
        thresholds,
    );

    RiskProfile {
        demographic,
        clinical,
        behavioral,
        environmental,
        overall,
    }
}

// ---------------------------------------------------------------------------
// Category scorers
// ---------------------------------------------------------------------------

fn demographic_risk(patient: &PatientProfile) -> CategoryScore {
    let mut score = 0.0;
    let mut factors = Vec::new();

    if patient.age > 65 {
        score += AGE_OVER_65_WEIGHT;
        factors.push("Advanced age (>65)".to_string());
    } else if patient.age < 18 {
        score += AGE_UNDER_18_WEIGHT;
        factors.push("Young age (<18)".to_string());
    }

    // The pregnancy flag scores only alongside a female gender value.
    let female = patient
        .gender
        .as_deref()
        .map_or(false, |g| g.eq_ignore_ascii_case("female"));
    if female && patient.is_pregnant {
        score += PREGNANCY_WEIGHT;
        factors.push("Pregnancy".to_string());
    }

    CategoryScore::new(score, factors)
}

fn clinical_risk(
    patient: &PatientProfile,
    reports: &[SymptomReport],
    labs: &[LabResult],
) -> CategoryScore {
    let mut score = 0.0;
    let mut factors = Vec::new();

    score += patient.chronic_conditions.len() as f64 * CHRONIC_CONDITION_WEIGHT;
    factors.extend(patient.chronic_conditions.iter().cloned());

    // High-risk symptom screen over the most recent reports only.
    let recent = reports.iter().rev().take(RECENT_REPORTS_SCANNED);
    let mut high_risk_hits = 0;
    for report in recent {
        let has_high_risk = report.symptoms.iter().any(|symptom| {
            HIGH_RISK_SYMPTOMS
                .iter()
                .any(|high_risk| symptom.contains(high_risk))
        });
        if has_high_risk {
            score += HIGH_RISK_SYMPTOM_WEIGHT;
            high_risk_hits += 1;
        }
    }
    if high_risk_hits > 0 {
        factors.push("High-risk symptoms reported".to_string());
    }

    for lab in labs.iter().filter(|lab| lab.is_abnormal()) {
        score += ABNORMAL_LAB_WEIGHT;
        factors.push(format!("Abnormal {} result", lab.test_name));
    }

    if reports.is_empty() && labs.is_empty() {
        factors.push("Insufficient history for full assessment".to_string());
    }

    CategoryScore::new(score, factors)
}

fn behavioral_risk(
    reports: &[SymptomReport],
    thresholds: &AnalyticsThresholds,
    now: DateTime<Utc>,
) -> CategoryScore {
    let cutoff = now - Duration::days(thresholds.recent_report_window_days);
    let windowed: Vec<&SymptomReport> = reports
        .iter()
        .filter(|r| r.reported_at >= cutoff)
        .collect();

    let mut score = 0.0;
    let mut factors = Vec::new();

    if !windowed.is_empty() {
        score += windowed.len() as f64 * REPORT_FREQUENCY_WEIGHT;
        factors.push(format!(
            "{} symptom reports in the last {} days",
            windowed.len(),
            thresholds.recent_report_window_days,
        ));
    }

    if windowed.iter().any(|r| r.severity == Severity::High) {
        score += HIGH_SEVERITY_WEIGHT;
        factors.push("High severity symptoms reported".to_string());
    }

    CategoryScore::new(score, factors)
}

fn environmental_risk(patient: &PatientProfile) -> CategoryScore {
    let mut score = 0.0;
    let mut factors = Vec::new();

    for factor in &patient.risk_factors {
        let lower = factor.to_lowercase();
        if lower.contains("smoking") {
            score += SMOKING_WEIGHT;
            factors.push("Smoking".to_string());
        }
        if lower.contains("alcohol") {
            score += ALCOHOL_WEIGHT;
            factors.push("Alcohol use".to_string());
        }
        if lower.contains("obesity") {
            score += OBESITY_WEIGHT;
            factors.push("Obesity".to_string());
        }
    }

    CategoryScore::new(score, factors)
}

/// Overall band: the worst single category decides. Never returns
/// `Critical`; that level is reserved for the insight synthesizer.
fn overall_level(categories: [&CategoryScore; 4], thresholds: &AnalyticsThresholds) -> RiskLevel {
    let worst = categories
        .iter()
        .map(|c| c.score)
        .fold(0.0_f64, f64::max);

    if worst >= thresholds.risk_high_cutoff {
        RiskLevel::High
    } else if worst >= thresholds.risk_medium_cutoff {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
