use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Severity;
use crate::error::AnalyticsError;

/// Symptom field as reported upstream: a single name or a sequence of names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymptomPayload {
    One(String),
    Many(Vec<String>),
}

impl SymptomPayload {
    /// Normalize into the canonical form: trimmed, lowercased, empty entries
    /// dropped, reported order kept. A payload with nothing left is rejected.
    pub fn normalize(self) -> Result<Vec<String>, AnalyticsError> {
        let raw = match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        };
        let symptoms: Vec<String> = raw
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        if symptoms.is_empty() {
            return Err(AnalyticsError::InvalidInput {
                field: "symptoms".into(),
                value: "no symptom names after normalization".into(),
            });
        }
        Ok(symptoms)
    }
}

/// One symptom check-in. `symptoms` is always in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomReport {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub location: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl SymptomReport {
    pub fn new(
        patient_id: Uuid,
        payload: SymptomPayload,
        severity: Severity,
        location: Option<String>,
        reported_at: DateTime<Utc>,
    ) -> Result<Self, AnalyticsError> {
        Ok(Self {
            id: Uuid::new_v4(),
            patient_id,
            symptoms: payload.normalize()?,
            severity,
            location,
            reported_at,
        })
    }
}
