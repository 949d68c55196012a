use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResult {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub test_name: String,
    pub value: f64,
    pub unit: Option<String>,
    /// Inclusive reference range in "low-high" form, e.g. "70-100".
    pub normal_range: Option<String>,
    pub collected_at: DateTime<Utc>,
}

impl LabResult {
    /// Parsed reference bounds. `None` when the range is absent or malformed.
    pub fn reference_bounds(&self) -> Option<(f64, f64)> {
        let range = self.normal_range.as_deref()?;
        let (low, high) = range.split_once('-')?;
        let low: f64 = low.trim().parse().ok()?;
        let high: f64 = high.trim().parse().ok()?;
        (low <= high).then_some((low, high))
    }

    /// Value outside the reference range. A result without a parseable
    /// range is never flagged abnormal.
    pub fn is_abnormal(&self) -> bool {
        match self.reference_bounds() {
            Some((low, high)) => self.value < low || self.value > high,
            None => false,
        }
    }
}
