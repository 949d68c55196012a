use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{AdherenceBand, AppointmentStatus, VisitFrequency};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    /// Visit kind as recorded upstream, e.g. "checkup", "follow-up".
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AppointmentStatus,
    pub scheduled_at: DateTime<Utc>,
}

/// Visit-frequency and adherence view over a patient's appointment history.
/// `frequency` and `adherence` are `None` when there are no appointments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentStats {
    pub total: usize,
    pub completed: usize,
    pub frequency: Option<VisitFrequency>,
    pub adherence_pct: Option<f64>,
    pub adherence: Option<AdherenceBand>,
}

impl AppointmentStats {
    pub fn from_appointments(appointments: &[Appointment]) -> Self {
        let total = appointments.len();
        if total == 0 {
            return Self {
                total: 0,
                completed: 0,
                frequency: None,
                adherence_pct: None,
                adherence: None,
            };
        }

        let completed = appointments
            .iter()
            .filter(|a| a.status == AppointmentStatus::Completed)
            .count();
        // One decimal, matching the percentage precision used elsewhere.
        let pct = (completed as f64 / total as f64 * 1000.0).round() / 10.0;

        let frequency = if total > 5 {
            VisitFrequency::High
        } else if total > 2 {
            VisitFrequency::Moderate
        } else {
            VisitFrequency::Low
        };
        let adherence = if pct > 80.0 {
            AdherenceBand::Excellent
        } else if pct > 60.0 {
            AdherenceBand::Good
        } else {
            AdherenceBand::Poor
        };

        Self {
            total,
            completed,
            frequency: Some(frequency),
            adherence_pct: Some(pct),
            adherence: Some(adherence),
        }
    }
}
