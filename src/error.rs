//! Crate-wide error taxonomy.
//!
//! Only conditions that abort an operation are errors. Two conditions that
//! resemble errors are modeled as values instead: insufficient history is an
//! explicit status on the snapshot (never a fabricated score), and external
//! predictive failures degrade to `Availability::Unavailable` so a snapshot
//! is always produced from the rule-based path.

use thiserror::Error;
use uuid::Uuid;

use crate::accessor::AccessError;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Patient not found: {0}")]
    PatientNotFound(Uuid),

    #[error("Invalid value for {field}: {value}")]
    InvalidInput { field: String, value: String },

    #[error("Record access failed: {0}")]
    Access(String),
}

impl From<AccessError> for AnalyticsError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound(id) => AnalyticsError::PatientNotFound(id),
            AccessError::Backend(msg) => AnalyticsError::Access(msg),
        }
    }
}
