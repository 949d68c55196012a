//! Record access seam between the analytics core and whatever storage the
//! embedding application uses. The core only ever reads through this trait;
//! it never owns a connection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Appointment, LabResult, PatientProfile, SymptomReport};

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("Patient not found: {0}")]
    NotFound(Uuid),

    #[error("Record backend error: {0}")]
    Backend(String),
}

/// Read-side contract the twin assembler pulls records through.
///
/// Implementations must return each list in chronological order (oldest
/// first). An unknown patient id is only an error for `get_patient`; the
/// list operations return empty for patients with no records.
#[allow(async_fn_in_trait)]
pub trait RecordAccessor {
    async fn get_patient(&self, id: Uuid) -> Result<PatientProfile, AccessError>;

    /// Reports for one patient, optionally restricted to `since..`.
    async fn list_symptom_reports(
        &self,
        patient_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SymptomReport>, AccessError>;

    async fn list_lab_results(&self, patient_id: Uuid) -> Result<Vec<LabResult>, AccessError>;

    async fn list_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, AccessError>;
}

/// Map-backed accessor for tests and small embedded deployments.
#[derive(Debug, Default)]
pub struct InMemoryRecords {
    patients: HashMap<Uuid, PatientProfile>,
    reports: Vec<SymptomReport>,
    labs: Vec<LabResult>,
    appointments: Vec<Appointment>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patient(&mut self, patient: PatientProfile) {
        self.patients.insert(patient.id, patient);
    }

    pub fn add_report(&mut self, report: SymptomReport) {
        self.reports.push(report);
    }

    pub fn add_lab(&mut self, lab: LabResult) {
        self.labs.push(lab);
    }

    pub fn add_appointment(&mut self, appointment: Appointment) {
        self.appointments.push(appointment);
    }
}

impl RecordAccessor for InMemoryRecords {
    async fn get_patient(&self, id: Uuid) -> Result<PatientProfile, AccessError> {
        self.patients
            .get(&id)
            .cloned()
            .ok_or(AccessError::NotFound(id))
    }

    async fn list_symptom_reports(
        &self,
        patient_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<SymptomReport>, AccessError> {
        let mut reports: Vec<SymptomReport> = self
            .reports
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .filter(|r| since.map_or(true, |cutoff| r.reported_at >= cutoff))
            .cloned()
            .collect();
        reports.sort_by_key(|r| r.reported_at);
        Ok(reports)
    }

    async fn list_lab_results(&self, patient_id: Uuid) -> Result<Vec<LabResult>, AccessError> {
        let mut labs: Vec<LabResult> = self
            .labs
            .iter()
            .filter(|l| l.patient_id == patient_id)
            .cloned()
            .collect();
        labs.sort_by_key(|l| l.collected_at);
        Ok(labs)
    }

    async fn list_appointments(&self, patient_id: Uuid) -> Result<Vec<Appointment>, AccessError> {
        let mut appointments: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.scheduled_at);
        Ok(appointments)
    }
}
