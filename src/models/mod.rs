pub mod appointment;
pub mod enums;
pub mod lab;
pub mod patient;
pub mod symptom;

pub use appointment::{Appointment, AppointmentStats};
pub use lab::LabResult;
pub use patient::PatientProfile;
pub use symptom::{SymptomPayload, SymptomReport};
