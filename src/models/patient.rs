use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered patient demographics and declared history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub chronic_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    /// Declared lifestyle and exposure factors, e.g. "smoking", "alcohol use".
    pub risk_factors: Vec<String>,
    pub is_pregnant: bool,
}

impl PatientProfile {
    /// Case-insensitive substring match against declared risk factors.
    pub fn has_risk_factor(&self, needle: &str) -> bool {
        self.risk_factors
            .iter()
            .any(|f| f.to_lowercase().contains(needle))
    }
}
