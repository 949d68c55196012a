//! Human-facing message templates for risks, recommendations, and alerts.
//!
//! Centralized so wording stays consistent and out of detector logic. Every
//! string the scanners emit comes from here or from the critical-lab rule
//! table in the thresholds.

use crate::models::enums::Severity;

pub struct MessageTemplates;

impl MessageTemplates {
    // -----------------------------------------------------------------------
    // Population alerts
    // -----------------------------------------------------------------------

    /// OUTBREAK message, covering every qualifying symptom in one alert.
    pub fn outbreak(symptoms: &[String]) -> String {
        format!(
            "Potential outbreak detected: {} showing increasing trends",
            symptoms.join(", "),
        )
    }

    /// SEASONAL pattern message.
    pub fn seasonal_pattern() -> &'static str {
        "Common cold symptoms detected. Consider public health advisories."
    }

    /// LOCATION cluster message.
    pub fn location_cluster(location: &str) -> String {
        format!("Health cluster detected in {}", location)
    }

    // -----------------------------------------------------------------------
    // Status assessment
    // -----------------------------------------------------------------------

    pub fn chronic_condition_risk(condition: &str) -> String {
        format!("Risk of complications from {}", condition)
    }

    pub fn chronic_condition_advice() -> &'static str {
        "Regular monitoring of chronic conditions."
    }

    pub fn risk_factor_risk(factor: &str) -> String {
        format!("Increased risk due to {}", factor)
    }

    pub fn risk_factor_advice() -> &'static str {
        "Address identified risk factors through lifestyle changes."
    }

    pub fn recent_symptoms_risk() -> &'static str {
        "Recent symptom reports indicate potential issues."
    }

    pub fn recent_symptoms_advice() -> &'static str {
        "Follow up on recent symptoms with a healthcare professional."
    }

    // -----------------------------------------------------------------------
    // Predictive insights
    // -----------------------------------------------------------------------

    pub fn insufficient_history() -> &'static str {
        "Not enough historical data for predictive analysis"
    }

    pub fn keep_recording() -> &'static str {
        "Continue recording health data for more accurate predictions"
    }

    pub fn concerning_patterns() -> &'static str {
        "Multiple health indicators showing concerning patterns"
    }

    pub fn worsening_symptoms(symptoms: &[String]) -> String {
        format!("Worsening symptoms detected: {}", symptoms.join(", "))
    }

    pub fn elderly_decline() -> &'static str {
        "Declining health trajectory in elderly patient"
    }

    pub fn track_symptoms(symptoms: &[String]) -> String {
        format!("Track {} symptoms daily", symptoms.join(", "))
    }

    pub fn geriatric_assessment() -> &'static str {
        "Consider geriatric health assessment"
    }

    pub fn lifestyle_changes() -> &'static str {
        "Consider lifestyle modifications to reduce health risks"
    }

    /// Baseline recommendation pair for a concern level.
    pub fn concern_recommendations(concern: Severity) -> [&'static str; 2] {
        match concern {
            Severity::High => [
                "Schedule medical consultation within 1-2 days",
                "Monitor symptoms and vital signs closely",
            ],
            Severity::Medium => [
                "Schedule routine medical check-up within 1-2 weeks",
                "Continue monitoring health indicators",
            ],
            Severity::Low => [
                "Maintain regular health monitoring",
                "Follow preventive health guidelines",
            ],
        }
    }

    /// Monitoring next-step description for a concern level.
    pub fn monitoring_description(concern: Severity) -> &'static str {
        match concern {
            Severity::High => "Monitor symptoms and vital signs daily",
            Severity::Medium => "Monitor symptoms and vital signs weekly",
            Severity::Low => "Continue routine health monitoring",
        }
    }

    pub fn urgent_consultation() -> &'static str {
        "Schedule urgent medical consultation"
    }

    pub fn routine_consultation() -> &'static str {
        "Schedule routine medical check-up"
    }

    /// Key-insight line for a symptom that keeps coming back.
    pub fn recurring_symptom(name: &str, frequency: u32) -> String {
        format!("{} reported {} times", name, frequency)
    }

    /// Key-insight line for symptoms that show up together.
    pub fn co_occurring(first: &str, second: &str, frequency: u32) -> String {
        format!("{} and {} reported together {} times", first, second, frequency)
    }

    /// Evidence line for a condition predicted from a symptom pair.
    pub fn co_occurrence_evidence(first: &str, second: &str) -> String {
        format!("Co-occurring symptoms: {}, {}", first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbreak_message_lists_every_symptom() {
        let msg = MessageTemplates::outbreak(&["cough".into(), "fever".into()]);
        assert_eq!(
            msg,
            "Potential outbreak detected: cough, fever showing increasing trends"
        );
    }

    #[test]
    fn location_cluster_names_the_location() {
        let msg = MessageTemplates::location_cluster("Lagos");
        assert!(msg.contains("Lagos"));
    }

    #[test]
    fn status_messages_name_the_finding() {
        assert_eq!(
            MessageTemplates::chronic_condition_risk("diabetes"),
            "Risk of complications from diabetes"
        );
        assert_eq!(
            MessageTemplates::risk_factor_risk("smoking"),
            "Increased risk due to smoking"
        );
    }

    #[test]
    fn concern_recommendations_scale_with_level() {
        let high = MessageTemplates::concern_recommendations(Severity::High);
        assert!(high[0].contains("1-2 days"));
        let medium = MessageTemplates::concern_recommendations(Severity::Medium);
        assert!(medium[0].contains("1-2 weeks"));
        let low = MessageTemplates::concern_recommendations(Severity::Low);
        assert!(low[0].contains("Maintain regular"));
    }

    #[test]
    fn worsening_warning_lists_symptoms() {
        let msg = MessageTemplates::worsening_symptoms(&["cough".into(), "fatigue".into()]);
        assert_eq!(msg, "Worsening symptoms detected: cough, fatigue");
    }
}
