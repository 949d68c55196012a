//! Analytics passes over patient records.
//!
//! Four layers, each usable on its own:
//! 1. Risk scoring: four-category risk profile per patient
//! 2. Trend classification: split-half direction over counted or measured series
//! 3. Population scan: symptom trends, clusters, and alerts across patients
//! 4. Insight synthesis and twin assembly: the per-patient roll-up

pub mod insight;
pub mod messages;
pub mod population;
pub mod risk;
pub mod thresholds;
pub mod trend;
pub mod twin;

pub use insight::InsightReport;
pub use population::{ClusterAlert, PopulationReport};
pub use risk::RiskProfile;
pub use thresholds::AnalyticsThresholds;
pub use twin::{HealthTwinSnapshot, TwinAssembler};
