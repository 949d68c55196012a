//! Per-patient health analytics: risk profiles, longitudinal insight
//! synthesis, population symptom surveillance, and health twin snapshots
//! assembled over an embedder-provided record store.
//!
//! The crate is storage-agnostic. Records arrive through the async
//! [`accessor::RecordAccessor`] seam and the optional external predictive
//! service hangs off [`predictive::PredictiveClient`]; everything between
//! those two seams is pure computation with injectable thresholds.

pub mod accessor; // record access seam + in-memory implementation
pub mod analytics;
pub mod error;
pub mod models;
pub mod predictive; // optional external trend-analysis client

use tracing_subscriber::EnvFilter;

pub use accessor::{AccessError, InMemoryRecords, RecordAccessor};
pub use analytics::{AnalyticsThresholds, HealthTwinSnapshot, TwinAssembler};
pub use error::AnalyticsError;

/// Initialize tracing for embedders that do not install their own
/// subscriber. Honors `RUST_LOG`, defaulting to crate-level info.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("healthtwin_core=info")),
        )
        .init();
}
