use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = AnalyticsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(AnalyticsError::InvalidInput {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(TrendDirection {
    Increasing => "increasing",
    Stable => "stable",
    Decreasing => "decreasing",
});

str_enum!(Timeframe {
    Day => "24h",
    Week => "7d",
    Month => "30d",
});

impl Timeframe {
    /// Lookback window this timeframe spans, anchored at the caller's `now`.
    pub fn duration(&self) -> chrono::Duration {
        match self {
            Self::Day => chrono::Duration::hours(24),
            Self::Week => chrono::Duration::days(7),
            Self::Month => chrono::Duration::days(30),
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Self::Week
    }
}

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(AlertKind {
    Outbreak => "outbreak_alert",
    Seasonal => "seasonal_pattern",
    LocationCluster => "location_cluster",
});

str_enum!(SymptomCourse {
    Worsening => "worsening",
    Improving => "improving",
    Stable => "stable",
});

str_enum!(Trajectory {
    Declining => "declining",
    Stable => "stable",
    Improving => "improving",
});

str_enum!(MonitoringCadence {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
});

str_enum!(VisitFrequency {
    High => "high",
    Moderate => "moderate",
    Low => "low",
});

str_enum!(AdherenceBand {
    Excellent => "excellent",
    Good => "good",
    Poor => "poor",
});

// ---------------------------------------------------------------------------
// Ordered lattices
// ---------------------------------------------------------------------------
// Variant order is load-bearing: derived Ord gives Low < Medium < High and
// Good < NeedsAttention < Critical, so merging two assessments is `max`.

/// Shared three-level scale for symptom severity, alert severity,
/// predictive concern, and warning urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Overall risk band on a patient's risk profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Reserved for the insight synthesizer; category scoring never assigns it.
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Patient-facing health status on the twin snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    /// No findings; the starting point of every assessment.
    Good,
    /// At least one finding warrants follow-up.
    NeedsAttention,
    /// A finding requires immediate attention.
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::NeedsAttention => "Needs Attention",
            Self::Critical => "Critical",
        }
    }

    /// Merge another assessment into this one. Status only ever worsens;
    /// evaluation order of the contributing rules cannot downgrade it.
    pub fn escalate(self, other: HealthStatus) -> HealthStatus {
        self.max(other)
    }
}
