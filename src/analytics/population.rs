//! Population-level symptom surveillance.
//!
//! One pass over the reports in a lookback window produces ranked symptom
//! trends, per-location tallies, daily time series, and cluster alerts.
//! Detection is pure over the snapshot it is given; the caller decides which
//! reports feed the scan and how often it runs.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::messages::MessageTemplates;
use super::thresholds::AnalyticsThresholds;
use super::trend::classify_trend;
use crate::models::enums::{AlertKind, Severity, Timeframe, TrendDirection};
use crate::models::SymptomReport;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// One ranked symptom with its share of the window's reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomTrend {
    pub symptom: String,
    pub count: u32,
    /// Share of reports in the window mentioning this symptom, one decimal.
    pub percentage: f64,
    pub trend: TrendDirection,
}

/// Count of one symptom reported from one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTally {
    pub symptom: String,
    pub location: String,
    pub count: u32,
}

/// Records backing a cluster alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterDetail {
    Outbreak { symptoms: Vec<SymptomTrend> },
    Seasonal { symptoms: Vec<SymptomTrend> },
    LocationCluster { location: String, pairs: Vec<LocationTally> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterAlert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
    pub detail: ClusterDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub total_reports: usize,
    pub timeframe: Timeframe,
    pub unique_symptoms: usize,
    /// Malformed reports dropped from the scan; non-zero means partial data.
    pub skipped_reports: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationReport {
    /// Symptoms ranked by report count, descending.
    pub trends: Vec<SymptomTrend>,
    /// Symptom/location tallies ranked by count, descending.
    pub location_trends: Vec<LocationTally>,
    /// Daily occurrence series per symptom, UTC date buckets.
    pub time_series: BTreeMap<String, BTreeMap<NaiveDate, u32>>,
    /// Emission order is fixed: outbreak, then seasonal, then one alert per
    /// clustered location.
    pub alerts: Vec<ClusterAlert>,
    pub metadata: ReportMetadata,
}

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

/// Scan reports inside `timeframe` (anchored at `now`), optionally narrowed
/// to one location. Reports with an empty symptom list are counted as
/// skipped and logged, never silently folded in.
pub fn scan_population(
    reports: &[SymptomReport],
    timeframe: Timeframe,
    location: Option<&str>,
    thresholds: &AnalyticsThresholds,
    now: DateTime<Utc>,
) -> PopulationReport {
    let cutoff = now - timeframe.duration();
    let windowed: Vec<&SymptomReport> = reports
        .iter()
        .filter(|r| r.reported_at >= cutoff)
        .filter(|r| location.map_or(true, |loc| r.location.as_deref() == Some(loc)))
        .collect();

    let (valid, skipped): (Vec<&SymptomReport>, Vec<&SymptomReport>) =
        windowed.into_iter().partition(|r| !r.symptoms.is_empty());
    if !skipped.is_empty() {
        warn!(
            skipped = skipped.len(),
            "dropping reports with no symptom names from population scan"
        );
    }

    if valid.is_empty() {
        return PopulationReport {
            trends: vec![],
            location_trends: vec![],
            time_series: BTreeMap::new(),
            alerts: vec![],
            metadata: ReportMetadata {
                total_reports: 0,
                timeframe,
                unique_symptoms: 0,
                skipped_reports: skipped.len(),
                generated_at: now,
            },
        };
    }

    // Single aggregation pass. BTreeMaps keep iteration deterministic, so
    // equal counts rank alphabetically.
    let mut symptom_counts: BTreeMap<&str, u32> = BTreeMap::new();
    let mut pair_counts: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    let mut time_series: BTreeMap<String, BTreeMap<NaiveDate, u32>> = BTreeMap::new();

    for report in &valid {
        let day = report.reported_at.date_naive();
        for symptom in &report.symptoms {
            *symptom_counts.entry(symptom).or_insert(0) += 1;
            *time_series
                .entry(symptom.clone())
                .or_default()
                .entry(day)
                .or_insert(0) += 1;
            if let Some(loc) = report.location.as_deref() {
                *pair_counts.entry((symptom, loc)).or_insert(0) += 1;
            }
        }
    }

    let total = valid.len();
    let mut trends: Vec<SymptomTrend> = symptom_counts
        .iter()
        .map(|(&symptom, &count)| SymptomTrend {
            symptom: symptom.to_string(),
            count,
            percentage: (count as f64 / total as f64 * 1000.0).round() / 10.0,
            trend: classify_trend(&time_series[symptom], thresholds).direction,
        })
        .collect();
    trends.sort_by(|a, b| b.count.cmp(&a.count));

    let mut location_trends: Vec<LocationTally> = pair_counts
        .iter()
        .map(|(&(symptom, loc), &count)| LocationTally {
            symptom: symptom.to_string(),
            location: loc.to_string(),
            count,
        })
        .collect();
    location_trends.sort_by(|a, b| b.count.cmp(&a.count));

    let alerts = build_alerts(&trends, &location_trends, thresholds);

    info!(
        total_reports = total,
        unique_symptoms = trends.len(),
        alerts = alerts.len(),
        timeframe = timeframe.as_str(),
        "population scan complete"
    );

    PopulationReport {
        trends,
        location_trends,
        time_series,
        alerts,
        metadata: ReportMetadata {
            total_reports: total,
            timeframe,
            unique_symptoms: symptom_counts.len(),
            skipped_reports: skipped.len(),
            generated_at: now,
        },
    }
}

// ---------------------------------------------------------------------------
// Cluster alerts
// ---------------------------------------------------------------------------

fn build_alerts(
    trends: &[SymptomTrend],
    location_trends: &[LocationTally],
    thresholds: &AnalyticsThresholds,
) -> Vec<ClusterAlert> {
    let mut alerts = Vec::new();

    // Outbreak: every qualifying symptom goes into one combined alert.
    let outbreak: Vec<SymptomTrend> = trends
        .iter()
        .filter(|t| t.count > thresholds.outbreak_min_count && t.trend == TrendDirection::Increasing)
        .cloned()
        .collect();
    if !outbreak.is_empty() {
        let names: Vec<String> = outbreak.iter().map(|t| t.symptom.clone()).collect();
        alerts.push(ClusterAlert {
            kind: AlertKind::Outbreak,
            severity: Severity::High,
            message: MessageTemplates::outbreak(&names),
            detail: ClusterDetail::Outbreak { symptoms: outbreak },
        });
    }

    // Seasonal: enough distinct respiratory complaints in the window.
    let seasonal: Vec<SymptomTrend> = trends
        .iter()
        .filter(|t| thresholds.is_respiratory(&t.symptom))
        .cloned()
        .collect();
    if seasonal.len() >= thresholds.seasonal_min_matches {
        alerts.push(ClusterAlert {
            kind: AlertKind::Seasonal,
            severity: Severity::Medium,
            message: MessageTemplates::seasonal_pattern().to_string(),
            detail: ClusterDetail::Seasonal { symptoms: seasonal },
        });
    }

    // Location clusters: group the ranked tallies by location, keeping the
    // order in which each location first appears in the ranking.
    let mut grouped: Vec<(String, Vec<LocationTally>)> = Vec::new();
    for tally in location_trends {
        match grouped.iter_mut().find(|(loc, _)| loc == &tally.location) {
            Some((_, pairs)) => pairs.push(tally.clone()),
            None => grouped.push((tally.location.clone(), vec![tally.clone()])),
        }
    }
    for (location, pairs) in grouped {
        if pairs.len() >= thresholds.cluster_min_pairs {
            alerts.push(ClusterAlert {
                kind: AlertKind::LocationCluster,
                severity: Severity::Medium,
                message: MessageTemplates::location_cluster(&location),
                detail: ClusterDetail::LocationCluster { location, pairs },
            });
        }
    }

    alerts
}
