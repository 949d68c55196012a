//! Split-half trend classification over daily occurrence series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::thresholds::AnalyticsThresholds;
use crate::models::enums::TrendDirection;

/// Outcome of classifying one daily series, with the two half-window
/// averages the direction was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub direction: TrendDirection,
    pub earlier_avg: f64,
    pub recent_avg: f64,
}

impl TrendResult {
    fn stable(avg: f64) -> Self {
        Self {
            direction: TrendDirection::Stable,
            earlier_avg: avg,
            recent_avg: avg,
        }
    }
}

/// Classify a daily occurrence series (observation date -> count).
///
/// Fewer than two distinct dates is always `Stable`. Otherwise the ordered
/// dates split in half, the earlier half taking `floor(n / 2)` days and the
/// recent half the rest, and the half averages are compared against the
/// configured ratios. Depends on nothing but its inputs, so rerunning over
/// the same series always gives the same answer.
pub fn classify_trend(
    series: &BTreeMap<NaiveDate, u32>,
    thresholds: &AnalyticsThresholds,
) -> TrendResult {
    let values: BTreeMap<NaiveDate, f64> =
        series.iter().map(|(&d, &c)| (d, c as f64)).collect();
    classify_values(&values, thresholds)
}

/// Same split-half method over a measurement series (date -> value), used
/// for longitudinal lab values.
pub fn classify_values(
    series: &BTreeMap<NaiveDate, f64>,
    thresholds: &AnalyticsThresholds,
) -> TrendResult {
    // BTreeMap iteration is date-ascending, which is the order the split
    // relies on.
    let counts: Vec<f64> = series.values().copied().collect();
    match counts.len() {
        0 => return TrendResult::stable(0.0),
        1 => return TrendResult::stable(counts[0]),
        _ => {}
    }

    let split = counts.len() / 2;
    let (earlier, recent) = counts.split_at(split);
    let earlier_avg = earlier.iter().sum::<f64>() / earlier.len() as f64;
    let recent_avg = recent.iter().sum::<f64>() / recent.len() as f64;

    let direction = if recent_avg > earlier_avg * thresholds.trend_increase_ratio {
        TrendDirection::Increasing
    } else if recent_avg < earlier_avg * thresholds.trend_decrease_ratio {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    TrendResult {
        direction,
        earlier_avg,
        recent_avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(counts: &[u32]) -> BTreeMap<NaiveDate, u32> {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| (base + chrono::Duration::days(i as i64), c))
            .collect()
    }

    #[test]
    fn four_day_ramp_is_increasing() {
        let result = classify_trend(&series(&[2, 2, 5, 6]), &AnalyticsThresholds::default());
        assert_eq!(result.direction, TrendDirection::Increasing);
        assert_eq!(result.earlier_avg, 2.0);
        assert_eq!(result.recent_avg, 5.5);
    }

    #[test]
    fn falling_series_is_decreasing() {
        let result = classify_trend(&series(&[6, 5, 2, 1]), &AnalyticsThresholds::default());
        assert_eq!(result.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn flat_series_is_stable() {
        let result = classify_trend(&series(&[3, 3, 3, 3]), &AnalyticsThresholds::default());
        assert_eq!(result.direction, TrendDirection::Stable);
    }

    #[test]
    fn fewer_than_two_dates_is_stable() {
        let thresholds = AnalyticsThresholds::default();
        assert_eq!(
            classify_trend(&series(&[]), &thresholds).direction,
            TrendDirection::Stable
        );
        let single = classify_trend(&series(&[9]), &thresholds);
        assert_eq!(single.direction, TrendDirection::Stable);
        assert_eq!(single.recent_avg, 9.0);
    }

    #[test]
    fn odd_length_gives_the_extra_day_to_the_recent_half() {
        // Split of [2, 4, 4] is earlier [2], recent [4, 4].
        let result = classify_trend(&series(&[2, 4, 4]), &AnalyticsThresholds::default());
        assert_eq!(result.earlier_avg, 2.0);
        assert_eq!(result.recent_avg, 4.0);
        assert_eq!(result.direction, TrendDirection::Increasing);
    }

    #[test]
    fn increase_ratio_is_strict() {
        // 12 is exactly 1.2x of 10: not an increase.
        let thresholds = AnalyticsThresholds::default();
        assert_eq!(
            classify_trend(&series(&[10, 12]), &thresholds).direction,
            TrendDirection::Stable
        );
        assert_eq!(
            classify_trend(&series(&[10, 13]), &thresholds).direction,
            TrendDirection::Increasing
        );
    }

    #[test]
    fn ratios_come_from_the_thresholds() {
        let thresholds = AnalyticsThresholds {
            trend_increase_ratio: 1.5,
            ..AnalyticsThresholds::default()
        };
        assert_eq!(
            classify_trend(&series(&[10, 13]), &thresholds).direction,
            TrendDirection::Stable
        );
    }

    #[test]
    fn same_series_always_classifies_the_same() {
        let thresholds = AnalyticsThresholds::default();
        let s = series(&[1, 3, 2, 7, 4]);
        assert_eq!(
            classify_trend(&s, &thresholds),
            classify_trend(&s, &thresholds)
        );
    }
}
