//! Strain zones and baseline-relative wellness alerts
//!
//! The current week is compared against the athlete's own baselines:
//!
//! - **Sleep quality ↓**: mean sleep quality dropped more than
//!   `sleep_drop_pct` percent below baseline
//! - **Symptoms ↑**: mean symptom burden rose more than
//!   `symptoms_increase_pct` percent above baseline
//! - **Sleep hours ↓**: mean sleep duration dropped more than
//!   `sleep_hours_drop_pct` percent below baseline
//!
//! All comparisons are strict. A dimension without a baseline never raises a
//! flag: missing history is not evidence of a healthy athlete.
//!
//! Strain zones use fixed cut-points (6000 / 8000) independent of the
//! configurable strain ceiling.

use crate::baseline::Baseline;
use crate::models::DailyWellness;
use crate::thresholds::Thresholds;
use crate::wellness::symptom_burden;
use crate::weekly::WeeklyMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Strain below this is green
pub const GREEN_STRAIN_LIMIT: f64 = 6000.0;

/// Strain above this is red
pub const AMBER_STRAIN_LIMIT: f64 = 8000.0;

/// Weekly strain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrainZone {
    Green,
    Amber,
    Red,
}

impl StrainZone {
    /// Classify a weekly strain value
    pub fn from_strain(strain: f64) -> Self {
        if strain < GREEN_STRAIN_LIMIT {
            StrainZone::Green
        } else if strain <= AMBER_STRAIN_LIMIT {
            StrainZone::Amber
        } else {
            StrainZone::Red
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrainZone::Green => "green",
            StrainZone::Amber => "amber",
            StrainZone::Red => "red",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrainZone::Green => "Manageable load",
            StrainZone::Amber => "High load, monitor recovery",
            StrainZone::Red => "Overload risk, consider reducing load",
        }
    }
}

impl fmt::Display for StrainZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative wellness alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertFlag {
    SleepQualityDown,
    SymptomsUp,
    SleepHoursDown,
}

impl AlertFlag {
    /// Stable machine-readable key
    pub fn key(&self) -> &'static str {
        match self {
            AlertFlag::SleepQualityDown => "sleep_quality_down",
            AlertFlag::SymptomsUp => "symptoms_up",
            AlertFlag::SleepHoursDown => "sleep_hours_down",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            AlertFlag::SleepQualityDown => "Sleep quality ↓",
            AlertFlag::SymptomsUp => "Symptoms ↑",
            AlertFlag::SleepHoursDown => "Sleep hours ↓",
        }
    }
}

impl fmt::Display for AlertFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert evaluation for one athlete-week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertReport {
    pub zone: StrainZone,
    pub flags: BTreeSet<AlertFlag>,
}

impl AlertReport {
    pub fn has(&self, flag: AlertFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Flag labels joined for a table cell, "—" when there are none
    pub fn summary(&self) -> String {
        flag_summary(&self.flags)
    }
}

/// Compare a week's metrics against baselines and thresholds
pub fn evaluate_alerts(
    metrics: &WeeklyMetrics,
    baseline: &Baseline,
    thresholds: &Thresholds,
) -> AlertReport {
    let mut flags = BTreeSet::new();

    if percent_drop(baseline.sleep_quality, metrics.sleep_quality_mean)
        .is_some_and(|pct| pct > thresholds.sleep_drop_pct)
    {
        flags.insert(AlertFlag::SleepQualityDown);
    }
    if percent_rise(baseline.symptom_burden, metrics.symptom_burden_mean)
        .is_some_and(|pct| pct > thresholds.symptoms_increase_pct)
    {
        flags.insert(AlertFlag::SymptomsUp);
    }
    if percent_drop(baseline.sleep_duration, metrics.sleep_duration_mean)
        .is_some_and(|pct| pct > thresholds.sleep_hours_drop_pct)
    {
        flags.insert(AlertFlag::SleepHoursDown);
    }

    AlertReport {
        zone: StrainZone::from_strain(metrics.strain),
        flags,
    }
}

/// Compare a single day's wellness against the week's baselines
///
/// Sleep dimensions the athlete did not report for the day are skipped.
pub fn evaluate_day(
    wellness: &DailyWellness,
    baseline: &Baseline,
    thresholds: &Thresholds,
) -> BTreeSet<AlertFlag> {
    let mut flags = BTreeSet::new();

    if let Some(quality) = wellness.sleep_quality {
        if percent_drop(baseline.sleep_quality, quality)
            .is_some_and(|pct| pct > thresholds.sleep_drop_pct)
        {
            flags.insert(AlertFlag::SleepQualityDown);
        }
    }
    if percent_rise(baseline.symptom_burden, symptom_burden(wellness))
        .is_some_and(|pct| pct > thresholds.symptoms_increase_pct)
    {
        flags.insert(AlertFlag::SymptomsUp);
    }
    if let Some(hours) = wellness.sleep_duration {
        if percent_drop(baseline.sleep_duration, hours)
            .is_some_and(|pct| pct > thresholds.sleep_hours_drop_pct)
        {
            flags.insert(AlertFlag::SleepHoursDown);
        }
    }

    flags
}

/// Flag labels joined with " • ", "—" when empty
pub fn flag_summary(flags: &BTreeSet<AlertFlag>) -> String {
    if flags.is_empty() {
        "—".to_string()
    } else {
        flags
            .iter()
            .map(AlertFlag::label)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// Percentage by which `current` fell below a positive baseline
fn percent_drop(base: Option<f64>, current: f64) -> Option<f64> {
    base.filter(|b| *b > 0.0).map(|b| (b - current) / b * 100.0)
}

/// Percentage by which `current` rose above a positive baseline
fn percent_rise(base: Option<f64>, current: f64) -> Option<f64> {
    base.filter(|b| *b > 0.0).map(|b| (current - b) / b * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(sleep: f64, symptoms: f64, hours: f64, strain: f64) -> WeeklyMetrics {
        WeeklyMetrics {
            sleep_quality_mean: sleep,
            symptom_burden_mean: symptoms,
            sleep_duration_mean: hours,
            strain,
            ..WeeklyMetrics::default()
        }
    }

    fn full_baseline() -> Baseline {
        Baseline {
            sleep_quality: Some(5.0),
            symptom_burden: Some(10.0),
            sleep_duration: Some(8.0),
        }
    }

    #[test]
    fn test_strain_zone_boundaries() {
        assert_eq!(StrainZone::from_strain(0.0), StrainZone::Green);
        assert_eq!(StrainZone::from_strain(5999.9), StrainZone::Green);
        assert_eq!(StrainZone::from_strain(6000.0), StrainZone::Amber);
        assert_eq!(StrainZone::from_strain(8000.0), StrainZone::Amber);
        assert_eq!(StrainZone::from_strain(8000.1), StrainZone::Red);
    }

    #[test]
    fn test_zone_ignores_configured_strain_ceiling() {
        let thresholds = Thresholds {
            strain: 100.0,
            ..Thresholds::default()
        };
        let report = evaluate_alerts(
            &metrics(0.0, 0.0, 0.0, 5000.0),
            &Baseline::default(),
            &thresholds,
        );
        assert_eq!(report.zone, StrainZone::Green);
    }

    #[test]
    fn test_no_baseline_never_flags() {
        let report = evaluate_alerts(
            &metrics(0.0, 50.0, 0.0, 0.0),
            &Baseline::default(),
            &Thresholds::default(),
        );
        assert!(report.flags.is_empty());
        assert_eq!(report.summary(), "—");
    }

    #[test]
    fn test_flags_are_strict() {
        let thresholds = Thresholds::default();

        // Exactly 20% below: not raised
        let at_limit = evaluate_alerts(&metrics(4.0, 12.5, 6.4, 0.0), &full_baseline(), &thresholds);
        assert!(!at_limit.has(AlertFlag::SleepQualityDown));
        assert!(!at_limit.has(AlertFlag::SymptomsUp));
        assert!(!at_limit.has(AlertFlag::SleepHoursDown));

        let beyond = evaluate_alerts(&metrics(3.9, 12.6, 6.3, 0.0), &full_baseline(), &thresholds);
        assert!(beyond.has(AlertFlag::SleepQualityDown));
        assert!(beyond.has(AlertFlag::SymptomsUp));
        assert!(beyond.has(AlertFlag::SleepHoursDown));
        assert_eq!(beyond.summary(), "Sleep quality ↓ • Symptoms ↑ • Sleep hours ↓");
    }

    #[test]
    fn test_flags_are_independent() {
        let report = evaluate_alerts(
            &metrics(2.0, 10.0, 8.0, 0.0),
            &full_baseline(),
            &Thresholds::default(),
        );
        assert_eq!(
            report.flags.iter().copied().collect::<Vec<_>>(),
            vec![AlertFlag::SleepQualityDown]
        );

        // Improvement in every dimension raises nothing
        let better = evaluate_alerts(
            &metrics(7.0, 2.0, 9.5, 0.0),
            &full_baseline(),
            &Thresholds::default(),
        );
        assert!(better.flags.is_empty());
    }

    #[test]
    fn test_configured_percentages() {
        let strict = Thresholds {
            sleep_drop_pct: 5.0,
            ..Thresholds::default()
        };
        let report = evaluate_alerts(&metrics(4.5, 10.0, 8.0, 0.0), &full_baseline(), &strict);
        assert!(report.has(AlertFlag::SleepQualityDown));

        let report = evaluate_alerts(
            &metrics(4.5, 10.0, 8.0, 0.0),
            &full_baseline(),
            &Thresholds::default(),
        );
        assert!(!report.has(AlertFlag::SleepQualityDown));
    }

    #[test]
    fn test_day_evaluation() {
        let thresholds = Thresholds::default();
        let tired = DailyWellness {
            sleep_quality: Some(3.0),
            energy: Some(2.0),
            pain: Some(5.0),
            stress: Some(5.0),
            mood: Some(3.0),
            sleep_duration: Some(5.5),
            illness: false,
        };
        let flags = evaluate_day(&tired, &full_baseline(), &thresholds);
        assert_eq!(flags.len(), 3);

        // A day without sleep input does not count as a sleep drop
        let flags = evaluate_day(&DailyWellness::default(), &full_baseline(), &thresholds);
        assert!(flags.is_empty());

        let flags = evaluate_day(&tired, &Baseline::default(), &thresholds);
        assert!(flags.is_empty());
    }

    #[test]
    fn test_serialized_names() {
        let report = AlertReport {
            zone: StrainZone::Amber,
            flags: [AlertFlag::SymptomsUp].into_iter().collect(),
        };
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"zone":"amber","flags":["symptoms_up"]}"#);
        assert_eq!(AlertFlag::SymptomsUp.key(), "symptoms_up");
    }
}
