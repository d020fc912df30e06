//! Weekly training load and wellness aggregation
//!
//! For a window of dates (normally one Monday-Sunday week) this computes:
//!
//! - **Total load**: sum of daily session-RPE loads
//! - **Monotony**: mean daily load / population standard deviation
//! - **Strain**: total load × monotony
//! - **Mean health**: rounded average of the daily health scores
//! - Raw daily series and means for sleep quality, symptom burden and sleep
//!   duration, which feed the baselines
//!
//! Monotony is undefined when the loads do not vary. A busy week with
//! identical loads every day reads as maximally monotonous ([`MAX_MONOTONY`]),
//! an empty week reads as 0.

use crate::load::daily_load;
use crate::models::AthleteRecord;
use crate::wellness::{raw_sleep_duration, raw_sleep_quality, symptom_burden, wellness_score};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Monotony reported for a non-empty week with zero load variance
pub const MAX_MONOTONY: f64 = 7.0;

/// Aggregated metrics for a window of days
///
/// Always computed fresh from an [`AthleteRecord`], never cached.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyMetrics {
    /// Dates covered, in input order
    pub dates: Vec<NaiveDate>,

    /// Sum of daily loads
    pub total_load: f64,

    /// Mean daily load / standard deviation of daily loads
    pub monotony: f64,

    /// Total load × monotony
    pub strain: f64,

    /// Rounded mean of the daily health scores
    pub mean_health: u8,

    /// Load per day
    pub daily_loads: Vec<f64>,

    /// Health score per day
    pub daily_health: Vec<u8>,

    /// Raw sleep quality per day (0 when not reported)
    pub daily_sleep_quality: Vec<f64>,

    /// Raw symptom burden per day
    pub daily_symptom_burden: Vec<f64>,

    /// Raw sleep duration per day in hours (0 when not reported)
    pub daily_sleep_duration: Vec<f64>,

    pub sleep_quality_mean: f64,
    pub symptom_burden_mean: f64,
    pub sleep_duration_mean: f64,
}

/// Aggregate the given dates of an athlete's record
///
/// Dates without sessions or wellness count as an empty day. An empty input
/// yields all-zero metrics.
pub fn weekly_metrics(dates: &[NaiveDate], record: &AthleteRecord) -> WeeklyMetrics {
    let mut metrics = WeeklyMetrics {
        dates: dates.to_vec(),
        ..WeeklyMetrics::default()
    };

    for &date in dates {
        let wellness = record.wellness_on(date);

        metrics.daily_loads.push(daily_load(record.sessions_on(date)));
        metrics.daily_health.push(wellness_score(&wellness));
        metrics.daily_sleep_quality.push(raw_sleep_quality(&wellness));
        metrics.daily_symptom_burden.push(symptom_burden(&wellness));
        metrics.daily_sleep_duration.push(raw_sleep_duration(&wellness));
    }

    metrics.total_load = metrics.daily_loads.iter().fold(0.0, |total, load| total + load);
    metrics.monotony = monotony(&metrics.daily_loads);
    metrics.strain = metrics.total_load * metrics.monotony;

    let health: Vec<f64> = metrics.daily_health.iter().map(|&h| f64::from(h)).collect();
    metrics.mean_health = mean(&health).round().clamp(0.0, 100.0) as u8;

    metrics.sleep_quality_mean = mean(&metrics.daily_sleep_quality);
    metrics.symptom_burden_mean = mean(&metrics.daily_symptom_burden);
    metrics.sleep_duration_mean = mean(&metrics.daily_sleep_duration);

    tracing::trace!(
        days = dates.len(),
        total_load = metrics.total_load,
        monotony = metrics.monotony,
        strain = metrics.strain,
        "weekly metrics computed"
    );

    metrics
}

/// Training monotony of a series of daily loads
pub fn monotony(loads: &[f64]) -> f64 {
    let avg = mean(loads);
    let sd = population_std_dev(loads);

    if sd == 0.0 || all_equal(loads) {
        if avg > 0.0 {
            MAX_MONOTONY
        } else {
            0.0
        }
    } else {
        avg / sd
    }
}

/// Arithmetic mean, 0 for an empty series
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().mean()
    }
}

/// Population standard deviation (ddof = 0), 0 for fewer than two samples
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        0.0
    } else {
        values.iter().population_std_dev()
    }
}

// Float summation can leave a residue on identical samples
fn all_equal(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}
