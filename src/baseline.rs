//! Trailing multi-week wellness baselines
//!
//! A baseline is the athlete's own reference value for a wellness dimension,
//! taken over the N weeks strictly before the week being assessed. Each
//! historical week is aggregated from scratch; weeks without data for a
//! dimension are left out instead of dragging the average towards zero.

use crate::models::AthleteRecord;
use crate::week::WeekWindow;
use crate::weekly::{mean, weekly_metrics, WeeklyMetrics};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of trailing weeks when not configured
pub const DEFAULT_BASELINE_WEEKS: u32 = 4;

/// Longest configurable baseline window (one year)
pub const MAX_BASELINE_WEEKS: u32 = 52;

/// Reference values for the three tracked wellness dimensions
///
/// `None` means no historical week produced data for that dimension; callers
/// must suppress the comparison rather than treat it as healthy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Baseline {
    pub sleep_quality: Option<f64>,
    pub symptom_burden: Option<f64>,
    pub sleep_duration: Option<f64>,
}

impl Baseline {
    /// True when no dimension has a baseline
    pub fn is_empty(&self) -> bool {
        self.sleep_quality.is_none() && self.symptom_burden.is_none() && self.sleep_duration.is_none()
    }
}

/// The `weeks` windows preceding the week of `week_start`, most recent first
///
/// Stops early at the start of the calendar range.
pub fn historical_weeks(week_start: NaiveDate, weeks: u32) -> Vec<WeekWindow> {
    preceding_weeks(week_start, weeks).collect()
}

/// Baselines over the `weeks` weeks strictly before the week of `week_start`
pub fn baselines(record: &AthleteRecord, week_start: NaiveDate, weeks: u32) -> Baseline {
    // Weeks that end before the first entry cannot contribute
    let first_entry = record.first_date();
    let history: Vec<WeeklyMetrics> = preceding_weeks(week_start, weeks)
        .take_while(|window| first_entry.is_some_and(|first| window.end() >= first))
        .map(|window| weekly_metrics(&window.dates(), record))
        .collect();

    let baseline = Baseline {
        sleep_quality: positive_mean(history.iter().map(|m| m.sleep_quality_mean)),
        symptom_burden: positive_mean(history.iter().map(|m| m.symptom_burden_mean)),
        sleep_duration: positive_mean(history.iter().map(|m| m.sleep_duration_mean)),
    };

    if baseline.is_empty() {
        tracing::debug!(%week_start, weeks, "no historical data for baselines");
    }

    baseline
}

fn preceding_weeks(week_start: NaiveDate, weeks: u32) -> impl Iterator<Item = WeekWindow> {
    let current = WeekWindow::containing(week_start);
    (1..=i64::from(weeks)).map_while(move |k| current.checked_offset_weeks(-k))
}

/// Mean of the strictly positive values, `None` when there are none
fn positive_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let kept: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    if kept.is_empty() {
        None
    } else {
        Some(mean(&kept))
    }
}
