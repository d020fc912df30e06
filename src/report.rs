//! Weekly summaries for the daily view and the staff alert table
//!
//! Each athlete is independent, so the team summary fans out over rayon's
//! thread pool. The only shared input is the read-only thresholds record.

use crate::alerts::{evaluate_alerts, evaluate_day, AlertFlag, AlertReport};
use crate::baseline::{baselines, Baseline};
use crate::load::daily_load;
use crate::models::{AthleteRecord, DailyWellness};
use crate::store::DataBundle;
use crate::thresholds::Thresholds;
use crate::week::WeekWindow;
use crate::weekly::{weekly_metrics, WeeklyMetrics};
use crate::wellness::wellness_score;
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;

/// One athlete's week: metrics, baselines and alerts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AthleteWeekSummary {
    pub athlete_id: String,
    pub name: String,
    pub week: WeekWindow,
    pub metrics: WeeklyMetrics,
    pub baseline: Baseline,
    pub alerts: AlertReport,
}

/// One day of an athlete's week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub session_count: usize,
    pub load: f64,
    pub health_score: u8,
    pub wellness: DailyWellness,
    pub alerts: BTreeSet<AlertFlag>,
}

/// Metrics, baselines and alerts for one athlete-week
pub fn summarize_athlete(
    athlete_id: &str,
    name: &str,
    record: &AthleteRecord,
    week: WeekWindow,
    thresholds: &Thresholds,
) -> AthleteWeekSummary {
    let metrics = weekly_metrics(&week.dates(), record);
    let baseline = baselines(record, week.start(), thresholds.baseline_weeks);
    let alerts = evaluate_alerts(&metrics, &baseline, thresholds);

    AthleteWeekSummary {
        athlete_id: athlete_id.to_string(),
        name: name.to_string(),
        week,
        metrics,
        baseline,
        alerts,
    }
}

/// Day-by-day breakdown of a week against the week's baselines
pub fn summarize_days(
    record: &AthleteRecord,
    week: WeekWindow,
    baseline: &Baseline,
    thresholds: &Thresholds,
) -> Vec<DaySummary> {
    week.dates()
        .iter()
        .map(|&date| {
            let sessions = record.sessions_on(date);
            let wellness = record.wellness_on(date);
            DaySummary {
                date,
                session_count: sessions.len(),
                load: daily_load(sessions),
                health_score: wellness_score(&wellness),
                wellness,
                alerts: evaluate_day(&wellness, baseline, thresholds),
            }
        })
        .collect()
}

/// Staff table: every athlete's summary for the week containing `anchor`
///
/// Rows are sorted by athlete id.
pub fn summarize_week(
    bundle: &DataBundle,
    anchor: NaiveDate,
    thresholds: &Thresholds,
) -> Vec<AthleteWeekSummary> {
    let week = WeekWindow::containing(anchor);
    let ids = bundle.athlete_ids();

    let rows: Vec<AthleteWeekSummary> = ids
        .par_iter()
        .map(|id| {
            summarize_athlete(
                id,
                &bundle.display_name(id),
                bundle.record(id),
                week,
                thresholds,
            )
        })
        .collect();

    let flagged = rows.iter().filter(|row| !row.alerts.flags.is_empty()).count();
    tracing::info!(%week, athletes = rows.len(), flagged, "weekly summary computed");

    rows
}
