//! Alert threshold configuration
//!
//! One record shared by all athletes. Values arrive from hand-edited
//! configuration and may be empty strings, zero or garbage: every field is
//! coerced to its documented default when it is not a finite positive number.

use crate::baseline::{DEFAULT_BASELINE_WEEKS, MAX_BASELINE_WEEKS};
use crate::error::{LoadwatchError, Result};
use crate::models::lenient;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MONOTONY: f64 = 2.0;
pub const DEFAULT_STRAIN: f64 = 8000.0;
pub const DEFAULT_LOW_HEALTH: f64 = 60.0;
pub const DEFAULT_SLEEP_DROP_PCT: f64 = 20.0;
pub const DEFAULT_SYMPTOMS_INCREASE_PCT: f64 = 25.0;
pub const DEFAULT_SLEEP_HOURS_DROP_PCT: f64 = 20.0;

/// Configurable alert thresholds
///
/// `monotony`, `strain` and `low_health` are shown to staff as ceilings and
/// floors but do not drive any flag; strain zones use fixed cut-points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThresholdsInput")]
pub struct Thresholds {
    /// Monotony ceiling
    pub monotony: f64,

    /// Strain ceiling (arbitrary units)
    pub strain: f64,

    /// Low health score floor (0-100)
    pub low_health: f64,

    /// Sleep quality drop vs. baseline that raises a flag, in percent
    pub sleep_drop_pct: f64,

    /// Symptom burden increase vs. baseline that raises a flag, in percent
    pub symptoms_increase_pct: f64,

    /// Sleep duration drop vs. baseline that raises a flag, in percent
    pub sleep_hours_drop_pct: f64,

    /// Trailing weeks used for baselines (1-52)
    pub baseline_weeks: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            monotony: DEFAULT_MONOTONY,
            strain: DEFAULT_STRAIN,
            low_health: DEFAULT_LOW_HEALTH,
            sleep_drop_pct: DEFAULT_SLEEP_DROP_PCT,
            symptoms_increase_pct: DEFAULT_SYMPTOMS_INCREASE_PCT,
            sleep_hours_drop_pct: DEFAULT_SLEEP_HOURS_DROP_PCT,
            baseline_weeks: DEFAULT_BASELINE_WEEKS,
        }
    }
}

impl Thresholds {
    /// Configuration keys, in display order
    pub const KEYS: [&'static str; 7] = [
        "monotony",
        "strain",
        "low_health",
        "sleep_drop_pct",
        "symptoms_increase_pct",
        "sleep_hours_drop_pct",
        "baseline_weeks",
    ];

    /// Replace every invalid field with its default
    pub fn sanitized(self) -> Self {
        Thresholds {
            monotony: coerce(Some(self.monotony), DEFAULT_MONOTONY),
            strain: coerce(Some(self.strain), DEFAULT_STRAIN),
            low_health: coerce(Some(self.low_health), DEFAULT_LOW_HEALTH),
            sleep_drop_pct: coerce(Some(self.sleep_drop_pct), DEFAULT_SLEEP_DROP_PCT),
            symptoms_increase_pct: coerce(
                Some(self.symptoms_increase_pct),
                DEFAULT_SYMPTOMS_INCREASE_PCT,
            ),
            sleep_hours_drop_pct: coerce(
                Some(self.sleep_hours_drop_pct),
                DEFAULT_SLEEP_HOURS_DROP_PCT,
            ),
            baseline_weeks: coerce_weeks(Some(f64::from(self.baseline_weeks))),
        }
    }

    /// Read a field by key
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "monotony" => self.monotony.to_string(),
            "strain" => self.strain.to_string(),
            "low_health" => self.low_health.to_string(),
            "sleep_drop_pct" => self.sleep_drop_pct.to_string(),
            "symptoms_increase_pct" => self.symptoms_increase_pct.to_string(),
            "sleep_hours_drop_pct" => self.sleep_hours_drop_pct.to_string(),
            "baseline_weeks" => self.baseline_weeks.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Update a field from text, coercing invalid input to the default
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        let value = lenient::to_number(&serde_json::Value::String(raw.to_string()));
        match key {
            "monotony" => self.monotony = coerce(value, DEFAULT_MONOTONY),
            "strain" => self.strain = coerce(value, DEFAULT_STRAIN),
            "low_health" => self.low_health = coerce(value, DEFAULT_LOW_HEALTH),
            "sleep_drop_pct" => self.sleep_drop_pct = coerce(value, DEFAULT_SLEEP_DROP_PCT),
            "symptoms_increase_pct" => {
                self.symptoms_increase_pct = coerce(value, DEFAULT_SYMPTOMS_INCREASE_PCT)
            }
            "sleep_hours_drop_pct" => {
                self.sleep_hours_drop_pct = coerce(value, DEFAULT_SLEEP_HOURS_DROP_PCT)
            }
            "baseline_weeks" => self.baseline_weeks = coerce_weeks(value),
            _ => {
                return Err(LoadwatchError::UnknownConfigKey {
                    key: key.to_string(),
                })
            }
        }

        if value.is_none() {
            tracing::warn!(key, raw, "invalid threshold value, using default");
        }
        Ok(())
    }
}

fn coerce(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

fn coerce_weeks(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v >= 1.0 && v < f64::from(MAX_BASELINE_WEEKS) + 1.0 => {
            v.floor() as u32
        }
        _ => DEFAULT_BASELINE_WEEKS,
    }
}

/// Wire shape accepted on input, including the source application's keys
#[derive(Debug, Default, Deserialize)]
struct ThresholdsInput {
    #[serde(alias = "MONOTONIE", default, deserialize_with = "lenient::optional_number")]
    monotony: Option<f64>,

    #[serde(alias = "STRAIN", default, deserialize_with = "lenient::optional_number")]
    strain: Option<f64>,

    #[serde(alias = "SANTE_BASSE", default, deserialize_with = "lenient::optional_number")]
    low_health: Option<f64>,

    #[serde(alias = "SLEEP_DROP_PCT", default, deserialize_with = "lenient::optional_number")]
    sleep_drop_pct: Option<f64>,

    #[serde(
        alias = "SYMPTOMS_INCR_PCT",
        default,
        deserialize_with = "lenient::optional_number"
    )]
    symptoms_increase_pct: Option<f64>,

    #[serde(
        alias = "SLEEP_HOURS_DROP_PCT",
        default,
        deserialize_with = "lenient::optional_number"
    )]
    sleep_hours_drop_pct: Option<f64>,

    #[serde(alias = "BASELINE_WEEKS", default, deserialize_with = "lenient::optional_number")]
    baseline_weeks: Option<f64>,
}

impl From<ThresholdsInput> for Thresholds {
    fn from(input: ThresholdsInput) -> Self {
        Thresholds {
            monotony: coerce(input.monotony, DEFAULT_MONOTONY),
            strain: coerce(input.strain, DEFAULT_STRAIN),
            low_health: coerce(input.low_health, DEFAULT_LOW_HEALTH),
            sleep_drop_pct: coerce(input.sleep_drop_pct, DEFAULT_SLEEP_DROP_PCT),
            symptoms_increase_pct: coerce(
                input.symptoms_increase_pct,
                DEFAULT_SYMPTOMS_INCREASE_PCT,
            ),
            sleep_hours_drop_pct: coerce(input.sleep_hours_drop_pct, DEFAULT_SLEEP_HOURS_DROP_PCT),
            baseline_weeks: coerce_weeks(input.baseline_weeks),
        }
    }
}
