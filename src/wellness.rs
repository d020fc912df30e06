//! Composite wellness scoring
//!
//! Five Hooper-style 1-7 items are combined into a 0-100 health score:
//!
//! - Sleep quality, energy and mood count directly (7 = best)
//! - Pain and stress are inverted as `8 - value` (7 = worst)
//! - A weighted average of the five items is normalised by 7
//! - Illness subtracts a flat 0.15 before scaling to 0-100
//!
//! Missing items are resolved once per day to the neutral midpoint (4) by
//! [`ResolvedWellness::resolve`] before the formula runs.
//!
//! Symptom burden is a separate, raw composite used for baselines: absent
//! items contribute 0 instead of the neutral midpoint.

use crate::models::DailyWellness;
use serde::{Deserialize, Serialize};

/// Lower bound of the 1-7 wellness scales
pub const SCALE_MIN: f64 = 1.0;

/// Upper bound of the 1-7 wellness scales
pub const SCALE_MAX: f64 = 7.0;

/// Value substituted for a missing scale item
pub const NEUTRAL_SCALE_VALUE: f64 = 4.0;

/// Penalty on the [0, 1] scale when the athlete reports illness
pub const ILLNESS_PENALTY: f64 = 0.15;

/// Item weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellnessWeights {
    pub sleep: f64,
    pub energy: f64,
    pub pain_inverted: f64,
    pub stress_inverted: f64,
    pub mood: f64,
}

pub const WELLNESS_WEIGHTS: WellnessWeights = WellnessWeights {
    sleep: 0.22,
    energy: 0.22,
    pain_inverted: 0.18,
    stress_inverted: 0.18,
    mood: 0.18,
};

impl Default for WellnessWeights {
    fn default() -> Self {
        WELLNESS_WEIGHTS
    }
}

/// A day's wellness with every default substituted and every scale clamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWellness {
    pub sleep_quality: f64,
    pub energy: f64,
    pub pain: f64,
    pub stress: f64,
    pub mood: f64,
    pub illness: bool,
}

impl ResolvedWellness {
    /// Substitute the neutral midpoint for missing items and clamp to [1, 7]
    pub fn resolve(wellness: &DailyWellness) -> Self {
        let scale = |value: Option<f64>| clamp_scale(value.unwrap_or(NEUTRAL_SCALE_VALUE));

        ResolvedWellness {
            sleep_quality: scale(wellness.sleep_quality),
            energy: scale(wellness.energy),
            pain: scale(wellness.pain),
            stress: scale(wellness.stress),
            mood: scale(wellness.mood),
            illness: wellness.illness,
        }
    }

    /// Pain on the "higher is better" orientation
    pub fn pain_inverted(&self) -> f64 {
        SCALE_MAX + 1.0 - self.pain
    }

    /// Stress on the "higher is better" orientation
    pub fn stress_inverted(&self) -> f64 {
        SCALE_MAX + 1.0 - self.stress
    }

    /// Composite health score in [0, 100]
    pub fn health_score(&self) -> u8 {
        let w = &WELLNESS_WEIGHTS;
        let base = (self.sleep_quality * w.sleep
            + self.energy * w.energy
            + self.pain_inverted() * w.pain_inverted
            + self.stress_inverted() * w.stress_inverted
            + self.mood * w.mood)
            / SCALE_MAX;
        let penalty = if self.illness { ILLNESS_PENALTY } else { 0.0 };

        ((base - penalty) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

impl From<&DailyWellness> for ResolvedWellness {
    fn from(wellness: &DailyWellness) -> Self {
        ResolvedWellness::resolve(wellness)
    }
}

/// Health score (0-100) for one day's wellness report
pub fn wellness_score(wellness: &DailyWellness) -> u8 {
    ResolvedWellness::resolve(wellness).health_score()
}

/// Raw symptom burden for one day (higher = worse recovery)
///
/// `(8 - energy) + pain + stress + (8 - mood)` on unclamped inputs, where
/// an absent (or zero) item contributes 0.
pub fn symptom_burden(wellness: &DailyWellness) -> f64 {
    let fatigue = reported(wellness.energy).map_or(0.0, |e| SCALE_MAX + 1.0 - e);
    let low_mood = reported(wellness.mood).map_or(0.0, |m| SCALE_MAX + 1.0 - m);
    let pain = wellness.pain.unwrap_or(0.0);
    let stress = wellness.stress.unwrap_or(0.0);

    fatigue + pain + stress + low_mood
}

/// Raw sleep quality for series and baselines (0 when absent)
pub fn raw_sleep_quality(wellness: &DailyWellness) -> f64 {
    wellness.sleep_quality.unwrap_or(0.0)
}

/// Raw sleep duration in hours for series and baselines (0 when absent)
pub fn raw_sleep_duration(wellness: &DailyWellness) -> f64 {
    wellness.sleep_duration.unwrap_or(0.0)
}

fn clamp_scale(value: f64) -> f64 {
    if value.is_nan() {
        return NEUTRAL_SCALE_VALUE;
    }
    value.clamp(SCALE_MIN, SCALE_MAX)
}

fn reported(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn neutral() -> DailyWellness {
        DailyWellness {
            sleep_quality: Some(4.0),
            energy: Some(4.0),
            pain: Some(4.0),
            stress: Some(4.0),
            mood: Some(4.0),
            ..DailyWellness::default()
        }
    }

    #[test]
    fn test_default_score_is_pinned() {
        // 4 * (0.22 + 0.22 + 0.18 * 3) / 7 = 0.56
        assert_eq!(wellness_score(&DailyWellness::default()), 56);
        assert_eq!(wellness_score(&neutral()), 56);
    }

    #[test]
    fn test_illness_penalty_is_fifteen_points() {
        let ill = DailyWellness {
            illness: true,
            ..DailyWellness::default()
        };
        assert_eq!(wellness_score(&ill), 41);
    }

    #[test]
    fn test_score_extremes() {
        let best = DailyWellness {
            sleep_quality: Some(7.0),
            energy: Some(7.0),
            pain: Some(1.0),
            stress: Some(1.0),
            mood: Some(7.0),
            ..DailyWellness::default()
        };
        // Weights sum to 0.98, so the ceiling is 98
        assert_eq!(wellness_score(&best), 98);

        let worst = DailyWellness {
            sleep_quality: Some(1.0),
            energy: Some(1.0),
            pain: Some(7.0),
            stress: Some(7.0),
            mood: Some(1.0),
            illness: true,
            ..DailyWellness::default()
        };
        assert_eq!(wellness_score(&worst), 0);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let wild = DailyWellness {
            sleep_quality: Some(12.0),
            energy: Some(-3.0),
            pain: Some(0.0),
            stress: Some(99.0),
            mood: Some(f64::NAN),
            ..DailyWellness::default()
        };
        let resolved = ResolvedWellness::resolve(&wild);

        assert_eq!(resolved.sleep_quality, 7.0);
        assert_eq!(resolved.energy, 1.0);
        assert_eq!(resolved.pain_inverted(), 7.0);
        assert_eq!(resolved.stress_inverted(), 1.0);
        assert_eq!(resolved.mood, NEUTRAL_SCALE_VALUE);
    }

    #[test]
    fn test_symptom_burden_uses_raw_fields() {
        assert_eq!(symptom_burden(&DailyWellness::default()), 0.0);
        // (8-4) + 4 + 4 + (8-4)
        assert_eq!(symptom_burden(&neutral()), 16.0);

        let partial = DailyWellness {
            energy: Some(6.0),
            stress: Some(5.0),
            ..DailyWellness::default()
        };
        assert_eq!(symptom_burden(&partial), 7.0);

        // Unclamped: an out-of-scale pain counts as entered
        let unclamped = DailyWellness {
            pain: Some(9.0),
            ..DailyWellness::default()
        };
        assert_eq!(symptom_burden(&unclamped), 9.0);
    }

    #[test]
    fn test_raw_sleep_fields() {
        let wellness = DailyWellness {
            sleep_quality: Some(6.0),
            sleep_duration: Some(7.5),
            ..DailyWellness::default()
        };
        assert_eq!(raw_sleep_quality(&wellness), 6.0);
        assert_eq!(raw_sleep_duration(&wellness), 7.5);
        assert_eq!(raw_sleep_duration(&DailyWellness::default()), 0.0);
    }

    fn scale() -> impl Strategy<Value = f64> {
        (1u8..=7u8).prop_map(f64::from)
    }

    proptest! {
        #[test]
        fn test_score_stays_in_range(
            sleep in -5.0f64..15.0,
            energy in -5.0f64..15.0,
            pain in -5.0f64..15.0,
            stress in -5.0f64..15.0,
            mood in -5.0f64..15.0,
            illness in any::<bool>(),
        ) {
            let wellness = DailyWellness {
                sleep_quality: Some(sleep),
                energy: Some(energy),
                pain: Some(pain),
                stress: Some(stress),
                mood: Some(mood),
                sleep_duration: None,
                illness,
            };
            prop_assert!(wellness_score(&wellness) <= 100);
        }

        #[test]
        fn test_score_monotonic_in_each_item(
            sleep in scale(), energy in scale(), pain in scale(),
            stress in scale(), mood in scale(),
        ) {
            let base = DailyWellness {
                sleep_quality: Some(sleep),
                energy: Some(energy),
                pain: Some(pain),
                stress: Some(stress),
                mood: Some(mood),
                ..DailyWellness::default()
            };
            let score = wellness_score(&base);
            let up = |v: f64| Some((v + 1.0).min(SCALE_MAX));

            let s_sleep = wellness_score(&DailyWellness { sleep_quality: up(sleep), ..base });
            prop_assert!(s_sleep >= score);
            let s_energy = wellness_score(&DailyWellness { energy: up(energy), ..base });
            prop_assert!(s_energy >= score);
            let s_mood = wellness_score(&DailyWellness { mood: up(mood), ..base });
            prop_assert!(s_mood >= score);
            let s_pain = wellness_score(&DailyWellness { pain: up(pain), ..base });
            prop_assert!(s_pain <= score);
            let s_stress = wellness_score(&DailyWellness { stress: up(stress), ..base });
            prop_assert!(s_stress <= score);
        }
    }
}
