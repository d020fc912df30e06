//! Daily training load (session RPE method)
//!
//! Load for one session is duration (minutes) times perceived intensity; a
//! day's load is the sum over its sessions.

use crate::models::Session;

/// Load of a single session
///
/// Non-finite or negative factors count as 0, so the result is never negative.
pub fn session_load(session: &Session) -> f64 {
    non_negative(session.duration) * non_negative(session.intensity)
}

/// Total load for one day's sessions (0 for an empty day)
pub fn daily_load(sessions: &[Session]) -> f64 {
    // `Sum for f64` starts at -0.0
    sessions
        .iter()
        .fold(0.0, |total, session| total + session_load(session))
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_day_has_zero_load() {
        let load = daily_load(&[]);
        assert_eq!(load, 0.0);
        assert!(!load.is_sign_negative());
        assert_eq!(format!("{:.0}", load), "0");
    }

    #[test]
    fn test_single_session_load() {
        assert_eq!(daily_load(&[Session::new(60.0, 8.0)]), 480.0);
    }

    #[test]
    fn test_multiple_sessions_sum() {
        let sessions = [Session::new(60.0, 5.0), Session::new(30.0, 7.0)];
        assert_eq!(daily_load(&sessions), 510.0);
    }

    #[test]
    fn test_invalid_values_count_as_zero() {
        let sessions = [
            Session::new(f64::NAN, 5.0),
            Session::new(45.0, f64::INFINITY),
            Session::new(-20.0, 6.0),
            Session::new(40.0, 3.0),
        ];
        assert_eq!(daily_load(&sessions), 120.0);
    }

    proptest! {
        #[test]
        fn test_load_is_order_invariant(
            sessions in prop::collection::vec((0u32..240u32, 0u32..=10u32), 0..6)
        ) {
            let forward: Vec<Session> = sessions
                .iter()
                .map(|&(d, i)| Session::new(d as f64, i as f64))
                .collect();
            let mut reversed = forward.clone();
            reversed.reverse();

            prop_assert_eq!(daily_load(&forward), daily_load(&reversed));
            prop_assert!(daily_load(&forward) >= 0.0);
        }
    }
}
