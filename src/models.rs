use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One training unit on a given day
///
/// Sessions have no identity beyond their position in the day's list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Duration in minutes
    #[serde(alias = "duree", default, deserialize_with = "lenient::number")]
    pub duration: f64,

    /// Perceived effort (session RPE), nominally 0-10
    #[serde(alias = "rpe", default, deserialize_with = "lenient::number")]
    pub intensity: f64,
}

impl Session {
    pub fn new(duration: f64, intensity: f64) -> Self {
        Session {
            duration,
            intensity,
        }
    }
}

/// Self-reported wellness for one date
///
/// Every field is optional: subjective daily input is expected to be
/// incomplete. The 1-7 scales are stored raw and clamped only when scored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWellness {
    /// Sleep quality, 1-7 (7 = best)
    #[serde(
        alias = "sommeil",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub sleep_quality: Option<f64>,

    /// Energy, 1-7 (7 = best)
    #[serde(
        alias = "energie",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub energy: Option<f64>,

    /// Muscle soreness / pain, 1-7 (7 = worst)
    #[serde(
        alias = "douleurs",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub pain: Option<f64>,

    /// Stress, 1-7 (7 = worst)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub stress: Option<f64>,

    /// Mood, 1-7 (7 = best)
    #[serde(
        alias = "humeur",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub mood: Option<f64>,

    /// Sleep duration in hours (0-14), tracked separately from quality
    #[serde(
        alias = "sommeilDuree",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::optional_number"
    )]
    pub sleep_duration: Option<f64>,

    /// Illness flag (stored as 0/1 in exported data)
    #[serde(alias = "maladie", default, deserialize_with = "lenient::flag")]
    pub illness: bool,
}

impl DailyWellness {
    /// True when nothing was reported for the day
    pub fn is_empty(&self) -> bool {
        *self == DailyWellness::default()
    }
}

/// Per-athlete record store, keyed by calendar date
///
/// Sessions and wellness are independently keyed: a date may have sessions
/// without wellness input or the other way round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AthleteRecord {
    /// Ordered training sessions per date
    #[serde(alias = "seances", default)]
    pub sessions: BTreeMap<NaiveDate, Vec<Session>>,

    /// Wellness report per date
    #[serde(alias = "bienEtre", default)]
    pub wellness: BTreeMap<NaiveDate, DailyWellness>,
}

impl AthleteRecord {
    pub const fn new() -> Self {
        AthleteRecord {
            sessions: BTreeMap::new(),
            wellness: BTreeMap::new(),
        }
    }

    /// Sessions logged on a date (empty when none)
    pub fn sessions_on(&self, date: NaiveDate) -> &[Session] {
        self.sessions.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Wellness reported on a date (all fields absent when none)
    pub fn wellness_on(&self, date: NaiveDate) -> DailyWellness {
        self.wellness.get(&date).copied().unwrap_or_default()
    }

    /// Append a session to the end of the day's list
    pub fn add_session(&mut self, date: NaiveDate, session: Session) {
        self.sessions.entry(date).or_default().push(session);
    }

    /// Remove the session at `index` for a date, returning it if present
    pub fn remove_session(&mut self, date: NaiveDate, index: usize) -> Option<Session> {
        let day = self.sessions.get_mut(&date)?;
        if index >= day.len() {
            return None;
        }
        let removed = day.remove(index);
        if day.is_empty() {
            self.sessions.remove(&date);
        }
        Some(removed)
    }

    /// Replace the wellness report for a date
    pub fn set_wellness(&mut self, date: NaiveDate, wellness: DailyWellness) {
        self.wellness.insert(date, wellness);
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.wellness.is_empty()
    }

    /// Earliest date carrying either sessions or wellness
    pub fn first_date(&self) -> Option<NaiveDate> {
        let first_session = self.sessions.keys().next().copied();
        let first_wellness = self.wellness.keys().next().copied();
        match (first_session, first_wellness) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Athlete,
    Staff,
}

/// Athlete (or staff) identity as stored in the data bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    /// Identifier, also the key of the bundle maps
    #[serde(default)]
    pub id: String,

    /// Display name
    #[serde(alias = "nom", default)]
    pub name: String,

    #[serde(default)]
    pub role: Role,
}

impl Athlete {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Athlete {
            id: id.into(),
            name: name.into(),
            role: Role::Athlete,
        }
    }
}

/// Tolerant numeric deserializers for hand-entered data
///
/// Form input reaches the store as numbers, numeric strings, booleans or
/// null. Anything that is not a finite number is treated as missing.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn to_number(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        number.filter(|v| v.is_finite())
    }

    /// Missing or non-numeric becomes 0
    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(to_number(&value).unwrap_or(0.0))
    }

    /// Missing or non-numeric becomes `None`
    pub fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(to_number(&value))
    }

    /// Any non-zero number is truthy
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(to_number(&value).is_some_and(|v| v != 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    #[test]
    fn test_session_accepts_source_field_names() {
        let session: Session = serde_json::from_str(r#"{"duree": 45, "rpe": "6.5"}"#).unwrap();
        assert_eq!(session, Session::new(45.0, 6.5));
    }

    #[test]
    fn test_session_non_numeric_fields_become_zero() {
        let session: Session =
            serde_json::from_str(r#"{"duration": "abc", "intensity": null}"#).unwrap();
        assert_eq!(session, Session::new(0.0, 0.0));

        let session: Session = serde_json::from_str("{}").unwrap();
        assert_eq!(session, Session::default());
    }

    #[test]
    fn test_wellness_partial_input() {
        let wellness: DailyWellness =
            serde_json::from_str(r#"{"sommeil": 5, "stress": "", "maladie": 1}"#).unwrap();
        assert_eq!(wellness.sleep_quality, Some(5.0));
        assert_eq!(wellness.stress, None);
        assert_eq!(wellness.energy, None);
        assert!(wellness.illness);
        assert!(!wellness.is_empty());

        let wellness: DailyWellness =
            serde_json::from_str(r#"{"sleepDuration": 7.5, "illness": false}"#).unwrap();
        assert_eq!(wellness.sleep_duration, Some(7.5));
        assert!(!wellness.illness);
    }

    #[test]
    fn test_record_keys_must_be_iso_dates() {
        let ok: AthleteRecord = serde_json::from_str(
            r#"{"seances": {"2024-09-23": [{"duree": 60, "rpe": 8}]}, "bienEtre": {}}"#,
        )
        .unwrap();
        assert_eq!(ok.sessions_on(date(23)), &[Session::new(60.0, 8.0)]);

        let bad = serde_json::from_str::<AthleteRecord>(r#"{"sessions": {"23/09/2024": []}}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_record_session_editing() {
        let mut record = AthleteRecord::new();
        record.add_session(date(23), Session::new(60.0, 5.0));
        record.add_session(date(23), Session::new(30.0, 7.0));

        assert_eq!(record.sessions_on(date(23)).len(), 2);
        assert_eq!(
            record.remove_session(date(23), 0),
            Some(Session::new(60.0, 5.0))
        );
        assert_eq!(record.remove_session(date(23), 5), None);
        assert_eq!(
            record.remove_session(date(23), 0),
            Some(Session::new(30.0, 7.0))
        );
        assert!(record.sessions_on(date(23)).is_empty());
        assert!(record.is_empty());
    }

    #[test]
    fn test_first_date_spans_both_maps() {
        let mut record = AthleteRecord::new();
        assert_eq!(record.first_date(), None);

        record.add_session(date(20), Session::new(60.0, 5.0));
        record.set_wellness(
            date(18),
            DailyWellness {
                sleep_quality: Some(5.0),
                ..DailyWellness::default()
            },
        );
        assert_eq!(record.first_date(), Some(date(18)));
        assert!(record.wellness_on(date(19)).is_empty());
    }

    #[test]
    fn test_athlete_role_defaults_to_athlete() {
        let athlete: Athlete = serde_json::from_str(r#"{"id": "lea", "nom": "Léa"}"#).unwrap();
        assert_eq!(athlete.role, Role::Athlete);
        assert_eq!(athlete.name, "Léa");

        let staff: Athlete =
            serde_json::from_str(r#"{"id": "coach", "nom": "Coach", "role": "staff"}"#).unwrap();
        assert_eq!(staff.role, Role::Staff);
    }
}
