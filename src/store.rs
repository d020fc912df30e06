//! JSON data bundle: users, per-athlete records and shared thresholds
//!
//! This is the boundary where raw exported data is validated (ISO date keys,
//! lenient numbers) before it reaches the analytics engine.

use crate::error::{LoadwatchError, Result};
use crate::models::{Athlete, AthleteRecord, Role};
use crate::thresholds::Thresholds;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

static EMPTY_RECORD: AthleteRecord = AthleteRecord::new();

/// Everything the engine needs for a team
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBundle {
    /// Accounts keyed by id
    #[serde(default)]
    pub users: BTreeMap<String, Athlete>,

    /// Training and wellness records keyed by athlete id
    #[serde(default)]
    pub data: BTreeMap<String, AthleteRecord>,

    /// Thresholds saved alongside the data, if any
    #[serde(alias = "seuils", default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<Thresholds>,
}

impl DataBundle {
    /// Parse a bundle from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut bundle: DataBundle = serde_json::from_str(json)?;
        bundle.fill_user_ids();
        Ok(bundle)
    }

    /// Load a bundle from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadwatchError::DataFileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let bundle = Self::from_json_str(&content)?;

        tracing::info!(
            path = %path.display(),
            users = bundle.users.len(),
            records = bundle.data.len(),
            "data bundle loaded"
        );
        Ok(bundle)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Save the bundle as JSON, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json_string()?)?;
        tracing::info!(path = %path.display(), "data bundle saved");
        Ok(())
    }

    /// Record for an athlete, empty when nothing was logged
    pub fn record(&self, athlete_id: &str) -> &AthleteRecord {
        self.data.get(athlete_id).unwrap_or(&EMPTY_RECORD)
    }

    /// Mutable record for an athlete, created on first use
    pub fn record_mut(&mut self, athlete_id: &str) -> &mut AthleteRecord {
        self.data.entry(athlete_id.to_string()).or_default()
    }

    /// Ids of every athlete, sorted
    ///
    /// Ids are the map keys, as for [`record`](Self::record). Staff accounts
    /// are excluded. Records without a matching user still count as athletes.
    pub fn athlete_ids(&self) -> Vec<String> {
        let mut ids: BTreeSet<&String> = self
            .users
            .iter()
            .filter(|(_, user)| user.role == Role::Athlete)
            .map(|(id, _)| id)
            .collect();
        ids.extend(self.data.keys().filter(|id| {
            self.users
                .get(*id)
                .map_or(true, |user| user.role == Role::Athlete)
        }));
        ids.into_iter().cloned().collect()
    }

    /// Display name, falling back to the id
    pub fn display_name(&self, athlete_id: &str) -> String {
        self.users
            .get(athlete_id)
            .map(|user| user.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(athlete_id)
            .to_string()
    }

    /// Error unless the athlete has a user entry or a record
    pub fn require_athlete(&self, athlete_id: &str) -> Result<()> {
        if self.users.contains_key(athlete_id) || self.data.contains_key(athlete_id) {
            Ok(())
        } else {
            Err(LoadwatchError::AthleteNotFound {
                id: athlete_id.to_string(),
            })
        }
    }

    /// Add or replace an athlete account
    pub fn add_athlete(&mut self, athlete: Athlete) {
        self.users.insert(athlete.id.clone(), athlete);
    }

    /// Thresholds stored in the bundle, or `fallback`
    pub fn effective_thresholds(&self, fallback: &Thresholds) -> Thresholds {
        self.thresholds.clone().unwrap_or_else(|| fallback.clone())
    }

    // Exported user maps may omit `id` inside each entry
    fn fill_user_ids(&mut self) {
        for (key, user) in self.users.iter_mut() {
            if user.id.is_empty() {
                user.id = key.clone();
            }
        }
    }
}
