//! Schedule files.
//!
//! A schedule is a directory under the schedules root:
//!
//! | File | Contents | Required |
//! |------|----------|----------|
//! | `teams.json` | team id → [`TeamEntry`] | yes |
//! | `mentors.json` | mentor name → [`MentorEntry`] | yes |
//! | `settings.json` | [`ClassifierConfig`] | no |
//! | `locations.json` | query → coordinates, see [`LocationTable`] | no |
//! | `.geocache.json` | geocoding cache, written by the tool | no |
//!
//! Entries are decoded into explicit structs with documented defaults and
//! unknown fields are rejected. Time-window strings are parsed while
//! building teams and mentors; a malformed one aborts the load.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::geo::{GeoCache, LocationTable};
use crate::matching::ClassifierConfig;
use crate::models::{Mentor, Team};

/// Team file name.
pub const TEAMS_FILE: &str = "teams.json";
/// Mentor file name.
pub const MENTORS_FILE: &str = "mentors.json";
/// Settings file name.
pub const SETTINGS_FILE: &str = "settings.json";
/// Location table file name.
pub const LOCATIONS_FILE: &str = "locations.json";
/// Geocoding cache file name.
pub const GEOCACHE_FILE: &str = ".geocache.json";

/// One team in `teams.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamEntry {
    /// Already has a mentor (default `false`).
    pub arranged: bool,
    /// Travel time in minutes (default 0).
    pub travel_time: u16,
    /// Venue postcode or address (default none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// Meeting windows, `"<Weekday> HH:MM-HH:MM"` (default empty).
    pub meeting_times: Vec<String>,
}

impl TeamEntry {
    /// Builds the team, buffering meetings by the travel time.
    pub fn build(&self, id: &str) -> Result<Team, ConfigError> {
        let mut team = Team::new(id)
            .with_arranged(self.arranged)
            .with_travel_time(i32::from(self.travel_time));
        if let Some(postcode) = &self.postcode {
            team = team.with_postcode(postcode.clone());
        }
        team.with_meeting_times(&self.meeting_times)
            .map_err(|source| ConfigError::Window {
                owner: id.to_string(),
                source,
            })
    }
}

/// One mentor in `mentors.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MentorEntry {
    /// New mentor (default `false`).
    pub rookie: bool,
    /// Free windows (default empty).
    pub free_times: Vec<String>,
    /// Busy windows imported from a calendar; informational.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub busy_times: Vec<String>,
}

impl MentorEntry {
    /// Builds the mentor.
    pub fn build(&self, name: &str) -> Result<Mentor, ConfigError> {
        Mentor::new(name)
            .with_rookie(self.rookie)
            .with_free_times(&self.free_times)
            .map_err(|source| ConfigError::Window {
                owner: name.to_string(),
                source,
            })
    }
}

/// A loaded schedule.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Teams, sorted by id.
    pub teams: Vec<Team>,
    /// Mentors, sorted by name.
    pub mentors: Vec<Mentor>,
    /// Classification settings.
    pub settings: ClassifierConfig,
}

/// Builds teams from decoded entries, in key order.
pub fn build_teams(entries: &BTreeMap<String, TeamEntry>) -> Result<Vec<Team>, ConfigError> {
    entries.iter().map(|(id, entry)| entry.build(id)).collect()
}

/// Builds mentors from decoded entries, in key order.
pub fn build_mentors(entries: &BTreeMap<String, MentorEntry>) -> Result<Vec<Mentor>, ConfigError> {
    entries
        .iter()
        .map(|(name, entry)| entry.build(name))
        .collect()
}

/// A schedule directory.
#[derive(Debug, Clone)]
pub struct ScheduleDir {
    root: PathBuf,
}

impl ScheduleDir {
    /// The schedule `name` under `schedules_dir`.
    pub fn new(schedules_dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            root: schedules_dir.as_ref().join(name),
        }
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside the schedule.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Loads teams, mentors and settings.
    pub fn load(&self) -> Result<Schedule, ConfigError> {
        let team_entries: BTreeMap<String, TeamEntry> = read_json(&self.file(TEAMS_FILE))?;
        let mentor_entries = self.read_mentor_entries()?;
        let settings = self.load_settings()?;

        let schedule = Schedule {
            teams: build_teams(&team_entries)?,
            mentors: build_mentors(&mentor_entries)?,
            settings,
        };
        debug!(
            path = %self.root.display(),
            teams = schedule.teams.len(),
            mentors = schedule.mentors.len(),
            "schedule loaded"
        );
        Ok(schedule)
    }

    /// Settings, or defaults when `settings.json` is absent.
    pub fn load_settings(&self) -> Result<ClassifierConfig, ConfigError> {
        read_json_or_default(&self.file(SETTINGS_FILE))
    }

    /// Location table, or an empty one when `locations.json` is absent.
    pub fn load_locations(&self) -> Result<LocationTable, ConfigError> {
        let path = self.file(LOCATIONS_FILE);
        if path.exists() {
            LocationTable::load(&path)
        } else {
            Ok(LocationTable::new())
        }
    }

    /// Geocoding cache stored alongside the schedule.
    pub fn load_geocache(&self) -> Result<GeoCache, ConfigError> {
        GeoCache::load(self.file(GEOCACHE_FILE))
    }

    /// Raw mentor entries, as stored.
    pub fn read_mentor_entries(&self) -> Result<BTreeMap<String, MentorEntry>, ConfigError> {
        read_json(&self.file(MENTORS_FILE))
    }

    /// Overwrites `mentors.json`.
    pub fn write_mentor_entries(
        &self,
        entries: &BTreeMap<String, MentorEntry>,
    ) -> Result<(), ConfigError> {
        write_json(&self.file(MENTORS_FILE), entries)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let mut raw = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    raw.push('\n');
    std::fs::write(path, raw).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn schedule_dir() -> (tempfile::TempDir, ScheduleDir) {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("2024")).unwrap();
        let dir = ScheduleDir::new(tmp.path(), "2024");
        (tmp, dir)
    }

    #[test]
    fn test_entry_defaults() {
        let entry: TeamEntry = serde_json::from_str("{}").unwrap();
        assert_eq!(entry, TeamEntry::default());
        let entry: MentorEntry = serde_json::from_str(r#"{"rookie": true}"#).unwrap();
        assert!(entry.rookie);
        assert!(entry.free_times.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = serde_json::from_str::<TeamEntry>(r#"{"meetings": []}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_load_schedule() {
        let (_tmp, dir) = schedule_dir();
        write(
            dir.path(),
            TEAMS_FILE,
            r#"{
                "XYZ": {"arranged": true},
                "ABC": {"travel_time": 15, "postcode": "SO17 1BJ", "meeting_times": ["Mon 14:00-15:00"]}
            }"#,
        );
        write(
            dir.path(),
            MENTORS_FILE,
            r#"{
                "Bob": {"rookie": true, "free_times": ["Mon 13:50-15:10"]},
                "Alice": {"free_times": ["Mon 13:30-15:30"]}
            }"#,
        );

        let schedule = dir.load().unwrap();
        let ids: Vec<&str> = schedule.teams.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["ABC", "XYZ"]);
        assert_eq!(schedule.teams[0].meeting_windows()[0].travel_buffer_min(), 15);
        assert_eq!(schedule.teams[0].postcode.as_deref(), Some("SO17 1BJ"));
        assert!(schedule.teams[1].arranged);
        assert_eq!(schedule.mentors[0].name, "Alice");
        assert!(schedule.mentors[1].rookie);
        assert_eq!(schedule.settings, ClassifierConfig::default());
    }

    #[test]
    fn test_settings_file() {
        let (_tmp, dir) = schedule_dir();
        write(dir.path(), SETTINGS_FILE, r#"{"close_call_tolerance": 5}"#);
        assert_eq!(dir.load_settings().unwrap().close_call_tolerance, 5);
    }

    #[test]
    fn test_bad_window_names_owner() {
        let (_tmp, dir) = schedule_dir();
        write(dir.path(), TEAMS_FILE, r#"{"ABC": {"meeting_times": ["Mon 14:00"]}}"#);
        write(dir.path(), MENTORS_FILE, "{}");

        match dir.load() {
            Err(ConfigError::Window { owner, source }) => {
                assert_eq!(owner, "ABC");
                assert_eq!(source.kind, ParseErrorKind::Format);
            }
            other => panic!("expected window error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_files() {
        let (_tmp, dir) = schedule_dir();
        assert!(matches!(dir.load(), Err(ConfigError::Io { .. })));
        assert!(dir.load_locations().unwrap().is_empty());
        assert!(dir.load_geocache().unwrap().is_empty());
    }

    #[test]
    fn test_mentor_entries_round_trip_on_disk() {
        let (_tmp, dir) = schedule_dir();
        let mut entries = BTreeMap::new();
        entries.insert(
            "Alice".to_string(),
            MentorEntry {
                rookie: false,
                free_times: vec!["Mon 08:00-09:00".into()],
                busy_times: vec!["Mon 09:00-10:00".into()],
            },
        );
        dir.write_mentor_entries(&entries).unwrap();
        assert_eq!(dir.read_mentor_entries().unwrap(), entries);

        let raw = std::fs::read_to_string(dir.file(MENTORS_FILE)).unwrap();
        assert!(raw.ends_with('\n'));
    }
}
