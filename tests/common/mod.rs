use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHEDULE: &str = "2024";

pub struct TestEnv {
    _tmp: TempDir,
    pub schedules: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let schedules = tmp.path().join("schedules");
        make_fixture_schedule(&schedules.join(SCHEDULE));
        Self {
            _tmp: tmp,
            schedules,
        }
    }

    pub fn schedule_dir(&self) -> PathBuf {
        self.schedules.join(SCHEDULE)
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.schedule_dir().join(name), content).expect("write schedule file");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("u-mentor");
        cmd.arg("--schedules-dir")
            .arg(&self.schedules)
            .env_remove("RUST_LOG");
        cmd
    }
}

fn make_fixture_schedule(dir: &Path) {
    fs::create_dir_all(dir).expect("create schedule dir");

    let teams = serde_json::json!({
        "ABC": {"travel_time": 15, "postcode": "SO14 7DU", "meeting_times": ["Mon 14:00-15:00"]},
        "BOU": {"travel_time": 15, "postcode": "BH1 1AA", "meeting_times": ["Mon 14:00-15:00"]},
        "LAT": {"travel_time": 20, "meeting_times": ["Thu 18:00-19:00"]},
        "NEW": {"travel_time": 10},
        "XYZ": {"arranged": true}
    });
    let mentors = serde_json::json!({
        "Alice": {"free_times": ["Mon 13:30-15:30", "Sat 10:00-12:00"]},
        "Bob": {"rookie": true, "free_times": ["Mon 13:50-15:10"]}
    });
    let locations = serde_json::json!({
        "SO17 1BJ": {"lat": 50.9346, "lon": -1.3958},
        "SO14 7DU": {"lat": 50.8990, "lon": -1.4040},
        "BH1 1AA": {"lat": 50.7192, "lon": -1.8808}
    });

    for (name, value) in [
        ("teams.json", teams),
        ("mentors.json", mentors),
        ("locations.json", locations),
    ] {
        fs::write(
            dir.join(name),
            serde_json::to_string_pretty(&value).expect("serialize fixture"),
        )
        .expect("write fixture");
    }
}
