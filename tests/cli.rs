mod common;

use common::TestEnv;
use predicates::str::contains;
use std::fs;

#[test]
fn match_text_report() {
    let env = TestEnv::new();
    env.cmd()
        .args(["match", common::SCHEDULE])
        .assert()
        .success()
        .stdout("ABC: Alice (Bob)\nBOU: Alice (Bob)\nLAT: none\nNEW: none\n")
        .stderr(contains("NEW: has no meeting times"));
}

#[test]
fn match_tolerance_override() {
    let env = TestEnv::new();
    env.cmd()
        .args(["match", common::SCHEDULE, "--tolerance", "2"])
        .assert()
        .success()
        .stdout(contains("ABC: Alice\n"));
}

#[test]
fn match_largest_tolerance() {
    let env = TestEnv::new();
    env.cmd()
        .args(["match", common::SCHEDULE, "--tolerance", "65535"])
        .assert()
        .success()
        .stdout(contains("ABC: Alice (Bob)\n"));
}

#[test]
fn match_rejects_out_of_range_tolerance() {
    let env = TestEnv::new();
    for value in ["-1", "65536", "2147483647"] {
        env.cmd()
            .args(["match", common::SCHEDULE])
            .arg(format!("--tolerance={value}"))
            .assert()
            .failure()
            .stderr(contains("--tolerance"));
    }
}

#[test]
fn match_json_report() {
    let env = TestEnv::new();
    let out = env
        .cmd()
        .args(["match", common::SCHEDULE, "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json output");
    assert_eq!(value["ok"], true);
    let data = value["data"].as_array().expect("data array");
    assert_eq!(data.len(), 4);
    assert_eq!(data[0]["team"], "ABC");
    assert_eq!(data[0]["suitable"], serde_json::json!(["Alice"]));
    assert_eq!(data[0]["close_calls"], serde_json::json!(["Bob"]));
}

#[test]
fn match_with_postcode_applies_speed_check() {
    let env = TestEnv::new();
    env.cmd()
        .args(["match", common::SCHEDULE, "SO17 1BJ"])
        .assert()
        .success()
        .stdout(contains("ABC: Alice (Bob)\n"))
        .stdout(contains("BOU: none\n"))
        .stderr(contains("LAT: has no distance"));

    let cache = fs::read_to_string(env.schedule_dir().join(".geocache.json")).expect("cache written");
    assert!(cache.contains("SO17 1BJ"));
    assert!(cache.contains("BH1 1AA"));
}

#[test]
fn match_html_to_file() {
    let env = TestEnv::new();
    let path = env.schedule_dir().join("output.html");
    env.cmd()
        .args(["match", common::SCHEDULE, "--format", "html", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout("");

    let html = fs::read_to_string(&path).expect("report written");
    assert!(html.contains("<td>ABC</td>"));
    assert!(html.contains("Bob*"));
    assert!(!html.contains("XYZ"));
}

#[test]
fn match_rejects_bad_window() {
    let env = TestEnv::new();
    env.write("teams.json", r#"{"ABC": {"meeting_times": ["Funday 14:00-15:00"]}}"#);
    env.cmd()
        .args(["match", common::SCHEDULE])
        .assert()
        .failure()
        .stderr(contains("bad time window for 'ABC'"))
        .stderr(contains("could not understand day 'Funday'"));
}

#[test]
fn match_missing_schedule() {
    let env = TestEnv::new();
    env.cmd()
        .args(["match", "1999"])
        .assert()
        .failure()
        .stderr(contains("loading schedule '1999'"));
}

#[test]
fn import_calendar_updates_mentor() {
    let env = TestEnv::new();
    let ics = env.schedule_dir().join("carol.ics");
    fs::write(
        &ics,
        "BEGIN:VCALENDAR\n\
BEGIN:VEVENT\n\
SUMMARY:Work\n\
DTSTART:20240108T090000\n\
DTEND:20240108T170000\n\
END:VEVENT\n\
END:VCALENDAR\n",
    )
    .expect("write ics");

    env.cmd()
        .arg("import-calendar")
        .arg(&ics)
        .args(["Carol", common::SCHEDULE, "--day-start", "08:00", "--day-end", "20:00"])
        .assert()
        .success();

    let raw = fs::read_to_string(env.schedule_dir().join("mentors.json")).expect("mentors");
    let mentors: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(mentors["Carol"]["busy_times"], serde_json::json!(["Mon 09:00-17:00"]));
    let free = mentors["Carol"]["free_times"].as_array().expect("free times");
    assert_eq!(free.len(), 8);
    assert_eq!(free[0], "Mon 08:00-09:00");
    assert_eq!(free[1], "Mon 17:00-20:00");
    assert_eq!(free[2], "Tue 08:00-20:00");
    // Existing mentors are untouched.
    assert_eq!(mentors["Bob"]["rookie"], true);

    env.cmd()
        .args(["match", common::SCHEDULE])
        .assert()
        .success()
        .stdout(contains("LAT: Carol\n"));
}

#[test]
fn import_calendar_rejects_empty_day_span() {
    let env = TestEnv::new();
    env.cmd()
        .args(["import-calendar", "missing.ics", "Carol", common::SCHEDULE])
        .args(["--day-start", "20:00", "--day-end", "08:00"])
        .assert()
        .failure()
        .stderr(contains("is empty"));
}
