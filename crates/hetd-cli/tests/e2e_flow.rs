//! End-to-end tests running the `hetd` binary against local calendar files.
//!
//! Tests the full pipeline: read → decode → classify → aggregate → print

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn hetd_binary() -> String {
    env!("CARGO_BIN_EXE_hetd").to_string()
}

/// Runs `hetd` inside `home` with an isolated config dir and environment.
fn run_hetd(home: &Path, envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut command = Command::new(hetd_binary());
    command
        .current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("ICAL")
        .env_remove("HETD_SOURCE")
        .env_remove("RUST_LOG");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.args(args).output().expect("failed to run hetd")
}

fn vevent(uid: &str, summary: &str, course_line: &str, start: &str, end: &str) -> String {
    [
        "BEGIN:VEVENT".to_string(),
        format!("UID:{uid}"),
        "DTSTAMP:20250101T000000Z".to_string(),
        format!("SUMMARY:{summary}"),
        format!("DESCRIPTION:\\nGroupe 1\\nSalle B12\\nJ. Doe\\n{course_line}\\n"),
        start.to_string(),
        end.to_string(),
        "END:VEVENT".to_string(),
    ]
    .join("\r\n")
}

fn write_calendar(dir: &Path, events: &[String]) -> PathBuf {
    let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//Timetable//EN\r\n");
    for event in events {
        body.push_str(event);
        body.push_str("\r\n");
    }
    body.push_str("END:VCALENDAR\r\n");

    let path = dir.join("timetable.ics");
    std::fs::write(&path, body).unwrap();
    path
}

fn timetable() -> Vec<String> {
    vec![
        vevent(
            "1",
            "CM Algèbre",
            "MAT200 - Algèbre",
            "DTSTART;TZID=Europe/Paris:20200310T090000",
            "DTEND;TZID=Europe/Paris:20200310T103000",
        ),
        vevent(
            "2",
            "TD Algèbre",
            "MAT200 - Algèbre",
            "DTSTART:20200311T130000Z",
            "DTEND:20200311T140000Z",
        ),
        vevent(
            "3",
            "TP Optique",
            "PHY100 - Physique",
            "DTSTART:20990312T080000",
            "DTEND:20990312T110000",
        ),
        vevent(
            "4",
            "TP/TD Projet",
            "PHY100 - Physique",
            "DTSTART:20200313T080000",
            "DTEND:20200313T100000",
        ),
        vevent(
            "5",
            "Réunion",
            "no course here",
            "DTSTART:20200314T080000",
            "DTEND:20200314T100000",
        ),
    ]
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_full_report_from_local_file() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());

    let output = run_hetd(temp.path(), &[], &["--source", calendar.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "hetd should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Fetching calendar from: "));
    assert!(stdout.contains("Processed 5 events"));
    assert!(!stdout.contains("Skipped"));
    assert!(stdout.contains("ERROR: Multiple categories (TP/TD/CM) found in event: TP/TD Projet"));
    assert!(stdout.contains("Warning: Could not extract code from event: Réunion"));
    assert!(stdout.contains(
        "MAT200 - Algèbre                                       1.5      1        0              2.5            3.25"
    ));
    assert!(stdout.contains(
        "PHY100 - Physique                                      0        0        3              3              2   "
    ));
    assert!(stdout.contains(
        "TOTAL                                                  1.5      1        3              5.5            5.25"
    ));

    let diagnostics = stdout.find("WARNINGS AND ERRORS:").unwrap();
    let table = stdout.find("HOURS SUMMARY BY CODE").unwrap();
    assert!(diagnostics < table, "diagnostics should precede the table");
}

#[test]
fn test_done_flag_skips_future_events() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());

    let output = run_hetd(
        temp.path(),
        &[],
        &["--done", "--source", calendar.to_str().unwrap()],
    );
    assert!(output.status.success());

    let stdout = stdout_of(&output);
    assert!(stdout.contains("Filtering to show only past events (before "));
    assert!(stdout.contains("Processed 4 events"));
    assert!(stdout.contains("Skipped 1 future events"));
    assert!(!stdout.contains("PHY100 - Physique"));
    assert!(stdout.contains(
        "TOTAL                                                  1.5      1        0              2.5            3.25"
    ));
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());

    let output = run_hetd(
        temp.path(),
        &[],
        &["--json", "--source", calendar.to_str().unwrap()],
    );
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["processed"], 5);
    assert_eq!(report["rows"].as_array().unwrap().len(), 2);
    assert_eq!(report["rows"][0]["label"], "MAT200 - Algèbre");
    assert_eq!(report["totals"]["total_hetd"], 5.25);
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 2);
}

#[test]
fn test_source_from_ical_variable() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());

    let output = run_hetd(temp.path(), &[("ICAL", calendar.to_str().unwrap())], &[]);
    assert!(
        output.status.success(),
        "hetd should read ICAL: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_of(&output).contains("Processed 5 events"));
}

#[test]
fn test_source_from_dotenv_file() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());
    std::fs::write(
        temp.path().join(".env"),
        format!("ICAL={}\n", calendar.display()),
    )
    .unwrap();

    let output = run_hetd(temp.path(), &[], &[]);
    assert!(
        output.status.success(),
        "hetd should read ICAL from .env: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_of(&output).contains("Processed 5 events"));
}

#[test]
fn test_environment_wins_over_dotenv_file() {
    let temp = TempDir::new().unwrap();
    let calendar = write_calendar(temp.path(), &timetable());
    std::fs::write(temp.path().join(".env"), "ICAL=does-not-exist.ics\n").unwrap();

    let output = run_hetd(temp.path(), &[("ICAL", calendar.to_str().unwrap())], &[]);
    assert!(
        output.status.success(),
        "process environment should take precedence: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout_of(&output).contains("Processed 5 events"));
}

#[test]
fn test_missing_source_is_fatal() {
    let temp = TempDir::new().unwrap();

    let output = run_hetd(temp.path(), &[], &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing calendar source"));
    assert!(!stdout_of(&output).contains("HOURS SUMMARY BY CODE"));
}

#[test]
fn test_missing_file_is_fatal() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.ics");

    let output = run_hetd(temp.path(), &[], &["--source", missing.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to fetch calendar"));
    assert!(!stdout_of(&output).contains("HOURS SUMMARY BY CODE"));
}

#[test]
fn test_malformed_calendar_is_fatal() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.ics");
    std::fs::write(&path, "this is not a calendar").unwrap();

    let output = run_hetd(temp.path(), &[], &["--source", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to parse calendar"));
    assert!(!stdout_of(&output).contains("HOURS SUMMARY BY CODE"));
}
