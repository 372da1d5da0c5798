use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn tts_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tts");
    path
}

/// Run `tts` with the remote credential variables removed, so every test
/// exercises the embedded dataset deterministically.
fn run_tts(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = tts_binary();
    let output = Command::new(&binary)
        .env_remove("TIMETABLE_REMOTE_URL")
        .env_remove("TIMETABLE_REMOTE_KEY")
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run tts binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// A config path that does not exist, so built-in defaults apply.
fn default_config() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tts.toml");
    (tmp, path)
}

fn strict_config() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("tts.toml");
    fs::write(&path, "unknown_department = \"strict\"\n").unwrap();
    (tmp, path)
}

#[test]
fn test_departments_lists_catalog() {
    let (_tmp, config) = default_config();
    let (stdout, stderr, success) = run_tts(&config, &["departments"]);
    assert!(success, "departments failed: {}", stderr);
    assert!(stdout.contains("BCA"));
    assert!(stdout.contains("BSc.AI&DS"));
    assert!(stdout.contains("Arts & Humanities"));
    assert_eq!(stdout.lines().count(), 7);
}

#[test]
fn test_staff_list_is_deduplicated() {
    let (_tmp, config) = default_config();
    let (stdout, stderr, success) = run_tts(&config, &["staff-list"]);
    assert!(success, "staff-list failed: {}", stderr);
    assert_eq!(stdout.matches("Dr. Evangeline").count(), 1);
    assert!(stdout.contains("mr-c-santhosh-kumar"));
    assert_eq!(stdout.lines().count(), 11);
}

#[test]
fn test_staff_search_finds_assignment() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["staff", "Mr. C. Santhosh Kumar", "--day", "mon", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("BCA"));
    assert!(stdout.contains("DBMS"));
    assert!(stdout.contains("assigned"));
}

#[test]
fn test_staff_search_accepts_display_day() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["staff", "Mr. C. Santhosh Kumar", "--day", "Monday", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("DBMS"));
}

#[test]
fn test_staff_search_reports_free_period() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["staff", "Dr. Evangeline", "--day", "mon", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("free"));
    assert!(stdout.contains("Dr. Evangeline"));
}

#[test]
fn test_department_search_finds_assignment() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["department", "bca", "--day", "mon", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("DBMS"));
    assert!(stdout.contains("Mr. C. Santhosh Kumar"));
    assert!(stdout.contains("assigned"));
}

#[test]
fn test_department_search_staffless_slot_is_unassigned() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["department", "bca", "--day", "mon", "--period", "7"],
    );
    assert!(success);
    assert!(stdout.contains("LIB/AA"));
    assert!(stdout.contains("unassigned"));
}

#[test]
fn test_department_search_empty_slot_is_unassigned() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["department", "cs", "--day", "wed", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("Computer Science"));
    assert!(stdout.contains("unassigned"));
}

#[test]
fn test_department_hyphenated_alias() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["department", "bsc-ai-ds", "--day", "mon", "--period", "1"],
    );
    assert!(success);
    assert!(stdout.contains("AI Fundamentals"));
    assert!(stdout.contains("BSc.AI&DS"));
}

#[test]
fn test_unknown_department_resolves_to_default() {
    let (_tmp, config) = default_config();
    let (stdout, _, success) = run_tts(
        &config,
        &["department", "zoology", "--day", "mon", "--period", "1"],
    );
    assert!(success);
    // Default policy routes unknown ids to the default department (bca).
    assert!(stdout.contains("DBMS"));
}

#[test]
fn test_unknown_department_fails_under_strict_policy() {
    let (_tmp, config) = strict_config();
    let (_, stderr, success) = run_tts(
        &config,
        &["department", "zoology", "--day", "mon", "--period", "1"],
    );
    assert!(!success);
    assert!(stderr.contains("unknown department"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("tts.toml");
    fs::write(&config, "[remote]\ntimeout_secs = 0\n").unwrap();
    let (_, stderr, success) = run_tts(&config, &["departments"]);
    assert!(!success);
    assert!(stderr.contains("timeout_secs"), "stderr: {}", stderr);
}

#[test]
fn test_custom_catalog_from_config() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("tts.toml");
    fs::write(
        &config,
        r#"
default_department = "cs"

[[departments]]
id = "cs"
name = "Computer Science"
"#,
    )
    .unwrap();
    let (stdout, stderr, success) = run_tts(&config, &["departments"]);
    assert!(success, "departments failed: {}", stderr);
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.contains("Computer Science"));
}
