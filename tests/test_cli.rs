// CLI integration tests for kirinuki
// Every test runs in a temp directory with an empty XDG_CONFIG_HOME so host
// configuration cannot leak in.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const SOURCE: &str = "use std::fmt;\n\nfn main() {\n    let answer = 42;\n    println!(\"{answer}\");\n}\n";

fn kirinuki(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kirinuki"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join("xdg"))
        .output()
        .expect("Failed to execute command")
}

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    fs::write(dir.path().join("main.rs"), SOURCE).expect("failed to write source");
    dir
}

#[test]
fn test_help_flag_lists_subcommands() {
    let dir = workspace();
    let output = kirinuki(dir.path(), &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Help should exit with success");
    assert!(stdout.contains("summarize"), "Got: {}", stdout);
    assert!(stdout.contains("adjust"), "Got: {}", stdout);
    assert!(stdout.contains("config"), "Got: {}", stdout);
}

#[test]
fn test_summarize_with_room_prints_the_file() {
    let dir = workspace();
    let output = kirinuki(dir.path(), &["summarize", "main.rs", "--budget", "10000"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), SOURCE);
}

#[test]
fn test_summarize_respects_budget() {
    let dir = workspace();
    let output = kirinuki(dir.path(), &["summarize", "main.rs", "--budget", "40"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.chars().count() <= 40, "Got: {:?}", stdout);
}

#[test]
fn test_summarize_json_reports_projected_selection() {
    let dir = workspace();
    let start = SOURCE.find("42").unwrap();
    let selection = format!("{}..{}", start, start + 2);
    let output = kirinuki(
        dir.path(),
        &["summarize", "main.rs", "--budget", "60", "--selection", &selection, "--json"],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let entry = &json[0];
    let text = entry["text"].as_str().expect("text field");
    let projected_start = entry["selection"]["start"].as_u64().expect("selection start") as usize;
    let projected_end = entry["selection"]["end"].as_u64().expect("selection end") as usize;

    assert!(text.chars().count() <= 60);
    assert_eq!(&text[projected_start..projected_end], "42");
    assert!(entry["edit"]["replacements"].is_array());
}

#[test]
fn test_project_config_sets_the_budget() {
    let dir = workspace();
    fs::write(dir.path().join("kirinuki.toml"), "budget = 0\n").expect("failed to write config");

    let output = kirinuki(dir.path(), &["summarize", "main.rs"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "Got: {:?}", String::from_utf8_lossy(&output.stdout));
}

#[test]
fn test_broken_explicit_config_fails() {
    let dir = workspace();
    fs::write(dir.path().join("broken.toml"), "budget = = 1").expect("failed to write config");

    let output = kirinuki(
        dir.path(),
        &["summarize", "main.rs", "--config", "broken.toml"],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("broken.toml"), "Got: {}", stderr);
}

#[test]
fn test_adjust_prints_adjusted_and_original() {
    let dir = workspace();
    let start = SOURCE.find("answer = 42").unwrap();
    let selection = format!("{}..{}", start + 2, start + 4);
    let output = kirinuki(dir.path(), &["adjust", "main.rs", "--selection", &selection]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["original"]["start"], start + 2);
    assert_eq!(json["adjusted"]["start"], start);
    assert_eq!(json["adjusted"]["end"], start + "answer".len());
}

#[test]
fn test_adjust_rejects_malformed_selection() {
    let dir = workspace();
    let output = kirinuki(dir.path(), &["adjust", "main.rs", "--selection", "5-3"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("START..END"), "Got: {}", stderr);
}

#[test]
fn test_unknown_extension_requires_language_for_adjust() {
    let dir = workspace();
    fs::write(dir.path().join("notes.txt"), "plain text\n").expect("failed to write notes");
    let output = kirinuki(dir.path(), &["adjust", "notes.txt", "--selection", "0..5"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--language"));
}

#[test]
fn test_config_init_prints_default_toml() {
    let dir = workspace();
    let output = kirinuki(dir.path(), &["config", "init"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("budget = 8192"), "Got: {}", stdout);
    assert!(stdout.contains("[weights]"), "Got: {}", stdout);
}
