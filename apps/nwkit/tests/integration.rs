//! Integration tests for the nwkit CLI

use std::process::Command;

fn nwkit() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nwkit"));
    for var in [
        "NWKIT_OUTPUT",
        "NWKIT_COLOR",
        "NWKIT_BASE_URL",
        "NWKIT_NAMESPACE",
        "NWKIT_TIMEOUT",
        "NWKIT_VERIFY_CACHE",
        "RUST_LOG",
    ] {
        command.env_remove(var);
    }
    command
}

#[test]
fn test_cli_version() {
    let output = nwkit()
        .arg("--version")
        .output()
        .expect("Failed to execute nwkit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nwkit"));
}

#[test]
fn test_cli_help() {
    let output = nwkit()
        .arg("--help")
        .output()
        .expect("Failed to execute nwkit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("provision"));
    assert!(stdout.contains("platforms"));
}

#[test]
fn test_cli_invalid_command() {
    let output = nwkit()
        .arg("invalid-command")
        .output()
        .expect("Failed to execute nwkit");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_platforms_lists_catalog() {
    let project = tempfile::tempdir().unwrap();
    let output = nwkit()
        .args(["--color", "never", "platforms", "--project"])
        .arg(project.path())
        .output()
        .expect("Failed to execute nwkit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("macos"));
    assert!(stdout.contains("windows"));
    assert!(stdout.contains("osx-ia32.zip"));
}

#[test]
fn test_platforms_json() {
    let project = tempfile::tempdir().unwrap();
    let output = nwkit()
        .args(["--json", "platforms", "--project"])
        .arg(project.path())
        .output()
        .expect("Failed to execute nwkit");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let platforms = value["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), 4);
    assert_eq!(platforms[0]["platform"], "macos");
}

#[test]
fn test_unknown_platform_fails_before_io() {
    let project = tempfile::tempdir().unwrap();
    let output = nwkit()
        .args(["provision", "-p", "amiga", "--project"])
        .arg(project.path())
        .output()
        .expect("Failed to execute nwkit");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("amiga"));
    assert!(!project.path().join("resources").exists());
}

#[test]
fn test_unreachable_store_reports_partial_failure() {
    let project = tempfile::tempdir().unwrap();
    std::fs::write(
        project.path().join("nwkit.toml"),
        "[remote]\nbase_url = \"http://127.0.0.1:1/nw-\"\n\n[network]\nconnect_timeout = 2\n",
    )
    .unwrap();

    let output = nwkit()
        .args(["--json", "provision", "-p", "windows", "--project"])
        .arg(project.path())
        .output()
        .expect("Failed to execute nwkit");

    assert_eq!(output.status.code(), Some(2));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["complete"], false);
    assert_eq!(value["platforms"][0]["platform"], "windows");
    assert_eq!(value["platforms"][0]["stage"], "fetch");
    assert!(!project.path().join("tmp/node-webkit-win-ia32.zip").exists());
}
