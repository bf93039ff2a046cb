//! End-to-end checks of the `kithab-cli` binary that need no backend

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Nothing listens on the discard port, so any request fails fast
const OFFLINE_BACKEND: &str = "http://127.0.0.1:9/api";

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kithab-cli"));
    cmd.current_dir(dir)
        .env("KITHAB_BACKEND_URL", OFFLINE_BACKEND)
        .env("KITHAB_SESSION_PATH", dir.join("session.json"))
        .env_remove("KITHAB_ADMIN_ID")
        .env_remove("KITHAB_PASSWORD")
        .env_remove("KITHAB_DOWNLOAD_POLICY")
        .env_remove("RUST_LOG");
    cmd
}

fn write_session(dir: &Path, role: &str) {
    let session = format!(
        r#"{{"schema_version":1,"token":"t","user":{{"_id":"a1","name":"Someone","role":"{}"}}}}"#,
        role
    );
    std::fs::write(dir.join("session.json"), session).unwrap();
}

#[test]
fn help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn incomplete_search_is_refused_before_login() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["notes", "search", "--regulation", "r1", "--branch", "b1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please select all fields"));
}

#[test]
fn whoami_without_session() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn whoami_and_logout_with_stored_session() {
    let dir = TempDir::new().unwrap();
    write_session(dir.path(), "admin");

    cli(dir.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Someone"));

    cli(dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn login_requires_credentials() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["login", " ", "--password", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ID and password required"));
}

#[test]
fn register_reports_every_field() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args([
            "register",
            "--name",
            "",
            "--email",
            "not-an-email",
            "--roll-number",
            "21CS001",
            "--branch",
            "cse",
            "--password",
            "abc",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Full name is required"))
        .stderr(predicate::str::contains("Invalid email format"))
        .stderr(predicate::str::contains(
            "Password must be at least 6 characters",
        ));
}

#[test]
fn invalid_backend_flag() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .args(["--backend", "ftp://example.com", "whoami"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http://"));
}

#[test]
fn delete_without_confirmation_aborts() {
    let dir = TempDir::new().unwrap();
    write_session(dir.path(), "admin");
    cli(dir.path())
        .args(["admin", "regulation", "delete", "r1"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted"));

    cli(dir.path())
        .args(["notes", "delete", "n1"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted"));
}

#[test]
fn admin_commands_need_admin_role() {
    let dir = TempDir::new().unwrap();
    write_session(dir.path(), "student");
    cli(dir.path())
        .args(["admin", "users", "delete", "u1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires the Admin role"));
}
