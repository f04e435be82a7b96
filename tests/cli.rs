//! CLI integration tests for tagsystem admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::Value;
use tagsystem::store::{SqliteStore, UserStore};

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tagsystem").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn info_json(&self) -> Value {
        let output = self
            .cmd()
            .args([
                "admin",
                "info",
                "--data-dir",
                &self.data_dir_str(),
                "--json",
            ])
            .output()
            .expect("failed to run command");

        serde_json::from_slice(&output.stdout).expect("failed to parse JSON")
    }

    fn user_cmd(&self, action: &str, username: &str, extra: &[&str]) -> assert_cmd::assert::Assert {
        let data_dir = self.data_dir_str();
        let mut args = vec![
            "admin",
            "user",
            action,
            "--data-dir",
            data_dir.as_str(),
            "--username",
            username,
            "--non-interactive",
        ];
        args.extend_from_slice(extra);
        self.cmd().args(args).assert()
    }

    fn role_of(&self, username: &str) -> Option<String> {
        self.info_json()["users"]
            .as_array()
            .expect("users not an array")
            .iter()
            .find(|u| u["username"] == username)
            .map(|u| u["role"].as_str().expect("role").to_string())
    }
}

#[test]
fn init_creates_admin_and_password_file() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Created admin account 'admin'"));

    let password_file = ctx.data_dir().join(".admin_password");
    assert!(ctx.data_dir().join("tagsystem.db").exists());
    let password = std::fs::read_to_string(&password_file).expect("password file");
    assert_eq!(password.len(), 24);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&password_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    assert_eq!(ctx.role_of("admin").as_deref(), Some("ADMIN"));
}

#[test]
fn init_with_explicit_password_writes_no_file() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--data-dir",
            &ctx.data_dir_str(),
            "--username",
            "root",
            "--password",
            "correct-horse",
            "--non-interactive",
        ])
        .assert()
        .success();

    assert!(!ctx.data_dir().join(".admin_password").exists());

    let store = SqliteStore::new(ctx.data_dir().join("tagsystem.db")).unwrap();
    let user = store.get_user("root").unwrap().expect("root exists");
    assert!(user.is_admin());
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[test]
fn init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn user_add_and_remove() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.user_cmd("add", "alice", &["--password", "alice-pass"])
        .success()
        .stdout(predicate::str::contains("Created user \"alice\" with role USER"));
    assert_eq!(ctx.role_of("alice").as_deref(), Some("USER"));

    ctx.user_cmd("add", "alice", &["--password", "again"])
        .failure()
        .stderr(predicate::str::contains("already exists"));

    ctx.user_cmd("remove", "alice", &[])
        .failure()
        .stderr(predicate::str::contains("--yes is required"));

    ctx.user_cmd("remove", "alice", &["--yes"])
        .success()
        .stdout(predicate::str::contains("Deleted user 'alice'"));
    assert_eq!(ctx.role_of("alice"), None);
}

#[test]
fn user_add_generates_password_when_omitted() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.user_cmd("add", "bob", &[])
        .success()
        .stdout(predicate::str::contains("Password: "));
}

#[test]
fn user_add_rejects_bad_input() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.user_cmd("add", "_bob", &["--password", "x"]).failure();
    ctx.user_cmd("add", "bob", &["--password", "x", "--role", "OWNER"])
        .failure()
        .stderr(predicate::str::contains("invalid role"));
}

#[test]
fn user_role_changes() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.user_cmd("add", "alice", &["--password", "alice-pass"])
        .success();

    ctx.user_cmd("role", "alice", &["--role", "admin"]).success();
    assert_eq!(ctx.role_of("alice").as_deref(), Some("ADMIN"));

    ctx.user_cmd("role", "admin", &["--role", "user"]).success();
    assert_eq!(ctx.role_of("admin").as_deref(), Some("USER"));

    ctx.user_cmd("role", "alice", &["--role", "user"])
        .failure()
        .stderr(predicate::str::contains("only admin"));
}

#[test]
fn commands_require_init() {
    let ctx = TestContext::new();

    ctx.user_cmd("add", "alice", &["--password", "x"])
        .failure()
        .stderr(predicate::str::contains("Run 'tagsystem admin init' first"));

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Server not initialized"));
}

#[test]
fn serve_rejects_unreadable_config() {
    let ctx = TestContext::new();
    ctx.init().success();

    let config = ctx.data_dir().join("tagsystem.toml");
    std::fs::write(&config, "port = \"eighty\"").unwrap();

    ctx.cmd()
        .args(["serve", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}
