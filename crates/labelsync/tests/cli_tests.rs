use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const LABELS_YML: &str = r##"
labels:
  - name: bug
    color: "#d73a4a"
    description: Something isn't working
  - name: feature
    color: 0075ca
    aliases: [enhancement]
  - name: docs
    color: "0075ca"
delete:
  - wontfix
"##;

/// A mock scenario directory that doubles as the working directory
struct Scenario {
    dir: TempDir,
}

impl Scenario {
    fn new(remote: serde_json::Value) -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("remote.json"), remote.to_string()).unwrap();
        Self { dir }
    }

    fn standard() -> Self {
        let scenario = Self::new(json!([
            {"name": "Bug", "color": "ffffff"},
            {"name": "enhancement", "color": "000000"},
            {"name": "wontfix", "color": "ffffff"},
            {"name": "question", "color": "cc317c", "description": "Further information is requested"}
        ]));
        scenario.write("labels.yml", LABELS_YML);
        scenario
    }

    fn write(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    /// Command isolated from the user's settings and environment
    fn cmd(&self) -> Command {
        let mut cmd = isolated_cmd(&self.dir);
        cmd.env("LABELSYNC_MOCK_DIR", self.dir.path());
        cmd
    }

    fn remote_names(&self) -> Vec<String> {
        let content = std::fs::read_to_string(self.dir.path().join("remote.json")).unwrap();
        let labels: Vec<serde_json::Value> = serde_json::from_str(&content).unwrap();
        labels
            .iter()
            .map(|l| l["name"].as_str().unwrap().to_string())
            .collect()
    }
}

fn isolated_cmd(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("labelsync");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LABELSYNC_MOCK_DIR")
        .env_remove("LABELSYNC_BACKEND")
        .env_remove("LABELSYNC_CONFIG")
        .env_remove("LABELSYNC_TOKEN")
        .env_remove("LABELSYNC_GITHUB_TOKEN")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove("GITLAB_TOKEN");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_command() {
    cargo_bin_cmd!("labelsync")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Keep repository labels in sync with a declarative label file",
        ));
}

#[test]
fn test_version() {
    cargo_bin_cmd!("labelsync")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions() {
    cargo_bin_cmd!("labelsync")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("labelsync"));
}

#[test]
fn test_validate_reports_counts() {
    let scenario = Scenario::standard();

    scenario
        .cmd()
        .args(["validate", "--file", "labels.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "3 labels, 1 aliases, 1 to delete",
        ));
}

#[test]
fn test_validate_uses_default_label_file() {
    let scenario = Scenario::new(json!([]));
    scenario.write(".github/labels.yml", LABELS_YML);

    scenario
        .cmd()
        .args(["-o", "json", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""labels": 3"#));
}

#[test]
fn test_validate_rejects_bad_color() {
    let scenario = Scenario::new(json!([]));
    scenario.write(
        "labels.json",
        r#"{"labels": [{"name": "bug", "color": "red"}]}"#,
    );

    scenario
        .cmd()
        .args(["validate", "--file", "labels.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid label color"));
}

#[test]
fn test_validate_rejects_duplicate_names() {
    let scenario = Scenario::new(json!([]));
    scenario.write(
        "labels.toml",
        r#"
[[labels]]
name = "bug"
color = "d73a4a"

[[labels]]
name = "BUG"
color = "000000"
"#,
    );

    scenario
        .cmd()
        .args(["validate", "--file", "labels.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("defined more than once"));
}

#[test]
fn test_missing_label_file_shows_help_hint() {
    let scenario = Scenario::new(json!([]));

    scenario
        .cmd()
        .args(["validate", "--file", "nope.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Label file not found"))
        .stderr(predicate::str::contains("labelsync --help"));
}

#[test]
fn test_json_error_output() {
    let scenario = Scenario::new(json!([]));

    let output = scenario
        .cmd()
        .args(["-o", "json", "validate", "--file", "nope.yml"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["error"], true);
    assert_eq!(err["code"], "config");
}

#[test]
fn test_missing_token() {
    let dir = TempDir::new().unwrap();

    isolated_cmd(&dir)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitHub token not configured"));
}

#[test]
fn test_missing_gitlab_project() {
    let dir = TempDir::new().unwrap();

    isolated_cmd(&dir)
        .args(["-b", "gitlab", "--token", "glpat", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitLab project not configured"));
}

#[test]
fn test_missing_explicit_config() {
    let dir = TempDir::new().unwrap();

    isolated_cmd(&dir)
        .args(["--config", "missing.toml", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_list_labels_sorted() {
    let scenario = Scenario::standard();

    let json = stdout_json(scenario.cmd().args(["-o", "json", "list"]));
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bug", "enhancement", "question", "wontfix"]);
    assert_eq!(json[2]["color"], "cc317c");
}

#[test]
fn test_plan_does_not_modify_remote() {
    let scenario = Scenario::standard();

    let json = stdout_json(
        scenario
            .cmd()
            .args(["-o", "json", "plan", "--file", "labels.yml"]),
    );

    let actions: Vec<&str> = json["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["update", "rename", "create", "delete"]);
    assert_eq!(json["operations"][1]["from"], "enhancement");
    assert_eq!(json["has_changes"], true);
    assert_eq!(
        scenario.remote_names(),
        vec!["Bug", "enhancement", "wontfix", "question"]
    );
}

#[test]
fn test_dry_run_sync() {
    let scenario = Scenario::standard();

    scenario
        .cmd()
        .args(["sync", "--file", "labels.yml", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+ create docs  (dry run)"))
        .stdout(predicate::str::contains(
            "Summary: 1 created, 1 updated, 1 renamed, 1 deleted, 0 skipped, 0 failed",
        ))
        .stdout(predicate::str::contains("Dry run: no changes were made."));

    assert_eq!(
        scenario.remote_names(),
        vec!["Bug", "enhancement", "wontfix", "question"]
    );
}

#[test]
fn test_sync_applies_changes_and_is_idempotent() {
    let scenario = Scenario::standard();

    scenario
        .cmd()
        .args(["sync", "--file", "labels.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("> rename enhancement -> feature"))
        .stdout(predicate::str::contains("- delete wontfix"))
        .stdout(predicate::str::contains(
            "Summary: 1 created, 1 updated, 1 renamed, 1 deleted, 0 skipped, 0 failed",
        ));

    assert_eq!(
        scenario.remote_names(),
        vec!["bug", "feature", "question", "docs"]
    );

    let json = stdout_json(
        scenario
            .cmd()
            .args(["-o", "json", "sync", "--file", "labels.yml"]),
    );
    assert_eq!(json["summary"]["skipped"], 3);
    assert_eq!(json["summary"]["created"], 0);
    assert_eq!(json["summary"]["deleted"], 0);
    assert_eq!(json["summary"]["success"], true);
    assert_eq!(json["failures"], json!([]));
}

#[test]
fn test_partial_failure_exits_nonzero() {
    let scenario = Scenario::standard();
    scenario.write(
        "failures.toml",
        r#"
[[failures]]
method = "create_label"
label = "docs"
status = 500
message = "boom"
"#,
    );

    scenario
        .cmd()
        .args(["sync", "--file", "labels.yml"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "+ create docs  failed: API error (500): boom",
        ))
        .stdout(predicate::str::contains(
            "Summary: 0 created, 1 updated, 1 renamed, 1 deleted, 0 skipped, 1 failed",
        ));

    // Operations after the failure still ran
    assert_eq!(scenario.remote_names(), vec!["bug", "feature", "question"]);
}

#[test]
fn test_concurrent_sync_keeps_plan_order() {
    let scenario = Scenario::standard();
    scenario.write(
        "failures.toml",
        r#"
[[failures]]
method = "update_label"
label = "enhancement"
status = 422
"#,
    );

    let output = scenario
        .cmd()
        .args(["-o", "json", "sync", "--file", "labels.yml", "-j", "4"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let statuses: Vec<(&str, &str)> = json["operations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| {
            (
                op["action"].as_str().unwrap(),
                op["status"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("update", "applied"),
            ("rename", "failed"),
            ("create", "applied"),
            ("delete", "applied"),
        ]
    );
    assert_eq!(json["summary"]["failed"], 1);
    assert_eq!(json["summary"]["success"], false);

    let failures = json["failures"].as_array().unwrap();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0]["operation"]["action"], "rename");
    assert!(failures[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("rename label \"enhancement\" to \"feature\" failed"));
}

#[test]
fn test_zero_concurrency_is_rejected() {
    let scenario = Scenario::standard();

    scenario
        .cmd()
        .args(["sync", "--file", "labels.yml", "--concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}
