//! Command-line behavior against a library file on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const EXPORT: &str = r#"{
  "version": "1.0",
  "exportDate": "2024-01-26T10:00:00.000Z",
  "prompts": [
    {
      "id": "1",
      "title": "JavaScript Code Review",
      "content": "Please review this JavaScript code for best practices and potential issues.",
      "tags": ["javascript", "code-review", "development"],
      "usageCount": 5,
      "lastUsed": "2024-01-15T10:00:00Z",
      "createdAt": "2024-01-01T10:00:00Z"
    },
    {
      "id": "2",
      "title": "Python Data Analysis",
      "content": "Analyze this Python data science code and suggest improvements.",
      "tags": ["python", "data-science", "analysis"],
      "usageCount": 3,
      "lastUsed": "2024-01-10T10:00:00Z",
      "createdAt": "2024-01-02T10:00:00Z"
    },
    {
      "id": "3",
      "title": "Creative Writing Prompt",
      "content": "Write a creative story about a time traveler who gets stuck in the past.",
      "tags": ["creative", "writing", "fiction"],
      "usageCount": 8,
      "lastUsed": "2024-01-20T10:00:00Z",
      "createdAt": "2024-01-03T10:00:00Z"
    },
    {
      "id": "4",
      "title": "Meeting Summary Template",
      "content": "Create a professional meeting summary with action items and decisions.",
      "tags": ["business", "meetings", "productivity"],
      "usageCount": 12,
      "lastUsed": "2024-01-25T10:00:00Z",
      "createdAt": "2024-01-04T10:00:00Z"
    },
    {
      "id": "5",
      "title": "Email Marketing Campaign",
      "content": "Design an email marketing campaign for a new product launch.",
      "tags": ["marketing", "email", "campaigns"],
      "usageCount": 2,
      "lastUsed": "2024-01-05T10:00:00Z",
      "createdAt": "2024-01-05T10:00:00Z"
    }
  ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("library.json"), EXPORT).unwrap();
        std::fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> std::path::PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// A command with an empty config and no inherited library.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("promptvault").unwrap();
        cmd.current_dir(self.dir.path())
            .env_remove("PROMPTVAULT_LIBRARY")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .arg("--config")
            .arg(self.path("config.toml"));
        cmd
    }

    fn with_library(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("--library").arg(self.path("library.json"));
        cmd
    }
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

fn ids(results: &Value) -> Vec<&str> {
    results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_search_json_ranks_by_relevance() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "search", "code"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let results = stdout_json(&output.stdout);
    assert_eq!(ids(&results), ["1", "2", "4"]);
    assert_eq!(results[0]["matchedIn"], "title");
}

#[test]
fn test_search_with_tag_and_sort() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "search", "--tag", "development", "--tag", "creative"])
        .args(["--sort", "usage"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(ids(&stdout_json(&output.stdout)), ["3", "1"]);
}

#[test]
fn test_search_text_output() {
    let fixture = Fixture::new();
    fixture
        .with_library()
        .args(["search", "python"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Python Data Analysis"));
}

#[test]
fn test_library_from_environment() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .env("PROMPTVAULT_LIBRARY", fixture.path("library.json"))
        .args(["search", "meeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Meeting Summary Template"));
}

#[test]
fn test_tags_json() {
    let fixture = Fixture::new();
    let output = fixture.with_library().args(["--json", "tags"]).output().unwrap();

    assert!(output.status.success());
    let tags = stdout_json(&output.stdout);
    assert_eq!(tags.as_array().unwrap().len(), 15);
    assert_eq!(tags[0], "analysis");
}

#[test]
fn test_complete_tag() {
    let fixture = Fixture::new();
    fixture
        .with_library()
        .args(["complete-tag", "dev"])
        .assert()
        .success()
        .stdout("development\n");
}

#[test]
fn test_complete_tag_respects_limit() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "complete-tag", "c", "--limit", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let tags = stdout_json(&output.stdout);
    assert_eq!(tags, serde_json::json!(["campaigns", "code-review"]));
}

#[test]
fn test_suggest_excludes_ids() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "suggest", "--exclude", "1", "--exclude", "2"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let suggestions = stdout_json(&output.stdout);
    let ids = ids(&suggestions);
    assert_eq!(ids.len(), 3);
    assert!(!ids.contains(&"1"));
    assert!(!ids.contains(&"2"));
}

#[test]
fn test_slash_searches_command_text() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "slash", "Summarize with /meet"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slash = stdout_json(&output.stdout);
    assert_eq!(slash["command"]["query"], "meet");
    assert_eq!(slash["results"][0]["id"], "4");
}

#[test]
fn test_slash_without_command() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "slash", "no command here"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slash = stdout_json(&output.stdout);
    assert!(slash["command"].is_null());
    assert_eq!(slash["results"], serde_json::json!([]));
}

#[test]
fn test_watch_prints_latest_query() {
    let fixture = Fixture::new();
    let output = fixture
        .with_library()
        .args(["--json", "watch"])
        .write_stdin("c\nco\ncode\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let line: Value = serde_json::from_str(last).unwrap();
    assert_eq!(line["query"], "code");
    assert_eq!(ids(&line["results"]), ["1", "2", "4"]);
}

#[test]
fn test_check_reports_counts() {
    let fixture = Fixture::new();
    let output = fixture.with_library().args(["--json", "check"]).output().unwrap();

    assert!(output.status.success());
    let report = stdout_json(&output.stdout);
    assert_eq!(report["prompts"], 5);
    assert_eq!(report["tags"], 15);
    assert_eq!(report["version"], "1.0");
}

#[test]
fn test_invalid_library_is_a_validation_error() {
    let fixture = Fixture::new();
    let broken = fixture.write("broken.json", r#"[{"title": "", "content": "text"}]"#);

    fixture
        .cmd()
        .args(["check", "--library", path_arg(&broken)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("prompts[0].title"));
}

#[test]
fn test_missing_library_setting() {
    let fixture = Fixture::new();
    fixture.cmd().arg("tags").assert().code(4);
}

#[test]
fn test_missing_library_file() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["tags", "--library", "does-not-exist.json"])
        .assert()
        .code(5);
}

#[test]
fn test_library_path_from_config() {
    let fixture = Fixture::new();
    let config = fixture.write(
        "custom.toml",
        &format!(
            "[library]\npath = {:?}\n",
            path_arg(&fixture.path("library.json"))
        ),
    );

    let mut cmd = Command::cargo_bin("promptvault").unwrap();
    cmd.env_remove("PROMPTVAULT_LIBRARY")
        .args(["--no-color", "--config", path_arg(&config), "tags"])
        .assert()
        .success()
        .stdout(predicate::str::contains("development"));
}

#[test]
fn test_missing_config_file_is_a_config_error() {
    let fixture = Fixture::new();
    let mut cmd = Command::cargo_bin("promptvault").unwrap();
    cmd.env_remove("PROMPTVAULT_LIBRARY")
        .args(["--config", path_arg(&fixture.path("nope.toml")), "tags"])
        .assert()
        .code(3);
}
