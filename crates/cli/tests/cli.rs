use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 4] = [
    "TWITTER_API_KEY",
    "TWITTER_API_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_TOKEN_SECRET",
];

/// Offline config: static insights only, template formatting, no images, no delay
fn write_offline_config(dir: &TempDir, extra: &str) -> PathBuf {
    let content = format!(
        r#"
[general]
seed = 7

[schedule]
min_delay_secs = 0
max_delay_secs = 0
media_probability = 0.0

[sources.hacker_news]
enabled = false

[sources.rss]
enabled = false

[sources.reddit]
enabled = false

[generator]
provider = "none"

[media]
enabled = false

{}
"#,
        extra
    );
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn config_init_writes_example_file() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    cmd.current_dir(dir.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .success();

    let content = fs::read_to_string(&config_path).expect("read config");
    assert!(content.contains("interval_secs = 7200"));
    assert!(content.contains("TWITTER_ACCESS_TOKEN_SECRET"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "# mine").expect("write config");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    cmd.current_dir(dir.path())
        .args(["config", "init", "--path"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(fs::read_to_string(&config_path).unwrap(), "# mine");
}

#[test]
fn run_without_credentials_fails_at_startup() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(&dir, "");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }

    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--single-post"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TWITTER_API_KEY"));
}

#[test]
fn dry_run_single_post_writes_outbox() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(&dir, "");
    let outbox = dir.path().join("outbox.jsonl");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }

    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--single-post", "--dry-run", "--outbox"])
        .arg(&outbox)
        .assert()
        .success();

    let contents = fs::read_to_string(&outbox).expect("read outbox");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let value: Value = serde_json::from_str(lines[0]).expect("valid json");
    let text = value["text"].as_str().expect("text");
    assert!(!text.is_empty());
    assert!(text.chars().count() <= 280);
    assert_eq!(value["media_ids"].as_array().map(Vec::len), Some(0));
}

#[test]
fn dry_run_with_stub_generator_posts_its_reply() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(
        &dir,
        r#"
[generator.stub]
reply = "  Ship small, ship often.  "
"#,
    );
    let outbox = dir.path().join("outbox.jsonl");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }

    cmd.current_dir(dir.path())
        .env("TREND_POSTER__GENERATOR__PROVIDER", "stub")
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--single-post", "--dry-run", "--outbox"])
        .arg(&outbox)
        .assert()
        .success();

    let contents = fs::read_to_string(&outbox).expect("read outbox");
    let value: Value = serde_json::from_str(contents.trim()).expect("valid json");
    assert_eq!(value["text"], "Ship small, ship often.");
}

#[test]
fn format_limit_above_poster_limit_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(&dir, "");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    cmd.current_dir(dir.path())
        .env("TREND_POSTER__FORMAT__MAX_CHARS", "400")
        .arg("--config")
        .arg(&config_path)
        .arg("preview")
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds x.max_chars"));
}

#[test]
fn single_post_failure_exits_nonzero() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(
        &dir,
        r#"
[x]
api_base_url = "http://127.0.0.1:9"
upload_base_url = "http://127.0.0.1:9"
timeout_secs = 5
"#,
    );

    let mut cmd = cargo_bin_cmd!("trend-poster");
    for var in CREDENTIAL_VARS {
        cmd.env(var, "test-value");
    }

    cmd.current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["run", "--single-post"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Posting cycle failed"));
}

#[test]
fn preview_json_with_insights_only() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(&dir, "");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    let output = cmd
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["preview", "--json"])
        .output()
        .expect("run preview");

    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    let items = value["items"].as_array().expect("items");
    assert_eq!(items.len(), 11);
    assert!(items.iter().all(|i| i["type"] == "professional_insight"));

    let post = &value["post"];
    assert!(post["text"].as_str().expect("text").chars().count() <= 280);
    assert_eq!(post["path"], "fallback (insight template)");
}

#[test]
fn doctor_reports_missing_credentials() {
    let dir = TempDir::new().expect("temp dir");
    let config_path = write_offline_config(&dir, "");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }

    let output = cmd
        .current_dir(dir.path())
        .arg("--config")
        .arg(&config_path)
        .args(["doctor", "--json"])
        .output()
        .expect("run doctor");

    assert!(!output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["config"]["status"], "ok");
    assert_eq!(value["x"]["status"], "error");
    assert_eq!(value["overall"], "error");
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");

    let mut cmd = cargo_bin_cmd!("trend-poster");
    cmd.current_dir(dir.path())
        .args(["--config", "does-not-exist.toml", "preview"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
