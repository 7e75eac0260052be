use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

/// Command isolated from the caller's environment and config files.
fn slide(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("slide").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("OPENAI_API_KEY")
        .env_remove("SLIDE_MODEL")
        .env_remove("OPENAI_BASE_URL")
        .env_remove("SLIDE_WEB_GROUNDING")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_outline_command() {
    let tmp = tempfile::tempdir().unwrap();
    slide(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("outline"));
}

#[test]
fn zero_slides_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    slide(tmp.path())
        .args(["outline", "Rust", "--slides", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("slide count must be at least 1"))
        .stderr(predicate::str::contains("(400)"));
}

#[test]
fn missing_api_key_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    slide(tmp.path())
        .args(["outline", "Rust", "--slides", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"))
        .stderr(predicate::str::contains("(401)"));
}

#[test]
fn blank_model_from_config_file_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("custom.toml");
    std::fs::write(&path, "model = \"\"\napi_key = \"sk-test\"\n").unwrap();
    slide(tmp.path())
        .args(["outline", "Rust", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no outline model configured"));
}

#[test]
fn unreadable_config_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    slide(tmp.path())
        .args(["outline", "Rust", "--config", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

/// Local config pointing at a port nothing listens on, so runs fail fast
/// after logging the request.
fn write_local_config(home: &std::path::Path) {
    let dir = home.join(".slide");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "model = \"from-file\"\napi_key = \"sk-test\"\nbase_url = \"http://127.0.0.1:9/v1\"\nrequest_timeout_secs = 5\n",
    )
    .unwrap();
}

#[test]
fn model_comes_from_local_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_local_config(tmp.path());
    slide(tmp.path())
        .args(["--debug", "outline", "Rust", "--slides", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("from-file"));
}

#[test]
fn env_model_overrides_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    write_local_config(tmp.path());
    slide(tmp.path())
        .env("SLIDE_MODEL", "from-env")
        .args(["--debug", "outline", "Rust", "--slides", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("from-env"))
        .stderr(predicate::str::contains("from-file").not());
}

#[test]
fn model_flag_overrides_env() {
    let tmp = tempfile::tempdir().unwrap();
    write_local_config(tmp.path());
    slide(tmp.path())
        .env("SLIDE_MODEL", "from-env")
        .args(["--debug", "--model", "from-flag", "outline", "Rust", "--slides", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("from-flag"))
        .stderr(predicate::str::contains("from-env").not())
        .stderr(predicate::str::contains("from-file").not());
}
