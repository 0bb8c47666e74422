use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn rollcall(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rollcall").unwrap();
    cmd.env_remove("ROLLCALL_URL")
        .env_remove("ROLLCALL_ACCESS_TOKEN")
        .env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(dir.path())
        .arg("--store")
        .arg(dir.path().join("store.json"));
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("rollcall")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("branch"))
        .stdout(predicate::str::contains("storage"))
        .stdout(predicate::str::contains("ROLLCALL_URL"));
}

#[test]
fn storage_round_trip() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "set", "profile", r#"{"theme":"dark","size":3}"#, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 'profile'"));

    rollcall(&dir)
        .args(["storage", "get", "profile"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""theme": "dark""#));

    assert!(dir.path().join("store.json").exists());
}

#[test]
fn storage_plain_string() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "set", "greeting", "hello"])
        .assert()
        .success();

    rollcall(&dir)
        .args(["storage", "get", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""hello""#));
}

#[test]
fn storage_missing_key_prints_null() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "get", "nothing-here"])
        .assert()
        .success()
        .stdout(predicate::eq("null\n"));
}

#[test]
fn storage_set_rejects_invalid_json() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "set", "broken", "{not json", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn missing_url_is_reported() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["branch", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'url' is not configured"))
        .stderr(predicate::str::contains("rollcall config set --url"));
}

#[test]
fn config_set_then_show() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["config", "set", "--url", "https://api.example.test", "--timeout", "15"])
        .assert()
        .success();

    rollcall(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("URL: https://api.example.test"))
        .stdout(predicate::str::contains("Timeout: 15s"));
}

#[test]
fn unknown_format_exits_with_usage_code() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "get", "k", "--format", "yaml"])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn branch_list_against_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": [{"id": 1, "name": "North"}, {"id": 2, "name": "South"}]}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        rollcall(&dir)
            .args(["branch", "list", "--format", "json", "--url", &uri])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let branches: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(branches[1]["name"], "South");
}

#[tokio::test(flavor = "multi_thread")]
async fn backend_error_is_normalized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/77"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        rollcall(&dir)
            .args(["user", "get", "77", "--url", &uri])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error (404): not found"), "stderr: {}", stderr);
}

#[test]
fn storage_remove() {
    let dir = TempDir::new().unwrap();

    rollcall(&dir)
        .args(["storage", "set", "greeting", "hello"])
        .assert()
        .success();

    rollcall(&dir)
        .args(["storage", "remove", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'greeting'"));

    rollcall(&dir)
        .args(["storage", "get", "greeting"])
        .assert()
        .success()
        .stdout(predicate::eq("null\n"));

    rollcall(&dir)
        .args(["storage", "remove", "greeting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("was not set"));
}
