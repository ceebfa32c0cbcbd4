//! Integration tests for the catalog subcommands.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Temp home with a stored session token.
fn logged_in_home(token: &str) -> TempDir {
    let home = TempDir::new().expect("create temp snakedex home");
    fs::write(
        home.path().join("storage.json"),
        format!(r#"{{"token": "{token}"}}"#),
    )
    .unwrap();
    home
}

fn snakedex(home: &TempDir, server: &MockServer) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("snakedex");
    cmd.env("SNAKEDEX_HOME", home.path())
        .env("SNAKEDEX_API_URL", server.uri())
        .env("SNAKEDEX_BLOCK_REAL_API", "1");
    cmd
}

fn catalog() -> serde_json::Value {
    json!({
        "snakes": [
            {
                "thai_name": "งูเห่า",
                "binomial": "Naja kaouthia",
                "habitat": "ป่า, นาข้าว",
                "is_venomous": true,
                "danger_level": "มาก"
            },
            {"thai_name": "งูสิงบ้าน", "binomial": "Ptyas korros", "habitat": ["สวน"]}
        ]
    })
}

#[tokio::test]
async fn test_list_prints_records() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snakes"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Naja kaouthia"))
        .stdout(predicate::str::contains("Ptyas korros"));
}

#[tokio::test]
async fn test_show_normalizes_list_fields() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snakes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .mount(&server)
        .await;

    let output = snakedex(&home, &server)
        .args(["snakes", "show", "Naja kaouthia", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["habitat"], json!(["ป่า", "นาข้าว"]));
}

#[tokio::test]
async fn test_expired_token_is_cleared() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("stale");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snakes"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired."));

    let storage = fs::read_to_string(home.path().join("storage.json")).unwrap();
    assert!(!storage.contains("stale"));
}

#[tokio::test]
async fn test_protected_command_without_session_makes_no_call() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog()))
        .expect(0)
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired."));
}

#[tokio::test]
async fn test_add_posts_to_create_path() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/addsnake"))
        .and(body_partial_json(json!({
            "thai_name": "งูเขียวหางไหม้",
            "binomial": "Trimeresurus albolabris",
            "diet": ["กบ"]
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let record = home.path().join("record.json");
    fs::write(
        &record,
        r#"{"thai_name": "งูเขียวหางไหม้", "binomial": "Trimeresurus albolabris", "diet": "กบ"}"#,
    )
    .unwrap();

    snakedex(&home, &server)
        .args(["snakes", "add", "--file", record.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved."));
}

#[tokio::test]
async fn test_add_rejects_missing_required_fields() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "add", "--file", "-"])
        .write_stdin(r#"{"thai_name": "งูเห่า"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required fields"));
}

#[tokio::test]
async fn test_edit_addresses_original_binomial() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/snakes/binomial/Naja%20naja"))
        .and(body_partial_json(json!({"binomial": "Naja kaouthia"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "edit", "Naja naja", "--file", "-"])
        .write_stdin(r#"{"thai_name": "งูเห่า", "binomial": "Naja kaouthia"}"#)
        .assert()
        .success();
}

#[tokio::test]
async fn test_delete_requires_yes_without_terminal() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = logged_in_home("T");
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/snakes/binomial/Naja%20naja"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    snakedex(&home, &server)
        .args(["snakes", "delete", "Naja naja"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    snakedex(&home, &server)
        .args(["snakes", "delete", "Naja naja", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted Naja naja."));
}
