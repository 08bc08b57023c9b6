#![allow(deprecated)]

//! Command-line integration tests
//!
//! Run the `outreach-chat` binary end to end: configuration validation,
//! argument errors and failure reporting for one-shot commands.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn binary() -> Command {
    let mut cmd = Command::cargo_bin("outreach-chat").unwrap();
    cmd.env_remove("OUTREACH_BASE_URL")
        .env_remove("OUTREACH_FAILURE_POLICY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_flag() {
    binary()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("outreach-chat"));
}

#[test]
fn test_missing_subcommand_fails() {
    binary().assert().failure();
}

#[test]
fn test_invalid_base_url_scheme_rejected() {
    let (_temp_dir, config_path) =
        common::temp_config_file("server:\n  base_url: ftp://files.example.com\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("quota")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must use http or https"));
}

#[test]
fn test_zero_timeout_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file(
        "server:\n  base_url: http://localhost:8000\n  timeout_seconds: 0\n",
    );

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("chats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
}

#[test]
fn test_unknown_plan_rejected() {
    let (_temp_dir, config_path) = common::temp_config_file("{}\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("upgrade")
        .arg("gold")
        .env("OUTREACH_TOKEN", "token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plan"));
}

#[test]
fn test_unreachable_backend_fails_one_shot_command() {
    let (_temp_dir, config_path) =
        common::temp_config_file("server:\n  base_url: http://127.0.0.1:9\n  timeout_seconds: 2\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("chats")
        .env("OUTREACH_TOKEN", "token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load chats"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plans_command_prints_catalogue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/billing/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plans": [
                {"name": "FREE", "daily_limit": 3, "price": 0, "features": []},
                {"name": "PRO", "daily_limit": 200, "price": 29, "features": ["Priority"]}
            ]
        })))
        .mount(&server)
        .await;

    let (_temp_dir, config_path) = common::temp_config_file("{}\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("--no-color")
        .arg("--base-url")
        .arg(server.uri())
        .arg("plans")
        .assert()
        .success()
        .stdout(predicate::str::contains("PRO"))
        .stdout(predicate::str::contains("$29/mo"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quota_command_with_env_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/billing/quota"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "remaining": 7,
            "daily_limit": 10,
            "plan": "PRO"
        })))
        .mount(&server)
        .await;

    let (_temp_dir, config_path) = common::temp_config_file("{}\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("--no-color")
        .arg("--base-url")
        .arg(server.uri())
        .arg("quota")
        .env("OUTREACH_TOKEN", "token")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quota: 7/10 remaining  Plan: PRO"));
}

#[test]
fn test_blank_send_rejected_before_any_request() {
    let (_temp_dir, config_path) =
        common::temp_config_file("server:\n  base_url: http://127.0.0.1:9\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("send")
        .arg("   ")
        .env("OUTREACH_TOKEN", "token")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Message text cannot be empty"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_no_token_redirects_without_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_temp_dir, config_path) =
        common::temp_config_file("session:\n  credential_store: memory\n");

    binary()
        .arg("--config")
        .arg(config_path)
        .arg("--no-color")
        .arg("--base-url")
        .arg(server.uri())
        .arg("chats")
        .env_remove("OUTREACH_TOKEN")
        .env_remove("OUTREACH_CREDENTIAL_STORE")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not logged in"))
        .stderr(predicate::str::contains("Missing credentials"));

    server.verify().await;
}
