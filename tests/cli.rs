//! End-to-end tests for the `ap` binary.
//!
//! Every test runs with a temporary HOME and no config environment, so
//! stored credentials and config never leak between tests or from the
//! developer's machine.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CALLBACK: &str = "http://localhost:8888/callback?token=secret-access&refresh=secret-refresh";

/// Get a command for running ap inside `home`.
fn ap(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ap").unwrap();
    cmd.env("HOME", home)
        .env_remove("AUTOPLAYLIST_CONFIG")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RUST_LOG");
    cmd
}

fn login(home: &Path, base_url: &str) {
    ap(home)
        .args(["--base-url", base_url, "login", "--callback", CALLBACK])
        .assert()
        .success();
}

// =============================================================================
// Help and completion
// =============================================================================

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn version_flag_works() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ap"));
}

#[test]
fn completion_needs_no_config() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .env("AUTOPLAYLIST_CONFIG", home.path().join("missing.toml"))
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ap"));
}

// =============================================================================
// Login, status, logout
// =============================================================================

#[test]
fn status_without_credentials() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .success()
        .stdout("not_authenticated\n");

    ap(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in"));
}

#[test]
fn login_persists_credentials_without_printing_them() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["login", "--callback", CALLBACK])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in."))
        .stdout(predicate::str::contains("secret-").not())
        .stderr(predicate::str::contains("secret-").not());

    assert!(home.path().join(".autoplaylist/secrets.toml").exists());

    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .success()
        .stdout("authenticated\n");

    ap(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("secret-").not());
}

#[test]
fn login_without_refresh_warns() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["login", "--callback", "?token=only-access"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no refresh credential"));

    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .success()
        .stdout("authenticated\n");
}

#[test]
fn rejected_callback_fails() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["login", "--callback", "http://localhost/callback?error=denied"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not authorized"));

    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .stdout("not_authenticated\n");
}

#[test]
fn quiet_login_requires_callback() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["login", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--callback"));
}

#[test]
fn logout_is_idempotent() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["login", "--callback", CALLBACK])
        .assert()
        .success();

    ap(home.path()).arg("logout").assert().success();
    ap(home.path()).arg("logout").assert().success();

    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .stdout("not_authenticated\n");
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn invalid_base_url_flag_fails() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .args(["--base-url", "ftp://example.com", "status"])
        .assert()
        .failure();
}

#[test]
fn config_file_sets_base_url() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "base_url = \"https://ap.example.com\"\n").unwrap();

    ap(home.path())
        .env("AUTOPLAYLIST_CONFIG", &config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://ap.example.com"));
}

#[test]
fn missing_explicit_config_fails() {
    let home = TempDir::new().unwrap();
    let autoplaylist_dir = home.path().join(".autoplaylist");
    std::fs::create_dir_all(&autoplaylist_dir).unwrap();
    std::fs::write(autoplaylist_dir.join("config.toml"), "").unwrap();

    ap(home.path())
        .env("AUTOPLAYLIST_CONFIG", home.path().join("missing.toml"))
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn unknown_config_key_fails() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "base_uri = \"https://ap.example.com\"\n").unwrap();

    ap(home.path())
        .env("AUTOPLAYLIST_CONFIG", &config)
        .arg("status")
        .assert()
        .failure();
}

// =============================================================================
// Backend commands
// =============================================================================

#[test]
fn playlists_requires_login() {
    let home = TempDir::new().unwrap();
    ap(home.path())
        .arg("playlists")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn playlists_lists_backend_playlists() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists"))
        .and(header("authorization", "Bearer secret-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "liked", "name": "Liked Songs", "track_count": 12, "type": "liked"},
            {"id": "p1", "name": "Road Trip", "track_count": 40, "type": "playlist"}
        ])))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri());

    ap(home.path())
        .args(["--base-url", &server.uri(), "playlists"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Road Trip"))
        .stdout(predicate::str::contains("Liked Songs"));

    ap(home.path())
        .args(["--base-url", &server.uri(), "playlists", "--quiet"])
        .assert()
        .success()
        .stdout("liked\np1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn refreshed_credential_is_persisted() {
    let server = MockServer::start().await;
    Mock::given(path("/playlists"))
        .and(header("authorization", "Bearer secret-access"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/playlists"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "fresh-access"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri());

    // First run refreshes; the second reuses the stored refreshed credential.
    for _ in 0..2 {
        ap(home.path())
            .args(["--base-url", &server.uri(), "playlists"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No playlists found."));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_session_logs_out() {
    let server = MockServer::start().await;
    Mock::given(path("/playlists"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(path("/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri());

    ap(home.path())
        .args(["--base-url", &server.uri(), "playlists"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session expired; run 'ap login'"))
        .stderr(predicate::str::contains("secret-").not());

    ap(home.path())
        .args(["status", "--quiet"])
        .assert()
        .stdout("not_authenticated\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_shows_review_and_creates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p1", "name": "Road Trip", "track_count": 3, "type": "playlist"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "results": {
                "genre": {"Rock": ["t1", "t2"]},
                "language": {"English": ["t1", "t2", "t3"]},
                "artist": {}
            },
            "track_details": {
                "t1": {"name": "One", "artists": "Band"}
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/create-playlists"))
        .and(wiremock::matchers::body_json(json!({
            "playlists": [{"name": "Rock", "track_ids": ["t1", "t2"]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "created": [{"name": "Rock", "playlist_id": "new1", "track_count": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri());

    ap(home.path())
        .args([
            "--base-url",
            &server.uri(),
            "generate",
            "--playlist",
            "p1",
            "--exclude",
            "english",
            "--create",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rock"))
        .stdout(predicate::str::contains("One (Band)"))
        .stdout(predicate::str::contains("Created 'Rock' (2 tracks)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_rejects_unknown_playlist() {
    let server = MockServer::start().await;
    Mock::given(path("/playlists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(path("/generate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    login(home.path(), &server.uri());

    ap(home.path())
        .args(["--base-url", &server.uri(), "generate", "--playlist", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown playlist 'nope'"));
}
