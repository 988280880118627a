use assert_cmd::Command;
use assert_cmd::assert::{Assert, OutputAssertExt};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::{contains, starts_with};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The binary with config, data and credentials isolated from the host.
fn skillsmith(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("skillsmith"));
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("SKILLSMITH_API_URL")
        .env_remove("SKILLSMITH_TIMEOUT_SECS")
        .env_remove("GITHUB_TOKEN");
    cmd
}

fn skill_json(id: i64, name: &str, github: Option<serde_json::Value>) -> serde_json::Value {
    let mut metadata = json!({"tags": ["finance"], "fileCount": 3, "totalSize": 2048});
    if let Some(github) = github {
        metadata["github"] = github;
    }
    json!({
        "id": id,
        "name": name,
        "skillType": "process",
        "version": 1,
        "mainContent": "# Invoice review",
        "references": {},
        "metadata": metadata,
        "createdAt": "2026-01-05T10:00:00Z",
        "updatedAt": "2026-01-05T10:00:00Z"
    })
}

/// Run the CLI off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> Assert {
    tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap()
        .assert()
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    skillsmith(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Skillsmith"));
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    skillsmith(&home).arg("--version").assert().success();
}

#[test]
fn test_cli_completions() {
    let home = TempDir::new().unwrap();
    skillsmith(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(starts_with("_skillsmith"));
}

#[test]
fn test_create_rejects_short_content_without_calling_service() {
    let home = TempDir::new().unwrap();
    skillsmith(&home)
        .args([
            "--api-url",
            "http://127.0.0.1:1/api",
            "create",
            "--type",
            "process",
            "--content",
            "Too short to analyze",
            "--name",
            "My Skill",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Content must be at least 100 characters (currently 20)"))
        .stderr(contains("connection error").not());
}

#[test]
fn test_create_rejects_short_name() {
    let home = TempDir::new().unwrap();
    let content = "Deploy steps. ".repeat(10);
    skillsmith(&home)
        .args([
            "--api-url",
            "http://127.0.0.1:1/api",
            "create",
            "--type",
            "technical",
            "--content",
            content.as_str(),
            "--name",
            "A!",
        ])
        .assert()
        .failure()
        .stderr(contains("Skill name must be at least 3 characters"));
}

#[test]
fn test_create_reports_unreachable_service() {
    let home = TempDir::new().unwrap();
    let content = "Deploy steps. ".repeat(10);
    skillsmith(&home)
        .args([
            "--api-url",
            "http://127.0.0.1:1/api",
            "create",
            "--type",
            "technical",
            "--content",
            content.as_str(),
            "--name",
            "deploy-guide",
        ])
        .assert()
        .failure()
        .stderr(contains("Analysis failed: POST http://127.0.0.1:1/api/analyze"))
        .stderr(contains("Suggestion:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_skills_from_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills"))
        .and(query_param("search", "invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skills": [skill_json(1, "invoice-review", None)],
            "pagination": {"total": 1, "limit": 20, "offset": 0, "hasMore": false}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api", server.uri());
    let mut cmd = skillsmith(&home);
    cmd.args([
        "--api-url",
        api_url.as_str(),
        "list",
        "--search",
        "invoice",
    ]);

    run_blocking(cmd)
        .await
        .success()
        .stdout(contains("invoice-review"))
        .stdout(contains("finance"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_with_blank_token_never_calls_publish() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(skill_json(5, "release-notes", None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/skills/5/publish"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api", server.uri());
    let mut cmd = skillsmith(&home);
    cmd.args([
        "--api-url",
        api_url.as_str(),
        "publish",
        "5",
        "--token",
        "   ",
    ]);

    run_blocking(cmd)
        .await
        .failure()
        .stderr(contains("A GitHub token is required to publish"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_reports_repository_from_publish_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(skill_json(5, "release-notes", None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/skills/5/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "repositoryUrl": "https://github.com/acme/release-notes",
            "repositoryName": "release-notes",
            "publishedAt": "2026-01-06T09:00:00Z",
            "installCommand": "claude skill install acme/release-notes"
        })))
        .expect(1)
        .mount(&server)
        .await;
    // The refreshed listing no longer contains the skill
    Mock::given(method("GET"))
        .and(path("/api/skills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"skills": []})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api", server.uri());
    let mut cmd = skillsmith(&home);
    cmd.args([
        "--api-url",
        api_url.as_str(),
        "--format",
        "json",
        "publish",
        "5",
        "--token",
        "ghp_test",
    ]);

    run_blocking(cmd)
        .await
        .success()
        .stdout(contains("\"repositoryUrl\": \"https://github.com/acme/release-notes\""))
        .stdout(contains("claude skill install acme/release-notes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_refuses_already_published_skill() {
    let server = MockServer::start().await;
    let github = json!({
        "repositoryUrl": "https://github.com/acme/release-notes",
        "repositoryName": "release-notes",
        "publishedAt": "2026-01-06T09:00:00Z",
        "installCommand": "claude skill install acme/release-notes"
    });
    Mock::given(method("GET"))
        .and(path("/api/skills/5"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(skill_json(5, "release-notes", Some(github))),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api", server.uri());
    let mut cmd = skillsmith(&home);
    cmd.args([
        "--api-url",
        api_url.as_str(),
        "publish",
        "5",
        "--token",
        "ghp_test",
    ]);

    run_blocking(cmd)
        .await
        .failure()
        .stderr(contains("https://github.com/acme/release-notes"))
        .stderr(contains("--republish"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_missing_skill_suggests_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Skill not found"})))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let api_url = format!("{}/api", server.uri());
    let mut cmd = skillsmith(&home);
    cmd.args(["--api-url", api_url.as_str(), "show", "42"]);

    run_blocking(cmd)
        .await
        .failure()
        .stderr(contains("Skill 42 not found"))
        .stderr(contains("skillsmith list"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let home = TempDir::new().unwrap();
    skillsmith(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(contains("skillsmith"))
        .stdout(contains("config.toml"));
}

#[test]
fn test_config_show_prefers_flag_over_default() {
    let home = TempDir::new().unwrap();
    skillsmith(&home)
        .args(["--api-url", "https://skills.example.com/api/", "config", "show"])
        .assert()
        .success()
        .stdout(contains("https://skills.example.com/api"))
        .stdout(contains("120s"));
}
