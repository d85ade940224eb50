//! HTTP integration tests for the bot registration endpoint
//!
//! Drive the full actix stack with mocked collaborators and a temporary
//! handle registry; no external services are touched.

#[cfg(test)]
mod http_integration_tests {
    use std::path::Path;
    use std::sync::Arc;

    use actix_web::{test, web, App};
    use chrono::{Duration, Utc};

    use crate::config::Config;
    use crate::handlers::configure_bot_routes;
    use crate::services::auth::MockSessionVerifier;
    use crate::services::directory::MockWardenDirectory;
    use crate::services::mailer::MockMailer;
    use crate::services::publisher::{MockChangePublisher, PullRequestRef, TrackingIssue};
    use crate::services::{HandleRegistry, RegistrationService, RegistrationWindow};
    use crate::AppState;

    fn test_config(dir: &Path) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            handles_dir: dir.to_path_buf(),
            registration_start: Utc::now() - Duration::hours(1),
            registration_end: Utc::now() + Duration::hours(1),
            github_token: "test-token".to_string(),
            github_repo_owner: "arena".to_string(),
            github_repo: "site".to_string(),
            github_base_branch: "main".to_string(),
            applications_repo: "bot-applications".to_string(),
            auth_service_url: "http://auth.invalid".to_string(),
            user_directory_url: "http://users.invalid".to_string(),
            user_directory_key: "test-key".to_string(),
            mail_api_url: "http://mail.invalid".to_string(),
            mail_api_key: "test-key".to_string(),
            mail_from: "noreply@example.com".to_string(),
        }
    }

    fn open_window() -> RegistrationWindow {
        RegistrationWindow {
            start: Utc::now() - Duration::hours(1),
            end: Utc::now() + Duration::hours(1),
        }
    }

    fn closed_window() -> RegistrationWindow {
        RegistrationWindow {
            start: Utc::now() - Duration::hours(2),
            end: Utc::now() - Duration::hours(1),
        }
    }

    struct Mocks {
        verifier: MockSessionVerifier,
        publisher: MockChangePublisher,
        directory: MockWardenDirectory,
        mailer: MockMailer,
    }

    fn no_mocks() -> Mocks {
        Mocks {
            verifier: MockSessionVerifier::new(),
            publisher: MockChangePublisher::new(),
            directory: MockWardenDirectory::new(),
            mailer: MockMailer::new(),
        }
    }

    fn happy_mocks() -> Mocks {
        let mut mocks = no_mocks();
        mocks.verifier.expect_verify().returning(|_, _| Ok(true));
        mocks.directory.expect_profile().returning(|_| Ok(None));
        mocks
            .publisher
            .expect_propose_change_set()
            .returning(|_| {
                Ok(PullRequestRef {
                    number: 7,
                    html_url: "https://example.com/pull/7".to_string(),
                })
            });
        mocks
            .publisher
            .expect_open_tracking_issue()
            .returning(|_, _| {
                Ok(TrackingIssue {
                    number: 42,
                    html_url: "https://example.com/issues/42".to_string(),
                })
            });
        mocks
            .publisher
            .expect_put_file()
            .returning(|_, _, _| Ok(()));
        mocks
    }

    fn test_state(dir: &Path, window: RegistrationWindow, mocks: Mocks) -> web::Data<AppState> {
        let registry = Arc::new(HandleRegistry::new(dir));
        let registration = Arc::new(RegistrationService::new(
            registry.clone(),
            Arc::new(mocks.verifier),
            Arc::new(mocks.publisher),
            Arc::new(mocks.directory),
            Arc::new(mocks.mailer),
            window,
        ));
        web::Data::new(AppState {
            config: test_config(dir),
            registry,
            registration,
        })
    }

    #[actix_rt::test]
    async fn non_post_method_returns_405_with_allow_header() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/v1/bots/register").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 405);
        assert_eq!(
            resp.headers().get("Allow").and_then(|v| v.to_str().ok()),
            Some("POST")
        );

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Method not allowed");
    }

    #[actix_rt::test]
    async fn closed_window_rejects_regardless_of_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), closed_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap_or("")
                .contains("registration window"),
            "unexpected body: {body}"
        );
    }

    #[actix_rt::test]
    async fn missing_bot_name_returns_422() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({ "owner": "alice" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 422);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bot name is required.");
    }

    #[actix_rt::test]
    async fn missing_owner_returns_422() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({ "botName": "scanbot" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 422);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Bot must have an owner.");
    }

    #[actix_rt::test]
    async fn overlong_bot_name_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({
                "botName": "a".repeat(26),
                "owner": "alice",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn invalid_characters_return_400() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({
                "botName": "scan bot!",
                "owner": "alice",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(
            body["error"].as_str().unwrap_or("").contains("alphanumeric"),
            "unexpected body: {body}"
        );
    }

    #[actix_rt::test]
    async fn taken_name_returns_400() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("scanbot.json"),
            r#"{"handle": "scanbot"}"#,
        )
        .unwrap();
        let state = test_state(dir.path(), open_window(), no_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .set_json(serde_json::json!({
                "botName": "scanbot",
                "owner": "alice",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "scanbot is already a registered handle");
    }

    #[actix_rt::test]
    async fn failed_authentication_returns_401() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = no_mocks();
        mocks.verifier.expect_verify().returning(|_, _| Ok(false));
        let state = test_state(dir.path(), open_window(), mocks);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .insert_header(("authorization", "Bearer bad-token"))
            .set_json(serde_json::json!({
                "botName": "scanbot",
                "owner": "alice",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
    }

    #[actix_rt::test]
    async fn valid_registration_returns_201_with_pr_number() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), open_window(), happy_mocks());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/v1").configure(configure_bot_routes)),
        )
        .await;

        let bot_name = format!("bot-{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        let req = test::TestRequest::post()
            .uri("/v1/bots/register")
            .insert_header(("x-arena-user", "alice"))
            .insert_header(("authorization", "Bearer good-token"))
            .set_json(serde_json::json!({
                "botName": bot_name,
                "owner": "alice",
                "description": "Finds reentrancy issues",
                "submission": "Sample findings attached",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 201);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Created PR 7");
    }
}
