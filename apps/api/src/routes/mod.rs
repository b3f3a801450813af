pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::github::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/github/profile", get(handlers::handle_profile))
        .route(
            "/api/v1/github/repositories",
            post(handlers::handle_list_repositories),
        )
        .route(
            "/api/v1/github/repositories/enrich",
            post(handlers::handle_enrich_repositories),
        )
        .route(
            "/api/v1/github/repositories/ranked",
            post(handlers::handle_ranked_repositories),
        )
        .route(
            "/api/v1/github/repositories/score",
            post(handlers::handle_score_repositories),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::github::mock::{MockGitHub, MockHandle};
    use crate::github::DEFAULT_API_URL;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_config(enrich_limit: usize) -> Config {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            github_api_url: DEFAULT_API_URL.to_string(),
            enrich_limit,
            file_timeout_ms: 2000,
            contributors_timeout_ms: 2000,
            max_file_bytes: 1024 * 1024,
        }
    }

    async fn app(mock: MockGitHub) -> (Router, MockHandle) {
        let (github, handle) = mock.serve().await;
        let state = AppState {
            github,
            config: test_config(20),
        };
        (build_router(state), handle)
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn repo_json(id: u64, owner: &str, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "full_name": format!("{owner}/{name}"),
            "owner": {"login": owner},
            "private": false,
            "fork": false,
            "stargazers_count": 0,
            "forks_count": 0
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _mock) = app(MockGitHub::new()).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (app, mock) = app(MockGitHub::new()).await;
        let (status, body) = send(
            app,
            post_json("/api/v1/github/repositories", None, json!({"username": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_profile_passes_token_through() {
        let (app, _mock) = app(
            MockGitHub::new().json("/user", json!({"login": "alice", "name": "Alice", "followers": 3})),
        )
        .await;
        let request = Request::builder()
            .uri("/api/v1/github/profile")
            .header(header::AUTHORIZATION, "Bearer ghp_abc")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["login"], "alice");
        assert_eq!(body["followers"], 3);
    }

    #[tokio::test]
    async fn test_list_resolves_username_from_token() {
        let (app, mock) = app(
            MockGitHub::new()
                .json("/user", json!({"login": "alice"}))
                .page("/user/repos", 1, json!([repo_json(1, "alice", "x")])),
        )
        .await;
        let (status, body) = send(
            app,
            post_json("/api/v1/github/repositories", Some("ghp_abc"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");
        assert_eq!(body["count"], 1);
        assert_eq!(body["repositories"][0]["full_name"], "alice/x");
        assert!(mock.was_requested("/user"));
    }

    #[tokio::test]
    async fn test_no_repositories_is_not_found() {
        let (app, _mock) = app(MockGitHub::new().page("/user/repos", 1, json!([]))).await;
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/github/repositories",
                Some("ghp_abc"),
                json!({"username": "alice"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_ranked_pipeline_filters_and_sorts() {
        let (app, _mock) = app(
            MockGitHub::new()
                .page(
                    "/user/repos",
                    1,
                    json!([repo_json(1, "alice", "x"), repo_json(2, "org", "y")]),
                )
                .json(
                    "/repos/alice/x/contributors",
                    json!([{"login": "alice", "contributions": 40}]),
                )
                .json(
                    "/repos/org/y/contributors",
                    json!([{"login": "bob", "contributions": 500}]),
                ),
        )
        .await;
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/github/repositories/ranked",
                Some("ghp_abc"),
                json!({"username": "alice"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let repos = body["repositories"].as_array().unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0]["full_name"], "alice/x");
        assert_eq!(repos[0]["enrichment"]["user_commit_count"], 40);
    }

    #[tokio::test]
    async fn test_ranked_drops_repositories_past_limit() {
        let mut starred = repo_json(2, "org", "y");
        starred["stargazers_count"] = json!(150);
        let (app, mock) = app(
            MockGitHub::new()
                .page("/user/repos", 1, json!([repo_json(1, "alice", "x"), starred]))
                .json(
                    "/repos/alice/x/contributors",
                    json!([{"login": "alice", "contributions": 40}]),
                )
                .json(
                    "/repos/org/y/contributors",
                    json!([{"login": "bob", "contributions": 500}]),
                ),
        )
        .await;
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/github/repositories/ranked",
                Some("ghp_abc"),
                json!({"username": "alice", "limit": 1}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["repositories"][0]["full_name"], "alice/x");
        assert!(!mock.requests().iter().any(|p| p.starts_with("/repos/org/y/")));
    }

    #[tokio::test]
    async fn test_rejected_token_is_github_unauthorized() {
        let (app, _mock) = app(
            MockGitHub::new()
                .status("/user/repos", 401)
                .status("/users/alice/repos", 401),
        )
        .await;
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/github/repositories",
                Some("revoked"),
                json!({"username": "alice"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "GITHUB_UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_zero_limit_is_rejected() {
        let (app, mock) = app(MockGitHub::new()).await;
        let (status, _) = send(
            app,
            post_json(
                "/api/v1/github/repositories/enrich",
                Some("ghp_abc"),
                json!({"username": "alice", "limit": 0}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_score_supplied_list_without_token() {
        let (app, mock) = app(MockGitHub::new()).await;
        let mut foreign = repo_json(2, "org", "y");
        foreign["owner"] = json!("org");
        foreign["enrichment"] = json!({"commit_count": 500, "user_commit_count": 0});
        let mut own = repo_json(1, "alice", "x");
        own["owner"] = json!("alice");

        let (status, body) = send(
            app,
            post_json(
                "/api/v1/github/repositories/score",
                None,
                json!({"username": "alice", "repositories": [foreign, own]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["repositories"][0]["full_name"], "alice/x");
        assert_eq!(body["repositories"][0]["score"], 20);
        assert!(mock.requests().is_empty());
    }
}
