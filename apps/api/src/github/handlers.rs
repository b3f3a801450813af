use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument, Span};

use crate::enrichment::enrich_repositories;
use crate::errors::AppError;
use crate::ids::new_request_id;
use crate::models::profile::UserProfile;
use crate::models::repository::{RepositorySummary, ScoredRepository};
use crate::scoring::score_repositories;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RepositoriesRequest {
    /// Defaults to the login the token belongs to.
    pub username: Option<String>,
    /// Overrides the configured enrichment limit.
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub username: Option<String>,
    pub repositories: Vec<ScoredRepository>,
}

#[derive(Debug, Serialize)]
pub struct RepositoriesResponse<T> {
    pub request_id: String,
    pub username: String,
    pub count: usize,
    pub repositories: Vec<T>,
}

impl<T> RepositoriesResponse<T> {
    fn new(request_id: String, username: String, repositories: Vec<T>) -> Self {
        Self {
            request_id,
            username,
            count: repositories.len(),
            repositories,
        }
    }
}

/// GET /api/v1/github/profile
pub async fn handle_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserProfile>, AppError> {
    let (_, span) = request_span("profile");
    let token = bearer_token(&headers)?;
    let profile = state
        .github
        .fetch_authenticated_user(&token)
        .instrument(span)
        .await?;
    Ok(Json(profile))
}

/// POST /api/v1/github/repositories
pub async fn handle_list_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RepositoriesRequest>,
) -> Result<Json<RepositoriesResponse<RepositorySummary>>, AppError> {
    let (request_id, span) = request_span("list");
    let (username, repositories) = list(&state, &headers, &req).instrument(span).await?;
    Ok(Json(RepositoriesResponse::new(request_id, username, repositories)))
}

/// POST /api/v1/github/repositories/enrich
pub async fn handle_enrich_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RepositoriesRequest>,
) -> Result<Json<RepositoriesResponse<ScoredRepository>>, AppError> {
    let (request_id, span) = request_span("enrich");
    let (username, enriched) = collect_and_enrich(&state, &headers, &req)
        .instrument(span)
        .await?;
    Ok(Json(RepositoriesResponse::new(request_id, username, enriched)))
}

/// POST /api/v1/github/repositories/ranked
pub async fn handle_ranked_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RepositoriesRequest>,
) -> Result<Json<RepositoriesResponse<ScoredRepository>>, AppError> {
    let (request_id, span) = request_span("ranked");
    let (username, enriched) = collect_and_enrich(&state, &headers, &req)
        .instrument(span.clone())
        .await?;
    let ranked = span.in_scope(|| score_repositories(enriched, &username));
    Ok(Json(RepositoriesResponse::new(request_id, username, ranked)))
}

/// POST /api/v1/github/repositories/score
///
/// Scores a caller-supplied list. A token is only needed when `username` is
/// omitted.
pub async fn handle_score_repositories(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<RepositoriesResponse<ScoredRepository>>, AppError> {
    let (request_id, span) = request_span("score");
    let username = match non_blank(req.username.as_deref()) {
        Some(name) => name.to_string(),
        None => {
            let token = bearer_token(&headers)?;
            resolve_username(&state, &token, None)
                .instrument(span.clone())
                .await?
        }
    };
    let ranked = span.in_scope(|| score_repositories(req.repositories, &username));
    Ok(Json(RepositoriesResponse::new(request_id, username, ranked)))
}

fn request_span(operation: &'static str) -> (String, Span) {
    let request_id = new_request_id();
    let span = info_span!("github_api", %request_id, operation);
    (request_id, span)
}

async fn list(
    state: &AppState,
    headers: &HeaderMap,
    req: &RepositoriesRequest,
) -> Result<(String, Vec<RepositorySummary>), AppError> {
    let token = bearer_token(headers)?;
    let username = resolve_username(state, &token, req.username.as_deref()).await?;
    let repositories = state.github.list_repositories(&token, &username).await?;
    Ok((username, repositories))
}

async fn collect_and_enrich(
    state: &AppState,
    headers: &HeaderMap,
    req: &RepositoriesRequest,
) -> Result<(String, Vec<ScoredRepository>), AppError> {
    let limit = req.limit.unwrap_or(state.config.enrich_limit);
    if limit == 0 {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let token = bearer_token(headers)?;
    let (username, mut repositories) = list(state, headers, req).await?;
    // Nothing past `limit` is returned, so every repository here has been
    // through the contribution gate by the time it is ranked.
    let listed = repositories.len();
    repositories.truncate(limit);
    info!("Enriching {} of {listed} repositories", repositories.len());

    let enriched = enrich_repositories(&state.github, &token, repositories, &username, limit).await;
    Ok((username, enriched))
}

/// Uses the requested username if one was given, otherwise the login behind
/// the token.
async fn resolve_username(
    state: &AppState,
    token: &str,
    requested: Option<&str>,
) -> Result<String, AppError> {
    if let Some(name) = non_blank(requested) {
        return Ok(name.to_string());
    }
    let profile = state.github.fetch_authenticated_user(token).await?;
    Ok(profile.login)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Extracts the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(AppError::Unauthorized)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer ghp_abc")).unwrap(), "ghp_abc");
        assert_eq!(bearer_token(&headers_with("bearer  ghp_abc ")).unwrap(), "ghp_abc");
    }

    #[test]
    fn test_bearer_token_rejects_missing_or_malformed() {
        assert!(matches!(bearer_token(&HeaderMap::new()), Err(AppError::Unauthorized)));
        assert!(matches!(bearer_token(&headers_with("Basic abc")), Err(AppError::Unauthorized)));
        assert!(matches!(bearer_token(&headers_with("Bearer ")), Err(AppError::Unauthorized)));
        assert!(matches!(bearer_token(&headers_with("ghp_abc")), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  alice ")), Some("alice"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}
