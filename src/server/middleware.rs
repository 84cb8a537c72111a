//! Request middleware: bearer-token authorization and rate limiting
//!
//! Both middlewares consult collaborators held by
//! [`crate::server::AppState`]; neither owns any global state.

use crate::core::auth::{AuthContext, AuthPolicy};
use crate::core::error::ApiError;
use crate::core::rate_limit::RateDecision;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;

/// Extract the bearer token from the Authorization header, if any
fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The per-endpoint authorization table.
///
/// User management and stats are admin-only; product writes need any
/// authenticated caller; everything read-only or informational is public.
pub fn policy_for(method: &Method, path: &str) -> AuthPolicy {
    if path.starts_with("/api/users") || path == "/api/stats" {
        return AuthPolicy::HasRole(vec!["admin".to_string()]);
    }
    if path == "/api/auth/me" {
        return AuthPolicy::Authenticated;
    }
    if *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS {
        return AuthPolicy::Public;
    }
    AuthPolicy::Authenticated
}

/// Resolve the caller's auth context, enforce the endpoint policy, and
/// stash the context in request extensions for handlers that need it.
pub async fn authorize(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&req).map(str::to_owned);
    let context = state.auth.resolve(token.as_deref()).await;
    let policy = policy_for(req.method(), req.uri().path());

    if !policy.check(&context) {
        return Err(match context {
            AuthContext::Anonymous => {
                ApiError::Unauthorized("Invalid or missing authentication token".to_string())
            }
            _ => ApiError::Forbidden("Insufficient permissions for this operation".to_string()),
        });
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Apply the configured rate limit to API routes.
///
/// Callers are keyed by their bearer token when present, otherwise they
/// share the anonymous bucket. Health probes are exempt.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path();
    if path.starts_with("/api") && path != "/api/health" {
        let key = bearer_token(&req).unwrap_or("anonymous").to_string();
        if state.limiter.check(&key).await == RateDecision::Limited {
            return Err(ApiError::RateLimited);
        }
    }
    Ok(next.run(req).await)
}
