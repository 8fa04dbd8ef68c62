//! Authentication extractor for HTTP and WebSocket handlers

use super::error::Problem;
use crate::contract::AuthContext;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use std::sync::Arc;

/// Authenticated caller, extracted from a Bearer token or, for WebSocket
/// handshakes, a `token` query parameter
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = parts
            .extensions
            .get::<Arc<AppState>>()
            .ok_or_else(|| {
                Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                    .with_detail("application state missing")
            })?
            .clone();

        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or_else(|| {
                Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized")
                    .with_detail("missing session token")
            })?;

        let ctx = state.auth.verify_token(&token)?;
        Ok(Self(ctx))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn query_token(parts: &Parts) -> Option<String> {
    parts
        .uri
        .query()?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .map(ToString::to_string)
}
