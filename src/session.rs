//! Cart partitioning by client session.
//!
//! Clients identify their cart with a `session-id` header. Requests without one get a
//! freshly minted id, and every API response echoes the id in use as `x-session-id` so
//! the client can adopt it.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderName, HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_HEADER: HeaderName = HeaderName::from_static("session-id");
pub const SESSION_ECHO_HEADER: HeaderName = HeaderName::from_static("x-session-id");

const MAX_SESSION_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartSession(String);

impl CartSession {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SESSION_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid {
            return Err(AppError::BadRequest(format!(
                "{SESSION_HEADER} must be 1-{MAX_SESSION_LEN} characters of [A-Za-z0-9_-]"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Middleware resolving the request's [`CartSession`] and echoing it on the response.
pub async fn attach_session(mut request: Request, next: Next) -> Result<Response, AppError> {
    let session = match request.headers().get(&SESSION_HEADER) {
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| AppError::BadRequest(format!("invalid {SESSION_HEADER} header")))?;
            CartSession::parse(raw)?
        }
        None => {
            let session = CartSession::generate();
            tracing::debug!(session = %session, "minted cart session");
            session
        }
    };

    let echo = HeaderValue::from_str(session.as_str())
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    request.extensions_mut().insert(session);

    let mut response = next.run(request).await;
    response.headers_mut().insert(SESSION_ECHO_HEADER, echo);
    Ok(response)
}

impl<S> FromRequestParts<S> for CartSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CartSession>()
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("session middleware is not installed"))
            })
    }
}
