use axum::{extract::FromRequestParts, http::request::Parts};

use crate::controllers::ApiError;
use crate::error::EngineError;

pub const SESSION_HEADER: &str = "x-session-id";

/// Непрозрачный id сессии покупателя из заголовка `X-Session-Id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| EngineError::validation("missing X-Session-Id header"))?;
        Ok(SessionId(value.to_string()))
    }
}
