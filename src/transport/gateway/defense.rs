use crate::error::{AuthError, RateLimitError, ValidationError};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

pub(super) const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Everything a request can be refused for. Generation failures are not
/// here: they degrade to fallback content with a 200.
#[derive(Debug)]
pub(super) enum Rejection {
    Unauthorized(AuthError),
    RateLimited(RateLimitError),
    InvalidBody(ValidationError),
}

impl Rejection {
    pub(super) fn reason(&self) -> &'static str {
        match self {
            Self::Unauthorized(AuthError::Missing) => "identity_missing",
            Self::Unauthorized(AuthError::InvalidBearer) => "bearer_invalid",
            Self::Unauthorized(AuthError::InvalidDevice(_)) => "device_invalid",
            Self::RateLimited(_) => "rate_limited",
            Self::InvalidBody(_) => "invalid_body",
        }
    }
}

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Self::InvalidBody(err)
    }
}

impl From<RateLimitError> for Rejection {
    fn from(err: RateLimitError) -> Self {
        Self::RateLimited(err)
    }
}

impl From<AuthError> for Rejection {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err)
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized(AuthError::Missing) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized: send Authorization: Bearer <token> or X-Device-Id",
                    "errorRu": "Требуется заголовок X-Device-Id"
                })),
            )
                .into_response(),
            Self::Unauthorized(_) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized",
                    "errorRu": "Необходима авторизация"
                })),
            )
                .into_response(),
            Self::RateLimited(error) => {
                let retry_after = error.retry_after_secs();
                let (message, message_ru) = if matches!(
                    &error,
                    RateLimitError::Exhausted { policy, .. } if *policy != "coarse"
                ) {
                    (
                        "AI request limit reached. Please wait a moment.",
                        "Лимит AI запросов. Подожди минуту.",
                    )
                } else {
                    (
                        "Too many requests, please try again later.",
                        "Слишком много запросов. Попробуй позже.",
                    )
                };
                let mut response = (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({
                        "error": message,
                        "errorRu": message_ru,
                        "retryAfter": retry_after
                    })),
                )
                    .into_response();
                let headers = response.headers_mut();
                headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
                headers.insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(0_u32));
                response
            }
            Self::InvalidBody(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid request body",
                    "errorRu": "Проверь введённые данные.",
                    "details": err.issues
                })),
            )
                .into_response(),
        }
    }
}
