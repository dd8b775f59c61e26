use crate::error::AppError;

/// Why a bearer token was rejected.
///
/// The distinction is only for logs; callers always see the same 401.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed token: {0}")]
    Malformed(String),
    #[error("no signing key matches kid {0:?}")]
    UnknownKey(Option<String>),
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("signing keys unavailable: {0}")]
    KeySetUnavailable(String),
}

pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing credentials";

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
    }
}
