use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::domain::auth::{AuthError, IdentityVerifier};
use crate::error::AppError;

/// Rejects requests without a valid bearer token.
///
/// The verified [`Identity`](crate::domain::auth::Identity) is inserted into the request extensions. Every
/// rejection produces the same 401 body; the reason is only logged.
pub async fn auth_middleware(
    State(verifier): State<Arc<dyn IdentityVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AuthError::MissingToken);

    let identity = match token {
        Ok(token) => verifier.verify(token).await,
        Err(e) => Err(e),
    }
    .map_err(|e| {
        tracing::info!(
            path = %request.uri().path(),
            reason = %e,
            "Request rejected by authentication"
        );
        AppError::from(e)
    })?;

    tracing::debug!(subject = %identity.subject, "Request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
