//! Authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use configflow_core::auth::Credential;

use crate::error::AppError;
use crate::AppState;

/// Resolve the `Authorization: Bearer` credential to an
/// [`Actor`](configflow_core::Actor) and attach it to the request extensions.
///
/// A missing header, another scheme and every authentication failure all
/// produce the same 401 response.
pub async fn require_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(Credential::from_authorization)
        .ok_or(AppError::Unauthorized)?;

    let actor = state.authenticator.resolve(credential).await?;
    tracing::debug!(actor = %actor, "request authenticated");

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}
