//! API key endpoints.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use configflow_core::model::{CreateApiKeyRequest, UpdateApiKeyRequest};
use configflow_core::{Actor, Page};

use crate::error::AppError;
use crate::json::{ApiKeyResponse, CreatedApiKeyResponse};
use crate::AppState;

/// API key routes. Require an authenticated actor.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/api-keys", get(list_api_keys).post(create_api_key))
        .route(
            "/api/v1/api-keys/:id",
            get(get_api_key).put(update_api_key).delete(delete_api_key),
        )
}

/// Create an API key.
///
/// The only response that carries the secret.
async fn create_api_key(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateApiKeyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedApiKeyResponse>), AppError> {
    let Json(request) = body?;
    let key = state.api_keys.create(&actor, request)?;
    Ok((StatusCode::CREATED, Json(key.into())))
}

/// List API keys.
async fn list_api_keys(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<ApiKeyResponse>>, AppError> {
    let Query(page) = page?;
    let keys = state.api_keys.list(page)?;
    Ok(Json(keys.into_iter().map(Into::into).collect()))
}

/// Get an API key by id.
async fn get_api_key(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    Ok(Json(state.api_keys.get(&id)?.into()))
}

/// Update an API key label.
async fn update_api_key(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateApiKeyRequest>, JsonRejection>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let Json(request) = body?;
    Ok(Json(state.api_keys.update(&actor, &id, request)?.into()))
}

/// Delete (revoke) an API key.
async fn delete_api_key(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    Ok(Json(state.api_keys.delete(&actor, &id)?.into()))
}
