//! Environment endpoints.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use configflow_core::model::{CreateEnvironmentRequest, UpdateEnvironmentRequest};
use configflow_core::{Actor, Environment, Page};

use crate::error::AppError;
use crate::AppState;

/// Environment routes. Require an authenticated actor.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/environments",
            get(list_environments).post(create_environment),
        )
        .route(
            "/api/v1/environments/:id",
            get(get_environment)
                .put(update_environment)
                .delete(delete_environment),
        )
}

/// Create an environment.
async fn create_environment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateEnvironmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Environment>), AppError> {
    let Json(request) = body?;
    let environment = state.environments.create(&actor, request)?;
    Ok((StatusCode::CREATED, Json(environment)))
}

/// List environments.
async fn list_environments(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<Environment>>, AppError> {
    let Query(page) = page?;
    Ok(Json(state.environments.list(page)?))
}

/// Get an environment by id.
async fn get_environment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Environment>, AppError> {
    Ok(Json(state.environments.get(&id)?))
}

/// Update an environment.
async fn update_environment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateEnvironmentRequest>, JsonRejection>,
) -> Result<Json<Environment>, AppError> {
    let Json(request) = body?;
    Ok(Json(state.environments.update(&actor, &id, request)?))
}

/// Delete an environment.
async fn delete_environment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<Environment>, AppError> {
    Ok(Json(state.environments.delete(&actor, &id)?))
}
