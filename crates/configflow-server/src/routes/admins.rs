//! Administrator endpoints, including login.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use configflow_core::model::{CreateAdminRequest, LoginRequest, UpdateAdminRequest};
use configflow_core::{Actor, Page};

use crate::error::AppError;
use crate::json::{AdminResponse, LoginResponse};
use crate::routes::blocking;
use crate::AppState;

/// Login route. Public.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/api/v1/admins/login", post(login))
}

/// Administrator management routes. Require an authenticated actor.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/admins", get(list_admins).post(create_admin))
        .route(
            "/api/v1/admins/:id",
            get(get_admin).put(update_admin).delete(delete_admin),
        )
}

/// Exchange administrator credentials for a session token.
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = body?;
    let issued = state
        .authenticator
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(issued.into()))
}

/// Create an administrator.
async fn create_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    body: Result<Json<CreateAdminRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AdminResponse>), AppError> {
    let Json(request) = body?;
    let admins = state.admins.clone();
    let admin = blocking(move || admins.create(&actor, request)).await?;
    Ok((StatusCode::CREATED, Json(admin.into())))
}

/// List administrators.
async fn list_admins(
    State(state): State<AppState>,
    page: Result<Query<Page>, QueryRejection>,
) -> Result<Json<Vec<AdminResponse>>, AppError> {
    let Query(page) = page?;
    let admins = state.admins.list(page)?;
    Ok(Json(admins.into_iter().map(Into::into).collect()))
}

/// Get an administrator by id.
async fn get_admin(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    Ok(Json(state.admins.get(&id)?.into()))
}

/// Update an administrator.
async fn update_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    body: Result<Json<UpdateAdminRequest>, JsonRejection>,
) -> Result<Json<AdminResponse>, AppError> {
    let Json(request) = body?;
    let admins = state.admins.clone();
    let admin = blocking(move || admins.update(&actor, &id, request)).await?;
    Ok(Json(admin.into()))
}

/// Delete an administrator.
async fn delete_admin(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<AdminResponse>, AppError> {
    Ok(Json(state.admins.delete(&actor, &id)?.into()))
}
