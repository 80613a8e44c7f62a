//! ConfigFlow HTTP/JSON server.
//!
//! Exposes administrator login and CRUD over administrators, API keys and
//! environments. Every route except `/health` and login requires an
//! `Authorization: Bearer` credential: either a session token or an API key.

pub mod config;
pub mod error;
pub mod json;
pub mod middleware;
pub mod routes;

pub use config::{Args, ConfigError, ServerConfig};
pub use error::AppError;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use configflow_core::{
    AdminService, ApiKeyService, AuthConfig, Authenticator, EnvironmentService, Store,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Default per-request deadline.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Credential resolver.
    pub authenticator: Arc<Authenticator>,
    /// Administrator service.
    pub admins: AdminService,
    /// API key service.
    pub api_keys: ApiKeyService,
    /// Environment service.
    pub environments: EnvironmentService,
    /// Backing store, used by the health check.
    pub store: Arc<Store>,
    /// Per-request deadline.
    pub request_timeout: Duration,
}

impl AppState {
    /// Create new application state over an opened store.
    pub fn new(store: Arc<Store>, auth: &AuthConfig) -> Self {
        Self {
            authenticator: Arc::new(Authenticator::new(auth, store.clone())),
            admins: AdminService::new(store.clone()),
            api_keys: ApiKeyService::new(store.clone()),
            environments: EnvironmentService::new(store.clone()),
            store,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Override the per-request deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .merge(routes::admins::routes())
        .merge(routes::api_keys::routes())
        .merge(routes::environments::routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_actor,
        ));

    Router::new()
        .merge(routes::health::routes())
        .merge(routes::admins::public_routes())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(state.request_timeout)),
        )
        .with_state(state)
}
