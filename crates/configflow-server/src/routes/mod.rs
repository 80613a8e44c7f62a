//! HTTP route handlers.

pub mod admins;
pub mod api_keys;
pub mod environments;
pub mod health;

use configflow_core::ServiceResult;

use crate::error::AppError;

/// Run a synchronous service call on the blocking pool.
///
/// Used for calls that hash passwords, which would otherwise hold the async
/// worker for the whole Argon2 computation.
pub(crate) async fn blocking<T, F>(call: F) -> Result<T, AppError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))?
        .map_err(AppError::from)
}
