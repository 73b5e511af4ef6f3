//! API routes module - organizes all route handlers.

pub mod app_state;
pub mod error;
pub mod promotions;

use std::path::Path;
use std::sync::Arc;

use axum::http::Uri;
use axum::routing::get;
use axum::Router;

use crate::storage::{SqliteStore, StorageError};

pub use app_state::AppState;
pub use error::ApiError;

/// Create the main API router combining all route modules.
///
/// State is applied by callers (e.g. `.with_state(app_state)`), which lets
/// tests inject their own store.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/", get(promotions::index))
        .route("/health", get(promotions::health))
        .nest("/promotions", promotions::promotions_router())
        .fallback(not_found_fallback)
        .method_not_allowed_fallback(method_not_allowed_fallback)
}

/// Create application state backed by SQLite at the given path.
pub fn create_app_state(db_path: &Path) -> Result<AppState, StorageError> {
    let store = SqliteStore::open(db_path)?;
    Ok(AppState::new(Arc::new(store)))
}

/// Create application state backed by a private in-memory database.
pub fn create_in_memory_app_state() -> Result<AppState, StorageError> {
    let store = SqliteStore::open_in_memory()?;
    Ok(AppState::new(Arc::new(store)))
}

/// JSON 404 for unknown paths.
async fn not_found_fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!(
        "The requested URL {} was not found on the server.",
        uri
    ))
}

/// JSON 405 for known paths hit with the wrong verb. The `Allow` header
/// listing the permitted methods is appended by the router.
async fn method_not_allowed_fallback() -> ApiError {
    ApiError::method_not_allowed("The method is not allowed for the requested URL.")
}
