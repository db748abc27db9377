//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};
use pitstop_core::storage::StorageConfig;

pub mod attachments;
pub mod health;

/// Headroom over the max file size for multipart framing and other fields.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Creates the API router, with protected routes behind the auth middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let max_file_size = state
        .storage
        .as_ref()
        .map_or(StorageConfig::DEFAULT_MAX_FILE_SIZE, |s| {
            s.config().max_file_size
        });
    let body_limit =
        usize::try_from(max_file_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX);

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(attachments::routes(body_limit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
