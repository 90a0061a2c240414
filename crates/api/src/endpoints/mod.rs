//! API endpoints.

mod auth;
mod folders;
mod notes;
mod tags;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/folders", folders::router())
        .nest("/notes", notes::router())
        .nest("/tags", tags::router())
}
