//! Route definitions for the `/accounts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::accounts;
use crate::state::AppState;

/// Routes mounted at `/accounts`.
///
/// `check-email` must be registered before the `{id}` capture so the
/// literal segment wins.
///
/// ```text
/// POST /              -> create or update
/// GET  /              -> list (skip/take)
/// GET  /check-email   -> email existence probe
/// GET  /{id}          -> fetch one
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(accounts::create_or_update).get(accounts::list))
        .route("/check-email", get(accounts::check_email))
        .route("/{id}", get(accounts::get_by_id))
}
