pub mod accounts;
pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /accounts                     create/update (POST), list (GET)
/// /accounts/check-email         email existence probe (GET)
/// /accounts/{id}                fetch one (GET)
///
/// /auth/login                   login (public, device headers)
/// /auth/refresh                 refresh (device-bound)
/// /auth/logout                  logout (Bearer token, device-bound)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/accounts", accounts::router())
        .nest("/auth", auth::router())
}
