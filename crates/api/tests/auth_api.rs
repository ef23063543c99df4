//! HTTP-level integration tests for the auth endpoints.
//!
//! Covers login, token rotation, replay, logout idempotency, device
//! binding, credential-oracle resistance, and lazy session expiry.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json, post_json_with_headers};
use sqlx::PgPool;
use storefront_api::auth::password::hash_password;
use storefront_db::models::account::{Account, UpsertAccount, UserType};
use storefront_db::repositories::AccountRepo;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const PASSWORD: &str = "secret123!";

/// Create a test account directly in the database.
async fn create_test_account(pool: &PgPool, email: &str) -> Account {
    let hashed = hash_password(PASSWORD).expect("hashing should succeed");
    let input = UpsertAccount {
        id: Uuid::now_v7(),
        name: Some("Test Customer".to_string()),
        email: email.to_string(),
        user_type: UserType::Customer,
        password_hash: hashed,
    };
    AccountRepo::upsert(pool, &input)
        .await
        .expect("account creation should succeed")
}

/// Log in via the API from the given device and return the response JSON.
async fn login(app: axum::Router, email: &str, device_id: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response =
        post_json_with_headers(app, "/api/v1/auth/login", body, &[("x-device-id", device_id)])
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn session_count(pool: &PgPool) -> i64 {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
        .fetch_one(pool)
        .await
        .unwrap();
    count
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns the envelope with account info and a token pair.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let account = create_test_account(&pool, "login@test.com").await;
    let app = common::build_test_app(pool.clone());

    let json = login(app, "login@test.com", "dev-1").await;

    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Login successful");
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert!(json["data"]["expires_in"].is_number());
    assert_eq!(json["data"]["account"]["id"], account.id.to_string());
    assert_eq!(json["data"]["account"]["email"], "login@test.com");
    assert_eq!(json["data"]["account"]["user_type"], "customer");
    assert!(
        json["data"]["account"].get("password_hash").is_none(),
        "password hash must never be serialized"
    );

    assert_eq!(session_count(&pool).await, 1);
}

/// Login without the X-Device-ID header is a 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_requires_device_header(pool: PgPool) {
    create_test_account(&pool, "nodevice@test.com").await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "nodevice@test.com", "password": PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
}

/// Wrong password and unknown email fail with the same status AND the
/// same message text, so the response is useless as a credential oracle.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_failure_is_oracle_resistant(pool: PgPool) {
    create_test_account(&pool, "user@x.com").await;
    let app = common::build_test_app(pool);

    let wrong_password = post_json_with_headers(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "email": "user@x.com", "password": "wrong" }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    let unknown_email = post_json_with_headers(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "email": "nobody@x.com", "password": "whatever" }),
        &[("x-device-id", "dev-1")],
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a["message"], b["message"], "messages must be identical");
    assert_eq!(a["message"], "invalid email or password");
}

/// A second login from the same device replaces the session row; the
/// first pair's refresh token is dead afterwards.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_relogin_replaces_session(pool: PgPool) {
    create_test_account(&pool, "relogin@test.com").await;
    let app = common::build_test_app(pool.clone());

    let first = login(app.clone(), "relogin@test.com", "dev-1").await;
    let second = login(app.clone(), "relogin@test.com", "dev-1").await;

    assert_eq!(session_count(&pool).await, 1, "same device must reuse the row");
    assert_ne!(
        first["data"]["access_token"], second["data"]["access_token"],
        "each login mints a fresh pair"
    );

    // The rotated-out refresh token no longer matches any session.
    let stale = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": first["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

/// Logins from two devices coexist as independent sessions.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_two_devices(pool: PgPool) {
    create_test_account(&pool, "twodev@test.com").await;
    let app = common::build_test_app(pool.clone());

    login(app.clone(), "twodev@test.com", "dev-1").await;
    login(app, "twodev@test.com", "dev-2").await;

    assert_eq!(session_count(&pool).await, 2);
}

/// Descriptor headers supplied at login are recorded against the session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_records_device_info(pool: PgPool) {
    create_test_account(&pool, "meta@test.com").await;
    let app = common::build_test_app(pool.clone());

    let body = serde_json::json!({ "email": "meta@test.com", "password": PASSWORD });
    let response = post_json_with_headers(
        app,
        "/api/v1/auth/login",
        body,
        &[
            ("x-device-id", "dev-1"),
            ("x-device-type", "phone"),
            ("x-device-model", "Pixel 8"),
            ("x-device-os", "Android"),
            ("x-device-os-version", "15"),
            ("user-agent", "shop-app/1.0"),
            ("x-forwarded-for", "203.0.113.9"),
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (device_os, ip): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT device_os, ip_address FROM device_info")
            .fetch_one(&pool)
            .await
            .expect("device_info row should exist");
    assert_eq!(device_os.as_deref(), Some("Android"));
    assert_eq!(ip.as_deref(), Some("203.0.113.9"));
}

// ---------------------------------------------------------------------------
// Refresh / rotation
// ---------------------------------------------------------------------------

/// Refresh succeeds with the bound device and rotates both tokens; the
/// rotated-out refresh token then fails.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token_pair(pool: PgPool) {
    create_test_account(&pool, "rotate@test.com").await;
    let app = common::build_test_app(pool);

    let t1 = login(app.clone(), "rotate@test.com", "dev-1").await;

    let response = post_json_with_headers(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let t2 = body_json(response).await;

    assert_eq!(t2["message"], "Token refreshed successfully");
    assert_ne!(t1["data"]["access_token"], t2["data"]["access_token"]);
    assert_ne!(t1["data"]["refresh_token"], t2["data"]["refresh_token"]);

    // Replaying the pre-rotation refresh token must fail.
    let replay = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(replay).await;
    assert_eq!(json["message"], "invalid or expired token");
}

/// A refresh token presented from a different device fails with the
/// device-mismatch error even though the token itself is valid.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_device_mismatch(pool: PgPool) {
    create_test_account(&pool, "mismatch@test.com").await;
    let app = common::build_test_app(pool);

    let t1 = login(app.clone(), "mismatch@test.com", "dev-1").await;

    let response = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-2")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "token is bound to a different device");
}

/// A garbage refresh token fails without touching any session.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_garbage_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": "definitely-not-a-jwt" }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// An over-expired session is revoked at refresh time (lazy expiry) and
/// reports the terminal error once; the next attempt with the same
/// token gets plain invalid-token (the row is revoked now).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_expired_session_ladder(pool: PgPool) {
    create_test_account(&pool, "expired@test.com").await;
    let app = common::build_test_app(pool.clone());

    let t1 = login(app.clone(), "expired@test.com", "dev-1").await;

    // Push the session's refresh expiry into the past. The JWT itself
    // is still well within its own lifetime, so the session row is
    // what decides.
    sqlx::query("UPDATE sessions SET expires_at = NOW() - INTERVAL '1 hour'")
        .execute(&pool)
        .await
        .unwrap();

    let first = post_json_with_headers(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(first.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(first).await;
    assert_eq!(json["message"], "refresh token has expired, please log in again");

    let (is_revoked,): (bool,) = sqlx::query_as("SELECT is_revoked FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(is_revoked, "expired session must be revoked as a side effect");

    let second = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(second).await;
    assert_eq!(
        json["message"], "invalid or expired token",
        "revoked session must not report refresh-expired again"
    );
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// Logout revokes the session; any later refresh with its last-known
/// refresh token fails.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_kills_refresh(pool: PgPool) {
    create_test_account(&pool, "logout@test.com").await;
    let app = common::build_test_app(pool);

    let t1 = login(app.clone(), "logout@test.com", "dev-1").await;
    let access = t1["data"]["access_token"].as_str().unwrap();
    let bearer = format!("Bearer {access}");

    let response = post_json_with_headers(
        app.clone(),
        "/api/v1/auth/logout",
        serde_json::json!({}),
        &[("x-device-id", "dev-1"), ("authorization", &bearer)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Logged out successfully");

    let refresh = post_json_with_headers(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": t1["data"]["refresh_token"] }),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(refresh.status(), StatusCode::UNAUTHORIZED);
}

/// Logging out twice succeeds both times (idempotent revocation).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_is_idempotent(pool: PgPool) {
    create_test_account(&pool, "twice@test.com").await;
    let app = common::build_test_app(pool);

    let t1 = login(app.clone(), "twice@test.com", "dev-1").await;
    let bearer = format!("Bearer {}", t1["data"]["access_token"].as_str().unwrap());
    let headers = [("x-device-id", "dev-1"), ("authorization", bearer.as_str())];

    let first =
        post_json_with_headers(app.clone(), "/api/v1/auth/logout", serde_json::json!({}), &headers)
            .await;
    let second =
        post_json_with_headers(app, "/api/v1/auth/logout", serde_json::json!({}), &headers).await;

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(second.status(), StatusCode::OK);
}

/// Logout from a device other than the session's binding is rejected,
/// so an observed token cannot revoke someone else's device context.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_device_mismatch(pool: PgPool) {
    create_test_account(&pool, "othermach@test.com").await;
    let app = common::build_test_app(pool.clone());

    let t1 = login(app.clone(), "othermach@test.com", "dev-1").await;
    let bearer = format!("Bearer {}", t1["data"]["access_token"].as_str().unwrap());

    let response = post_json_with_headers(
        app,
        "/api/v1/auth/logout",
        serde_json::json!({}),
        &[("x-device-id", "dev-2"), ("authorization", bearer.as_str())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "token is bound to a different device");

    // Session survives untouched.
    let (is_revoked,): (bool,) = sqlx::query_as("SELECT is_revoked FROM sessions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!(!is_revoked);
}

/// Logout without a Bearer token is a 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_requires_bearer(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_with_headers(
        app,
        "/api/v1/auth/logout",
        serde_json::json!({}),
        &[("x-device-id", "dev-1")],
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
