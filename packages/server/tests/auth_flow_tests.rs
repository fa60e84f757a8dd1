//! Integration tests for signup, login, session cookies and logout over HTTP.

mod common;

use axum::body::Body;
use axum::http::{
    header::{COOKIE, SET_COOKIE},
    Request, Response, StatusCode,
};
use common::{json_request, response_json, unique_email, TestHarness};
use execli_core::domains::auth::UserSession;
use serde_json::json;
use test_context::test_context;
use tower::ServiceExt;

const PASSWORD: &str = "correct-horse-battery";

/// `name=value` part of the Set-Cookie header
fn session_cookie(response: &Response<Body>) -> String {
    let header = response.headers()[SET_COOKIE].to_str().unwrap();
    header.split(';').next().unwrap().to_string()
}

fn me_request(cookie: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/auth/me")
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn signup_sets_session_cookie(ctx: &TestHarness) {
    let email = unique_email("signup");

    let response = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/signup",
            json!({
                "email": email.to_uppercase(),
                "password": PASSWORD,
                "firstName": "Ada",
                "companyName": "Acme"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = session_cookie(&response);

    let body = response_json(response).await;
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["first_name"], "Ada");
    assert_eq!(body["user"]["plan"], "free");
    assert!(body["user"].get("password_hash").is_none());

    let me = ctx.app().oneshot(me_request(&cookie)).await.unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me_body = response_json(me).await;
    assert_eq!(me_body["user"]["email"], email);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_signup_conflicts(ctx: &TestHarness) {
    let email = unique_email("dup");
    let signup = json!({ "email": email, "password": PASSWORD });

    let first = ctx
        .app()
        .oneshot(json_request("/api/auth/signup", signup.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = ctx
        .app()
        .oneshot(json_request("/api/auth/signup", signup))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn weak_password_is_rejected(ctx: &TestHarness) {
    let response = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/signup",
            json!({ "email": unique_email("weak"), "password": "short" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn login_checks_password(ctx: &TestHarness) {
    let email = unique_email("login");
    ctx.app()
        .oneshot(json_request(
            "/api/auth/signup",
            json!({ "email": email, "password": PASSWORD }),
        ))
        .await
        .unwrap();

    let wrong = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": "not-the-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response_json(wrong).await["error"],
        "Invalid email or password"
    );

    let unknown = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": unique_email("nobody"), "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let right = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/login",
            json!({ "email": email, "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(right.status(), StatusCode::OK);
    let cookie = session_cookie(&right);

    let me = ctx.app().oneshot(me_request(&cookie)).await.unwrap();
    assert_eq!(me.status(), StatusCode::OK);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn logout_ends_session(ctx: &TestHarness) {
    let response = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/signup",
            json!({ "email": unique_email("logout"), "password": PASSWORD }),
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = ctx.app().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let me = ctx.app().oneshot(me_request(&cookie)).await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn expired_sessions_are_ignored_and_purged(ctx: &TestHarness) {
    let response = ctx
        .app()
        .oneshot(json_request(
            "/api/auth/signup",
            json!({ "email": unique_email("expiry"), "password": PASSWORD }),
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let body = response_json(response).await;
    let user_id = body["user"]["id"].as_str().unwrap().to_string();

    sqlx::query(
        "UPDATE user_sessions SET expires_at = NOW() - INTERVAL '1 hour' WHERE user_id = $1::uuid",
    )
    .bind(&user_id)
    .execute(&ctx.db_pool)
    .await
    .unwrap();

    let me = ctx.app().oneshot(me_request(&cookie)).await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    let removed = UserSession::delete_expired(&ctx.db_pool).await.unwrap();
    assert!(removed >= 1);
}
