mod common;

use std::sync::Arc;

use async_trait::async_trait;
use fitrack_backend::{
    AppState,
    database::{MemoryStore, NewUser, Role, StoreError, User, UserRepository},
};
use reqwest::StatusCode;
use uuid::Uuid;

use common::{SECRET, TestServer, json, mint_token, seed_user, token_for};

async fn get_me(srv: &TestServer, request: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder) -> reqwest::Response {
    let client = reqwest::Client::new();
    request(client.get(srv.url("/api/auth/me")))
        .send()
        .await
        .unwrap()
}

async fn assert_denied(res: reqwest::Response, message: &str) {
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], message);
}

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let srv = TestServer::spawn().await;

    let res = get_me(&srv, |r| r).await;
    assert_denied(res, "Not authorized to access this route").await;
}

#[tokio::test]
async fn every_protected_group_requires_credentials() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for path in [
        "/api/plan",
        "/api/weight",
        "/api/workout",
        "/api/steps",
        "/api/meals",
        "/api/analytics/summary",
        "/api/admin/users",
    ] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn forged_cookie_token_is_rejected() {
    let srv = TestServer::spawn().await;
    let user = seed_user(&srv.state, "forged@example.com", Role::User).await;
    let forged = mint_token("some-other-secret", &user.id.to_string(), 600);

    let res = get_me(&srv, |r| r.header("Cookie", format!("token={forged}"))).await;
    assert_denied(res, "Token is invalid or expired").await;
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let srv = TestServer::spawn().await;

    let res = get_me(&srv, |r| r.bearer_auth("not.a.jwt")).await;
    assert_denied(res, "Token is invalid or expired").await;
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let srv = TestServer::spawn().await;
    let user = seed_user(&srv.state, "late@example.com", Role::User).await;
    // well past the validator's leeway
    let expired = mint_token(SECRET, &user.id.to_string(), -3600);

    let res = get_me(&srv, |r| r.bearer_auth(expired)).await;
    assert_denied(res, "Token is invalid or expired").await;
}

#[tokio::test]
async fn subject_that_is_not_an_id_is_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_token(SECRET, "definitely-not-a-uuid", 600);

    let res = get_me(&srv, |r| r.bearer_auth(token)).await;
    assert_denied(res, "Token is invalid or expired").await;
}

#[tokio::test]
async fn unknown_user_is_rejected() {
    let srv = TestServer::spawn().await;
    let token = mint_token(SECRET, &Uuid::new_v4().to_string(), 600);

    let res = get_me(&srv, |r| r.bearer_auth(token)).await;
    assert_denied(res, "User not found").await;
}

#[tokio::test]
async fn deactivated_user_is_rejected() {
    let srv = TestServer::spawn().await;
    let user = seed_user(&srv.state, "gone@example.com", Role::User).await;
    srv.state.users.set_active(user.id, false).await.unwrap();

    let res = get_me(&srv, |r| r.bearer_auth(token_for(&user))).await;
    assert_denied(res, "User account is deactivated").await;
}

#[tokio::test]
async fn active_user_reaches_handler_with_user_attached() {
    let srv = TestServer::spawn().await;
    let user = seed_user(&srv.state, "active@example.com", Role::User).await;

    let res = get_me(&srv, |r| r.bearer_auth(token_for(&user))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], user.id.to_string());
    assert_eq!(body["data"]["email"], "active@example.com");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn cookie_token_wins_over_bearer_header() {
    let srv = TestServer::spawn().await;
    let user = seed_user(&srv.state, "both@example.com", Role::User).await;
    let good = token_for(&user);

    // valid cookie, junk header: the header is never consulted
    let res = get_me(&srv, |r| {
        r.header("Cookie", format!("token={good}"))
            .bearer_auth("junk")
    })
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    // junk cookie, valid header: the cookie still decides
    let res = get_me(&srv, |r| {
        r.header("Cookie", "token=junk").bearer_auth(good.clone())
    })
    .await;
    assert_denied(res, "Token is invalid or expired").await;
}

struct UnavailableUsers;

#[async_trait]
impl UserRepository for UnavailableUsers {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn create(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn set_active(&self, _id: Uuid, _is_active: bool) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn lookup_failure_is_answered_as_invalid_token() {
    let state = AppState::new(
        common::config(&[("APP_ENV", "development")]),
        Arc::new(UnavailableUsers),
        Arc::new(MemoryStore::new()),
    );
    let srv = TestServer::spawn_with_state(state).await;
    let token = mint_token(SECRET, &Uuid::new_v4().to_string(), 600);

    let res = get_me(&srv, |r| r.bearer_auth(token)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Token is invalid or expired");
    // the store failure is still what gets reported as the cause
    assert!(body["stack"].as_str().is_some_and(|s| s.contains("connection refused")));
}
