#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;

use axum::{Router, ServiceExt, extract::Request};
use chrono::Utc;
use fitrack_backend::{
    AppState,
    config::Config,
    create_app, with_layers,
    database::{NewUser, Role, User},
    utils::Claims,
};
use jsonwebtoken::{EncodingKey, Header};

pub const SECRET: &str = "test-secret";
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with_state(AppState::in_memory(config(&[]))).await
    }

    pub async fn spawn_with_state(state: AppState) -> Self {
        // same app as prod, on an ephemeral port
        let app = create_app(state.clone());
        Self::start(state, |listener| async move {
            axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
                .await
                .unwrap();
        })
        .await
    }

    /// Serves extra routes behind the production middleware chain.
    pub async fn spawn_routes(routes: Router<AppState>, state: AppState) -> Self {
        let app = with_layers(routes, state.clone());
        Self::start(state, |listener| async move {
            axum::serve(listener, app).await.unwrap();
        })
        .await
    }

    async fn start<F, Fut>(state: AppState, serve: F) -> Self
    where
        F: FnOnce(tokio::net::TcpListener) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(serve(listener));

        Self {
            base_url: format!("http://{}", addr),
            state,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Test configuration: the shared secret plus any overrides.
pub fn config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> =
        HashMap::from([("JWT_SECRET".to_string(), SECRET.to_string())]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

pub fn mint_token(secret: &str, subject: &str, expires_in_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: subject.to_string(),
        iat: now,
        exp: now + expires_in_secs,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

pub fn token_for(user: &User) -> String {
    mint_token(SECRET, &user.id.to_string(), 600)
}

/// Inserts a user directly; the password hash is a placeholder, so these
/// users can't log in with a password.
pub async fn seed_user(state: &AppState, email: &str, role: Role) -> User {
    state
        .users
        .create(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: "unusable".to_string(),
            role,
        })
        .await
        .expect("failed to seed user")
}

pub async fn json(res: reqwest::Response) -> serde_json::Value {
    res.json().await.expect("response body is not JSON")
}
