use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{ServiceExt, extract::Request};
use fitrack_backend::{AppState, config::Config, create_app, database::PgStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Running in {:?} mode", config.environment);

    let state = match config.database_url.clone() {
        Some(database_url) => {
            let store = Arc::new(
                PgStore::connect(&database_url)
                    .await
                    .expect("Failed to connect to Postgres"),
            );
            AppState::new(config, store.clone(), store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data will not persist");
            AppState::in_memory(config)
        }
    };

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );

    let app = create_app(state);

    tracing::info!("Server running on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        ServiceExt::<Request>::into_make_service(app),
    )
    .await
    .expect("Failed to start server");
}
