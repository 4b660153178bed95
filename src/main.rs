mod backend;
mod chat;
mod config;
mod error;
mod filter;
mod middleware;
mod models;
mod routes;
mod session;
mod templates;
mod views;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use crate::{backend::HttpBackend, config::Config, models::AppState, session::SessionStore};

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    tracing::info!(backend = %cfg.backend_url, "using clinic backend");

    let state = AppState {
        backend: Arc::new(HttpBackend::new(&cfg.backend_url)),
        sessions: SessionStore::new(cfg.session_ttl()),
        secure_cookies: cfg.secure_cookies,
    };

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
