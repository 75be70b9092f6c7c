//! Lander persistence server
//!
//! Run with: cargo run -p lander-server -- --port 3000

use clap::Parser;
use lander_server::{app, AppState, MemoryStore, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();

    let store = MemoryStore::new();
    match config.seed_user() {
        Some(user) => {
            tracing::info!(email = %user.email, "seeded login user");
            store.add_user(user);
        }
        None => tracing::warn!("EMAIL/PASSWORD not set, login is disabled"),
    }

    let addr = config.addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Lander server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app(AppState::new(store))).await?;
    Ok(())
}
