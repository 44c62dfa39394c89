// ============================
// crates/backend-bin/src/main.rs
// ============================

use backend_lib::{config::Settings, reaper, routes, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; the log filter falls back to it.
    let settings = Settings::load().or_else(|_| {
        println!("config.toml not usable, trying config/default.toml");
        Settings::load_from("config/default.toml")
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.server.log_level.clone())),
        )
        .init();

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let reaper_settings = settings.reaper.clone();

    let state = Arc::new(AppState::from_settings(settings)?);

    // Recurring purge of stale unconfirmed accounts
    reaper::spawn_reaper(state.accounts.clone(), reaper_settings);

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
