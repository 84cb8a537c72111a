//! Storefront service entry point

use anyhow::Result;
use storefront::config::AppConfig;
use storefront::server::{build_router, seed_demo, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?.with_env_overrides();
    let state = AppState::from_config(&config);

    if config.seed_demo {
        seed_demo(&state)
            .await
            .map_err(|e| anyhow::anyhow!("seeding failed: {}", e))?;
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "storefront listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Read configuration from the path given as the first argument or the
/// `STOREFRONT_CONFIG` variable; fall back to defaults when neither is set.
fn load_config() -> Result<AppConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("STOREFRONT_CONFIG").ok());

    match path {
        Some(path) => {
            tracing::info!(%path, "loading configuration");
            AppConfig::from_yaml_file(&path)
        }
        None => Ok(AppConfig::default()),
    }
}
