use anyhow::Context;
use heroes::config::Config;
use heroes::server::{self, Server, ShutdownOutcome};
use heroes::state::AppState;
use heroes::{app, storage};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("heroes=info,tower_http=info")),
        )
        .init();

    tracing::info!("heroes starting");

    let config = Config::from_env()?;
    config.log_startup();

    let heroes = storage::connect(&config)
        .await
        .context("Unable to init storage")?;

    let settings = config.server_settings();
    let router = app::router(AppState::new(heroes), &settings);
    let bound = Server::new(router, settings)
        .bind()
        .await
        .context("Unable to run app")?;

    let handle = bound.shutdown_handle();
    tokio::spawn(async move {
        server::shutdown_signal().await;
        handle.trigger();
    });

    match bound.serve().await.context("Server failed")? {
        ShutdownOutcome::Drained => tracing::info!("Shutdown complete"),
        ShutdownOutcome::GraceExpired => {
            tracing::warn!("Shutdown grace period expired, exiting with open connections")
        }
    }

    Ok(())
}
