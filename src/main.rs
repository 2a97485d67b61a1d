use std::{env, sync::Arc, time::Duration};

use anyhow::Context as _;
use chrono::TimeDelta;
use plop::{
    config::Config,
    line::LineClient,
    listener::{Dispatcher, Rules},
    server::{AppState, build_router},
    store::UsageStore,
    util,
};
use tokio::sync::Mutex;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    util::logger::init()?;

    let config_path = env::var("BOT_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let mut config = Config::load_or_create(&config_path)?;
    config.apply_env();
    config.validate()?;

    let cooldown = TimeDelta::try_minutes(config.counter.cooldown_minutes)
        .context("Cooldown is out of range")?;
    let store = UsageStore::open(&config.storage.data_dir, cooldown)?;
    let store = Arc::new(Mutex::new(store));

    let api = Arc::new(LineClient::new(
        config.line.access_token.clone(),
        Duration::from_secs(config.line.request_timeout_seconds),
    )?);
    let dispatcher = Dispatcher::new(store.clone(), api, Rules::from(&config.counter));

    let state = AppState {
        dispatcher,
        channel_secret: config
            .line
            .verify_signature
            .then(|| config.line.channel_secret.clone()),
    };
    if state.channel_secret.is_none() {
        tracing::warn!("Webhook signature verification is disabled");
    }

    let app = build_router(state, &config.server.webhook_path);
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(
        "Listening on http://{}{}",
        config.server.bind,
        config.server.webhook_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(store) {
        Ok(store) => store.into_inner().close()?,
        Err(_) => tracing::warn!("Store still shared after shutdown, skipping final flush"),
    }

    Ok(())
}
