/*
 * Responsibility
 * - Config load → tracing → dependency wiring → Router assembly
 * - Apply middleware (HTTP layers, bearer auth)
 * - Start with axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogLevel};
use crate::middleware::http::HttpLimits;
use crate::repos::{AlertStore, SqliteAlertStore, alert_repo};
use crate::services::TokenService;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing(level: LogLevel) {
    // RUST_LOG wins when set; otherwise LOG_LEVEL decides.
    // Ex:
    // RUST_LOG=info,sensor_alerts=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.filter_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // stderr can be hidden depending on how the process is launched
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_level);
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting alert ingestion in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, HttpLimits::from(&config));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let pool = alert_repo::connect(&config.database_url).await?;
    alert_repo::initialize(&pool).await?;
    tracing::debug!(database_url = %config.database_url, "alerts table ready");

    let alerts: Arc<dyn AlertStore> = Arc::new(SqliteAlertStore::new(pool));
    let tokens = Arc::new(TokenService::from_config(config));

    Ok(AppState::new(alerts, tokens, config.persist_max_retries))
}

fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, limits)
}
