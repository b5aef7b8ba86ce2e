mod api;
mod middleware;

use std::sync::Arc;

use creatorfit_core::{Environment, SignalsMode, Taxonomy};
use creatorfit_oauth::InstagramClient;
use creatorfit_qualify::SignalsSource;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(creatorfit_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = creatorfit_db::PoolConfig::from_app_config(&config);
    let pool = creatorfit_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = creatorfit_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let taxonomy = match config.taxonomy_path.as_deref() {
        Some(path) => {
            let taxonomy = creatorfit_core::load_taxonomy(path)?;
            tracing::info!(path = %path.display(), niches = taxonomy.niches().len(), "loaded taxonomy file");
            taxonomy
        }
        None => Taxonomy::builtin(),
    };

    let instagram = match config.instagram.clone() {
        Some(app) => Some(Arc::new(InstagramClient::new(app, config.http_timeout_secs)?)),
        None => {
            tracing::warn!("Instagram credentials not set; OAuth connection routes will return 503");
            None
        }
    };

    tracing::info!(mode = %config.signals_mode, "signals provider selected");
    if let Some(notice) = signals_mode_notice(config.signals_mode, instagram.is_some()) {
        tracing::warn!(mode = %config.signals_mode, "{notice}");
    }
    let signals = SignalsSource::from_mode(config.signals_mode, pool.clone());

    let auth = AuthState::from_env(matches!(config.env, Environment::Development))?;
    let state = AppState {
        pool,
        config: Arc::clone(&config),
        taxonomy: Arc::new(taxonomy),
        instagram,
        signals,
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "creatorfit server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// In snapshot mode a fresh OAuth connection has no stored metrics yet, so the
/// inline qualification fails until an admin records a snapshot.
fn signals_mode_notice(mode: SignalsMode, oauth_configured: bool) -> Option<&'static str> {
    match mode {
        SignalsMode::Snapshot if oauth_configured => Some(
            "snapshot signals mode: new Instagram connections stay 'connected' until an \
             admin records a metrics snapshot and re-runs qualification",
        ),
        _ => None,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
