mod api;
mod middleware;

use geoaddr_core::Resolver;
use geoaddr_db::{PgAccessLogStore, PoolConfig};
use geoaddr_geocoder::{GeocoderConfig, HeartRailsClient};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = geoaddr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = PoolConfig::from_app_config(&config);
    let pool = geoaddr_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = geoaddr_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let geocoder = HeartRailsClient::new(&GeocoderConfig::from_app_config(&config))?;
    let resolver = Resolver::new(geocoder, PgAccessLogStore::new(pool));
    let app = build_app(AppState::new(resolver));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "geoaddr-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
