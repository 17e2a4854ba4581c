use clap::{Parser, Subcommand};
use geoaddr_core::{AppConfig, Resolver};
use geoaddr_db::{PgAccessLogStore, PgPool, PoolConfig};
use geoaddr_geocoder::{GeocoderConfig, HeartRailsClient};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "geoaddr-cli")]
#[command(about = "Resolve Japanese postal codes and inspect the access log")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a postal code and print the result as JSON.
    Resolve {
        /// Seven-digit postal code, e.g. 1000005.
        postal_code: String,
    },
    /// Print per-postal-code request counts, busiest first.
    AccessLogs,
    /// Apply pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = geoaddr_core::load_app_config()?;

    // stdout carries the JSON output, so logs go to stderr.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool = geoaddr_db::connect_pool(
        &config.database_url,
        PoolConfig::from_app_config(&config),
    )
    .await?;

    match cli.command {
        Commands::Resolve { postal_code } => run_resolve(&config, pool, &postal_code).await,
        Commands::AccessLogs => run_access_logs(&config, pool).await,
        Commands::Migrate => {
            let applied = geoaddr_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            Ok(())
        }
    }
}

fn build_resolver(
    config: &AppConfig,
    pool: PgPool,
) -> anyhow::Result<Resolver<HeartRailsClient, PgAccessLogStore>> {
    let geocoder = HeartRailsClient::new(&GeocoderConfig::from_app_config(config))
        .map_err(|e| anyhow::anyhow!("failed to build geocoder client: {e}"))?;
    Ok(Resolver::new(geocoder, PgAccessLogStore::new(pool)))
}

async fn run_resolve(
    config: &AppConfig,
    pool: PgPool,
    postal_code: &str,
) -> anyhow::Result<()> {
    let resolver = build_resolver(config, pool)?;
    let resolved = resolver.resolve(postal_code).await?;
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

async fn run_access_logs(config: &AppConfig, pool: PgPool) -> anyhow::Result<()> {
    let resolver = build_resolver(config, pool)?;
    let access_logs = resolver.list_access_counts().await?;
    let body = serde_json::json!({ "access_logs": access_logs });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
