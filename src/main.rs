//! # Court Search Server Main Driver
//!
//! ## Purpose
//! Entry point for the court search web server. Loads configuration, wires up
//! the shared components (HTTP client, query store, orchestrator) and runs the
//! web server until shutdown.
//!
//! ## Architecture Flow
//! 1. Parse command line arguments and load configuration
//! 2. Initialize logging
//! 3. Open the query store and build the HTTP client
//! 4. Optionally run a one-shot connectivity check and exit
//! 5. Serve requests until interrupted

use clap::{Arg, Command};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use district_court_search::{
    api::ApiServer,
    client::CourtClient,
    config::Config,
    errors::{AppError, Result},
    orchestrator::QueryOrchestrator,
    probe,
    storage::QueryStore,
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("court-search-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Case-status search portal for the Wardha District Court")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Server port (overrides the configuration file)")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("check-health")
                .long("check-health")
                .help("Probe the court website and exit")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").expect("has default");
    let mut config = Config::from_file(config_path)?;
    if let Some(port) = matches.get_one::<u16>("port") {
        config.server.port = *port;
    }
    let config = Arc::new(config);

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config_path = config_path.as_str(),
        court = config.court.name.as_str(),
        "starting court search server"
    );

    let store = Arc::new(QueryStore::open(&config.storage.db_path)?);
    let client = Arc::new(CourtClient::new(&config.http, &config.court.base_url)?);
    let orchestrator = Arc::new(QueryOrchestrator::new(
        Arc::clone(&config),
        Arc::clone(&client),
        Arc::clone(&store),
    ));

    let app_state = AppState {
        config: Arc::clone(&config),
        client,
        store,
        orchestrator,
    };

    if matches.get_flag("check-health") {
        return run_health_check(&app_state).await;
    }

    ApiServer::new(app_state).run().await?;
    info!("court search server shut down");
    Ok(())
}

/// Initialize logging from the configured level; `RUST_LOG` wins when set.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// One-shot connectivity check for operators and deploy scripts.
async fn run_health_check(app_state: &AppState) -> Result<()> {
    match probe::find_working_url(&app_state.client, &app_state.config.court, &app_state.store)
        .await
    {
        Some(url) => {
            info!(url = url.as_str(), "court website is accessible");
            Ok(())
        }
        None => Err(AppError::Internal {
            message: format!(
                "{} website is not accessible from this host",
                app_state.config.court.name
            ),
        }),
    }
}
