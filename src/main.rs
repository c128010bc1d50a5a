use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use xchange_dashboard::services::report_service::render_dashboard;
use xchange_dashboard::{DashboardAggregator, DashboardConfig, LoadPhase, MarketplaceClient, Session};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xchange_dashboard=debug,reqwest=warn")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let session = match Session::from_env() {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid session: {}", e);
            std::process::exit(2);
        }
    };

    let client = match MarketplaceClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create API client: {}", e);
            std::process::exit(2);
        }
    };

    info!("Loading dashboard from {}", config.api_base_url);
    let dashboard = DashboardAggregator::new(client, &config);
    let state = dashboard.load(session).await;

    print!("{}", render_dashboard(&state));

    if state.phase == LoadPhase::Error {
        std::process::exit(1);
    }
}
