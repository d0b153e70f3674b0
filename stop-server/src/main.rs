use stop_server::arrivals::ArrivalConfig;
use stop_server::config::ServerConfig;
use stop_server::store::DatasetHandle;
use stop_server::web::{AppState, create_router};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "stop_server=info,tower_http=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    // Load the dataset up front; on failure the first request retries
    let dataset = DatasetHandle::new(&config.gtfs_dir);
    if let Err(e) = dataset.get().await {
        warn!(error = %e, dir = %config.gtfs_dir.display(), "schedule dataset not loaded yet");
    }

    let state = AppState::new(dataset, ArrivalConfig::new(config.arrival_limit));
    let app = create_router(state);

    let addr = config.socket_addr();
    info!("Stop server listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health         - Health check");
    info!("  GET  /areas          - Stop areas");
    info!("  GET  /stops          - Stops in an area");
    info!("  GET  /buses          - Routes calling at a stop");
    info!("  GET  /nearest-stop   - Stop nearest a location");
    info!("  GET  /arrival-times  - Upcoming arrivals of a route at a stop");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
