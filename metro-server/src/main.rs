use metro_server::config::AppConfig;
use metro_server::directory::{DirectorySchema, StationDirectory, StopResolver};
use metro_server::domain::{Clock, TransportMode};
use metro_server::fetch::{ArrivalClient, FetchConfig};
use metro_server::refresh::RefreshSchedule;
use metro_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("metro_server=info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // The rail directory is required; without it there is nothing to show
    let rail = StationDirectory::from_path(
        TransportMode::Rail,
        &config.rail_stations,
        &DirectorySchema::for_mode(TransportMode::Rail),
    )
    .expect("Failed to load rail station directory");

    let bus = StationDirectory::from_path(
        TransportMode::Bus,
        &config.bus_stations,
        &DirectorySchema::for_mode(TransportMode::Bus),
    )
    .unwrap_or_else(|e| {
        warn!(error = %e, "bus station directory unavailable, bus arrivals disabled");
        StationDirectory::empty(TransportMode::Bus)
    });

    let client = ArrivalClient::new(FetchConfig::new().with_timeout(config.fetch_timeout_secs))
        .expect("Failed to create HTTP client");

    let state = AppState::new(
        StopResolver::new(rail, bus),
        client,
        Clock::System(config.timezone),
        RefreshSchedule::new(config.refresh),
    );

    let app = create_router(state, &config.static_dir);

    let addr = config.listen_addr;
    info!(%addr, "metro dashboard listening");
    info!("open http://{addr} in your browser for the web interface");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
