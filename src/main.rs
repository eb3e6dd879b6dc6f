use platter::api;
use platter::datasource::{
    HttpDeliveryQuoteProvider, HttpDistanceResolver, HttpExchangeRateSource,
};
use platter::ExchangeRateSource;
use platter::orchestration::PricingOrchestrator;
use platter::{init_db, Config, Repository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let port = config.port;

    // Initialize the snapshot store
    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };
    let repo = Arc::new(Repository::new(pool));

    // One shared HTTP client carries the bounded provider timeout; a timeout
    // is treated identically to a provider failure.
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_millis(config.provider_timeout_ms))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let distance = Arc::new(HttpDistanceResolver::new(
        client.clone(),
        config.geocoding_api_url.clone(),
    ));
    let courier = Arc::new(HttpDeliveryQuoteProvider::new(
        client.clone(),
        config.courier_api_url.clone(),
    ));
    let exchange: Option<Arc<dyn ExchangeRateSource>> = config
        .exchange_api_url
        .clone()
        .map(|url| Arc::new(HttpExchangeRateSource::new(client, url)) as Arc<dyn ExchangeRateSource>);

    let orchestrator = Arc::new(PricingOrchestrator::new(
        repo.clone(),
        distance,
        courier,
        exchange,
    ));

    // Create router
    let app = api::create_router(api::AppState { repo, orchestrator });

    // Bind to address
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
