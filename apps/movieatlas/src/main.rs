use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movieatlas::{config::Config, router, services::TmdbClient, session::SessionStore, AppState};

fn init_tracing() {
    // Initialize tracing with env-filter
    // RUST_LOG environment variable controls log levels
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("movieatlas=debug,tower_http=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    // Initialize tracing first so we can log configuration loading
    init_tracing();

    tracing::info!("Starting MovieAtlas v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; a missing or placeholder TMDB token is fatal
    let config = match Config::load().and_then(|cfg| cfg.validate().map(|_| cfg)) {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            tracing::debug!("Server: {}:{}", cfg.server.host, cfg.server.port);
            tracing::debug!("TMDB: {:?}", cfg.tmdb);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            tracing::error!(
                "Set tmdb.access_token in config.toml or ATLAS_TMDB__ACCESS_TOKEN to your \
                 TMDB v4 API Read Access Token (https://www.themoviedb.org/settings/api)"
            );
            std::process::exit(1);
        }
    };

    // Create the TMDB client; the app is useless without it
    let tmdb = match TmdbClient::new_shared(&config.tmdb) {
        Ok(client) => {
            tracing::info!("TMDB client initialized");
            client
        }
        Err(e) => {
            tracing::error!("Failed to create TMDB client: {}", e);
            std::process::exit(1);
        }
    };

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        tmdb,
        sessions: Arc::new(SessionStore::new()),
    };

    let app = router(state);

    let addr = config.server_addr();
    tracing::info!("MovieAtlas listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
