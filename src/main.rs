use std::net::SocketAddr;
use std::sync::Arc;

use jobboard_backend::{
    config::{get_config, init_config, StoreBackend},
    database::{memory_store::MemoryStore, pg_store::PgStore, pool::create_pool, EntityStore},
    middleware::cors::cors_layer,
    routes,
    services::i18n_service::Localizer,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,sqlx=warn"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let store: Arc<dyn EntityStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = create_pool(config).await?;
            let store = PgStore::new(pool);
            store.migrate().await?;
            info!("Using PostgreSQL store");
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(
        store,
        &config.jwt_secret,
        Localizer::new(&config.default_locale),
    );

    let app = routes::app(app_state)
        .layer(cors_layer(&config.cors_origins))
        .layer(CompressionLayer::new());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
