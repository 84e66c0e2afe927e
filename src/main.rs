use anyhow::Result;
use logistics::config::AppConfig;
use logistics::places::GooglePlacesClient;
use logistics::server::ServerBuilder;
use logistics::storage::{Repositories, ensure_indexes};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;

    let repositories = match config.storage.mongo_uri.as_deref() {
        Some(uri) => {
            let client = mongodb::Client::with_uri_str(uri).await?;
            let database = client.database(&config.storage.database);
            ensure_indexes(&database).await?;
            tracing::info!(database = %config.storage.database, "using mongodb storage");
            Repositories::mongodb(database)
        }
        None => {
            tracing::warn!("MONGO_URI not set, records are kept in memory and lost on exit");
            Repositories::in_memory()
        }
    };

    let mut builder = ServerBuilder::new().with_repositories(repositories);
    match config.places.api_key.as_deref() {
        Some(key) => {
            builder = builder.with_place_lookup(GooglePlacesClient::with_base_url(
                key,
                config.places.base_url.as_str(),
            ));
        }
        None => tracing::warn!("GOOGLE_PLACES_API_KEY not set, location creation will fail"),
    }

    builder.with_config(config).serve().await
}
