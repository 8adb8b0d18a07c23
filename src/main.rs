use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zapshift::application::readiness::{Readiness, probe_until_ready};
use zapshift::application::service::ShippingService;
use zapshift::config::Config;
use zapshift::domain::ports::{DocumentStoreBox, PaymentProviderBox};
use zapshift::infrastructure::in_memory::InMemoryDocumentStore;
use zapshift::infrastructure::stripe::{DisabledPaymentProvider, StripePaymentProvider};
use zapshift::interfaces::http::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = open_store(&config).await?;

    let payments: PaymentProviderBox = match &config.stripe_key {
        Some(key) => Box::new(StripePaymentProvider::new(
            key.clone(),
            config.stripe_api_base.clone(),
        )),
        None => {
            warn!("STRIPE_KEY not set, checkout sessions are disabled");
            Box::new(DisabledPaymentProvider)
        }
    };

    let service = Arc::new(ShippingService::new(
        store,
        payments,
        config.checkout_settings(),
    ));

    // Data routes answer 503 until the first successful store ping.
    let readiness = Readiness::new();
    tokio::spawn(probe_until_ready(
        service.clone(),
        readiness.clone(),
        config.readiness_probe_interval(),
    ));

    let address = config.listen_addr();
    let listener = TcpListener::bind(address).await.into_diagnostic()?;
    info!(
        "Server is running on port: http://localhost:{}",
        listener.local_addr().into_diagnostic()?.port()
    );

    http::serve(listener, http::router(AppState::new(service, readiness)))
        .await
        .into_diagnostic()?;

    info!("Server stopped");
    Ok(())
}

#[cfg(feature = "storage-mongodb")]
async fn open_store(config: &Config) -> Result<DocumentStoreBox> {
    use zapshift::infrastructure::mongo::MongoDocumentStore;

    match &config.db_uri {
        Some(uri) => {
            info!(database = %config.db_name, "Using MongoDB document store");
            let store = MongoDocumentStore::connect(uri, &config.db_name)
                .await
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        None => {
            info!("DB_URI not set, using in-memory document store");
            Ok(Box::new(InMemoryDocumentStore::new()))
        }
    }
}

#[cfg(not(feature = "storage-mongodb"))]
async fn open_store(config: &Config) -> Result<DocumentStoreBox> {
    if config.db_uri.is_some() {
        warn!(
            "Persistent storage requested via --db-uri, but 'storage-mongodb' feature is not enabled. Falling back to in-memory storage."
        );
    } else {
        info!("DB_URI not set, using in-memory document store");
    }
    Ok(Box::new(InMemoryDocumentStore::new()))
}
