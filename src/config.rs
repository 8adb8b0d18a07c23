use crate::domain::payment::CheckoutSettings;
use crate::infrastructure::stripe::DEFAULT_API_BASE;
use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Server configuration, read from flags or the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Parcel, coverage and checkout backend", long_about = None)]
pub struct Config {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// MongoDB connection string. Without it, documents are kept in memory.
    #[arg(long, env = "DB_URI")]
    pub db_uri: Option<String>,

    /// Database holding the parcels, warehouses and books collections.
    #[arg(long, env = "DB_NAME", default_value = "zap_shift_db")]
    pub db_name: String,

    /// Stripe secret key. Without it, checkout requests fail.
    #[arg(long, env = "STRIPE_KEY", hide_env_values = true)]
    pub stripe_key: Option<String>,

    /// Base URL of the Stripe API.
    #[arg(long, env = "STRIPE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub stripe_api_base: String,

    /// Client application base URL used for checkout redirects.
    #[arg(long, env = "CLIENT_URL", default_value = "http://localhost:5173")]
    pub client_url: String,

    /// ISO currency code charged at checkout.
    #[arg(long, env = "PAYMENT_CURRENCY", default_value = "usd")]
    pub currency: String,

    /// Seconds between store pings while the service is not yet ready.
    #[arg(long, env = "READINESS_PROBE_SECS", default_value_t = 5)]
    pub readiness_probe_secs: u64,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            client_url: self.client_url.clone(),
            currency: self.currency.to_lowercase(),
        }
    }

    pub fn readiness_probe_interval(&self) -> Duration {
        Duration::from_secs(self.readiness_probe_secs.max(1))
    }
}
