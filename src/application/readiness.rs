use super::service::ShippingService;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, info};

/// Process-wide readiness flag.
///
/// Starts out not ready and flips to ready once, after the document store has
/// answered a ping. It never flips back.
#[derive(Debug, Default, Clone)]
pub struct Readiness {
    ready: Arc<AtomicBool>,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// A readiness flag that is already set. Useful for tests.
    pub fn ready() -> Self {
        let readiness = Self::new();
        readiness.mark_ready();
        readiness
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }
}

/// Pings the store every `interval` until it answers, then marks the process
/// ready.
pub async fn probe_until_ready(
    service: Arc<ShippingService>,
    readiness: Readiness,
    interval: Duration,
) {
    loop {
        match service.ping().await {
            Ok(()) => {
                readiness.mark_ready();
                info!("Document store reachable, accepting traffic");
                return;
            }
            Err(e) => {
                error!(error = %e, retry_in = ?interval, "Document store not reachable");
                tokio::time::sleep(interval).await;
            }
        }
    }
}
