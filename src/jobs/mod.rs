use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{error, info};

pub mod tasks;

/// Job scheduler for background tasks
pub struct JobScheduler {
    context: Arc<crate::context::AppContext>,
}

impl JobScheduler {
    pub fn new(context: Arc<crate::context::AppContext>) -> Self {
        Self { context }
    }

    /// Start all background jobs
    pub fn start(self: Arc<Self>) {
        info!("Starting background job scheduler");

        tokio::spawn(Self::cache_sweep_job(Arc::clone(&self)));
        tokio::spawn(Self::health_check_job(Arc::clone(&self)));

        info!("Background jobs started");
    }

    /// Physically evict expired cache entries
    ///
    /// Logical expiry in the cache itself is authoritative; this only
    /// keeps the map from accumulating dead entries.
    async fn cache_sweep_job(scheduler: Arc<Self>) {
        let mut interval = interval(scheduler.context.config.cache.sweep_interval());

        loop {
            interval.tick().await;

            let evicted = tasks::sweep_handle_cache(&scheduler.context);
            if evicted > 0 {
                info!("Cache sweep evicted {} expired entries", evicted);
            }
        }
    }

    /// Health check job (runs every 5 minutes)
    async fn health_check_job(scheduler: Arc<Self>) {
        let mut interval = interval(Duration::from_secs(300));

        loop {
            interval.tick().await;

            match tasks::health_check(&scheduler.context).await {
                Ok(_) => {
                    // Silent success - health is good
                }
                Err(e) => error!("Health check failed: {}", e),
            }
        }
    }
}
