/// Govdir - government handle directory API
///
/// Serves the list of validated government accounts registered under a
/// fixed set of domain extensions, backed by a directory mirror kept
/// current by the out-of-process backfill and validate jobs.

mod api;
mod cache;
mod config;
mod context;
mod db;
mod error;
mod extension;
mod jobs;
mod metrics;
mod resolver;
mod server;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "govdir=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Print banner
    println!("{}", banner());

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context
    let ctx = AppContext::new(config).await?;
    let ctx = Arc::new(ctx);

    // Start background jobs
    let scheduler = Arc::new(jobs::JobScheduler::new(Arc::clone(&ctx)));
    scheduler.start();

    // Start server
    server::serve((*ctx).clone()).await?;

    Ok(())
}

fn banner() -> String {
    format!(
        r#"
  ____   ___  __     __ ____   ___  ____
 / ___| / _ \ \ \   / /|  _ \ |_ _||  _ \
| |  _ | | | | \ \ / / | | | | | | | |_) |
| |_| || |_| |  \ V /  | |_| | | | |  _ <
 \____| \___/    \_/   |____/ |___||_| \_\

        Government Handle Directory API v{}
        "#,
        env!("CARGO_PKG_VERSION")
    )
}
