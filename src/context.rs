/// Application context and dependency injection
use crate::{
    cache::HandleCache,
    config::ServerConfig,
    db,
    error::ApiResult,
    extension::ExtensionRegistry,
    resolver::HandleResolver,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub db: SqlitePool,
    pub extensions: Arc<ExtensionRegistry>,
    pub cache: Arc<HandleCache>,
    pub resolver: Arc<HandleResolver>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ApiResult<Self> {
        // Validate configuration
        config.validate()?;

        // Ensure the data directory exists
        if !config.storage.data_directory.exists() {
            tokio::fs::create_dir_all(&config.storage.data_directory).await?;
        }

        // Initialize directory database
        let db =
            db::create_pool(&config.storage.directory_db, db::DatabaseOptions::default()).await?;

        // Run migrations
        db::run_migrations(&db).await?;

        // Test connection
        db::test_connection(&db).await?;

        // Build the fixed extension allow-list
        let extensions = Arc::new(ExtensionRegistry::new(&config.directory.extensions)?);

        // Initialize handle cache and resolver
        let cache = Arc::new(HandleCache::new(config.cache.ttl()));
        let resolver = Arc::new(HandleResolver::new(db.clone(), Arc::clone(&cache)));

        Ok(Self {
            config: Arc::new(config),
            db,
            extensions,
            cache,
            resolver,
        })
    }

    /// Get service URL
    pub fn service_url(&self) -> String {
        format!(
            "http://{}:{}",
            self.config.service.hostname, self.config.service.port
        )
    }
}
