/// Background task implementations
use crate::{context::AppContext, error::ApiResult, metrics};

/// Evict expired handle cache entries, returning the eviction count
pub fn sweep_handle_cache(ctx: &AppContext) -> usize {
    let evicted = ctx.cache.sweep();
    metrics::CACHE_SWEEP_EVICTIONS_TOTAL.inc_by(evicted as u64);
    evicted
}

/// Health check - verify the directory store is reachable
pub async fn health_check(ctx: &AppContext) -> ApiResult<()> {
    sqlx::query("SELECT 1").fetch_one(&ctx.db).await?;

    Ok(())
}
