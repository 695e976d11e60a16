/// API routes and handlers
pub mod handles;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new().merge(handles::routes())
}
