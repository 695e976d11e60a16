/// Handle listing endpoint
///
/// `GET /api/{extension}` returns every validated handle registered
/// under the extension, e.g. `GET /api/.gov.uk`.
use crate::{
    context::AppContext,
    error::ApiResult,
    metrics,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppContext> {
    Router::new().route("/api/:extension", get(list_handles))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HandlesResponse {
    pub handles: Vec<String>,
}

pub async fn list_handles(
    State(ctx): State<AppContext>,
    Path(extension): Path<String>,
) -> ApiResult<Json<HandlesResponse>> {
    // Validate against the allow-list before touching cache or store
    let extension = match ctx.extensions.match_segment(&extension) {
        Ok(ext) => ext,
        Err(e) => {
            metrics::REQUESTS_TOTAL.with_label_values(&["rejected"]).inc();
            return Err(e);
        }
    };

    match ctx.resolver.resolve(extension).await {
        Ok(handles) => {
            metrics::REQUESTS_TOTAL.with_label_values(&["ok"]).inc();
            Ok(Json(HandlesResponse { handles }))
        }
        Err(e) => {
            metrics::REQUESTS_TOTAL.with_label_values(&["error"]).inc();
            Err(e)
        }
    }
}
