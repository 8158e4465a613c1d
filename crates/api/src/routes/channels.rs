use axum::{extract::State, routing::get, Extension, Json, Router};
use bulletin_core::types::EnrichedChannel;
use tracing::info;

use crate::{
    error::{ApiResult, AppError},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/channels", get(list_channels))
        .with_state(state)
}

async fn list_channels(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<Vec<EnrichedChannel>>> {
    info!(request_id = %request_id.0, "fetching channels");

    let channels = state.channels.list().await.map_err(|source| {
        AppError::FetchFailed {
            resource: "channels",
            source,
        }
        .with_request_id(&request_id.0)
    })?;

    Ok(Json(channels))
}
