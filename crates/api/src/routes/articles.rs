use axum::{extract::State, routing::get, Extension, Json, Router};
use bulletin_core::types::Article;
use tracing::info;

use crate::{
    error::{ApiResult, AppError},
    state::{AppState, RequestId},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/articles", get(list_articles))
        .with_state(state)
}

async fn list_articles(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Json<Vec<Article>>> {
    info!(request_id = %request_id.0, "fetching articles");

    let articles = state.articles.fetch().await.map_err(|source| {
        AppError::FetchFailed {
            resource: "articles",
            source,
        }
        .with_request_id(&request_id.0)
    })?;

    Ok(Json(articles))
}
