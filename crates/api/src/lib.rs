pub mod content;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{middleware::from_fn, Router};

use crate::middleware::request_id::request_id;
use crate::state::AppState;

/// Every route is served both at the root and under `/api`.
pub fn app(state: AppState) -> Router {
    let routes = routes::router(state);

    Router::new()
        .nest("/api", routes.clone())
        .merge(routes)
        .layer(from_fn(request_id))
}
