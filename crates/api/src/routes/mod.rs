pub mod articles;
pub mod channels;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(user::router())
        .merge(channels::router(state.clone()))
        .merge(articles::router(state))
}
