use axum::{routing::get, Extension, Router};

use crate::{
    error::{ApiError, AppError},
    state::RequestId,
};

pub fn router() -> Router {
    Router::new().route("/user", get(current_user))
}

// no session handling yet, so nobody is ever signed in
async fn current_user(Extension(request_id): Extension<RequestId>) -> ApiError {
    AppError::Unauthorized.with_request_id(&request_id.0)
}
