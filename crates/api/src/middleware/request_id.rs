use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use nanoid::nanoid;
use tracing::{info_span, Instrument};

use crate::state::RequestId;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

impl RequestId {
    pub fn generate() -> Self {
        Self(format!("req_{}", nanoid!(16)))
    }
}

/// Tags each request with a fresh id. Handlers read it as an extension, every
/// log line emitted while serving the request lands in a `request` span
/// carrying it, and the response echoes it back in `x-request-id`.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = RequestId::generate();
    let span = info_span!(
        "request",
        request_id = %id.0,
        method = %req.method(),
        path = %req.uri().path(),
    );
    req.extensions_mut().insert(id.clone());

    let mut resp = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id.0) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Extension, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_request_id_header_matches_extension() {
        let app = Router::new()
            .route(
                "/echo",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(request_id));

        let response = app
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();

        assert!(header.starts_with("req_"));
        assert_eq!(header.len(), "req_".len() + 16);
        assert_eq!(body, header.as_bytes());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();

        assert_ne!(a.0, b.0);
        assert!(HeaderValue::from_str(&a.0).is_ok());
    }
}
