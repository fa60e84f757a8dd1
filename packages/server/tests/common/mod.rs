// Common test utilities

pub mod fixtures;
pub mod harness;

#[allow(unused_imports)]
pub use fixtures::*;
pub use harness::*;

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request, Response};
use serde_json::Value;

/// JSON POST request for `tower::ServiceExt::oneshot`
#[allow(dead_code)]
pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Collect a response body as JSON
#[allow(dead_code)]
pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");
    serde_json::from_slice(&bytes).expect("JSON body")
}
