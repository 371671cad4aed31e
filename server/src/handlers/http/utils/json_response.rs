use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use http::{HeaderValue, header};
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use tracing::{debug, error};

use promo_shared::types::ErrorResponse;

/// Response type produced by every handler.
pub type HttpResponse = Response<BoxBody<Bytes, Infallible>>;

/// Wrap bytes into the boxed body type handlers return.
pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody<Bytes, Infallible> {
    Full::new(chunk.into()).boxed()
}

/// Serialize any `Serialize` type and deliver it as a JSON response.
/// This is the primary helper all handlers should use instead of
/// writing their own one-off serialization + response-building blocks.
pub fn deliver_serialized_json<T: Serialize>(data: &T, status: StatusCode) -> Result<HttpResponse> {
    let json = serde_json::to_string(data).context("Failed to serialize response")?;

    debug!("Delivering serialized JSON response, size: {} bytes", json.len());

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CACHE_CONTROL, "no-store")
        .body(full(json))
        .map_err(|e| anyhow!("Failed to build JSON response: {}", e))
}

/// Delivers an [`ErrorResponse`] envelope with the given status.
pub fn deliver_error_json(error: &ErrorResponse, status: StatusCode) -> Result<HttpResponse> {
    debug!(
        "Delivering error JSON: {} - {} ({})",
        status.as_u16(),
        error.code,
        error.message
    );

    deliver_serialized_json(error, status)
}

/// Status code from the numeric statuses carried by the shared error enums.
pub fn status_from_u16(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Last-resort 500 used when a handler itself failed. Built without any
/// fallible step.
pub fn internal_error() -> HttpResponse {
    let body = serde_json::to_string(&ErrorResponse::new(
        "INTERNAL_ERROR",
        "An internal error occurred",
    ))
    .unwrap_or_default();

    let mut response = Response::new(full(body));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    error!("Delivered internal error response");
    response
}
