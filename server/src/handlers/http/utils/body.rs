use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::Request;
use hyper::body::Body;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Largest request body accepted by any JSON endpoint.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Collect a request body (bounded by [`MAX_BODY_BYTES`]) and parse it as
/// JSON.
pub async fn read_json<B, T>(req: Request<B>) -> Result<T>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    T: DeserializeOwned,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| anyhow!("Failed to read request body: {}", e))?
        .to_bytes();

    debug!("Read request body, size: {} bytes", body.len());

    serde_json::from_slice(&body).context("Request body is not valid JSON")
}

/// Parse `application/x-www-form-urlencoded` query parameters into `T`.
pub fn read_query<B, T>(req: &Request<B>) -> Result<T>
where
    T: DeserializeOwned,
{
    let query = req.uri().query().unwrap_or("");
    let pairs: serde_json::Map<String, serde_json::Value> = form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), serde_json::Value::String(v.into_owned())))
        .collect();

    serde_json::from_value(serde_json::Value::Object(pairs))
        .context("Query parameters do not match the expected shape")
}
