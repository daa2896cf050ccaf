//! Guarded JSON body reading for endpoints that parse bodies by hand.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};
use vlab_core::error::CoreError;

use crate::error::AppError;

/// Largest accepted request body: 5 MiB.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Read the request body as a JSON object.
///
/// Checks run in order and stop at the first failure:
/// 1. declared `Content-Length` above [`MAX_BODY_BYTES`] → 413;
/// 2. content type other than `application/json` → 400;
/// 3. actual body above [`MAX_BODY_BYTES`] → 413;
/// 4. body not valid JSON, or not an object → 400.
pub async fn read_json_object(request: Request) -> Result<Map<String, Value>, AppError> {
    let (parts, body) = request.into_parts();

    if declared_length(&parts.headers).is_some_and(|len| len > MAX_BODY_BYTES as u64) {
        return Err(too_large());
    }

    if !is_json_content_type(&parts.headers) {
        return Err(AppError::BadRequest(
            "Content-Type must be application/json".into(),
        ));
    }

    let bytes = read_limited(body).await?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::BadRequest(
            "Request body must be a JSON object".into(),
        )),
        Err(_) => Err(AppError::BadRequest(
            "Request body must be valid JSON".into(),
        )),
    }
}

async fn read_limited(body: Body) -> Result<axum::body::Bytes, AppError> {
    axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        tracing::debug!(error = %e, "Request body rejected");
        too_large()
    })
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// `application/json`, optionally with parameters such as `charset`.
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

fn too_large() -> AppError {
    AppError::Core(CoreError::PayloadTooLarge(format!(
        "Request body exceeds {MAX_BODY_BYTES} bytes"
    )))
}
