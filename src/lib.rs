#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod auth;
pub mod client;
pub mod debug;
pub mod endpoint;
pub mod error;
pub mod params;
pub mod types;

use reqwest::{Request, StatusCode};
use serde_json::Value;

use crate::debug::{DebugSink, RequestTrace, ResponseTrace};
use crate::error::{Error, Stage};

pub type Result<T> = std::result::Result<T, Error>;

/// Sends `request`, checks the status and decodes the body, surfacing an `error` field in a
/// JSON object as [`error::Kind::Api`].
#[tracing::instrument(
    level = "debug",
    skip(client, request, sink),
    fields(
        method = %request.method(),
        path = request.url().path(),
        status_code
    )
)]
async fn request(
    client: &reqwest::Client,
    endpoint: &str,
    request: Request,
    sink: Option<&dyn DebugSink>,
) -> Result<Value> {
    let method = request.method().clone();
    let path = request.url().path().to_owned();
    let request_trace = sink.map(|_| RequestTrace::from_request(&request));

    let response = client
        .execute(request)
        .await
        .map_err(|e| Error::transport(endpoint, Stage::Send, e))?;
    let status_code = response.status();

    tracing::Span::current().record("status_code", status_code.as_u16());

    if status_code != StatusCode::OK {
        if let (Some(sink), Some(request_trace)) = (sink, &request_trace) {
            let response_trace = ResponseTrace {
                status: status_code,
                headers: response.headers().clone(),
                body: None,
            };
            sink.record(endpoint, request_trace, &response_trace);
        }

        tracing::warn!(
            status = %status_code,
            method = %method,
            path = %path,
            "API request failed"
        );

        return Err(Error::status(status_code, method, path));
    }

    let headers = sink.map(|_| response.headers().clone());
    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::transport(endpoint, Stage::Send, e))?;

    if let (Some(sink), Some(request_trace), Some(headers)) = (sink, &request_trace, headers) {
        let response_trace = ResponseTrace {
            status: status_code,
            headers,
            body: Some(String::from_utf8_lossy(&bytes).into_owned()),
        };
        sink.record(endpoint, request_trace, &response_trace);
    }

    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| Error::transport(endpoint, Stage::Decode, e))?;

    if let Some(message) = api_error(&value) {
        tracing::warn!(method = %method, path = %path, message = %message, "API error");
        return Err(Error::api(endpoint, message));
    }

    Ok(value)
}

/// The exchange reports application failures as `{"error": ...}` with HTTP 200. Only objects
/// are inspected; arrays are always data.
fn api_error(value: &Value) -> Option<String> {
    match value.as_object()?.get("error")? {
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn api_error_should_read_string_message() {
        assert_eq!(
            api_error(&json!({"error": "rate limit"})),
            Some("rate limit".to_owned())
        );
    }

    #[test]
    fn api_error_should_render_non_string_message() {
        assert_eq!(
            api_error(&json!({"error": {"code": 7}})),
            Some(r#"{"code":7}"#.to_owned())
        );
    }

    #[test]
    fn api_error_should_ignore_arrays_and_clean_objects() {
        assert_eq!(api_error(&json!([{"error": "inside array"}])), None);
        assert_eq!(api_error(&json!({"bid": 50000, "ask": 50010})), None);
        assert_eq!(api_error(&json!("error")), None);
    }
}
