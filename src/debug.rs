//! Request/response traces emitted when [`crate::client::Config`] has `debug` enabled.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::{Method, Request, StatusCode};
use url::Url;

/// Snapshot of an outgoing request.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RequestTrace {
    pub method: Method,
    pub url: Url,
    /// Headers as sent, including the client's `User-Agent`, `Accept` and `Connection`.
    pub headers: HeaderMap,
    /// Form body, if any.
    pub body: Option<String>,
}

impl RequestTrace {
    pub(crate) fn from_request(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned()),
        }
    }
}

/// Snapshot of an incoming response.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct ResponseTrace {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Raw body. Not read for non-200 responses.
    pub body: Option<String>,
}

/// Receives one trace per completed HTTP exchange while debug mode is on.
///
/// Implementations must not panic; the trace never influences the call result.
pub trait DebugSink: fmt::Debug + Send + Sync + 'static {
    fn record(&self, endpoint: &str, request: &RequestTrace, response: &ResponseTrace);
}

/// Default [`DebugSink`] writing to [`tracing`] at `debug` level.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn record(&self, endpoint: &str, request: &RequestTrace, response: &ResponseTrace) {
        tracing::debug!(
            endpoint,
            method = %request.method,
            url = %request.url,
            request_headers = ?request.headers,
            request_body = ?request.body,
            status = response.status.as_u16(),
            response_headers = ?response.headers,
            response_body = ?response.body,
            "debug trace"
        );
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::CONTENT_TYPE;

    use super::*;

    #[test]
    fn request_trace_should_capture_form_body() {
        let client = reqwest::Client::new();
        let request = client
            .post("https://cex.io/api/convert/BTC/USD")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("amnt=2")
            .build()
            .unwrap();

        let trace = RequestTrace::from_request(&request);

        assert_eq!(trace.method, Method::POST);
        assert_eq!(trace.url.path(), "/api/convert/BTC/USD");
        assert_eq!(trace.body.as_deref(), Some("amnt=2"));
        assert_eq!(
            trace.headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn request_trace_without_body_should_be_none() {
        let request = reqwest::Client::new()
            .get("https://cex.io/api/ticker/BTC/USD")
            .build()
            .unwrap();

        assert!(RequestTrace::from_request(&request).body.is_none());
    }
}
