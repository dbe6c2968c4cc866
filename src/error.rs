use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

/// HTTP method type, re-exported for use with error inspection.
pub use reqwest::Method;
/// HTTP status code type, re-exported for use with error inspection.
pub use reqwest::StatusCode;

use crate::types::Shape;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Error building the request, reaching the server, or decoding its reply
    Transport,
    /// Error related to a non-200 HTTP response
    Status,
    /// HTTP 200 response whose JSON object carries an `error` field
    Api,
    /// Decoded response did not have the shape expected for the endpoint
    Shape,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn transport<S: StdError + Send + Sync + 'static>(
        endpoint: &str,
        stage: Stage,
        source: S,
    ) -> Self {
        Transport {
            endpoint: endpoint.to_owned(),
            stage,
            source: Box::new(source),
        }
        .into()
    }

    pub fn status(status_code: StatusCode, method: Method, path: String) -> Self {
        Status {
            status_code,
            method,
            path,
        }
        .into()
    }

    pub fn api<S: Into<String>>(endpoint: &str, message: S) -> Self {
        Api {
            endpoint: endpoint.to_owned(),
            message: message.into(),
        }
        .into()
    }

    #[must_use]
    pub fn unexpected_shape(endpoint: &str, expected: Shape, found: Shape) -> Self {
        UnexpectedShape {
            endpoint: endpoint.to_owned(),
            expected,
            found,
        }
        .into()
    }

    /// Returns the [`Stage`] of a [`Kind::Transport`] error.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.downcast_ref::<Transport>().map(|t| t.stage)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Where in the request/response cycle a transport failure happened.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    /// Composing the URL or encoding the form body
    Build,
    /// Sending the request or reading the response body
    Send,
    /// Parsing the response body as JSON
    Decode,
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Transport {
    pub endpoint: String,
    pub stage: Stage,
    pub source: Box<dyn StdError + Send + Sync + 'static>,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed for {}: {}",
            self.stage, self.endpoint, self.source
        )
    }
}

impl StdError for Transport {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub struct Status {
    pub status_code: StatusCode,
    pub method: Method,
    pub path: String,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP error code {} making {} call to {}",
            self.status_code.as_u16(),
            self.method,
            self.path
        )
    }
}

impl StdError for Status {}

/// Application-level failure reported by the exchange inside a successful response.
#[non_exhaustive]
#[derive(Debug)]
pub struct Api {
    pub endpoint: String,
    pub message: String,
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API error from {}: {}", self.endpoint, self.message)
    }
}

impl StdError for Api {}

#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct UnexpectedShape {
    pub endpoint: String,
    pub expected: Shape,
    pub found: Shape,
}

impl fmt::Display for UnexpectedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {} response from {}, found {}",
            self.expected, self.endpoint, self.found
        )
    }
}

impl StdError for UnexpectedShape {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::with_source(Kind::Transport, e)
    }
}

impl From<Transport> for Error {
    fn from(err: Transport) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<Status> for Error {
    fn from(err: Status) -> Self {
        Error::with_source(Kind::Status, err)
    }
}

impl From<Api> for Error {
    fn from(err: Api) -> Self {
        Error::with_source(Kind::Api, err)
    }
}

impl From<UnexpectedShape> for Error {
    fn from(err: UnexpectedShape) -> Self {
        Error::with_source(Kind::Shape, err)
    }
}
