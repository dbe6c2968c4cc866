//! Client for the CEX.IO public REST API.
//!
//! # Example
//!
//! ```no_run
//! use cexio_client_sdk::client::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::default();
//!
//! let ticker = client.ticker("btc", "usd").await?;
//! println!("bid: {:?}, ask: {:?}", ticker.get("bid"), ticker.get("ask"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use bon::Builder;
use reqwest::{
    Client as ReqwestClient, Method, Request,
    header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::Result;
use crate::auth::Credentials;
use crate::debug::{DebugSink, TracingSink};
use crate::endpoint::Endpoint;
use crate::error::{Error, Stage};
use crate::params::{self, ConvertRequest, PriceStatsRequest};
use crate::types::{self, Object, Shape};

/// The production API base URL.
pub const DEFAULT_HOST: &str = "https://cex.io/api/";

const DEFAULT_USER_AGENT: &str = "cexio_client_sdk";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Placeholder body type for calls without a form body.
const NO_BODY: Option<&()> = None;

/// Configuration for [`Client`]
#[derive(Clone, Debug, Default, Builder)]
pub struct Config {
    /// Whether every HTTP exchange is handed to the client's [`DebugSink`].
    #[builder(default)]
    debug: bool,
    /// Override for the `User-Agent` header. Defaults to `cexio_client_sdk`.
    #[builder(into)]
    user_agent: Option<String>,
}

/// HTTP client for the CEX.IO public API.
///
/// Cloning is cheap: clones share the connection pool and configuration.
#[derive(Clone, Debug)]
pub struct Client {
    config: Config,
    /// Base URL, always ending in `/`.
    host: Url,
    /// Sent with every request; stamped onto the [`Request`] so debug traces see them.
    headers: HeaderMap,
    client: ReqwestClient,
    credentials: Option<Credentials>,
    debug_sink: Arc<dyn DebugSink>,
}

impl Default for Client {
    fn default() -> Self {
        Client::new(DEFAULT_HOST, Config::default())
            .expect("Client with default endpoint should succeed")
    }
}

impl Client {
    /// Creates a new client against `host`. A trailing `/` is appended when missing so that
    /// endpoint names are resolved below the host's path.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be created.
    pub fn new(host: &str, config: Config) -> Result<Client> {
        let mut host = Url::parse(host)?;
        if host.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        if !host.path().ends_with('/') {
            let path = format!("{}/", host.path());
            host.set_path(&path);
        }

        let user_agent =
            HeaderValue::from_str(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
                .map_err(|e| Error::transport("client", Stage::Build, e))?;

        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", user_agent);
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert("Connection", HeaderValue::from_static("keep-alive"));
        let client = ReqwestClient::builder().build()?;

        Ok(Self {
            config,
            host,
            headers,
            client,
            credentials: None,
            debug_sink: Arc::new(TracingSink),
        })
    }

    /// Attaches account credentials. They are stored only; no public endpoint uses them.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replaces the default [`TracingSink`]. Only consulted when `debug` is enabled.
    #[must_use]
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.debug_sink = sink;
        self
    }

    /// Returns the base URL of the API.
    #[must_use]
    pub fn host(&self) -> &Url {
        &self.host
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.config.debug
    }

    /// Builds the request for one call without sending it.
    ///
    /// The URL is `host + endpoint`, followed by `/path_param` when `path_param` is not
    /// empty. Both are appended one `/`-separated segment at a time, so reserved characters
    /// such as `#` or `?` inside a symbol are percent-encoded rather than ending the path.
    /// `POST` requests get `body` form-encoded along with matching `Content-Type` and
    /// `Content-Length` headers; `body` is ignored for every other method.
    pub(crate) fn prepare<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        path_param: &str,
        body: Option<&B>,
    ) -> Result<Request> {
        let mut url = self.host.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                Error::transport(
                    endpoint,
                    Stage::Build,
                    url::ParseError::RelativeUrlWithCannotBeABaseBase,
                )
            })?;
            segments.pop_if_empty().extend(endpoint.split('/'));
            if !path_param.is_empty() {
                segments.extend(path_param.split('/'));
            }
        }

        let mut builder = self.client.request(method.clone(), url);

        if method == Method::POST {
            let encoded = match body {
                Some(body) => serde_html_form::to_string(body)
                    .map_err(|e| Error::transport(endpoint, Stage::Build, e))?,
                None => String::new(),
            };

            builder = builder
                .header(CONTENT_TYPE, FORM_URLENCODED)
                .header(CONTENT_LENGTH, encoded.len())
                .body(encoded);
        }

        let mut request = builder
            .build()
            .map_err(|e| Error::transport(endpoint, Stage::Build, e))?;

        let headers = request.headers_mut();
        for (name, value) in &self.headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        Ok(request)
    }

    /// Performs one call and returns the decoded JSON value.
    ///
    /// The call fails with
    /// - [`crate::error::Kind::Transport`] if the request cannot be built or sent, or the
    ///   body is not JSON,
    /// - [`crate::error::Kind::Status`] for any status other than `200 OK`,
    /// - [`crate::error::Kind::Api`] if the body is a JSON object with an `error` key.
    ///
    /// No shape checking is done beyond that; see [`types::into_object`] and
    /// [`types::into_array`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::collections::HashMap;
    ///
    /// use cexio_client_sdk::client::Client;
    /// use cexio_client_sdk::error::Method;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = Client::default();
    /// let body = HashMap::from([("amnt", "2")]);
    ///
    /// let value = client
    ///     .call("convert", Method::POST, "BTC/USD", Some(&body))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        path_param: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let request = self.prepare(endpoint, method, path_param, body)?;
        let sink = self.config.debug.then_some(self.debug_sink.as_ref());

        crate::request(&self.client, endpoint, request, sink).await
    }

    /// Performs a call to one of the known [`Endpoint`]s, taking name and method from its
    /// descriptor.
    ///
    /// `body` is only sent for endpoints that take one. Unlike [`Client::call`], the decoded
    /// value must have the descriptor's [`types::Shape`], otherwise the call fails with
    /// [`crate::error::Kind::Shape`].
    pub async fn call_endpoint<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        path_param: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        let descriptor = endpoint.descriptor();
        let body = if descriptor.requires_body { body } else { None };

        let value = self
            .call(descriptor.name, descriptor.method.clone(), path_param, body)
            .await?;

        let found = Shape::of(&value);
        if found != descriptor.shape {
            return Err(Error::unexpected_shape(
                descriptor.name,
                descriptor.shape,
                found,
            ));
        }

        Ok(value)
    }

    async fn object<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        path_param: &str,
        body: Option<&B>,
    ) -> Result<Object> {
        let value = self.call_endpoint(endpoint, path_param, body).await?;
        types::into_object(endpoint.name(), value)
    }

    async fn array<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint,
        path_param: &str,
        body: Option<&B>,
    ) -> Result<Vec<Value>> {
        let value = self.call_endpoint(endpoint, path_param, body).await?;
        types::into_array(endpoint.name(), value)
    }

    /// Minimum and maximum order sizes for every trading pair.
    pub async fn currency_limits(&self) -> Result<Object> {
        self.object(Endpoint::CurrencyLimits, "", NO_BODY).await
    }

    pub async fn ticker(&self, base: &str, quote: &str) -> Result<Object> {
        self.object(Endpoint::Ticker, &params::pair(base, quote), NO_BODY)
            .await
    }

    pub async fn tickers(&self, base: &str, quote: &str) -> Result<Object> {
        self.object(Endpoint::Tickers, &params::pair(base, quote), NO_BODY)
            .await
    }

    pub async fn last_price(&self, base: &str, quote: &str) -> Result<Object> {
        self.object(Endpoint::LastPrice, &params::pair(base, quote), NO_BODY)
            .await
    }

    pub async fn last_prices(&self, base: &str, quote: &str, quote2: &str) -> Result<Object> {
        self.object(
            Endpoint::LastPrices,
            &params::pairs(base, quote, quote2),
            NO_BODY,
        )
        .await
    }

    /// Converts `amount` of `base` into `quote` at the current rate.
    pub async fn convert(&self, base: &str, quote: &str, amount: &str) -> Result<Object> {
        let body = ConvertRequest::builder().amnt(amount).build();
        self.object(Endpoint::Convert, &params::pair(base, quote), Some(&body))
            .await
    }

    /// Price chart points for the last `last_hours` hours, at most `max_resp_arr_size` of
    /// them.
    pub async fn price_stats(
        &self,
        base: &str,
        quote: &str,
        last_hours: &str,
        max_resp_arr_size: &str,
    ) -> Result<Vec<Value>> {
        let body = PriceStatsRequest::builder()
            .last_hours(last_hours)
            .max_resp_arr_size(max_resp_arr_size)
            .build();
        self.array(Endpoint::PriceStats, &params::pair(base, quote), Some(&body))
            .await
    }

    /// Historical OHLCV data for one day, with `date` formatted as `YYYYMMDD`.
    pub async fn ohlcv(&self, base: &str, quote: &str, date: &str) -> Result<Object> {
        self.object(
            Endpoint::Ohlcv,
            &params::dated_pair(date, base, quote),
            NO_BODY,
        )
        .await
    }

    pub async fn order_book(&self, base: &str, quote: &str) -> Result<Object> {
        self.object(Endpoint::OrderBook, &params::pair(base, quote), NO_BODY)
            .await
    }

    pub async fn trade_history(&self, base: &str, quote: &str) -> Result<Vec<Value>> {
        self.array(Endpoint::TradeHistory, &params::pair(base, quote), NO_BODY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use reqwest::header::{ACCEPT, CONNECTION, USER_AGENT};

    use super::*;

    fn client() -> Client {
        Client::new("https://cex.io/api", Config::default()).unwrap()
    }

    fn body(request: &Request) -> Option<&[u8]> {
        request.body().and_then(reqwest::Body::as_bytes)
    }

    #[test]
    fn new_should_append_trailing_slash() {
        assert_eq!(client().host().as_str(), "https://cex.io/api/");
        assert_eq!(Client::default().host().as_str(), DEFAULT_HOST);
    }

    #[test]
    fn invalid_host_should_fail() {
        let err = Client::new("not a valid url", Config::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::Transport);
    }

    #[test]
    fn get_should_not_carry_body_or_content_type() {
        let form = BTreeMap::from([("amnt", "2")]);
        let request = client()
            .prepare("ticker", Method::GET, "BTC/USD", Some(&form))
            .unwrap();

        assert_eq!(request.url().as_str(), "https://cex.io/api/ticker/BTC/USD");
        assert!(request.headers().get(CONTENT_TYPE).is_none());
        assert!(request.headers().get(CONTENT_LENGTH).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn reserved_characters_should_stay_in_path() {
        let client = client();

        let fragment = client
            .prepare("ticker", Method::GET, "BTC#/USD", NO_BODY)
            .unwrap();
        assert_eq!(
            fragment.url().as_str(),
            "https://cex.io/api/ticker/BTC%23/USD"
        );
        assert!(fragment.url().fragment().is_none());

        let query = client
            .prepare("ticker", Method::GET, "BTC?X/USD", NO_BODY)
            .unwrap();
        assert_eq!(query.url().as_str(), "https://cex.io/api/ticker/BTC%3FX/USD");
        assert!(query.url().query().is_none());
    }

    #[test]
    fn nested_endpoint_name_should_keep_separator() {
        let request = client()
            .prepare("ohlcv/hd", Method::GET, "20240115/BTC/USD", NO_BODY)
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "https://cex.io/api/ohlcv/hd/20240115/BTC/USD"
        );
    }

    #[test]
    fn empty_symbols_should_pass_through() {
        let request = client()
            .prepare("ticker", Method::GET, &params::pair("", "usd"), NO_BODY)
            .unwrap();

        assert_eq!(request.url().as_str(), "https://cex.io/api/ticker//USD");
    }

    #[test]
    fn prepared_request_should_carry_default_headers() {
        let client = Client::new(
            DEFAULT_HOST,
            Config::builder().user_agent("desk-bot/1.0").build(),
        )
        .unwrap();
        let request = client
            .prepare("ticker", Method::GET, "BTC/USD", NO_BODY)
            .unwrap();

        assert_eq!(request.headers().get(USER_AGENT).unwrap(), "desk-bot/1.0");
        assert_eq!(request.headers().get(ACCEPT).unwrap(), "*/*");
        assert_eq!(request.headers().get(CONNECTION).unwrap(), "keep-alive");
        assert!(request.headers().get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn cannot_be_a_base_host_should_fail() {
        let err = Client::new("mailto:desk@cex.io", Config::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::Transport);
    }

    #[test]
    fn empty_path_param_should_not_add_separator() {
        let request = client()
            .prepare("currency_limits", Method::GET, "", NO_BODY)
            .unwrap();

        assert_eq!(request.url().as_str(), "https://cex.io/api/currency_limits");
    }

    #[test]
    fn post_should_form_encode_body_with_exact_length() {
        let form = PriceStatsRequest::builder()
            .last_hours("24")
            .max_resp_arr_size("100")
            .build();
        let request = client()
            .prepare("price_stats", Method::POST, "BTC/USD", Some(&form))
            .unwrap();

        let encoded = body(&request).unwrap();
        assert_eq!(encoded, b"lastHours=24&maxRespArrSize=100");
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            FORM_URLENCODED
        );
        assert_eq!(
            request.headers().get(CONTENT_LENGTH).unwrap(),
            encoded.len().to_string().as_str()
        );
    }

    #[test]
    fn post_without_body_should_still_set_headers() {
        let request = client()
            .prepare("convert", Method::POST, "BTC/USD", NO_BODY)
            .unwrap();

        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            FORM_URLENCODED
        );
        assert_eq!(request.headers().get(CONTENT_LENGTH).unwrap(), "0");
        assert_eq!(body(&request).unwrap(), b"");
    }

    #[test]
    fn config_builder_should_default_to_quiet() {
        let config = Config::builder().build();
        assert!(!config.debug);

        let client = Client::new(DEFAULT_HOST, Config::builder().debug(true).build()).unwrap();
        assert!(client.is_debug());
        assert!(client.credentials().is_none());
    }

    #[test]
    fn with_credentials_should_store_them() {
        let client = client().with_credentials(Credentials::new(
            "up123".to_owned(),
            "key".to_owned(),
            "secret".to_owned(),
        ));

        assert_eq!(client.credentials().unwrap().username(), "up123");
    }
}
