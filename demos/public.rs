//! Public API example calling every endpoint once.
//!
//! Run with tracing enabled:
//! ```sh
//! RUST_LOG=info,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example public
//! ```
//!
//! Set `CEXIO_DEBUG=1` to log every request/response pair at debug level, and optionally log
//! to a file:
//! ```sh
//! CEXIO_DEBUG=1 LOG_FILE=public.log RUST_LOG=debug,hyper_util=off,hyper=off,reqwest=off,h2=off,rustls=off cargo run --example public
//! ```

use std::fs::File;

use cexio_client_sdk::client::{Client, Config, DEFAULT_HOST};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = File::create(path)?;
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    let debug = std::env::var("CEXIO_DEBUG").is_ok_and(|v| v == "1");
    let client = Client::new(DEFAULT_HOST, Config::builder().debug(debug).build())?;

    match client.currency_limits().await {
        Ok(response) => info!(endpoint = "currency_limits", keys = response.len()),
        Err(e) => debug!(endpoint = "currency_limits", error = %e),
    }

    match client.ticker("btc", "usd").await {
        Ok(response) => info!(
            endpoint = "ticker",
            bid = ?response.get("bid"),
            ask = ?response.get("ask")
        ),
        Err(e) => debug!(endpoint = "ticker", error = %e),
    }

    match client.tickers("usd", "eur").await {
        Ok(response) => info!(endpoint = "tickers", data = ?response.get("data")),
        Err(e) => debug!(endpoint = "tickers", error = %e),
    }

    match client.last_price("btc", "usd").await {
        Ok(response) => info!(endpoint = "last_price", lprice = ?response.get("lprice")),
        Err(e) => debug!(endpoint = "last_price", error = %e),
    }

    match client.last_prices("btc", "usd", "eur").await {
        Ok(response) => info!(endpoint = "last_prices", data = ?response.get("data")),
        Err(e) => debug!(endpoint = "last_prices", error = %e),
    }

    match client.convert("btc", "usd", "2").await {
        Ok(response) => info!(endpoint = "convert", amnt = ?response.get("amnt")),
        Err(e) => debug!(endpoint = "convert", error = %e),
    }

    match client.price_stats("btc", "usd", "24", "100").await {
        Ok(points) => info!(endpoint = "price_stats", count = points.len()),
        Err(e) => debug!(endpoint = "price_stats", error = %e),
    }

    match client.ohlcv("btc", "usd", "20240115").await {
        Ok(response) => info!(endpoint = "ohlcv", keys = response.len()),
        Err(e) => debug!(endpoint = "ohlcv", error = %e),
    }

    match client.order_book("btc", "usd").await {
        Ok(response) => info!(
            endpoint = "order_book",
            bids = ?response.get("bids").and_then(|b| b.as_array()).map(Vec::len),
            asks = ?response.get("asks").and_then(|a| a.as_array()).map(Vec::len)
        ),
        Err(e) => debug!(endpoint = "order_book", error = %e),
    }

    match client.trade_history("btc", "usd").await {
        Ok(trades) => info!(endpoint = "trade_history", count = trades.len()),
        Err(e) => debug!(endpoint = "trade_history", error = %e),
    }

    Ok(())
}
