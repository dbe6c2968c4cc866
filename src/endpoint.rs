//! The table of supported public endpoints.
//!
//! | Endpoint | Method | Path | Body | Response |
//! |----------|--------|------|------|----------|
//! | `currency_limits` | GET | — | — | object |
//! | `ticker` | GET | `BASE/QUOTE` | — | object |
//! | `tickers` | GET | `BASE/QUOTE` | — | object |
//! | `last_price` | GET | `BASE/QUOTE` | — | object |
//! | `last_prices` | GET | `BASE/QUOTE/QUOTE2` | — | object |
//! | `convert` | POST | `BASE/QUOTE` | `amnt` | object |
//! | `price_stats` | POST | `BASE/QUOTE` | `lastHours`, `maxRespArrSize` | array |
//! | `ohlcv/hd` | GET | `DATE/BASE/QUOTE` | — | object |
//! | `order_book` | GET | `BASE/QUOTE` | — | object |
//! | `trade_history` | GET | `BASE/QUOTE` | — | array |

use reqwest::Method;

use crate::types::Shape;

/// Static description of one remote operation.
#[non_exhaustive]
#[derive(Debug)]
pub struct Descriptor {
    /// URL segment appended to the base URL. May contain `/`.
    pub name: &'static str,
    pub method: Method,
    /// Whether the call carries a form-encoded body.
    pub requires_body: bool,
    /// The top-level JSON kind the endpoint answers with.
    pub shape: Shape,
}

macro_rules! descriptor {
    ($ident:ident, $name:literal, $method:ident, $body:literal, $shape:ident) => {
        static $ident: Descriptor = Descriptor {
            name: $name,
            method: Method::$method,
            requires_body: $body,
            shape: Shape::$shape,
        };
    };
}

descriptor!(CURRENCY_LIMITS, "currency_limits", GET, false, Object);
descriptor!(TICKER, "ticker", GET, false, Object);
descriptor!(TICKERS, "tickers", GET, false, Object);
descriptor!(LAST_PRICE, "last_price", GET, false, Object);
descriptor!(LAST_PRICES, "last_prices", GET, false, Object);
descriptor!(CONVERT, "convert", POST, true, Object);
descriptor!(PRICE_STATS, "price_stats", POST, true, Array);
descriptor!(OHLCV, "ohlcv/hd", GET, false, Object);
descriptor!(ORDER_BOOK, "order_book", GET, false, Object);
descriptor!(TRADE_HISTORY, "trade_history", GET, false, Array);

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CurrencyLimits,
    Ticker,
    Tickers,
    LastPrice,
    LastPrices,
    Convert,
    PriceStats,
    Ohlcv,
    OrderBook,
    TradeHistory,
}

impl Endpoint {
    pub const ALL: [Endpoint; 10] = [
        Endpoint::CurrencyLimits,
        Endpoint::Ticker,
        Endpoint::Tickers,
        Endpoint::LastPrice,
        Endpoint::LastPrices,
        Endpoint::Convert,
        Endpoint::PriceStats,
        Endpoint::Ohlcv,
        Endpoint::OrderBook,
        Endpoint::TradeHistory,
    ];

    #[must_use]
    pub fn descriptor(self) -> &'static Descriptor {
        match self {
            Endpoint::CurrencyLimits => &CURRENCY_LIMITS,
            Endpoint::Ticker => &TICKER,
            Endpoint::Tickers => &TICKERS,
            Endpoint::LastPrice => &LAST_PRICE,
            Endpoint::LastPrices => &LAST_PRICES,
            Endpoint::Convert => &CONVERT,
            Endpoint::PriceStats => &PRICE_STATS,
            Endpoint::Ohlcv => &OHLCV,
            Endpoint::OrderBook => &ORDER_BOOK,
            Endpoint::TradeHistory => &TRADE_HISTORY,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks up an endpoint by its URL segment, e.g. `"ohlcv/hd"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Endpoint> {
        Endpoint::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_body_endpoints_use_post() {
        for endpoint in Endpoint::ALL {
            let descriptor = endpoint.descriptor();
            assert_eq!(
                descriptor.method == Method::POST,
                descriptor.requires_body,
                "{endpoint}"
            );
        }
    }

    #[test]
    fn array_endpoints_should_match_table() {
        let arrays: Vec<_> = Endpoint::ALL
            .into_iter()
            .filter(|e| e.descriptor().shape == Shape::Array)
            .collect();

        assert_eq!(arrays, vec![Endpoint::PriceStats, Endpoint::TradeHistory]);
    }

    #[test]
    fn from_name_should_round_trip_every_endpoint() {
        for endpoint in Endpoint::ALL {
            assert_eq!(Endpoint::from_name(endpoint.name()), Some(endpoint));
        }
        assert_eq!(Endpoint::from_name("ohlcv/hd"), Some(Endpoint::Ohlcv));
        assert_eq!(Endpoint::from_name("balance"), None);
    }

    #[test]
    fn display_should_use_url_segment() {
        assert_eq!(Endpoint::Ohlcv.to_string(), "ohlcv/hd");
        assert_eq!(Endpoint::CurrencyLimits.to_string(), "currency_limits");
    }
}
