//! Path segments and form bodies for the public endpoints.
//!
//! Currency codes are not validated: empty or unknown symbols pass through unchanged and
//! the exchange is left to reject them.

use bon::Builder;
use serde::Serialize;

/// `BASE/QUOTE`, upper-cased.
#[must_use]
pub fn pair(base: &str, quote: &str) -> String {
    format!("{base}/{quote}").to_uppercase()
}

/// `BASE/QUOTE/QUOTE2`, upper-cased.
#[must_use]
pub fn pairs(base: &str, quote: &str, quote2: &str) -> String {
    format!("{base}/{quote}/{quote2}").to_uppercase()
}

/// `DATE/BASE/QUOTE`. The date is passed through as given, only the pair is upper-cased.
#[must_use]
pub fn dated_pair(date: &str, base: &str, quote: &str) -> String {
    format!("{date}/{}", pair(base, quote))
}

/// Body of the `convert` endpoint.
///
/// # Example
///
/// ```
/// use cexio_client_sdk::params::ConvertRequest;
///
/// let request = ConvertRequest::builder().amnt("2.5").build();
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(on(String, into))]
pub struct ConvertRequest {
    /// Amount of the base currency to convert.
    pub amnt: String,
}

/// Body of the `price_stats` endpoint.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(on(String, into))]
#[serde(rename_all = "camelCase")]
pub struct PriceStatsRequest {
    pub last_hours: String,
    pub max_resp_arr_size: String,
}
