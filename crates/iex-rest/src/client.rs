//! HTTP Client
//!
//! One `GET` helper plus typed wrappers for each documented endpoint. The
//! server decides what a body is: responses with no `content-type` are
//! empty, `application/json` bodies are parsed, and everything else (CSV,
//! plain text, image URLs) comes back verbatim.

use serde_json::Value;

use crate::error::RestError;
use crate::types::{ChartRange, DateRange, MarketList};

/// Default HTTPS origin for the IEX API.
pub const DEFAULT_ENDPOINT: &str = "https://api.iextrading.com/1.0";

// =============================================================================
// Response Body
// =============================================================================

/// A response body, classified by the `content-type` the server returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// No `content-type` header on the response.
    Empty,
    /// An `application/json` body, parsed.
    Json(Value),
    /// Any other body, verbatim.
    Text(String),
}

impl ApiBody {
    /// Parsed JSON, if this body was JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Consume into parsed JSON, if this body was JSON.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Raw text, if this body was non-JSON.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Classify a body by its `content-type`.
fn classify(content_type: Option<&str>, body: &str) -> Result<ApiBody, RestError> {
    match content_type {
        None => Ok(ApiBody::Empty),
        Some(ct) if ct.contains("application/json") => {
            Ok(ApiBody::Json(serde_json::from_str(body)?))
        }
        Some(_) => Ok(ApiBody::Text(body.to_owned())),
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

const fn display_percent_query(on: bool) -> &'static str {
    if on { "?displayPercent=true" } else { "" }
}

fn news_path(symbol: &str, last: Option<u8>) -> String {
    match last {
        Some(count) => format!("/stock/{symbol}/news/last/{count}"),
        None => format!("/stock/{symbol}/news"),
    }
}

// =============================================================================
// Client
// =============================================================================

/// Client for the request/response endpoints of the IEX API.
#[derive(Debug, Clone)]
pub struct IexClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for IexClient {
    fn default() -> Self {
        Self::new()
    }
}

impl IexClient {
    /// Client against the production endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client against a custom endpoint (e.g. a sandbox or test server).
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), endpoint)
    }

    /// Client reusing a caller-supplied `reqwest` client.
    #[must_use]
    pub fn with_http_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    /// Straight pass-through `GET` against any API path.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails at the HTTP level or the server
    /// claims a JSON body that does not parse.
    pub async fn request(&self, path: &str) -> Result<ApiBody, RestError> {
        let url = join_url(&self.endpoint, path);
        tracing::debug!(%url, "requesting");

        let response = self.http.get(&url).send().await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;

        classify(content_type.as_deref(), &body)
    }

    // =========================================================================
    // Reference Data
    // =========================================================================

    /// All symbols supported for trading.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn symbols(&self) -> Result<ApiBody, RestError> {
        self.request("/ref-data/symbols").await
    }

    // =========================================================================
    // Stocks
    // =========================================================================

    /// Quote for a stock. `display_percent` returns percentage fields
    /// multiplied by 100.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_quote(
        &self,
        symbol: &str,
        display_percent: bool,
    ) -> Result<ApiBody, RestError> {
        self.request(&format!(
            "/stock/{symbol}/quote{}",
            display_percent_query(display_percent)
        ))
        .await
    }

    /// Historical chart data over a range.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_chart(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/chart/{}", range.as_str()))
            .await
    }

    /// Official open and close.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_open_close(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/open-close")).await
    }

    /// Previous trading day adjusted data.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_previous(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/previous")).await
    }

    /// Company information.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_company(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/company")).await
    }

    /// Key stats.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_key_stats(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/stats")).await
    }

    /// Peer symbols.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_peers(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/peers")).await
    }

    /// Related symbols, as the exchange sees them.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_relevant(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/relevant")).await
    }

    /// Recent news, optionally limited to the last `n` items (1-50).
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_news(&self, symbol: &str, last: Option<u8>) -> Result<ApiBody, RestError> {
        self.request(&news_path(symbol, last)).await
    }

    /// Income statement, balance sheet, and cash flow.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_financials(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/financials")).await
    }

    /// Earnings from the four most recent quarters.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_earnings(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/earnings")).await
    }

    /// Dividend history over a range.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_dividends(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/dividends/{}", range.as_str()))
            .await
    }

    /// Split history over a range.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_splits(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/splits/{}", range.as_str()))
            .await
    }

    /// Company logo URL.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_logo(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/logo")).await
    }

    /// Latest price only.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_price(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/price")).await
    }

    /// Fifteen-minute delayed quote.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_delayed_quote(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/delayed-quote")).await
    }

    /// Effective spread by market maker.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_effective_spread(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/effective-spread"))
            .await
    }

    /// Trade volume broken down by venue.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_volume_by_venue(&self, symbol: &str) -> Result<ApiBody, RestError> {
        self.request(&format!("/stock/{symbol}/volume-by-venue"))
            .await
    }

    // =========================================================================
    // Market
    // =========================================================================

    /// Top ten for a market list grouping.
    ///
    /// # Errors
    ///
    /// See [`Self::request`].
    pub async fn stock_market_list_top_ten(
        &self,
        list: MarketList,
        display_percent: bool,
    ) -> Result<ApiBody, RestError> {
        self.request(&format!(
            "/stock/market/list/{}{}",
            list.as_str(),
            display_percent_query(display_percent)
        ))
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("https://x/1.0", "/stock/a"), "https://x/1.0/stock/a");
        assert_eq!(join_url("https://x/1.0/", "stock/a"), "https://x/1.0/stock/a");
        assert_eq!(join_url("https://x/1.0/", "/stock/a"), "https://x/1.0/stock/a");
    }

    #[test]
    fn display_percent_is_opt_in() {
        assert_eq!(display_percent_query(false), "");
        assert_eq!(display_percent_query(true), "?displayPercent=true");
    }

    #[test]
    fn news_path_with_and_without_limit() {
        assert_eq!(news_path("AAPL", None), "/stock/AAPL/news");
        assert_eq!(news_path("AAPL", Some(5)), "/stock/AAPL/news/last/5");
    }

    #[test]
    fn missing_content_type_is_empty() {
        let body = classify(None, "ignored").unwrap();
        assert_eq!(body, ApiBody::Empty);
    }

    #[test]
    fn json_content_type_parses_the_body() {
        let body = classify(
            Some("application/json; charset=utf-8"),
            r#"{"latestPrice": 187.42}"#,
        )
        .unwrap();
        assert_eq!(body.as_json().unwrap()["latestPrice"], json!(187.42));
    }

    #[test]
    fn json_content_type_with_bad_body_errors() {
        let result = classify(Some("application/json"), "{not json");
        assert!(matches!(result, Err(RestError::Json(_))));
    }

    #[test]
    fn other_content_types_pass_through() {
        let body = classify(Some("text/csv"), "a,b\n1,2").unwrap();
        assert_eq!(body.as_text().unwrap(), "a,b\n1,2");
        assert!(body.as_json().is_none());
    }

    #[test]
    fn default_endpoint_is_production() {
        let client = IexClient::new();
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
    }
}
