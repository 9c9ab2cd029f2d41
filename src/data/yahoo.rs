//! Yahoo Finance data fetcher
//!
//! Fetches option chains, spot quotes, daily price history and the VIX level
//! through Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::blocking::Request;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::provider::MarketDataProvider;
use crate::core::{HistoricalExtremes, LevelsError, LevelsResult, OptionChain, RawQuote};

/// Symbol of the CBOE volatility index
pub const VOLATILITY_INDEX_SYMBOL: &str = "^VIX";

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: Url,
    chart_url: Url,
}

impl YahooClient {
    pub fn new() -> LevelsResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| LevelsError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: parse_url("https://query1.finance.yahoo.com/v7/finance")?,
            chart_url: parse_url("https://query1.finance.yahoo.com/v8/finance/chart")?,
        })
    }

    /// Build a GET request for `base/segments...`; segments and query values are percent-encoded
    fn request(&self, base: &Url, segments: &[&str], query: &[(&str, String)]) -> LevelsResult<Request> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| LevelsError::config(format!("{} cannot take path segments", base)))?
            .extend(segments);

        self.client
            .get(url)
            .query(query)
            .build()
            .map_err(|e| LevelsError::network(format!("Failed to build request: {}", e)))
    }

    fn get_json<T: DeserializeOwned>(&self, request: Request, what: &str) -> LevelsResult<T> {
        tracing::debug!("GET {}", request.url());
        self.client
            .execute(request)
            .and_then(|r| r.error_for_status())
            .map_err(|e| LevelsError::network(e.to_string()))?
            .json()
            .map_err(|e| LevelsError::data(format!("Failed to parse {}: {}", what, e)))
    }

    fn quote_request(&self, symbol: &str) -> LevelsResult<Request> {
        self.request(&self.base_url, &["quote"], &[("symbols", symbol.to_string())])
    }

    fn options_request(&self, symbol: &str, expiry_ts: Option<i64>) -> LevelsResult<Request> {
        let query: Vec<(&str, String)> = expiry_ts.map(|ts| ("date", ts.to_string())).into_iter().collect();
        self.request(&self.base_url, &["options", symbol], &query)
    }

    fn chart_request(&self, symbol: &str, window_days: u32) -> LevelsResult<Request> {
        self.request(
            &self.chart_url,
            &[symbol],
            &[
                ("range", format!("{}d", window_days.max(1))),
                ("interval", "1d".to_string()),
            ],
        )
    }

    /// Get current quote for a symbol
    pub fn get_quote(&self, symbol: &str) -> LevelsResult<SpotQuote> {
        let response: YahooQuoteResponse = self.get_json(self.quote_request(symbol)?, "quote")?;

        let result = response
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| LevelsError::data(format!("No quote data returned for {}", symbol)))?;

        Ok(SpotQuote {
            symbol: symbol.to_string(),
            price: result.regular_market_price,
            bid: result.bid,
            ask: result.ask,
            timestamp: Utc::now(),
        })
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> LevelsResult<Vec<NaiveDate>> {
        let response: YahooOptionsResponse = self.get_json(self.options_request(symbol, None)?, "options")?;

        let chain = response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| LevelsError::data(format!("No options data returned for {}", symbol)))?;

        let expiries: Vec<NaiveDate> = chain
            .expiration_dates
            .iter()
            .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
            .collect();

        Ok(expiries)
    }

    /// Get option chain for a specific expiration
    pub fn get_option_chain(&self, symbol: &str, expiry: NaiveDate) -> LevelsResult<OptionChain> {
        // Yahoo keys expirations by midnight UTC
        let expiry_ts = expiry
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .ok_or_else(|| LevelsError::data(format!("Invalid expiry {}", expiry)))?;

        let response: YahooOptionsResponse =
            self.get_json(self.options_request(symbol, Some(expiry_ts))?, "options")?;

        let chain_data = response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| LevelsError::data(format!("No options data returned for {}", symbol)))?;

        let mut chain = OptionChain::new(symbol, expiry);

        if let Some(options) = chain_data.options.first() {
            chain.calls = options.calls.iter().filter_map(convert_option_quote).collect();
            chain.puts = options.puts.iter().filter_map(convert_option_quote).collect();
        }

        tracing::info!(
            "Fetched {} chain for {}: {} calls, {} puts",
            symbol,
            expiry,
            chain.calls.len(),
            chain.puts.len()
        );

        Ok(chain)
    }

    /// Daily highs and lows over the last `window_days` calendar days
    pub fn get_history(&self, symbol: &str, window_days: u32) -> LevelsResult<HistoricalExtremes> {
        let response: YahooChartResponse = self.get_json(self.chart_request(symbol, window_days)?, "chart")?;

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| LevelsError::data(format!("No price history returned for {}", symbol)))?;

        let bars = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| LevelsError::data(format!("No price bars returned for {}", symbol)))?;

        HistoricalExtremes::from_series(&bars.high, &bars.low)
            .ok_or_else(|| LevelsError::data(format!("Empty price history for {}", symbol)))
    }
}

impl MarketDataProvider for YahooClient {
    fn expirations(&self, ticker: &str) -> LevelsResult<Vec<NaiveDate>> {
        self.get_expirations(ticker)
    }

    fn option_chain_for(&self, ticker: &str, expiry: NaiveDate) -> LevelsResult<OptionChain> {
        self.get_option_chain(ticker, expiry)
    }

    fn spot_price(&self, ticker: &str) -> LevelsResult<f64> {
        self.get_quote(ticker).map(|q| q.price)
    }

    fn historical_extremes(&self, ticker: &str, window_days: u32) -> LevelsResult<HistoricalExtremes> {
        self.get_history(ticker, window_days)
    }

    fn volatility_index(&self) -> LevelsResult<f64> {
        self.get_quote(VOLATILITY_INDEX_SYMBOL).map(|q| q.price)
    }
}

fn parse_url(url: &str) -> LevelsResult<Url> {
    Url::parse(url).map_err(|e| LevelsError::config(format!("Invalid URL {}: {}", url, e)))
}

/// Convert Yahoo option data to a raw chain row
fn convert_option_quote(data: &YahooOptionData) -> Option<RawQuote> {
    let strike = data.strike?;

    Some(RawQuote {
        contract_symbol: data.contract_symbol.clone(),
        strike,
        open_interest: data.open_interest.unwrap_or(0).max(0) as u64,
        volume: data.volume.unwrap_or(0).max(0) as u64,
        implied_vol: data.implied_volatility.unwrap_or(0.0),
        last_price: data.last_price,
    })
}

/// Spot price quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    pub price: f64,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: f64,
    bid: Option<f64>,
    ask: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooBars>,
}

#[derive(Debug, Deserialize)]
struct YahooBars {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_encoded() {
        let client = YahooClient::new().unwrap();

        let quote = client.quote_request("A&B C").unwrap();
        assert_eq!(quote.url().path(), "/v7/finance/quote");
        assert_eq!(quote.url().query(), Some("symbols=A%26B+C"));
        let pairs: Vec<(String, String)> = quote.url().query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("symbols".to_string(), "A&B C".to_string())]);

        let vix = client.quote_request(VOLATILITY_INDEX_SYMBOL).unwrap();
        assert_eq!(vix.url().query(), Some("symbols=%5EVIX"));

        // A symbol stays a single path segment
        let chart = client.chart_request("BRK/B C", 90).unwrap();
        assert_eq!(chart.url().path(), "/v8/finance/chart/BRK%2FB%20C");
        assert_eq!(chart.url().query(), Some("range=90d&interval=1d"));

        let options = client.options_request("A B", Some(1737676800)).unwrap();
        assert_eq!(options.url().path(), "/v7/finance/options/A%20B");
        assert_eq!(options.url().query(), Some("date=1737676800"));

        let expirations = client.options_request("SPY", None).unwrap();
        assert_eq!(expirations.url().query(), None);
    }

    #[test]
    fn test_parse_options_payload() {
        let json = r#"{
            "optionChain": {
                "result": [{
                    "expirationDates": [1737072000, 1737676800],
                    "quote": {"regularMarketPrice": 450.1},
                    "options": [{
                        "calls": [
                            {"contractSymbol": "SPY250117C00460000", "strike": 460.0, "lastPrice": 2.1,
                             "volume": 1200, "openInterest": 8000, "impliedVolatility": 0.18},
                            {"strike": 470.0, "impliedVolatility": 0.17},
                            {"contractSymbol": "broken"}
                        ],
                        "puts": [
                            {"strike": 440.0, "volume": -3, "openInterest": 2500, "impliedVolatility": 0.22}
                        ]
                    }]
                }]
            }
        }"#;

        let response: YahooOptionsResponse = serde_json::from_str(json).unwrap();
        let data = &response.option_chain.result[0];
        assert_eq!(data.expiration_dates.len(), 2);

        let calls: Vec<RawQuote> = data.options[0].calls.iter().filter_map(convert_option_quote).collect();
        let puts: Vec<RawQuote> = data.options[0].puts.iter().filter_map(convert_option_quote).collect();

        // Row without strike is dropped, missing counts become zero
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].open_interest, 8000);
        assert_eq!(calls[0].last_price, Some(2.1));
        assert_eq!(calls[1].volume, 0);
        assert_eq!(calls[1].open_interest, 0);
        assert_eq!(puts[0].volume, 0);
        assert_eq!(puts[0].open_interest, 2500);
    }

    #[test]
    fn test_parse_chart_payload() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"regularMarketPrice": 101.0},
                    "timestamp": [1, 2, 3],
                    "indicators": {"quote": [{
                        "high": [102.0, null, 104.5],
                        "low": [99.0, 97.5, null],
                        "close": [100.0, 98.0, 104.0]
                    }]}
                }],
                "error": null
            }
        }"#;

        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        let bars = &response.chart.result.unwrap()[0].indicators.quote[0];
        let ext = HistoricalExtremes::from_series(&bars.high, &bars.low).unwrap();
        assert_eq!(ext.high, 104.5);
        assert_eq!(ext.low, 97.5);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_quote() {
        let client = YahooClient::new().unwrap();
        let quote = client.get_quote("SPY").unwrap();

        assert!(quote.price > 0.0);
        println!("SPY price: {}", quote.price);
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_option_chain() {
        let client = YahooClient::new().unwrap();
        let chain = client.option_chain("SPY").unwrap();

        println!(
            "Chain for {}: {} calls, {} puts",
            chain.expiry,
            chain.calls.len(),
            chain.puts.len()
        );

        assert!(!chain.calls.is_empty());
        assert!(!chain.puts.is_empty());
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_history() {
        let client = YahooClient::new().unwrap();
        let ext = client.get_history("SPY", 30).unwrap();
        assert!(ext.high >= ext.low);
    }
}
