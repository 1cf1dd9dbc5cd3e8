//! Yahoo Finance data provider.
//!
//! Daily closes come from the v8 chart API; the size metric comes from the
//! v10 quoteSummary `summaryDetail` module (`totalAssets` for funds, with
//! `marketCap` as a fallback). Requests share one retry loop with exponential
//! backoff and one circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. CSV import and the synthetic provider are the offline fallbacks.

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider, DataSource, FetchResult, RawBar};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://query2.finance.yahoo.com";

/// v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// v10 quoteSummary response (summaryDetail module only).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryResult,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    result: Option<Vec<SummaryModules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryModules {
    summary_detail: Option<SummaryDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    total_assets: Option<RawValue>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
        let end_ts = end
            .and_hms_opt(23, 59, 59)
            .map_or(start_ts, |dt| dt.and_utc().timestamp());
        format!(
            "{BASE_URL}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    fn summary_url(symbol: &str) -> String {
        format!("{BASE_URL}/v10/finance/quoteSummary/{symbol}?modules=summaryDetail")
    }

    fn api_error(symbol: &str, err: Option<ApiError>) -> DataError {
        match err {
            Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            },
            Some(err) => {
                DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
            }
            None => DataError::ResponseFormatChanged("empty result with no error".into()),
        }
    }

    /// Parse the chart API response into RawBars.
    fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<RawBar>, DataError> {
        let ChartResult { result, error } = resp.chart;
        let data = result
            .ok_or_else(|| Self::api_error(symbol, error))?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let close = quote.close.get(i).copied().flatten();
            let adj_close = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten());

            // Holidays and halted sessions come back with no prices at all
            if close.is_none() && adj_close.is_none() {
                continue;
            }

            bars.push(RawBar {
                date,
                close: close.unwrap_or(f64::NAN),
                adj_close: adj_close.unwrap_or(f64::NAN),
            });
        }

        Ok(bars)
    }

    fn parse_summary(symbol: &str, resp: SummaryResponse) -> Result<f64, DataError> {
        let SummaryResult { result, error } = resp.quote_summary;
        let detail = result
            .ok_or_else(|| Self::api_error(symbol, error))?
            .into_iter()
            .next()
            .and_then(|m| m.summary_detail);

        let value = detail.and_then(|d| {
            d.total_assets
                .and_then(|v| v.raw)
                .or_else(|| d.market_cap.and_then(|v| v.raw))
        });

        match value {
            Some(v) if v.is_finite() && v > 0.0 => Ok(v),
            _ => Err(DataError::NoSizeMetric {
                symbol: symbol.to_string(),
            }),
        }
    }

    /// GET a JSON document with retry and circuit breaker logic.
    fn get_json<T: DeserializeOwned>(&self, symbol: &str, url: &str) -> Result<T, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                tracing::debug!(symbol, attempt, ?delay, "retrying request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                tracing::warn!(symbol, retry_after, "rate limited by Yahoo Finance");
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let parsed: T = resp.json().map_err(|e| {
                DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
            })?;
            self.circuit_breaker.record_success();
            return Ok(parsed);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let chart: ChartResponse = self.get_json(symbol, &Self::chart_url(symbol, start, end))?;
        let bars = Self::parse_chart(symbol, chart)?;
        tracing::debug!(symbol, bars = bars.len(), "fetched history");
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::YahooFinance,
        })
    }

    fn fetch_size_metric(&self, symbol: &str) -> Result<f64, DataError> {
        let summary: SummaryResponse = self.get_json(symbol, &Self::summary_url(symbol))?;
        Self::parse_summary(symbol, summary)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}
