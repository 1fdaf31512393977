use forecast_lib;
use forecast_lib::{HistoryRange, PricePoint};
use anyhow::{anyhow, Context};
use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

static YAHOO_CHART_HOST : &str = "query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart : Chart
}

#[derive(Debug, Deserialize)]
struct Chart {
    result : Option<Vec<ChartResult>>,
    error : Option<ChartError>
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code : String,
    description : String
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp : Vec<i64>,
    indicators : Indicators
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote : Vec<Quote>
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close : Vec<Option<f64>>
}

pub struct YahooMarketDataService {
    host : String,
    client : reqwest::blocking::Client
}

impl YahooMarketDataService {
    pub fn create() -> anyhow::Result<YahooMarketDataService> {
        YahooMarketDataService::create_with_host(YAHOO_CHART_HOST)
    }

    pub fn create_with_host(host : &str) -> anyhow::Result<YahooMarketDataService> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(YahooMarketDataService { host : String::from(host), client })
    }

    fn http_get_text(&self, symbol : &str, range : HistoryRange) -> anyhow::Result<String> {
        let mut url = url::Url::parse(&format!("https://{}/v8/finance/chart/", self.host))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Invalid chart URL for host '{}'", self.host))?
            .pop_if_empty()
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", range.as_query_param())
            .append_pair("interval", "1d");

        debug!("GET {}", url);
        let response = self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .context("Failed to send HTTP GET")?;

        if response.status() != http::StatusCode::OK {
            return Err(anyhow!("Erroneous HTTP status returned for '{}': {}", symbol, response.status()));
        }

        Ok(response.text()?)
    }
}

pub fn parse_chart_response(response_body : &str) -> anyhow::Result<Vec<PricePoint>> {
    let response : ChartResponse = serde_json::from_str(response_body).context("Failed to parse chart response")?;
    if let Some(error) = response.chart.error {
        return Err(anyhow!("Chart request failed: {} ({})", error.description, error.code));
    }

    let result = response.chart.result
        .as_ref()
        .and_then(|r| r.first())
        .ok_or(anyhow!("No chart data found in response"))?;
    let quote = result.indicators.quote.first().ok_or(anyhow!("No quotes found in response"))?;

    let mut points = Vec::new();
    for (i, &timestamp) in result.timestamp.iter().enumerate() {
        let close = match quote.close.get(i).copied().flatten() {
            Some(close) => close,
            None => continue
        };
        let date = DateTime::from_timestamp(timestamp, 0)
            .ok_or(anyhow!("Invalid timestamp {} in chart response", timestamp))?
            .date_naive();
        points.push(PricePoint { date, close : close as f32 });
    }

    Ok(points)
}

impl forecast_lib::MarketDataService for YahooMarketDataService {
    fn get_daily_closes(&mut self, symbol : &str, range : HistoryRange) -> anyhow::Result<Vec<PricePoint>> {
        let response_body = self.http_get_text(symbol, range)
            .with_context(|| format!("Failed to download {} history of '{}' from {}", range, symbol, self.host))?;

        parse_chart_response(&response_body)
    }
}
