use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use super::types::{parse_f64, Kline, RotationPairs, Ticker24hrDto, Ticker24hrStats, TickerPriceDto};
use crate::error::{MarketLensError, Result};

pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Documented maximum for the klines endpoint; larger requests are clamped.
const MAX_KLINES_LIMIT: u32 = 1000;

/// Exchange-style REST client. Errors from individual calls are surfaced
/// verbatim to the caller; no retries.
pub struct BinanceClient {
    client: Client,
    api_url: Url,
}

impl BinanceClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("MarketLens/0.1.0")
            .build()
            .map_err(|e| MarketLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| MarketLensError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v3/")
            .map_err(|e| MarketLensError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self { client, api_url })
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| MarketLensError::Config(format!("Invalid endpoint URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MarketLensError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn get_current_price(&self, symbol: &str) -> Result<f64> {
        validate_symbol(symbol)?;

        let url = self.endpoint_url("ticker/price")?;
        let dto: TickerPriceDto = self
            .get_json(url, &[("symbol", symbol.to_uppercase())])
            .await?;

        debug!("Current price for {}: {}", dto.symbol, dto.price);
        parse_f64("price", &dto.price)
    }

    /// Fetches OHLCV candles ordered oldest to newest.
    pub async fn get_klines(&self, symbol: &str, interval: &str, limit: u32) -> Result<Vec<Kline>> {
        validate_symbol(symbol)?;
        let limit = limit.min(MAX_KLINES_LIMIT);

        let url = self.endpoint_url("klines")?;
        let rows: Vec<Value> = self
            .get_json(
                url,
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", interval.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        rows.iter().map(Kline::from_row).collect()
    }

    pub async fn get_24hr_stats(&self, symbol: &str) -> Result<Ticker24hrStats> {
        validate_symbol(symbol)?;

        let url = self.endpoint_url("ticker/24hr")?;
        let dto: Ticker24hrDto = self
            .get_json(url, &[("symbol", symbol.to_uppercase())])
            .await?;

        dto.try_into()
    }

    /// Fetches 24hr stats for the three rotation pairs in parallel and joins
    /// them into one record. If any leg fails the whole call fails; there is
    /// no partial result.
    pub async fn get_rotation_pairs(&self) -> Result<RotationPairs> {
        info!("Fetching rotation pair stats in parallel...");

        let (btc_usdt, eth_usdt, eth_btc) = tokio::join!(
            self.get_24hr_stats("BTCUSDT"),
            self.get_24hr_stats("ETHUSDT"),
            self.get_24hr_stats("ETHBTC"),
        );

        let btc_usdt = btc_usdt?;
        let eth_usdt = eth_usdt?;
        let eth_btc = eth_btc?;

        let eth_btc_ratio = eth_btc.last_price;
        let btc_eth_price_ratio = btc_usdt.last_price / eth_usdt.last_price;

        Ok(RotationPairs {
            btc_usdt,
            eth_usdt,
            eth_btc,
            eth_btc_ratio,
            btc_eth_price_ratio,
        })
    }
}

fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(MarketLensError::Config(
            "symbol must not be empty".to_string(),
        ));
    }
    Ok(())
}
