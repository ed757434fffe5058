use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::types::{
    CoinMarketDto, Dominance, GlobalDataDto, GlobalMarketDto, MarketChartDto, OhlcCandle,
};
use crate::error::{MarketLensError, Result};
use crate::providers::throttle::IntervalThrottle;

pub const COINGECKO_API_URL: &str = "https://api.coingecko.com";

/// Published free-tier guidance works out to roughly one call every two
/// seconds; the client self-imposes that spacing per instance.
pub const MIN_CALL_SPACING: Duration = Duration::from_millis(2000);

/// Aggregator-style REST client with a per-instance cooperative throttle.
pub struct CoinGeckoClient {
    client: Client,
    api_url: Url,
    throttle: IntervalThrottle,
}

impl CoinGeckoClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(COINGECKO_API_URL, MIN_CALL_SPACING)
    }

    pub fn with_base_url(base_url: &str, min_spacing: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("MarketLens/0.1.0")
            .build()
            .map_err(|e| MarketLensError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| MarketLensError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v3/")
            .map_err(|e| MarketLensError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            throttle: IntervalThrottle::new(min_spacing),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.throttle.acquire().await;

        let url = self
            .api_url
            .join(path)
            .map_err(|e| MarketLensError::Config(format!("Invalid endpoint URL: {e}")))?;

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

    pub async fn get_global(&self) -> Result<GlobalMarketDto> {
        let dto: GlobalDataDto = self.get_json("global", &[]).await?;
        Ok(dto.data)
    }

    pub async fn get_dominance(&self) -> Result<Dominance> {
        Ok(self.get_global().await?.dominance())
    }

    /// Returns coin id -> currency -> price.
    pub async fn get_simple_price(
        &self,
        ids: &[&str],
        vs_currencies: &[&str],
    ) -> Result<HashMap<String, HashMap<String, f64>>> {
        self.get_json(
            "simple/price",
            &[
                ("ids", ids.join(",")),
                ("vs_currencies", vs_currencies.join(",")),
            ],
        )
        .await
    }

    /// Returns [timestamp-ms, price] points oldest to newest.
    pub async fn get_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<(f64, f64)>> {
        let dto: MarketChartDto = self
            .get_json(
                &format!("coins/{coin_id}/market_chart"),
                &[
                    ("vs_currency", vs_currency.to_string()),
                    ("days", days.to_string()),
                ],
            )
            .await?;

        Ok(dto.prices)
    }

    /// Returns OHLC candles oldest to newest. The upstream picks the candle
    /// granularity from the requested window.
    pub async fn get_ohlc(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<Vec<OhlcCandle>> {
        self.get_json(
            &format!("coins/{coin_id}/ohlc"),
            &[
                ("vs_currency", vs_currency.to_string()),
                ("days", days.to_string()),
            ],
        )
        .await
    }

    pub async fn get_coins_markets(
        &self,
        vs_currency: &str,
        per_page: u32,
    ) -> Result<Vec<CoinMarketDto>> {
        self.get_json(
            "coins/markets",
            &[
                ("vs_currency", vs_currency.to_string()),
                ("per_page", per_page.to_string()),
                ("page", "1".to_string()),
            ],
        )
        .await
    }
}
