use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct GlobalDataDto {
    pub data: GlobalMarketDto,
}

#[derive(Debug, Deserialize)]
pub struct GlobalMarketDto {
    pub active_cryptocurrencies: Option<u64>,
    #[serde(default)]
    pub total_market_cap: HashMap<String, f64>,
    #[serde(default)]
    pub market_cap_percentage: HashMap<String, f64>,
}

/// Market-cap dominance breakdown derived from the global endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct Dominance {
    pub btc_percent: f64,
    pub eth_percent: f64,
    pub others_percent: f64,
    /// None when the ETH share is zero or missing.
    pub btc_eth_ratio: Option<f64>,
    pub total_market_cap_usd: Option<f64>,
    pub active_cryptocurrencies: Option<u64>,
}

impl GlobalMarketDto {
    pub fn dominance(&self) -> Dominance {
        let btc_percent = self.market_cap_percentage.get("btc").copied().unwrap_or(0.0);
        let eth_percent = self.market_cap_percentage.get("eth").copied().unwrap_or(0.0);
        let others_percent = (100.0 - btc_percent - eth_percent).max(0.0);
        let btc_eth_ratio = (eth_percent > 0.0).then(|| btc_percent / eth_percent);

        Dominance {
            btc_percent,
            eth_percent,
            others_percent,
            btc_eth_ratio,
            total_market_cap_usd: self.total_market_cap.get("usd").copied(),
            active_cryptocurrencies: self.active_cryptocurrencies,
        }
    }
}

/// Chart payload: each entry is a [timestamp-ms, price] pair, oldest first.
#[derive(Debug, Deserialize)]
pub struct MarketChartDto {
    pub prices: Vec<(f64, f64)>,
}

/// One aggregator candle; the upstream row is positional
/// [timestamp-ms, open, high, low, close].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64, f64, f64)")]
pub struct OhlcCandle {
    pub timestamp_ms: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<(f64, f64, f64, f64, f64)> for OhlcCandle {
    fn from((timestamp_ms, open, high, low, close): (f64, f64, f64, f64, f64)) -> Self {
        Self {
            timestamp_ms,
            open,
            high,
            low,
            close,
        }
    }
}

impl OhlcCandle {
    pub fn is_green(&self) -> bool {
        self.close > self.open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinMarketDto {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub price_change_percentage_24h: Option<f64>,
}
