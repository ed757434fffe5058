pub mod binance;
pub mod coingecko;
pub mod throttle;

use serde::{Deserialize, Serialize};

/// The fixed set of external market-data APIs under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Binance,
    CoinGecko,
    CryptoCompare,
    CoinCap,
    CoinPaprika,
    Coinbase,
    Kraken,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::CoinGecko => "coingecko",
            Self::CryptoCompare => "cryptocompare",
            Self::CoinCap => "coincap",
            Self::CoinPaprika => "coinpaprika",
            Self::Coinbase => "coinbase",
            Self::Kraken => "kraken",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
