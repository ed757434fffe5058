use crate::auth::Token;
use crate::providers::Provider;

/// One request description in the probe battery.
#[derive(Debug, Clone)]
pub struct ProbeSpec {
    pub provider: Provider,
    pub endpoint: String,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl ProbeSpec {
    pub fn new(provider: Provider, endpoint: &str, url: &str) -> Self {
        Self {
            provider,
            endpoint: endpoint.to_string(),
            url: url.to_string(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// The fixed battery: seven providers, fourteen probes. Order matters only
/// for log readability; results are keyed by (provider, endpoint).
pub fn default_battery(cryptocompare_key: Option<&Token>) -> Vec<ProbeSpec> {
    let mut cryptocompare_price = ProbeSpec::new(
        Provider::CryptoCompare,
        "price",
        "https://min-api.cryptocompare.com/data/price",
    )
    .with_query("fsym", "BTC")
    .with_query("tsyms", "USD");

    let mut cryptocompare_histoday = ProbeSpec::new(
        Provider::CryptoCompare,
        "histoday",
        "https://min-api.cryptocompare.com/data/v2/histoday",
    )
    .with_query("fsym", "BTC")
    .with_query("tsym", "USD")
    .with_query("limit", "30");

    if let Some(key) = cryptocompare_key {
        let header = format!("Apikey {}", key.as_str());
        cryptocompare_price = cryptocompare_price.with_header("authorization", &header);
        cryptocompare_histoday = cryptocompare_histoday.with_header("authorization", &header);
    }

    vec![
        ProbeSpec::new(
            Provider::Binance,
            "ticker-price",
            "https://api.binance.com/api/v3/ticker/price",
        )
        .with_query("symbol", "BTCUSDT"),
        ProbeSpec::new(
            Provider::Binance,
            "ticker-24hr",
            "https://api.binance.com/api/v3/ticker/24hr",
        )
        .with_query("symbol", "BTCUSDT"),
        ProbeSpec::new(
            Provider::Binance,
            "klines",
            "https://api.binance.com/api/v3/klines",
        )
        .with_query("symbol", "BTCUSDT")
        .with_query("interval", "1d")
        .with_query("limit", "30"),
        ProbeSpec::new(
            Provider::Binance,
            "depth",
            "https://api.binance.com/api/v3/depth",
        )
        .with_query("symbol", "BTCUSDT")
        .with_query("limit", "5"),
        ProbeSpec::new(
            Provider::Binance,
            "exchange-info",
            "https://api.binance.com/api/v3/exchangeInfo",
        )
        .with_query("symbol", "BTCUSDT"),
        ProbeSpec::new(
            Provider::CoinGecko,
            "global",
            "https://api.coingecko.com/api/v3/global",
        ),
        ProbeSpec::new(
            Provider::CoinGecko,
            "simple-price",
            "https://api.coingecko.com/api/v3/simple/price",
        )
        .with_query("ids", "bitcoin,ethereum")
        .with_query("vs_currencies", "usd"),
        ProbeSpec::new(
            Provider::CoinGecko,
            "coins-markets",
            "https://api.coingecko.com/api/v3/coins/markets",
        )
        .with_query("vs_currency", "usd")
        .with_query("per_page", "10")
        .with_query("page", "1"),
        cryptocompare_price,
        cryptocompare_histoday,
        ProbeSpec::new(
            Provider::CoinCap,
            "assets",
            "https://api.coincap.io/v2/assets",
        )
        .with_query("limit", "10"),
        ProbeSpec::new(
            Provider::CoinPaprika,
            "tickers",
            "https://api.coinpaprika.com/v1/tickers/btc-bitcoin",
        ),
        ProbeSpec::new(
            Provider::Coinbase,
            "spot-price",
            "https://api.coinbase.com/v2/prices/BTC-USD/spot",
        ),
        ProbeSpec::new(
            Provider::Kraken,
            "ticker",
            "https://api.kraken.com/0/public/Ticker",
        )
        .with_query("pair", "XBTUSD"),
    ]
}
