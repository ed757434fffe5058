use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{MarketLensError, Result};

#[derive(Debug, Deserialize)]
pub struct TickerPriceDto {
    pub symbol: String,
    pub price: String,
}

/// Raw 24hr ticker as returned by the exchange: numeric fields arrive as
/// strings and are parsed into `Ticker24hrStats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hrDto {
    pub symbol: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub weighted_avg_price: String,
    pub last_price: String,
    pub bid_price: String,
    pub ask_price: String,
    pub open_price: String,
    pub high_price: String,
    pub low_price: String,
    pub volume: String,
    pub quote_volume: String,
    pub open_time: u64,
    pub close_time: u64,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticker24hrStats {
    pub symbol: String,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub weighted_avg_price: f64,
    pub last_price: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub open_time: u64,
    pub close_time: u64,
    pub trade_count: u64,
}

impl TryFrom<Ticker24hrDto> for Ticker24hrStats {
    type Error = MarketLensError;

    fn try_from(dto: Ticker24hrDto) -> Result<Self> {
        Ok(Self {
            price_change: parse_f64("priceChange", &dto.price_change)?,
            price_change_percent: parse_f64("priceChangePercent", &dto.price_change_percent)?,
            weighted_avg_price: parse_f64("weightedAvgPrice", &dto.weighted_avg_price)?,
            last_price: parse_f64("lastPrice", &dto.last_price)?,
            bid_price: parse_f64("bidPrice", &dto.bid_price)?,
            ask_price: parse_f64("askPrice", &dto.ask_price)?,
            open_price: parse_f64("openPrice", &dto.open_price)?,
            high_price: parse_f64("highPrice", &dto.high_price)?,
            low_price: parse_f64("lowPrice", &dto.low_price)?,
            volume: parse_f64("volume", &dto.volume)?,
            quote_volume: parse_f64("quoteVolume", &dto.quote_volume)?,
            open_time: dto.open_time,
            close_time: dto.close_time,
            trade_count: dto.count,
            symbol: dto.symbol,
        })
    }
}

/// One OHLCV candle. The upstream API returns each candle as a positional
/// array; the first eleven columns are, in order: open time, open, high, low,
/// close, volume, close time, quote volume, trade count, taker-buy-base
/// volume, taker-buy-quote volume.
#[derive(Debug, Clone, Serialize)]
pub struct Kline {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: u64,
    pub quote_volume: f64,
    pub trade_count: u64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl Kline {
    pub fn from_row(row: &Value) -> Result<Self> {
        let fields = row
            .as_array()
            .ok_or_else(|| MarketLensError::Parse("kline row is not an array".to_string()))?;

        if fields.len() < 11 {
            return Err(MarketLensError::Parse(format!(
                "kline row has {} fields, expected at least 11",
                fields.len()
            )));
        }

        Ok(Self {
            open_time: row_u64(fields, 0)?,
            open: row_f64(fields, 1)?,
            high: row_f64(fields, 2)?,
            low: row_f64(fields, 3)?,
            close: row_f64(fields, 4)?,
            volume: row_f64(fields, 5)?,
            close_time: row_u64(fields, 6)?,
            quote_volume: row_f64(fields, 7)?,
            trade_count: row_u64(fields, 8)?,
            taker_buy_base_volume: row_f64(fields, 9)?,
            taker_buy_quote_volume: row_f64(fields, 10)?,
        })
    }

    pub fn is_green(&self) -> bool {
        self.close > self.open
    }
}

/// 24hr stats for the three rotation pairs plus derived cross-pair ratios.
#[derive(Debug, Serialize)]
pub struct RotationPairs {
    pub btc_usdt: Ticker24hrStats,
    pub eth_usdt: Ticker24hrStats,
    pub eth_btc: Ticker24hrStats,
    /// Pass-through of the ETHBTC last price, not recomputed from the
    /// USDT legs.
    pub eth_btc_ratio: f64,
    pub btc_eth_price_ratio: f64,
}

pub fn parse_f64(field: &str, raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| MarketLensError::Parse(format!("field '{field}' is not a number: '{raw}'")))
}

fn row_f64(fields: &[Value], index: usize) -> Result<f64> {
    let value = &fields[index];
    if let Some(raw) = value.as_str() {
        return parse_f64(&format!("kline[{index}]"), raw);
    }
    value
        .as_f64()
        .ok_or_else(|| MarketLensError::Parse(format!("kline field {index} is not a number")))
}

fn row_u64(fields: &[Value], index: usize) -> Result<u64> {
    fields[index]
        .as_u64()
        .ok_or_else(|| MarketLensError::Parse(format!("kline field {index} is not an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Value {
        json!([
            1_700_000_000_000_u64,
            "35000.00",
            "36500.50",
            "34800.25",
            "36200.75",
            "1234.56",
            1_700_086_399_999_u64,
            "44000000.00",
            987_654_u64,
            "600.10",
            "21500000.00",
            "0"
        ])
    }

    #[test]
    fn test_kline_from_row_parses_all_positional_fields() {
        let kline = Kline::from_row(&sample_row()).unwrap();

        assert_eq!(kline.open_time, 1_700_000_000_000);
        assert_eq!(kline.open, 35000.0);
        assert_eq!(kline.high, 36500.5);
        assert_eq!(kline.low, 34800.25);
        assert_eq!(kline.close, 36200.75);
        assert_eq!(kline.volume, 1234.56);
        assert_eq!(kline.close_time, 1_700_086_399_999);
        assert_eq!(kline.quote_volume, 44_000_000.0);
        assert_eq!(kline.trade_count, 987_654);
        assert_eq!(kline.taker_buy_base_volume, 600.10);
        assert_eq!(kline.taker_buy_quote_volume, 21_500_000.0);
    }

    #[test]
    fn test_kline_from_row_rejects_short_rows() {
        let row = json!([1_700_000_000_000_u64, "35000.00", "36500.50"]);

        let err = Kline::from_row(&row).unwrap_err();
        assert!(matches!(err, MarketLensError::Parse(_)));
    }

    #[test]
    fn test_kline_from_row_rejects_non_array() {
        let err = Kline::from_row(&json!({"open": "35000.00"})).unwrap_err();
        assert!(matches!(err, MarketLensError::Parse(_)));
    }

    #[test]
    fn test_kline_is_green() {
        let mut kline = Kline::from_row(&sample_row()).unwrap();
        assert!(kline.is_green());

        kline.close = kline.open - 1.0;
        assert!(!kline.is_green());
    }

    #[test]
    fn test_ticker_24hr_dto_parses_into_stats() {
        let dto = Ticker24hrDto {
            symbol: "ETHBTC".to_string(),
            price_change: "-0.001".to_string(),
            price_change_percent: "-1.96".to_string(),
            weighted_avg_price: "0.0505".to_string(),
            last_price: "0.05".to_string(),
            bid_price: "0.0499".to_string(),
            ask_price: "0.0501".to_string(),
            open_price: "0.051".to_string(),
            high_price: "0.052".to_string(),
            low_price: "0.0495".to_string(),
            volume: "10000".to_string(),
            quote_volume: "505".to_string(),
            open_time: 1_700_000_000_000,
            close_time: 1_700_086_399_999,
            count: 42_000,
        };

        let stats = Ticker24hrStats::try_from(dto).unwrap();
        assert_eq!(stats.symbol, "ETHBTC");
        assert_eq!(stats.last_price, 0.05);
        assert_eq!(stats.price_change, -0.001);
        assert_eq!(stats.trade_count, 42_000);
    }

    #[test]
    fn test_ticker_24hr_dto_rejects_non_numeric_field() {
        let dto = Ticker24hrDto {
            symbol: "ETHBTC".to_string(),
            price_change: "not-a-number".to_string(),
            price_change_percent: "0".to_string(),
            weighted_avg_price: "0".to_string(),
            last_price: "0".to_string(),
            bid_price: "0".to_string(),
            ask_price: "0".to_string(),
            open_price: "0".to_string(),
            high_price: "0".to_string(),
            low_price: "0".to_string(),
            volume: "0".to_string(),
            quote_volume: "0".to_string(),
            open_time: 0,
            close_time: 0,
            count: 0,
        };

        let err = Ticker24hrStats::try_from(dto).unwrap_err();
        assert!(err.to_string().contains("priceChange"));
    }
}
