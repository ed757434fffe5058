use serde::Serialize;

use super::types::Kline;

pub const RSI_PERIOD: usize = 14;
pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct Indicators {
    pub rsi_14: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
}

pub fn calculate_indicators(closes: &[f64]) -> Indicators {
    Indicators {
        rsi_14: rsi(closes, RSI_PERIOD),
        sma_20: sma(closes, SMA_SHORT_PERIOD),
        sma_50: sma(closes, SMA_LONG_PERIOD),
    }
}

/// RSI over Wilder's initial average of the first `period` deltas, with no
/// further smoothing. Returns None with fewer than period + 1 closes.
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in closes.windows(2).take(period) {
        let delta = pair[1] - pair[0];
        if delta >= 0.0 {
            gains += delta;
        } else {
            losses -= delta;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_gain = gains / period as f64;
    #[allow(clippy::cast_precision_loss)]
    let avg_loss = losses / period as f64;

    // The naive formula divides by avg_loss; an all-gain window must read 100.
    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

/// Arithmetic mean of the last `period` closes; None with fewer points.
pub fn sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];

    #[allow(clippy::cast_precision_loss)]
    let mean = window.iter().sum::<f64>() / period as f64;
    Some(mean)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandleTrend {
    pub consecutive_count: usize,
    pub trend: Trend,
}

/// Counts consecutive same-color candles ending at the most recent one.
/// Two or more consecutive greens read bullish, two or more reds bearish,
/// anything shorter neutral.
pub fn candle_trend<C>(candles: &[C], is_green: impl Fn(&C) -> bool) -> CandleTrend {
    let Some(last) = candles.last() else {
        return CandleTrend {
            consecutive_count: 0,
            trend: Trend::Neutral,
        };
    };

    let last_green = is_green(last);
    let consecutive_count = candles
        .iter()
        .rev()
        .take_while(|candle| is_green(candle) == last_green)
        .count();

    let trend = if consecutive_count >= 2 {
        if last_green {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    } else {
        Trend::Neutral
    };

    CandleTrend {
        consecutive_count,
        trend,
    }
}

pub fn weekly_trend(candles: &[Kline]) -> CandleTrend {
    candle_trend(candles, Kline::is_green)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(open: f64, close: f64) -> Kline {
        Kline {
            open_time: 0,
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 0.0,
            close_time: 0,
            quote_volume: 0.0,
            trade_count: 0,
            taker_buy_base_volume: 0.0,
            taker_buy_quote_volume: 0.0,
        }
    }

    #[test]
    fn test_rsi_all_gains_is_exactly_100() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + f64::from(i)).collect();

        assert_eq!(rsi(&closes, RSI_PERIOD), Some(100.0));
    }

    #[test]
    fn test_rsi_all_losses_is_zero() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - f64::from(i)).collect();

        assert_eq!(rsi(&closes, RSI_PERIOD), Some(0.0));
    }

    #[test]
    fn test_rsi_requires_period_plus_one_points() {
        let closes: Vec<f64> = (0..14).map(f64::from).collect();

        assert_eq!(rsi(&closes, RSI_PERIOD), None);
    }

    #[test]
    fn test_rsi_balanced_gains_and_losses_is_50() {
        // Alternating +1/-1 over 14 deltas: avg gain == avg loss.
        let closes: Vec<f64> = (0..15)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();

        let value = rsi(&closes, RSI_PERIOD).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_sma_is_mean_of_last_window() {
        let closes: Vec<f64> = (1..=25).map(f64::from).collect();

        // Last 20 closes are 6..=25.
        assert_eq!(sma(&closes, 20), Some(15.5));
    }

    #[test]
    fn test_sma_50_undefined_with_fewer_points() {
        let closes: Vec<f64> = (0..49).map(f64::from).collect();

        assert_eq!(sma(&closes, SMA_LONG_PERIOD), None);
    }

    #[test]
    fn test_calculate_indicators_on_short_series() {
        let closes = [100.0, 101.0, 102.0];
        let indicators = calculate_indicators(&closes);

        assert_eq!(indicators.rsi_14, None);
        assert_eq!(indicators.sma_20, None);
        assert_eq!(indicators.sma_50, None);
    }

    #[test]
    fn test_trend_single_green_after_red_is_neutral() {
        // green, green, red, green (most recent last)
        let candles = [
            candle(100.0, 110.0),
            candle(110.0, 120.0),
            candle(120.0, 115.0),
            candle(115.0, 118.0),
        ];

        let trend = weekly_trend(&candles);
        assert_eq!(trend.consecutive_count, 1);
        assert_eq!(trend.trend, Trend::Neutral);
    }

    #[test]
    fn test_trend_two_greens_is_bullish() {
        // red, green, green
        let candles = [
            candle(120.0, 115.0),
            candle(115.0, 118.0),
            candle(118.0, 121.0),
        ];

        let trend = weekly_trend(&candles);
        assert_eq!(trend.consecutive_count, 2);
        assert_eq!(trend.trend, Trend::Bullish);
    }

    #[test]
    fn test_trend_three_reds_is_bearish() {
        let candles = [
            candle(120.0, 115.0),
            candle(115.0, 110.0),
            candle(110.0, 105.0),
        ];

        let trend = weekly_trend(&candles);
        assert_eq!(trend.consecutive_count, 3);
        assert_eq!(trend.trend, Trend::Bearish);
    }

    #[test]
    fn test_trend_empty_series_is_neutral() {
        let trend = weekly_trend(&[]);

        assert_eq!(trend.consecutive_count, 0);
        assert_eq!(trend.trend, Trend::Neutral);
    }

    #[test]
    fn test_candle_trend_works_over_open_close_pairs() {
        let pairs = [(120.0, 115.0), (115.0, 118.0), (118.0, 121.0)];

        let trend = candle_trend(&pairs, |(open, close)| close > open);
        assert_eq!(trend.consecutive_count, 2);
        assert_eq!(trend.trend, Trend::Bullish);
    }
}
