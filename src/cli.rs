use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::auth::Token;
use crate::probe::{battery, ProbeRunner};
use crate::providers::binance::indicators::{self, CandleTrend, Indicators};
use crate::providers::binance::{BinanceClient, BINANCE_API_URL};
use crate::providers::coingecko::types::OhlcCandle;
use crate::providers::coingecko::CoinGeckoClient;

#[derive(Parser)]
#[command(name = "marketlens")]
#[command(author, version, about = "Market Data API Insights Tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file path (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe all market-data providers and report reliability
    Probe {
        /// CryptoCompare API key (optional, raises the free-tier rate limit)
        #[arg(long, env = "CRYPTOCOMPARE_API_KEY")]
        cryptocompare_key: Option<String>,
    },

    /// Fetch the current spot price of an exchange symbol
    Price {
        /// Exchange symbol, e.g. BTCUSDT
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,
    },

    /// Fetch the aggregator price of a coin in one or more currencies
    CoinPrice {
        /// Aggregator coin id, e.g. bitcoin
        #[arg(short, long, default_value = "bitcoin")]
        coin: String,

        /// Quote currency
        #[arg(short, long, default_value = "usd")]
        vs: String,
    },

    /// Compute RSI/SMA indicators and the weekly-candle trend for a symbol
    Indicators {
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Candle interval for the indicator series
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Number of candles to fetch
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },

    /// Fetch 24h stats for the rotation pairs and derive cross-pair ratios
    Rotation,

    /// Fetch global market-cap dominance from the aggregator API
    Dominance,

    /// Compute indicators over an aggregator price-history series
    Chart {
        #[arg(short, long, default_value = "bitcoin")]
        coin: String,

        #[arg(short, long, default_value = "usd")]
        vs: String,

        /// History window in days
        #[arg(short, long, default_value_t = 60)]
        days: u32,
    },

    /// List top coins by market capitalization
    Markets {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Serialize)]
struct IndicatorsOutput {
    symbol: String,
    last_close: Option<f64>,
    #[serde(flatten)]
    indicators: Indicators,
    weekly_trend: CandleTrend,
}

#[derive(Serialize)]
struct ChartOutput {
    coin: String,
    vs_currency: String,
    points_analyzed: usize,
    last_price: Option<f64>,
    #[serde(flatten)]
    indicators: Indicators,
    candle_trend: CandleTrend,
}

impl Cli {
    pub async fn execute(&self) -> Result<ExitCode> {
        match &self.command {
            Commands::Probe { cryptocompare_key } => {
                let key = cryptocompare_key.as_deref().map(Token::from);
                let battery = battery::default_battery(key.as_ref());
                let runner = ProbeRunner::new()?;

                let report = runner.run(&battery).await;
                self.write_output(&report)?;

                if report.has_working_provider() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            }

            Commands::Price { symbol } => {
                info!("Fetching current price for {symbol}");
                let client = BinanceClient::new(BINANCE_API_URL)?;

                let price = client.get_current_price(symbol).await?;
                self.write_output(&serde_json::json!({
                    "symbol": symbol.to_uppercase(),
                    "price": price,
                }))?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::CoinPrice { coin, vs } => {
                info!("Fetching aggregator price for {coin} in {vs}");
                let client = CoinGeckoClient::new()?;

                let prices = client.get_simple_price(&[coin.as_str()], &[vs.as_str()]).await?;
                self.write_output(&prices)?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::Indicators {
                symbol,
                interval,
                limit,
            } => {
                info!("Computing indicators for {symbol} over {limit} {interval} candles");
                let client = BinanceClient::new(BINANCE_API_URL)?;

                let klines = client.get_klines(symbol, interval, *limit).await?;
                let closes: Vec<f64> = klines.iter().map(|kline| kline.close).collect();
                let weekly = client.get_klines(symbol, "1w", 8).await?;

                self.write_output(&IndicatorsOutput {
                    symbol: symbol.to_uppercase(),
                    last_close: closes.last().copied(),
                    indicators: indicators::calculate_indicators(&closes),
                    weekly_trend: indicators::weekly_trend(&weekly),
                })?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::Rotation => {
                let client = BinanceClient::new(BINANCE_API_URL)?;

                let pairs = client.get_rotation_pairs().await?;
                self.write_output(&pairs)?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::Dominance => {
                let client = CoinGeckoClient::new()?;

                let dominance = client.get_dominance().await?;
                self.write_output(&dominance)?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::Chart { coin, vs, days } => {
                info!("Fetching {days}-day chart for {coin}");
                let client = CoinGeckoClient::new()?;

                let points = client.get_market_chart(coin, vs, *days).await?;
                let closes: Vec<f64> = points.iter().map(|(_, price)| *price).collect();
                let candles = client.get_ohlc(coin, vs, *days).await?;

                self.write_output(&ChartOutput {
                    coin: coin.clone(),
                    vs_currency: vs.clone(),
                    points_analyzed: closes.len(),
                    last_price: closes.last().copied(),
                    indicators: indicators::calculate_indicators(&closes),
                    candle_trend: indicators::candle_trend(&candles, OhlcCandle::is_green),
                })?;

                Ok(ExitCode::SUCCESS)
            }

            Commands::Markets { limit } => {
                let client = CoinGeckoClient::new()?;

                let markets = client.get_coins_markets("usd", *limit).await?;
                self.write_output(&markets)?;

                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn write_output<T: Serialize>(&self, value: &T) -> Result<()> {
        let json_output = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{json_output}");
        }

        Ok(())
    }
}
