pub mod client;
pub mod indicators;
pub mod types;

pub use client::{BinanceClient, BINANCE_API_URL};
