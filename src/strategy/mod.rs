// src/strategy/mod.rs
pub mod bollinger;
pub mod candlestick;
pub mod evaluator;
pub mod fibonacci;
pub mod forecast;
pub mod keltner;
pub mod macd;
pub mod schema;

pub use bollinger::{DoubleBollingerParams, DoubleBollingerStrategy};
pub use candlestick::{CandlestickParams, CandlestickStrategy};
pub use evaluator::{crosses_above, crosses_below, SignalReport, StrategyEvaluator};
pub use fibonacci::{FibonacciLevels, FibonacciParams, FibonacciRetracementStrategy};
pub use forecast::{ForecastParams, ForecastStrategy};
pub use keltner::{KeltnerChannelParams, KeltnerChannelStrategy};
pub use macd::{MacdParams, MacdStrategy};
pub use schema::{SignalMarker, SignalStrategy, StopLossRule};
