// src/strategy/schema.rs
use crate::error::Result;
use crate::indicators::IndicatorFrame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Buy/sell markers and stop-loss level for one candle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMarker {
    /// Open time of the candle the marker belongs to
    pub open_time: DateTime<Utc>,
    /// Entry condition met on this candle
    pub buy: bool,
    /// Exit condition met on this candle
    pub sell: bool,
    /// Dynamic stop loss, absent while its inputs are undefined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoploss: Option<f64>,
}

/// How a strategy derives its dynamic stop loss from ATR
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopLossRule {
    /// Distance from entry: `multiplier * atr`
    AtrDistance { multiplier: f64 },
    /// Price level: `close - multiplier * atr`
    BelowClose { multiplier: f64 },
}

impl StopLossRule {
    pub fn level(&self, close: f64, atr: f64) -> Option<f64> {
        let value = match self {
            StopLossRule::AtrDistance { multiplier } => multiplier * atr,
            StopLossRule::BelowClose { multiplier } => close - multiplier * atr,
        };
        value.is_finite().then_some(value)
    }
}

impl Default for StopLossRule {
    fn default() -> Self {
        StopLossRule::AtrDistance { multiplier: 2.0 }
    }
}

/// A signal generator that thresholds pre-computed indicator columns.
pub trait SignalStrategy: Send + Sync {
    /// Short, stable name used in logs and reports
    fn name(&self) -> &str;

    /// Indicator columns `generate` reads
    fn required_columns(&self) -> Vec<&'static str>;

    /// One marker per candle in `frame`
    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>>;
}
