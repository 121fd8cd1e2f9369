// src/strategy/bollinger.rs
use crate::error::Result;
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::evaluator::build_markers;
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoubleBollingerParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    pub stoploss: StopLossRule,
}

impl Default for DoubleBollingerParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 30.0,
            rsi_sell_above: 70.0,
            stoploss: StopLossRule::default(),
        }
    }
}

/// Trades closes caught between the outer and inner lower Bollinger bands.
///
/// Both sides use the same lower band zone; RSI alone decides the direction.
#[derive(Debug, Clone, Default)]
pub struct DoubleBollingerStrategy {
    pub params: DoubleBollingerParams,
}

impl DoubleBollingerStrategy {
    pub fn new(params: DoubleBollingerParams) -> Self {
        Self { params }
    }
}

impl SignalStrategy for DoubleBollingerStrategy {
    fn name(&self) -> &str {
        "double_bollinger"
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![
            columns::RSI,
            columns::ATR,
            columns::BBAND_LOW,
            columns::INNER_BBAND_LOW,
        ]
    }

    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>> {
        let rsi = frame.indicator(columns::RSI)?;
        let outer = frame.indicator(columns::BBAND_LOW)?;
        let inner = frame.indicator(columns::INNER_BBAND_LOW)?;
        let close = &frame.candles().close;
        let volume = &frame.candles().volume;
        let p = &self.params;

        let in_zone = |i: usize| outer[i] < close[i] && close[i] < inner[i];

        build_markers(
            frame,
            p.stoploss,
            |i| rsi[i] < p.rsi_buy_below && volume[i] > 0.0 && in_zone(i),
            |i| rsi[i] > p.rsi_sell_above && volume[i] > 0.0 && in_zone(i),
        )
    }
}
