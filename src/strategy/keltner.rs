// src/strategy/keltner.rs
use crate::error::Result;
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::evaluator::build_markers;
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeltnerChannelParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    pub stoploss: StopLossRule,
}

impl Default for KeltnerChannelParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 30.0,
            rsi_sell_above: 70.0,
            stoploss: StopLossRule::default(),
        }
    }
}

/// Mean reversion on Keltner channel breaches: buy oversold closes below the
/// lower band, sell overbought closes above the upper band in a downtrend.
#[derive(Debug, Clone, Default)]
pub struct KeltnerChannelStrategy {
    pub params: KeltnerChannelParams,
}

impl KeltnerChannelStrategy {
    pub fn new(params: KeltnerChannelParams) -> Self {
        Self { params }
    }
}

impl SignalStrategy for KeltnerChannelStrategy {
    fn name(&self) -> &str {
        "keltner_channel"
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![
            columns::RSI,
            columns::EMA_FAST,
            columns::EMA_SLOW,
            columns::ATR,
            columns::KC_UPPER,
            columns::KC_LOWER,
        ]
    }

    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>> {
        let rsi = frame.indicator(columns::RSI)?;
        let ema_fast = frame.indicator(columns::EMA_FAST)?;
        let ema_slow = frame.indicator(columns::EMA_SLOW)?;
        let upper = frame.indicator(columns::KC_UPPER)?;
        let lower = frame.indicator(columns::KC_LOWER)?;
        let close = &frame.candles().close;
        let volume = &frame.candles().volume;
        let p = &self.params;

        build_markers(
            frame,
            p.stoploss,
            |i| rsi[i] < p.rsi_buy_below && close[i] < lower[i] && volume[i] > 0.0,
            |i| {
                rsi[i] > p.rsi_sell_above
                    && ema_fast[i] < ema_slow[i]
                    && volume[i] > 0.0
                    && close[i] > upper[i]
            },
        )
    }
}
