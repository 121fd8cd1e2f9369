// src/strategy/macd.rs
use crate::error::Result;
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::evaluator::{build_markers, crosses_above, crosses_below};
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    pub stoploss: StopLossRule,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 50.0,
            rsi_sell_above: 50.0,
            stoploss: StopLossRule::default(),
        }
    }
}

/// MACD/signal line crossovers filtered by RSI, sells only in a downtrend.
#[derive(Debug, Clone, Default)]
pub struct MacdStrategy {
    pub params: MacdParams,
}

impl MacdStrategy {
    pub fn new(params: MacdParams) -> Self {
        Self { params }
    }
}

impl SignalStrategy for MacdStrategy {
    fn name(&self) -> &str {
        "macd"
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![
            columns::RSI,
            columns::EMA_FAST,
            columns::EMA_SLOW,
            columns::ATR,
            columns::MACD,
            columns::MACD_SIGNAL,
        ]
    }

    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>> {
        let rsi = frame.indicator(columns::RSI)?;
        let ema_fast = frame.indicator(columns::EMA_FAST)?;
        let ema_slow = frame.indicator(columns::EMA_SLOW)?;
        let macd = frame.indicator(columns::MACD)?;
        let signal = frame.indicator(columns::MACD_SIGNAL)?;
        let volume = &frame.candles().volume;
        let p = &self.params;

        build_markers(
            frame,
            p.stoploss,
            |i| rsi[i] < p.rsi_buy_below && volume[i] > 0.0 && crosses_above(macd, signal, i),
            |i| {
                rsi[i] > p.rsi_sell_above
                    && ema_fast[i] < ema_slow[i]
                    && volume[i] > 0.0
                    && crosses_below(macd, signal, i)
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_support::{constant, frame};

    #[test]
    fn trades_signal_line_crossovers() {
        let n = 5;
        let frame = frame(&constant(n, 100.0), 10.0)
            .with_indicator(columns::RSI, vec![40.0, 40.0, 60.0, 60.0, 60.0])
            .unwrap()
            .with_indicator(columns::EMA_FAST, constant(n, 99.0))
            .unwrap()
            .with_indicator(columns::EMA_SLOW, constant(n, 100.0))
            .unwrap()
            .with_indicator(columns::ATR, vec![f64::NAN, 1.0, 1.0, 1.0, 1.0])
            .unwrap()
            .with_indicator(columns::MACD, vec![1.0, 3.0, 1.0, 1.0, 0.5])
            .unwrap()
            .with_indicator(columns::MACD_SIGNAL, constant(n, 2.0))
            .unwrap();

        let markers = MacdStrategy::default().generate(&frame).unwrap();
        let buys: Vec<bool> = markers.iter().map(|m| m.buy).collect();
        let sells: Vec<bool> = markers.iter().map(|m| m.sell).collect();

        assert_eq!(buys, [false, true, false, false, false]);
        // Only the first row below the signal line is a crossover
        assert_eq!(sells, [false, false, true, false, false]);
        assert_eq!(markers[0].stoploss, None);
        assert_eq!(markers[1].stoploss, Some(2.0));
    }
}
