// src/strategy/fibonacci.rs
use crate::error::Result;
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::evaluator::build_markers;
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const RETRACEMENT_RATIOS: [f64; 4] = [0.236, 0.382, 0.5, 0.618];

/// Retracement levels spanning the highest and lowest close of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub max: f64,
    pub min: f64,
    /// Levels ordered from the top, one per entry of [`RETRACEMENT_RATIOS`]
    pub levels: [f64; 4],
}

impl FibonacciLevels {
    /// `None` when the series has no finite close.
    pub fn from_closes(closes: &[f64]) -> Option<Self> {
        let (min, max) = closes
            .iter()
            .copied()
            .filter(|c| c.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, c| match acc {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            })?;

        let diff = max - min;
        Some(Self {
            max,
            min,
            levels: RETRACEMENT_RATIOS.map(|ratio| max - diff * ratio),
        })
    }

    /// `(upper, lower)` bounds of the retracement band holding `close`.
    ///
    /// A close sitting exactly on a level belongs to the lower band.
    pub fn band(&self, close: f64) -> (f64, f64) {
        let [l1, l2, l3, l4] = self.levels;
        let mut band = (l4, self.min);
        if close >= l1 {
            band = (self.max, l1);
        }
        if l2 <= close && close <= l1 {
            band = (l1, l2);
        }
        if l3 <= close && close <= l2 {
            band = (l2, l3);
        }
        if l4 <= close && close <= l3 {
            band = (l3, l4);
        }
        band
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    pub stoploss: StopLossRule,
}

impl Default for FibonacciParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 30.0,
            rsi_sell_above: 70.0,
            stoploss: StopLossRule::default(),
        }
    }
}

/// Trades closes breaking out of the previous candle's retracement band.
#[derive(Debug, Clone, Default)]
pub struct FibonacciRetracementStrategy {
    pub params: FibonacciParams,
}

impl FibonacciRetracementStrategy {
    pub fn new(params: FibonacciParams) -> Self {
        Self { params }
    }

    /// Per-candle breakout flags; the first candle never breaks out.
    pub fn breakouts(closes: &[f64]) -> Vec<bool> {
        let levels = match FibonacciLevels::from_closes(closes) {
            Some(levels) => levels,
            None => return vec![false; closes.len()],
        };
        debug!("Fibonacci levels: {:?}", levels);

        let bands: Vec<(f64, f64)> = closes.iter().map(|&c| levels.band(c)).collect();
        (0..closes.len())
            .map(|i| {
                i > 0 && {
                    let (upper, lower) = bands[i - 1];
                    closes[i] >= upper || closes[i] <= lower
                }
            })
            .collect()
    }
}

impl SignalStrategy for FibonacciRetracementStrategy {
    fn name(&self) -> &str {
        "fibonacci_retracement"
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
        let breakout = Self::breakouts(&frame.candles().close);
        let p = &self.params;

        build_markers(
            frame,
            p.stoploss,
            |i| rsi[i] < p.rsi_buy_below && volume[i] > 0.0 && breakout[i] && macd[i] < signal[i],
            |i| {
                rsi[i] > p.rsi_sell_above
                    && ema_fast[i] < ema_slow[i]
                    && volume[i] > 0.0
                    && breakout[i]
                    && macd[i] > signal[i]
            },
        )
    }
}
