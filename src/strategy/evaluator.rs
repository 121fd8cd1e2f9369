// src/strategy/evaluator.rs
use crate::error::{Result, SignalError};
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

/// Markers produced by one strategy over one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub strategy: String,
    pub symbol: String,
    pub interval: String,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub markers: Vec<SignalMarker>,
}

impl SignalReport {
    pub fn buy_times(&self) -> impl Iterator<Item = &SignalMarker> {
        self.markers.iter().filter(|m| m.buy)
    }

    pub fn sell_times(&self) -> impl Iterator<Item = &SignalMarker> {
        self.markers.iter().filter(|m| m.sell)
    }
}

/// Runs strategies over frames and summarises what fired
pub struct StrategyEvaluator;

impl StrategyEvaluator {
    /// Check the frame carries every column the strategy needs, then generate
    /// its markers.
    pub fn evaluate(strategy: &dyn SignalStrategy, frame: &IndicatorFrame) -> Result<SignalReport> {
        info!(
            "Evaluating strategy {} on {}:{} ({} candles)",
            strategy.name(),
            frame.candles().symbol,
            frame.candles().interval,
            frame.len()
        );

        if let Some(missing) = strategy
            .required_columns()
            .into_iter()
            .find(|name| !frame.has_indicator(name))
        {
            return Err(SignalError::MissingIndicator {
                name: missing.to_string(),
            });
        }

        let started = Instant::now();
        let markers = strategy.generate(frame)?;
        let buy_signals = markers.iter().filter(|m| m.buy).count();
        let sell_signals = markers.iter().filter(|m| m.sell).count();

        info!(
            "Strategy {} produced {} buy and {} sell signals in {:.2?}",
            strategy.name(),
            buy_signals,
            sell_signals,
            started.elapsed()
        );

        Ok(SignalReport {
            strategy: strategy.name().to_string(),
            symbol: frame.candles().symbol.clone(),
            interval: frame.candles().interval.clone(),
            buy_signals,
            sell_signals,
            markers,
        })
    }

    /// Evaluate several strategies over the same frame.
    pub fn evaluate_all(
        strategies: &[Box<dyn SignalStrategy>],
        frame: &IndicatorFrame,
    ) -> Result<Vec<SignalReport>> {
        strategies
            .iter()
            .map(|strategy| Self::evaluate(strategy.as_ref(), frame))
            .collect()
    }
}

// Assemble per-candle markers from row predicates plus the ATR stop loss
pub(crate) fn build_markers<B, S>(
    frame: &IndicatorFrame,
    stoploss: StopLossRule,
    buy: B,
    sell: S,
) -> Result<Vec<SignalMarker>>
where
    B: Fn(usize) -> bool,
    S: Fn(usize) -> bool,
{
    let atr = frame.indicator(columns::ATR)?;
    let candles = frame.candles();

    let markers: Vec<SignalMarker> = (0..frame.len())
        .map(|i| SignalMarker {
            open_time: candles.open_time[i],
            buy: buy(i),
            sell: sell(i),
            stoploss: stoploss.level(candles.close[i], atr[i]),
        })
        .collect();

    debug!("Built {} markers", markers.len());
    Ok(markers)
}

/// `fast` moved from at-or-below `slow` to strictly above it at `i`.
pub fn crosses_above(fast: &[f64], slow: &[f64], i: usize) -> bool {
    i > 0 && fast[i] > slow[i] && fast[i - 1] <= slow[i - 1]
}

/// `fast` moved from at-or-above `slow` to strictly below it at `i`.
pub fn crosses_below(fast: &[f64], slow: &[f64], i: usize) -> bool {
    i > 0 && fast[i] < slow[i] && fast[i - 1] >= slow[i - 1]
}
