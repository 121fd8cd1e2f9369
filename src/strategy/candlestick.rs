// src/strategy/candlestick.rs
use crate::error::Result;
use crate::indicators::patterns::{ConsensusResolver, Direction};
use crate::indicators::{columns, IndicatorFrame};
use crate::processor::BatchResolver;
use crate::strategy::evaluator::build_markers;
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    /// Buy needs strictly more than this many patterns agreeing on the row
    pub min_bull_matches: usize,
    pub min_bear_matches: usize,
    pub stoploss: StopLossRule,
}

impl Default for CandlestickParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 30.0,
            rsi_sell_above: 70.0,
            min_bull_matches: 5,
            min_bear_matches: 3,
            stoploss: StopLossRule::BelowClose { multiplier: 2.0 },
        }
    }
}

/// Trades the consensus candlestick pattern of each candle, filtered by RSI.
pub struct CandlestickStrategy {
    batch: BatchResolver,
    params: CandlestickParams,
}

impl CandlestickStrategy {
    pub fn new(batch: BatchResolver, params: CandlestickParams) -> Self {
        Self { batch, params }
    }

    /// TA-Lib catalog ranked by thepatternsite.com, resolved sequentially.
    pub fn pattern_site() -> Self {
        Self::new(
            BatchResolver::sequential(ConsensusResolver::pattern_site()),
            CandlestickParams::default(),
        )
    }

    pub fn params(&self) -> &CandlestickParams {
        &self.params
    }
}

impl SignalStrategy for CandlestickStrategy {
    fn name(&self) -> &str {
        "candlestick"
    }

    fn required_columns(&self) -> Vec<&'static str> {
        vec![columns::RSI, columns::ATR]
    }

    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>> {
        let consensus = self.batch.resolve_frame(frame)?;
        let rsi = frame.indicator(columns::RSI)?;
        let volume = &frame.candles().volume;
        let p = &self.params;

        debug!(
            "Consensus: {} bullish, {} bearish rows",
            consensus.iter().filter(|c| c.is_bullish()).count(),
            consensus.iter().filter(|c| c.is_bearish()).count()
        );

        build_markers(
            frame,
            p.stoploss,
            |i| {
                volume[i] > 0.0
                    && rsi[i] < p.rsi_buy_below
                    && consensus[i].direction() == Some(Direction::Bull)
                    && consensus[i].match_count > p.min_bull_matches
            },
            |i| {
                volume[i] > 0.0
                    && rsi[i] > p.rsi_sell_above
                    && consensus[i].direction() == Some(Direction::Bear)
                    && consensus[i].match_count > p.min_bear_matches
            },
        )
    }
}
