// src/strategy/forecast.rs
use crate::error::Result;
use crate::indicators::{columns, IndicatorFrame};
use crate::strategy::evaluator::build_markers;
use crate::strategy::schema::{SignalMarker, SignalStrategy, StopLossRule};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    pub rsi_buy_below: f64,
    pub rsi_sell_above: f64,
    /// Sell only while the fast EMA is below the slow EMA
    pub trend_filter: bool,
    pub stoploss: StopLossRule,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            rsi_buy_below: 30.0,
            rsi_sell_above: 70.0,
            trend_filter: true,
            stoploss: StopLossRule::default(),
        }
    }
}

/// Trades the gap between a model forecast (ARIMA, SARIMA, ...) and the close.
///
/// The forecast column is produced upstream; a forecast above the close on an
/// oversold candle is a buy, below the close on an overbought one a sell.
#[derive(Debug, Clone)]
pub struct ForecastStrategy {
    name: String,
    pub params: ForecastParams,
}

impl ForecastStrategy {
    pub fn new(name: impl Into<String>, params: ForecastParams) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn sarima() -> Self {
        Self::new("sarima", ForecastParams::default())
    }

    /// Auto-fitted SARIMA, traded without the EMA trend filter.
    pub fn pmd_sarima() -> Self {
        Self::new(
            "pmd_sarima",
            ForecastParams {
                trend_filter: false,
                ..ForecastParams::default()
            },
        )
    }
}

impl Default for ForecastStrategy {
    fn default() -> Self {
        Self::sarima()
    }
}

impl SignalStrategy for ForecastStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_columns(&self) -> Vec<&'static str> {
        let mut required = vec![columns::RSI, columns::ATR, columns::FORECAST];
        if self.params.trend_filter {
            required.extend([columns::EMA_FAST, columns::EMA_SLOW]);
        }
        required
    }

    fn generate(&self, frame: &IndicatorFrame) -> Result<Vec<SignalMarker>> {
        let rsi = frame.indicator(columns::RSI)?;
        let forecast = frame.indicator(columns::FORECAST)?;
        let trend = if self.params.trend_filter {
            Some((
                frame.indicator(columns::EMA_FAST)?,
                frame.indicator(columns::EMA_SLOW)?,
            ))
        } else {
            None
        };
        let close = &frame.candles().close;
        let volume = &frame.candles().volume;
        let p = &self.params;

        let downtrend = |i: usize| match trend {
            Some((fast, slow)) => fast[i] < slow[i],
            None => true,
        };

        build_markers(
            frame,
            p.stoploss,
            |i| rsi[i] < p.rsi_buy_below && volume[i] > 0.0 && forecast[i] > close[i],
            |i| {
                rsi[i] > p.rsi_sell_above
                    && downtrend(i)
                    && volume[i] > 0.0
                    && forecast[i] < close[i]
            },
        )
    }
}
