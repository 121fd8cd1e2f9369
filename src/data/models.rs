use crate::error::{Result, SignalError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Columnar OHLCV series for one symbol and interval, ordered by open time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleData {
    pub symbol: String,
    pub interval: String,
    pub open_time: Vec<DateTime<Utc>>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl CandleData {
    pub fn new(symbol: String, interval: String) -> Self {
        Self {
            symbol,
            interval,
            ..Default::default()
        }
    }

    pub fn with_capacity(symbol: String, interval: String, capacity: usize) -> Self {
        Self {
            symbol,
            interval,
            open_time: Vec::with_capacity(capacity),
            open: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            volume: Vec::with_capacity(capacity),
        }
    }

    pub fn push(
        &mut self,
        open_time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) {
        self.open_time.push(open_time);
        self.open.push(open);
        self.high.push(high);
        self.low.push(low);
        self.close.push(close);
        self.volume.push(volume);
    }

    pub fn len(&self) -> usize {
        self.open_time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_time.is_empty()
    }

    /// Every price/volume column must have one value per open time.
    pub fn validate(&self) -> Result<()> {
        let expected = self.len();
        let columns: [(&str, usize); 5] = [
            ("open", self.open.len()),
            ("high", self.high.len()),
            ("low", self.low.len()),
            ("close", self.close.len()),
            ("volume", self.volume.len()),
        ];

        for (name, actual) in columns {
            if actual != expected {
                return Err(SignalError::LengthMismatch {
                    name: name.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// One candle augmented with its pattern consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedCandle {
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub pattern_label: String,
    pub match_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn validate_catches_ragged_columns() {
        let mut data = CandleData::new("BTCUSDT".to_string(), "1h".to_string());
        data.push(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), 1.0, 2.0, 0.5, 1.5, 10.0);
        assert!(data.validate().is_ok());

        data.volume.pop();
        assert_eq!(
            data.validate().unwrap_err(),
            SignalError::LengthMismatch {
                name: "volume".to_string(),
                expected: 1,
                actual: 0
            }
        );
    }
}
