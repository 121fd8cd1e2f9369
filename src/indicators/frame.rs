use crate::data::models::CandleData;
use crate::error::{Result, SignalError};
use crate::indicators::patterns::PatternSignalProvider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Candles together with indicator and pattern columns computed upstream.
///
/// Indicator values use `NaN` for steps where the indicator is not defined
/// yet (warm-up), matching what TA-Lib style producers emit. Every column has
/// exactly one value per candle; construction, deserialisation and
/// [`IndicatorFrame::update_candles`] all refuse to break that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFrame")]
pub struct IndicatorFrame {
    candles: CandleData,
    #[serde(serialize_with = "nan_as_null::serialize")]
    indicators: BTreeMap<String, Vec<f64>>,
    patterns: BTreeMap<String, Vec<i32>>,
}

// Unchecked wire shape
#[derive(Deserialize)]
struct RawFrame {
    candles: CandleData,
    #[serde(default, deserialize_with = "nan_as_null::deserialize")]
    indicators: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    patterns: BTreeMap<String, Vec<i32>>,
}

// JSON has no NaN: warm-up values travel as null
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(columns: &BTreeMap<String, Vec<f64>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let columns: BTreeMap<&str, Vec<Option<f64>>> = columns
            .iter()
            .map(|(name, values)| {
                let values = values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect();
                (name.as_str(), values)
            })
            .collect();
        columns.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<f64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let columns = BTreeMap::<String, Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(columns
            .into_iter()
            .map(|(name, values)| {
                let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
                (name, values)
            })
            .collect())
    }
}

impl TryFrom<RawFrame> for IndicatorFrame {
    type Error = SignalError;

    fn try_from(raw: RawFrame) -> Result<Self> {
        let frame = Self {
            candles: raw.candles,
            indicators: raw.indicators,
            patterns: raw.patterns,
        };
        frame.validate()?;
        Ok(frame)
    }
}

impl IndicatorFrame {
    pub fn new(candles: CandleData) -> Result<Self> {
        candles.validate()?;
        Ok(Self {
            candles,
            indicators: BTreeMap::new(),
            patterns: BTreeMap::new(),
        })
    }

    pub fn candles(&self) -> &CandleData {
        &self.candles
    }

    /// Edit the candles in place. The edit is discarded with `LengthMismatch`
    /// when it leaves any column out of step with the candle count.
    pub fn update_candles<F>(&mut self, update: F) -> Result<()>
    where
        F: FnOnce(&mut CandleData),
    {
        let mut candles = self.candles.clone();
        update(&mut candles);
        let previous = std::mem::replace(&mut self.candles, candles);

        if let Err(e) = self.validate() {
            self.candles = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Candle columns agree with each other and every indicator/pattern
    /// column has one value per candle.
    pub fn validate(&self) -> Result<()> {
        self.candles.validate()?;
        for (name, values) in &self.indicators {
            self.check_length(name, values.len())?;
        }
        for (identifier, values) in &self.patterns {
            self.check_length(identifier, values.len())?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn insert_indicator(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        self.check_length(&name, values.len())?;
        debug!("Adding indicator column {} ({} rows)", name, values.len());
        self.indicators.insert(name, values);
        Ok(())
    }

    pub fn with_indicator(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        self.insert_indicator(name, values)?;
        Ok(self)
    }

    pub fn insert_pattern(&mut self, identifier: impl Into<String>, values: Vec<i32>) -> Result<()> {
        let identifier = identifier.into();
        self.check_length(&identifier, values.len())?;
        self.patterns.insert(identifier, values);
        Ok(())
    }

    pub fn with_pattern(mut self, identifier: impl Into<String>, values: Vec<i32>) -> Result<Self> {
        self.insert_pattern(identifier, values)?;
        Ok(self)
    }

    pub fn indicator(&self, name: &str) -> Result<&[f64]> {
        self.indicators
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SignalError::MissingIndicator {
                name: name.to_string(),
            })
    }

    pub fn has_indicator(&self, name: &str) -> bool {
        self.indicators.contains_key(name)
    }

    pub fn pattern(&self, identifier: &str) -> Option<&[i32]> {
        self.patterns.get(identifier).map(Vec::as_slice)
    }

    pub fn indicator_names(&self) -> impl Iterator<Item = &str> {
        self.indicators.keys().map(String::as_str)
    }

    fn check_length(&self, name: &str, actual: usize) -> Result<()> {
        let expected = self.len();
        if actual != expected {
            return Err(SignalError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl PatternSignalProvider for IndicatorFrame {
    fn len(&self) -> usize {
        self.candles.len()
    }

    fn signal(&self, index: usize, identifier: &str) -> Option<i32> {
        self.patterns.get(identifier)?.get(index).copied()
    }
}
