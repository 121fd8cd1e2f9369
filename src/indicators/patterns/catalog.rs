use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Patterns with no ranking on thepatternsite.com; never part of an enumeration
pub const EXCLUDED_PATTERNS: [&str; 5] = [
    "CDLCOUNTERATTACK",
    "CDLLONGLINE",
    "CDLSHORTLINE",
    "CDLSTALLEDPATTERN",
    "CDLKICKINGBYLENGTH",
];

// TA-Lib "Pattern Recognition" group, in TA-Lib's own order, with the
// exclusions above already removed
pub const TALIB_PATTERNS: [&str; 56] = [
    "CDL2CROWS",
    "CDL3BLACKCROWS",
    "CDL3INSIDE",
    "CDL3LINESTRIKE",
    "CDL3OUTSIDE",
    "CDL3STARSINSOUTH",
    "CDL3WHITESOLDIERS",
    "CDLABANDONEDBABY",
    "CDLADVANCEBLOCK",
    "CDLBELTHOLD",
    "CDLBREAKAWAY",
    "CDLCLOSINGMARUBOZU",
    "CDLCONCEALBABYSWALL",
    "CDLDARKCLOUDCOVER",
    "CDLDOJI",
    "CDLDOJISTAR",
    "CDLDRAGONFLYDOJI",
    "CDLENGULFING",
    "CDLEVENINGDOJISTAR",
    "CDLEVENINGSTAR",
    "CDLGAPSIDESIDEWHITE",
    "CDLGRAVESTONEDOJI",
    "CDLHAMMER",
    "CDLHANGINGMAN",
    "CDLHARAMI",
    "CDLHARAMICROSS",
    "CDLHIGHWAVE",
    "CDLHIKKAKE",
    "CDLHIKKAKEMOD",
    "CDLHOMINGPIGEON",
    "CDLIDENTICAL3CROWS",
    "CDLINNECK",
    "CDLINVERTEDHAMMER",
    "CDLKICKING",
    "CDLLADDERBOTTOM",
    "CDLLONGLEGGEDDOJI",
    "CDLMARUBOZU",
    "CDLMATCHINGLOW",
    "CDLMATHOLD",
    "CDLMORNINGDOJISTAR",
    "CDLMORNINGSTAR",
    "CDLONNECK",
    "CDLPIERCING",
    "CDLRICKSHAWMAN",
    "CDLRISEFALL3METHODS",
    "CDLSEPARATINGLINES",
    "CDLSHOOTINGSTAR",
    "CDLSPINNINGTOP",
    "CDLSTICKSANDWICH",
    "CDLTAKURI",
    "CDLTASUKIGAP",
    "CDLTHRUSTING",
    "CDLTRISTAR",
    "CDLUNIQUE3RIVER",
    "CDLUPSIDEGAP2CROWS",
    "CDLXSIDEGAP3METHODS",
];

/// Ordered, validated list of pattern identifiers a resolver works over.
///
/// The order is significant: it is the order rows are read in and the order
/// used to break ties between equally ranked labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PatternCatalog {
    identifiers: Vec<String>,
}

impl PatternCatalog {
    /// Build a catalog from an explicit enumeration.
    ///
    /// Rejects an empty list, duplicates and any identifier on
    /// [`EXCLUDED_PATTERNS`].
    pub fn new<I, S>(identifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identifiers: Vec<String> = identifiers.into_iter().map(Into::into).collect();

        if identifiers.is_empty() {
            return Err(SignalError::EmptySignalSet);
        }

        let mut seen = HashSet::with_capacity(identifiers.len());
        for identifier in &identifiers {
            if EXCLUDED_PATTERNS.contains(&identifier.as_str()) {
                return Err(SignalError::ExcludedIdentifier {
                    identifier: identifier.clone(),
                });
            }
            if !seen.insert(identifier.as_str()) {
                return Err(SignalError::DuplicateIdentifier {
                    identifier: identifier.clone(),
                });
            }
        }

        Ok(Self { identifiers })
    }

    /// The TA-Lib pattern group minus the five unranked patterns.
    pub fn talib() -> Self {
        Self {
            identifiers: TALIB_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    // Always false for a constructed catalog; kept for clippy's len_without_is_empty
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.identifiers.iter().map(String::as_str)
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::talib()
    }
}

impl TryFrom<Vec<String>> for PatternCatalog {
    type Error = SignalError;

    fn try_from(identifiers: Vec<String>) -> Result<Self> {
        Self::new(identifiers)
    }
}

impl From<PatternCatalog> for Vec<String> {
    fn from(catalog: PatternCatalog) -> Self {
        catalog.identifiers
    }
}
