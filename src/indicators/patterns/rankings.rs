use crate::error::{Result as SignalResult, SignalError};
use crate::indicators::patterns::catalog::PatternCatalog;
use crate::indicators::patterns::labeler::{qualify, Direction};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

// Overall performance rank per qualified pattern from thepatternsite.com
// (lower is better). Patterns the site ranks only one way share the rank
// across both directions.
const PATTERN_SITE_RANKINGS: [(&str, u32); 112] = [
    ("CDL3LINESTRIKE_Bull", 1),
    ("CDL3LINESTRIKE_Bear", 2),
    ("CDL3BLACKCROWS_Bull", 3),
    ("CDL3BLACKCROWS_Bear", 3),
    ("CDLEVENINGSTAR_Bull", 4),
    ("CDLEVENINGSTAR_Bear", 4),
    ("CDLTASUKIGAP_Bull", 5),
    ("CDLTASUKIGAP_Bear", 5),
    ("CDLINVERTEDHAMMER_Bull", 6),
    ("CDLINVERTEDHAMMER_Bear", 6),
    ("CDLMATCHINGLOW_Bull", 7),
    ("CDLMATCHINGLOW_Bear", 7),
    ("CDLABANDONEDBABY_Bull", 8),
    ("CDLABANDONEDBABY_Bear", 8),
    ("CDLBREAKAWAY_Bull", 10),
    ("CDLBREAKAWAY_Bear", 10),
    ("CDLMORNINGSTAR_Bull", 12),
    ("CDLMORNINGSTAR_Bear", 12),
    ("CDLPIERCING_Bull", 13),
    ("CDLPIERCING_Bear", 13),
    ("CDLSTICKSANDWICH_Bull", 14),
    ("CDLSTICKSANDWICH_Bear", 14),
    ("CDLTHRUSTING_Bull", 15),
    ("CDLTHRUSTING_Bear", 15),
    ("CDLINNECK_Bull", 17),
    ("CDLINNECK_Bear", 17),
    ("CDL3INSIDE_Bull", 20),
    ("CDL3INSIDE_Bear", 56),
    ("CDLHOMINGPIGEON_Bull", 21),
    ("CDLHOMINGPIGEON_Bear", 21),
    ("CDLDARKCLOUDCOVER_Bull", 22),
    ("CDLDARKCLOUDCOVER_Bear", 22),
    ("CDLIDENTICAL3CROWS_Bull", 24),
    ("CDLIDENTICAL3CROWS_Bear", 24),
    ("CDLMORNINGDOJISTAR_Bull", 25),
    ("CDLMORNINGDOJISTAR_Bear", 25),
    ("CDLXSIDEGAP3METHODS_Bull", 27),
    ("CDLXSIDEGAP3METHODS_Bear", 26),
    ("CDLTRISTAR_Bull", 28),
    ("CDLTRISTAR_Bear", 76),
    ("CDLGAPSIDESIDEWHITE_Bull", 46),
    ("CDLGAPSIDESIDEWHITE_Bear", 29),
    ("CDLEVENINGDOJISTAR_Bull", 30),
    ("CDLEVENINGDOJISTAR_Bear", 30),
    ("CDL3WHITESOLDIERS_Bull", 32),
    ("CDL3WHITESOLDIERS_Bear", 32),
    ("CDLONNECK_Bull", 33),
    ("CDLONNECK_Bear", 33),
    ("CDL3OUTSIDE_Bull", 34),
    ("CDL3OUTSIDE_Bear", 39),
    ("CDLRICKSHAWMAN_Bull", 35),
    ("CDLRICKSHAWMAN_Bear", 35),
    ("CDLSEPARATINGLINES_Bull", 36),
    ("CDLSEPARATINGLINES_Bear", 40),
    ("CDLLONGLEGGEDDOJI_Bull", 37),
    ("CDLLONGLEGGEDDOJI_Bear", 37),
    ("CDLHARAMI_Bull", 38),
    ("CDLHARAMI_Bear", 72),
    ("CDLLADDERBOTTOM_Bull", 41),
    ("CDLLADDERBOTTOM_Bear", 41),
    ("CDLCLOSINGMARUBOZU_Bull", 70),
    ("CDLCLOSINGMARUBOZU_Bear", 43),
    ("CDLTAKURI_Bull", 47),
    ("CDLTAKURI_Bear", 47),
    ("CDLDOJISTAR_Bull", 49),
    ("CDLDOJISTAR_Bear", 51),
    ("CDLHARAMICROSS_Bull", 50),
    ("CDLHARAMICROSS_Bear", 80),
    ("CDLADVANCEBLOCK_Bull", 54),
    ("CDLADVANCEBLOCK_Bear", 54),
    ("CDLSHOOTINGSTAR_Bull", 55),
    ("CDLSHOOTINGSTAR_Bear", 55),
    ("CDLMARUBOZU_Bull", 71),
    ("CDLMARUBOZU_Bear", 57),
    ("CDLUNIQUE3RIVER_Bull", 60),
    ("CDLUNIQUE3RIVER_Bear", 60),
    ("CDL2CROWS_Bull", 61),
    ("CDL2CROWS_Bear", 61),
    ("CDLBELTHOLD_Bull", 62),
    ("CDLBELTHOLD_Bear", 63),
    ("CDLHAMMER_Bull", 65),
    ("CDLHAMMER_Bear", 65),
    ("CDLHIGHWAVE_Bull", 67),
    ("CDLHIGHWAVE_Bear", 67),
    ("CDLSPINNINGTOP_Bull", 69),
    ("CDLSPINNINGTOP_Bear", 73),
    ("CDLUPSIDEGAP2CROWS_Bull", 74),
    ("CDLUPSIDEGAP2CROWS_Bear", 74),
    ("CDLGRAVESTONEDOJI_Bull", 77),
    ("CDLGRAVESTONEDOJI_Bear", 77),
    ("CDLHIKKAKEMOD_Bull", 82),
    ("CDLHIKKAKEMOD_Bear", 81),
    ("CDLHIKKAKE_Bull", 85),
    ("CDLHIKKAKE_Bear", 83),
    ("CDLENGULFING_Bull", 84),
    ("CDLENGULFING_Bear", 91),
    ("CDLMATHOLD_Bull", 86),
    ("CDLMATHOLD_Bear", 86),
    ("CDLHANGINGMAN_Bull", 87),
    ("CDLHANGINGMAN_Bear", 87),
    ("CDLRISEFALL3METHODS_Bull", 94),
    ("CDLRISEFALL3METHODS_Bear", 89),
    ("CDLKICKING_Bull", 96),
    ("CDLKICKING_Bear", 102),
    ("CDLDRAGONFLYDOJI_Bull", 98),
    ("CDLDRAGONFLYDOJI_Bear", 98),
    ("CDLCONCEALBABYSWALL_Bull", 101),
    ("CDLCONCEALBABYSWALL_Bear", 101),
    ("CDL3STARSINSOUTH_Bull", 103),
    ("CDL3STARSINSOUTH_Bear", 103),
    ("CDLDOJI_Bull", 104),
    ("CDLDOJI_Bear", 104),
];

/// Immutable qualified-label -> rank mapping. Lower rank is better.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, u32>", into = "HashMap<String, u32>")]
pub struct RankTable {
    ranks: HashMap<String, u32>,
}

impl RankTable {
    /// Build a table from `(qualified label, rank)` pairs. Ranks must be positive.
    pub fn new<I, S>(entries: I) -> SignalResult<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut ranks = HashMap::new();
        for (label, rank) in entries {
            let label = label.into();
            if rank == 0 {
                return Err(SignalError::InvalidRank { label });
            }
            ranks.insert(label, rank);
        }
        Ok(Self { ranks })
    }

    /// Rankings published by thepatternsite.com for the TA-Lib patterns.
    pub fn pattern_site() -> Self {
        Self {
            ranks: PATTERN_SITE_RANKINGS
                .iter()
                .map(|(label, rank)| (label.to_string(), *rank))
                .collect(),
        }
    }

    /// Load a JSON object of `{"<label>": rank}` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        info!("Loading pattern rankings from file: {}", path.display());

        let json_str = fs::read_to_string(path)
            .context(format!("Failed to read rank table: {}", path.display()))?;

        let table: RankTable = serde_json::from_str(&json_str)
            .context(format!("Failed to parse rank table JSON: {}", path.display()))?;

        info!("Loaded {} ranked patterns", table.len());
        Ok(table)
    }

    pub fn rank(&self, label: &str) -> Option<u32> {
        self.ranks.get(label).copied()
    }

    /// Rank of `label`, or [`SignalError::UnrankedPattern`] when absent.
    pub fn require(&self, label: &str) -> SignalResult<u32> {
        self.rank(label).ok_or_else(|| SignalError::UnrankedPattern {
            label: label.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Qualified labels of `catalog` that have no rank, in catalog order.
    pub fn missing_labels(&self, catalog: &PatternCatalog) -> Vec<String> {
        catalog
            .iter()
            .flat_map(|id| [qualify(id, Direction::Bull), qualify(id, Direction::Bear)])
            .filter(|label| !self.ranks.contains_key(label))
            .collect()
    }
}

impl TryFrom<HashMap<String, u32>> for RankTable {
    type Error = SignalError;

    fn try_from(ranks: HashMap<String, u32>) -> SignalResult<Self> {
        Self::new(ranks)
    }
}

impl From<RankTable> for HashMap<String, u32> {
    fn from(table: RankTable) -> Self {
        table.ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn pattern_site_covers_talib_catalog() {
        let table = RankTable::pattern_site();
        assert_eq!(table.len(), 112);
        assert!(table.missing_labels(&PatternCatalog::talib()).is_empty());
        assert_eq!(table.rank("CDL3LINESTRIKE_Bull"), Some(1));
        assert_eq!(table.rank("CDLDOJI_Bear"), Some(104));
    }

    #[test]
    fn reports_missing_labels_in_catalog_order() {
        let table = RankTable::new([("A_Bull", 10), ("C_Bear", 3)]).unwrap();
        let catalog = PatternCatalog::new(["A", "B", "C"]).unwrap();
        assert_eq!(
            table.missing_labels(&catalog),
            vec!["A_Bear", "B_Bull", "B_Bear", "C_Bull"]
        );
    }

    #[test]
    fn require_surfaces_unranked_pattern() {
        let table = RankTable::new([("A_Bull", 10)]).unwrap();
        assert_eq!(table.require("A_Bull"), Ok(10));
        assert_eq!(
            table.require("A_Bear"),
            Err(SignalError::UnrankedPattern {
                label: "A_Bear".to_string()
            })
        );
    }

    #[test]
    fn zero_rank_is_rejected() {
        let err = RankTable::new([("A_Bull", 0)]).unwrap_err();
        assert_eq!(
            err,
            SignalError::InvalidRank {
                label: "A_Bull".to_string()
            }
        );
    }

    #[test]
    fn loads_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"A_Bull": 10, "C_Bear": 3}}"#).unwrap();

        let table = RankTable::from_json_file(file.path()).unwrap();
        assert_eq!(table.rank("C_Bear"), Some(3));
        assert_eq!(table.rank("A_Bear"), None);
    }

    #[test]
    fn json_file_with_zero_rank_fails_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"A_Bull": 0}}"#).unwrap();
        assert!(RankTable::from_json_file(file.path()).is_err());
    }
}
