use crate::error::{Result, SignalError};
use crate::indicators::patterns::catalog::PatternCatalog;
use crate::indicators::patterns::labeler::{label, Direction};
use crate::indicators::patterns::rankings::RankTable;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub const NO_PATTERN: &str = "NO_PATTERN";

/// Best pattern for one time step and how many patterns matched there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub pattern_label: String,
    pub match_count: usize,
}

impl ConsensusResult {
    pub fn no_pattern() -> Self {
        Self {
            pattern_label: NO_PATTERN.to_string(),
            match_count: 0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.match_count > 0
    }

    pub fn direction(&self) -> Option<Direction> {
        Direction::of_label(&self.pattern_label)
    }

    pub fn is_bullish(&self) -> bool {
        self.direction() == Some(Direction::Bull)
    }

    pub fn is_bearish(&self) -> bool {
        self.direction() == Some(Direction::Bear)
    }
}

/// Collapses a row of raw pattern signals into a single [`ConsensusResult`].
///
/// The resolver holds no per-row state; it can be shared across threads and
/// cloned cheaply since the rank table sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ConsensusResolver {
    catalog: PatternCatalog,
    rankings: Arc<RankTable>,
}

impl ConsensusResolver {
    pub fn new(catalog: PatternCatalog, rankings: impl Into<Arc<RankTable>>) -> Result<Self> {
        if catalog.is_empty() {
            return Err(SignalError::EmptySignalSet);
        }

        let rankings = rankings.into();
        let missing = rankings.missing_labels(&catalog);
        if !missing.is_empty() {
            // Only fatal once a row actually needs one of these ranks
            warn!(
                "{} qualified labels have no rank, first: {}",
                missing.len(),
                missing[0]
            );
        }

        Ok(Self { catalog, rankings })
    }

    /// Resolver over the TA-Lib catalog ranked by thepatternsite.com.
    pub fn pattern_site() -> Self {
        Self {
            catalog: PatternCatalog::talib(),
            rankings: Arc::new(RankTable::pattern_site()),
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn rankings(&self) -> &RankTable {
        &self.rankings
    }

    /// Resolve one row. `signals[i]` is the raw signal for the i-th catalog
    /// identifier.
    pub fn resolve(&self, signals: &[i32]) -> Result<ConsensusResult> {
        if signals.len() != self.catalog.len() {
            return Err(SignalError::RowWidthMismatch {
                expected: self.catalog.len(),
                actual: signals.len(),
            });
        }

        let nonzero: Vec<(&str, i32)> = self
            .catalog
            .iter()
            .zip(signals.iter().copied())
            .filter(|(_, signal)| *signal != 0)
            .collect();

        match nonzero.as_slice() {
            [] => Ok(ConsensusResult::no_pattern()),
            [(identifier, signal)] => Ok(ConsensusResult {
                pattern_label: label(identifier, *signal),
                match_count: 1,
            }),
            [first, rest @ ..] => self.best_ranked(*first, rest),
        }
    }

    // Multiple matches: lowest rank wins, ties go to the earliest identifier
    fn best_ranked(&self, first: (&str, i32), rest: &[(&str, i32)]) -> Result<ConsensusResult> {
        let (identifier, signal) = first;
        let mut best_label = label(identifier, signal);
        let mut best_rank = self.rankings.require(&best_label)?;

        for (identifier, signal) in rest {
            let qualified = label(identifier, *signal);
            let rank = self.rankings.require(&qualified)?;
            if rank < best_rank {
                best_label = qualified;
                best_rank = rank;
            }
        }

        let match_count = rest.len() + 1;
        debug!(
            "Selected {} (rank {}) out of {} matches",
            best_label, best_rank, match_count
        );
        Ok(ConsensusResult {
            pattern_label: best_label,
            match_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(ids: &[&str], ranks: &[(&str, u32)]) -> ConsensusResolver {
        ConsensusResolver::new(
            PatternCatalog::new(ids.iter().copied()).unwrap(),
            RankTable::new(ranks.iter().copied()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn no_match_yields_sentinel() {
        let r = resolver(&["A", "B"], &[]);
        assert_eq!(r.resolve(&[0, 0]).unwrap(), ConsensusResult::no_pattern());
    }

    #[test]
    fn single_match_needs_no_rank() {
        let r = resolver(&["A", "B"], &[]);
        let result = r.resolve(&[-100, 0]).unwrap();
        assert_eq!(result.pattern_label, "A_Bear");
        assert_eq!(result.match_count, 1);
        assert!(result.is_bearish());
    }

    #[test]
    fn multi_match_picks_lowest_rank() {
        let r = resolver(&["A", "B", "C"], &[("A_Bull", 10), ("C_Bear", 3)]);
        let result = r.resolve(&[100, 0, -100]).unwrap();
        assert_eq!(
            result,
            ConsensusResult {
                pattern_label: "C_Bear".to_string(),
                match_count: 2
            }
        );
    }

    #[test]
    fn ties_go_to_first_identifier() {
        let r = resolver(&["A", "B", "C"], &[("A_Bull", 9), ("B_Bull", 4), ("C_Bull", 4)]);
        let result = r.resolve(&[200, 100, 100]).unwrap();
        assert_eq!(result.pattern_label, "B_Bull");
        assert_eq!(result.match_count, 3);
    }

    #[test]
    fn first_match_is_ranked_like_the_rest() {
        let r = resolver(&["A", "B", "C"], &[("B_Bear", 2), ("C_Bull", 2)]);
        assert_eq!(
            r.resolve(&[100, -100, 100]).unwrap_err(),
            SignalError::UnrankedPattern {
                label: "A_Bull".to_string()
            }
        );

        // An earliest match holding the minimum rank keeps it
        let r = resolver(&["A", "B"], &[("A_Bear", 1), ("B_Bull", 1)]);
        let result = r.resolve(&[-100, 100]).unwrap();
        assert_eq!(result.pattern_label, "A_Bear");
        assert_eq!(result.match_count, 2);
    }

    #[test]
    fn unranked_label_in_multi_match_is_an_error() {
        // The missing label is not the would-be winner; still an error
        let r = resolver(&["A", "B"], &[("A_Bull", 1)]);
        let err = r.resolve(&[100, -100]).unwrap_err();
        assert_eq!(
            err,
            SignalError::UnrankedPattern {
                label: "B_Bear".to_string()
            }
        );
    }

    #[test]
    fn row_width_must_match_catalog() {
        let r = resolver(&["A", "B"], &[]);
        assert_eq!(
            r.resolve(&[0, 0, 0]).unwrap_err(),
            SignalError::RowWidthMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn pattern_site_resolver_ranks_talib_rows() {
        let r = ConsensusResolver::pattern_site();
        let mut row = vec![0; r.catalog().len()];
        let position = |id: &str| r.catalog().iter().position(|c| c == id).unwrap();

        row[position("CDLDOJI")] = 100;
        row[position("CDLENGULFING")] = -100;
        row[position("CDLHAMMER")] = 100;

        let result = r.resolve(&row).unwrap();
        assert_eq!(result.pattern_label, "CDLHAMMER_Bull");
        assert_eq!(result.match_count, 3);
    }
}
