use crate::error::{Result, SignalError};
use crate::indicators::patterns::catalog::PatternCatalog;

/// Source of raw pattern signals, one signed strength per identifier per step.
///
/// Implementations only expose values computed elsewhere (TA-Lib, an
/// upstream service, a stored frame); nothing here recognizes patterns.
pub trait PatternSignalProvider: Sync {
    /// Number of time steps available.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw signal for `identifier` at `index`, `None` when the provider has no
    /// column for that identifier.
    fn signal(&self, index: usize, identifier: &str) -> Option<i32>;

    /// The full row for `index`, ordered like `catalog`.
    fn row(&self, index: usize, catalog: &PatternCatalog) -> Result<Vec<i32>> {
        if index >= self.len() {
            return Err(SignalError::RowOutOfRange {
                index,
                len: self.len(),
            });
        }
        catalog
            .iter()
            .map(|identifier| {
                self.signal(index, identifier)
                    .ok_or_else(|| SignalError::MissingPatternColumn {
                        identifier: identifier.to_string(),
                    })
            })
            .collect()
    }
}

/// Plain in-memory rows, already ordered like the catalog they were built for.
#[derive(Debug, Clone)]
pub struct SignalRows {
    catalog: PatternCatalog,
    rows: Vec<Vec<i32>>,
}

impl SignalRows {
    pub fn new(catalog: PatternCatalog, rows: Vec<Vec<i32>>) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|row| row.len() != catalog.len()) {
            return Err(SignalError::RowWidthMismatch {
                expected: catalog.len(),
                actual: bad.len(),
            });
        }
        Ok(Self { catalog, rows })
    }
}

impl PatternSignalProvider for SignalRows {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn signal(&self, index: usize, identifier: &str) -> Option<i32> {
        let position = self.catalog.iter().position(|id| id == identifier)?;
        self.rows.get(index).map(|row| row[position])
    }

    fn row(&self, index: usize, catalog: &PatternCatalog) -> Result<Vec<i32>> {
        let row = self.rows.get(index).ok_or(SignalError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })?;

        // Fast path when asked for the catalog the rows were built with
        if &self.catalog == catalog {
            return Ok(row.clone());
        }

        catalog
            .iter()
            .map(|identifier| {
                self.catalog
                    .iter()
                    .position(|id| id == identifier)
                    .map(|position| row[position])
                    .ok_or_else(|| SignalError::MissingPatternColumn {
                        identifier: identifier.to_string(),
                    })
            })
            .collect()
    }
}
