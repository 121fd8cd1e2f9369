use crate::data::models::{AnnotatedCandle, CandleData};
use crate::error::{Result, SignalError};
use crate::indicators::patterns::{ConsensusResolver, ConsensusResult, PatternSignalProvider};
use crate::processor::job::{ErrorPolicy, RowOutcome};
use anyhow::Context;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub parallel: bool,
    pub min_parallel_rows: usize,
    pub worker_threads: usize,
    pub on_error: ErrorPolicy,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: 1024,       // Below this, thread hand-off costs more than it saves
            worker_threads: num_cpus::get(),
            on_error: ErrorPolicy::Abort,
        }
    }
}

/// Runs a [`ConsensusResolver`] over every row a provider exposes.
///
/// Rows are independent, so large batches are split across a dedicated rayon
/// pool. Output order always follows row order and matches a sequential run.
#[derive(Debug, Clone)]
pub struct BatchResolver {
    resolver: ConsensusResolver,
    config: BatchConfig,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl BatchResolver {
    pub fn new(resolver: ConsensusResolver, config: BatchConfig) -> anyhow::Result<Self> {
        let pool = if config.parallel {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("consensus-worker-{}", i))
                .build()
                .context("Failed to build consensus worker pool")?;
            info!(
                "Consensus worker pool ready with {} threads",
                pool.current_num_threads()
            );
            Some(Arc::new(pool))
        } else {
            None
        };

        Ok(Self {
            resolver,
            config,
            pool,
        })
    }

    /// Sequential batch resolver, no thread pool.
    pub fn sequential(resolver: ConsensusResolver) -> Self {
        Self {
            resolver,
            config: BatchConfig {
                parallel: false,
                ..BatchConfig::default()
            },
            pool: None,
        }
    }

    pub fn resolver(&self) -> &ConsensusResolver {
        &self.resolver
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Resolve every row, failing on the first (lowest index) row that
    /// cannot be classified.
    #[instrument(skip(self, provider), fields(rows = provider.len()))]
    pub fn resolve_frame<P>(&self, provider: &P) -> Result<Vec<ConsensusResult>>
    where
        P: PatternSignalProvider + ?Sized,
    {
        let started = Instant::now();
        let results: Result<Vec<ConsensusResult>> = self
            .run(provider.len(), |index| self.resolve_index(provider, index))
            .into_iter()
            .collect();

        match &results {
            Ok(rows) => info!("Resolved {} rows in {:.2?}", rows.len(), started.elapsed()),
            Err(e) => warn!("Batch aborted: {}", e),
        }
        results
    }

    /// Resolve every row, reporting failures per row instead of aborting.
    #[instrument(skip(self, provider), fields(rows = provider.len()))]
    pub fn resolve_rows<P>(&self, provider: &P) -> Vec<RowOutcome>
    where
        P: PatternSignalProvider + ?Sized,
    {
        let started = Instant::now();
        let outcomes: Vec<RowOutcome> = self.run(provider.len(), |index| {
            RowOutcome::from((index, self.resolve_index(provider, index)))
        });

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        for outcome in outcomes.iter().filter(|o| o.is_failed()).take(5) {
            if let RowOutcome::Failed { index, error } = outcome {
                warn!("Row {} left unclassified: {}", index, error);
            }
        }
        info!(
            "Resolved {} rows ({} failed) in {:.2?}",
            outcomes.len() - failed,
            failed,
            started.elapsed()
        );
        outcomes
    }

    /// Resolve according to the configured [`ErrorPolicy`].
    pub fn process<P>(&self, provider: &P) -> Result<Vec<RowOutcome>>
    where
        P: PatternSignalProvider + ?Sized,
    {
        match self.config.on_error {
            ErrorPolicy::Abort => Ok(self
                .resolve_frame(provider)?
                .into_iter()
                .map(RowOutcome::Resolved)
                .collect()),
            ErrorPolicy::MarkFailed => Ok(self.resolve_rows(provider)),
        }
    }

    /// Attach `pattern_label` and `match_count` to every candle.
    pub fn annotate<P>(&self, candles: &CandleData, provider: &P) -> Result<Vec<AnnotatedCandle>>
    where
        P: PatternSignalProvider + ?Sized,
    {
        candles.validate()?;
        if provider.len() != candles.len() {
            return Err(SignalError::LengthMismatch {
                name: "patterns".to_string(),
                expected: candles.len(),
                actual: provider.len(),
            });
        }

        let results = self.resolve_frame(provider)?;
        Ok(results
            .into_iter()
            .enumerate()
            .map(|(i, result)| AnnotatedCandle {
                open_time: candles.open_time[i],
                open: candles.open[i],
                high: candles.high[i],
                low: candles.low[i],
                close: candles.close[i],
                volume: candles.volume[i],
                pattern_label: result.pattern_label,
                match_count: result.match_count,
            })
            .collect())
    }

    fn resolve_index<P>(&self, provider: &P, index: usize) -> Result<ConsensusResult>
    where
        P: PatternSignalProvider + ?Sized,
    {
        let row = provider.row(index, self.resolver.catalog())?;
        self.resolver.resolve(&row)
    }

    fn run<T, F>(&self, rows: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match &self.pool {
            Some(pool) if rows >= self.config.min_parallel_rows => {
                debug!("Resolving {} rows on {} threads", rows, pool.current_num_threads());
                pool.install(|| (0..rows).into_par_iter().map(&f).collect())
            }
            _ => {
                debug!("Resolving {} rows sequentially", rows);
                (0..rows).map(f).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::patterns::{PatternCatalog, RankTable, SignalRows};

    fn resolver() -> ConsensusResolver {
        ConsensusResolver::new(
            PatternCatalog::new(["A", "B", "C"]).unwrap(),
            RankTable::new([("A_Bull", 10), ("C_Bear", 3)]).unwrap(),
        )
        .unwrap()
    }

    fn rows(rows: Vec<Vec<i32>>) -> SignalRows {
        SignalRows::new(PatternCatalog::new(["A", "B", "C"]).unwrap(), rows).unwrap()
    }

    #[test]
    fn abort_reports_first_failing_row() {
        let batch = BatchResolver::sequential(resolver());
        let provider = rows(vec![vec![0, 0, 0], vec![0, 100, 100], vec![-100, 0, -100]]);

        let err = batch.resolve_frame(&provider).unwrap_err();
        assert_eq!(
            err,
            SignalError::UnrankedPattern {
                label: "B_Bull".to_string()
            }
        );
    }

    #[test]
    fn mark_failed_keeps_good_rows() {
        let config = BatchConfig {
            parallel: false,
            on_error: ErrorPolicy::MarkFailed,
            ..BatchConfig::default()
        };
        let batch = BatchResolver::new(resolver(), config).unwrap();
        let provider = rows(vec![vec![100, 0, -100], vec![0, 100, 100], vec![0, 0, 0]]);

        let outcomes = batch.process(&provider).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].result().unwrap().pattern_label, "C_Bear");
        assert!(outcomes[1].is_failed());
        assert_eq!(outcomes[2].result().unwrap().match_count, 0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let config = BatchConfig {
            parallel: true,
            min_parallel_rows: 1,
            worker_threads: 4,
            on_error: ErrorPolicy::Abort,
        };
        let parallel = BatchResolver::new(resolver(), config).unwrap();
        let sequential = BatchResolver::sequential(resolver());

        // Only A_Bull and C_Bear ever appear, both ranked
        let provider = rows(
            (0..500)
                .map(|i| vec![[0, 100][i % 2], 0, [0, -100][(i / 3) % 2]])
                .collect(),
        );

        assert_eq!(
            parallel.resolve_frame(&provider).unwrap(),
            sequential.resolve_frame(&provider).unwrap()
        );
    }
}
