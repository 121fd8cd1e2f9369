//! Property-based tests for the consensus resolver.
//!
//! These tests verify that:
//! 1. `match_count` is the number of nonzero signals in the row
//! 2. zero, one and many matches produce the label shape they promise
//! 3. the winning label carries the minimum rank, earliest on ties
//! 4. batch resolution is deterministic and independent of parallelism

use proptest::prelude::*;

use trading_signal_calculator::indicators::patterns::{
    label, ConsensusResolver, PatternCatalog, RankTable, SignalRows, NO_PATTERN,
};
use trading_signal_calculator::processor::{BatchConfig, BatchResolver, ErrorPolicy};

const WIDTH: usize = 8;

fn identifiers() -> Vec<String> {
    (0..WIDTH).map(|i| format!("CDLP{}", i)).collect()
}

/// A TA-Lib style signal, mostly zero
fn signal_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![
        6 => Just(0),
        1 => Just(100),
        1 => Just(-100),
        1 => Just(200),
        1 => Just(-200),
    ]
}

fn row_strategy() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(signal_strategy(), WIDTH)
}

/// Fully ranked table with a small rank range so ties are common
fn ranks_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(1u32..5, WIDTH * 2)
}

fn resolver(ranks: &[u32]) -> ConsensusResolver {
    let entries: Vec<(String, u32)> = identifiers()
        .iter()
        .enumerate()
        .flat_map(|(i, id)| {
            [
                (label(id, 1), ranks[2 * i]),
                (label(id, -1), ranks[2 * i + 1]),
            ]
        })
        .collect();
    ConsensusResolver::new(
        PatternCatalog::new(identifiers()).unwrap(),
        RankTable::new(entries).unwrap(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn match_count_is_number_of_nonzero_signals(row in row_strategy(), ranks in ranks_strategy()) {
        let result = resolver(&ranks).resolve(&row).unwrap();
        let nonzero = row.iter().filter(|s| **s != 0).count();

        prop_assert_eq!(result.match_count, nonzero);
        prop_assert_eq!(result.match_count == 0, result.pattern_label == NO_PATTERN);
    }

    #[test]
    fn single_match_labels_that_pattern(
        position in 0..WIDTH,
        signal in prop_oneof![Just(100), Just(-100), Just(200), Just(-200)],
        ranks in ranks_strategy(),
    ) {
        let mut row = vec![0; WIDTH];
        row[position] = signal;

        let result = resolver(&ranks).resolve(&row).unwrap();
        prop_assert_eq!(result.match_count, 1);
        prop_assert_eq!(result.pattern_label, label(&identifiers()[position], signal));
    }

    #[test]
    fn winner_has_minimum_rank_and_earliest_position(row in row_strategy(), ranks in ranks_strategy()) {
        let resolver = resolver(&ranks);
        let result = resolver.resolve(&row).unwrap();
        prop_assume!(result.match_count > 1);

        let ids = identifiers();
        let candidates: Vec<(usize, String, u32)> = row
            .iter()
            .enumerate()
            .filter(|(_, s)| **s != 0)
            .map(|(i, s)| {
                let qualified = label(&ids[i], *s);
                let rank = resolver.rankings().rank(&qualified).unwrap();
                (i, qualified, rank)
            })
            .collect();

        let min_rank = candidates.iter().map(|(_, _, r)| *r).min().unwrap();
        let expected = candidates
            .iter()
            .find(|(_, _, r)| *r == min_rank)
            .map(|(_, l, _)| l.clone())
            .unwrap();

        prop_assert_eq!(result.pattern_label, expected);
    }

    #[test]
    fn resolution_is_deterministic(row in row_strategy(), ranks in ranks_strategy()) {
        let resolver = resolver(&ranks);
        prop_assert_eq!(resolver.resolve(&row).unwrap(), resolver.resolve(&row).unwrap());
    }

    #[test]
    fn parallel_batch_matches_row_by_row(
        rows in prop::collection::vec(row_strategy(), 0..64),
        ranks in ranks_strategy(),
    ) {
        let resolver = resolver(&ranks);
        let provider = SignalRows::new(resolver.catalog().clone(), rows.clone()).unwrap();
        let config = BatchConfig {
            parallel: true,
            min_parallel_rows: 1,
            worker_threads: 3,
            on_error: ErrorPolicy::Abort,
        };
        let batch = BatchResolver::new(resolver.clone(), config).unwrap();

        let expected: Vec<_> = rows.iter().map(|row| resolver.resolve(row).unwrap()).collect();
        prop_assert_eq!(batch.resolve_frame(&provider).unwrap(), expected);
    }
}
