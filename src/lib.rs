// Export all necessary modules
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod processor;
pub mod strategy;
pub mod utils;

// Commonly used types
pub use config::Settings;
pub use data::{AnnotatedCandle, CandleData};
pub use error::{Result, SignalError};
pub use indicators::patterns::{
    ConsensusResolver, ConsensusResult, PatternCatalog, PatternSignalProvider, RankTable,
    NO_PATTERN,
};
pub use indicators::IndicatorFrame;
pub use processor::{BatchConfig, BatchResolver, ErrorPolicy, RowOutcome};
pub use strategy::{SignalMarker, SignalStrategy, StrategyEvaluator};
