// Module exports
pub mod catalog;
pub mod labeler;
pub mod provider;
pub mod rankings;
pub mod resolver;

// Public exports
pub use catalog::{PatternCatalog, EXCLUDED_PATTERNS, TALIB_PATTERNS};
pub use labeler::{label, Direction};
pub use provider::{PatternSignalProvider, SignalRows};
pub use rankings::RankTable;
pub use resolver::{ConsensusResolver, ConsensusResult, NO_PATTERN};
