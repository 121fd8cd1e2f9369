pub mod job;
pub mod worker;

pub use job::{ErrorPolicy, RowOutcome};
pub use worker::{BatchConfig, BatchResolver};
