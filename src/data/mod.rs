pub mod models;

pub use models::{AnnotatedCandle, CandleData};
