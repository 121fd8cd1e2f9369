pub mod frame;
pub mod patterns;

pub use self::frame::IndicatorFrame;

/// Column names the bundled strategies read from an indicator frame.
pub mod columns {
    pub const RSI: &str = "rsi";
    pub const EMA_FAST: &str = "ema5";
    pub const EMA_SLOW: &str = "ema21";
    pub const ATR: &str = "atr";
    pub const MACD: &str = "macd";
    pub const MACD_SIGNAL: &str = "macd_signal";
    pub const KC_UPPER: &str = "kc_upper";
    pub const KC_LOWER: &str = "kc_lower";
    pub const BBAND_LOW: &str = "bband_low";
    pub const INNER_BBAND_LOW: &str = "inner_bband_low";
    pub const FORECAST: &str = "forecast";
}
