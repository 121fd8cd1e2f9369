use serde::{Deserialize, Serialize};
use std::fmt;

pub const BULL_SUFFIX: &str = "_Bull";
pub const BEAR_SUFFIX: &str = "_Bear";

/// Direction of a matched candlestick pattern, taken from the signal's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Bull,
    Bear,
}

impl Direction {
    // None for a zero signal (no match)
    pub fn from_signal(signal: i32) -> Option<Self> {
        match signal {
            0 => None,
            s if s > 0 => Some(Direction::Bull),
            _ => Some(Direction::Bear),
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Bull => BULL_SUFFIX,
            Direction::Bear => BEAR_SUFFIX,
        }
    }

    /// Direction encoded in a qualified label, if any.
    pub fn of_label(label: &str) -> Option<Self> {
        if label.ends_with(BULL_SUFFIX) {
            Some(Direction::Bull)
        } else if label.ends_with(BEAR_SUFFIX) {
            Some(Direction::Bear)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Bull => write!(f, "bull"),
            Direction::Bear => write!(f, "bear"),
        }
    }
}

/// Qualify a pattern identifier with the direction of a nonzero signal.
///
/// Callers filter out zero signals first; a zero is labelled bearish, the
/// same as the `else` branch of the sign test.
pub fn label(identifier: &str, signal: i32) -> String {
    let direction = if signal > 0 { Direction::Bull } else { Direction::Bear };
    qualify(identifier, direction)
}

pub fn qualify(identifier: &str, direction: Direction) -> String {
    let suffix = direction.suffix();
    let mut qualified = String::with_capacity(identifier.len() + suffix.len());
    qualified.push_str(identifier);
    qualified.push_str(suffix);
    qualified
}
