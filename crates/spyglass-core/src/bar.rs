//! Annotated OHLCV bar.

use crate::Direction;

/// One observation: an OHLCV candle plus its annotations.
///
/// `support` and `resistance` hold the watched price levels recorded for
/// this period; either may be empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Unix timestamp in seconds. Sort key of the table.
    pub timestamp: f64,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
    pub volume: u64,
    /// Trading bias for this period.
    pub direction: Direction,
    /// Watched support levels, possibly empty.
    pub support: Vec<f32>,
    /// Watched resistance levels, possibly empty.
    pub resistance: Vec<f32>,
}

impl Bar {
    pub fn new(timestamp: f64, open: f32, high: f32, low: f32, close: f32, volume: u64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            direction: Direction::Neutral,
            support: Vec::new(),
            resistance: Vec::new(),
        }
    }

    /// Structural sanity check: finite positive prices with high/low
    /// actually bracketing the body.
    pub fn is_sane(&self) -> bool {
        self.timestamp.is_finite()
            && self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.open > 0.0
            && self.close > 0.0
            && self.low > 0.0
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sane_bar() {
        let bar = Bar::new(1000.0, 100.0, 105.0, 95.0, 102.0, 1000);
        assert!(bar.is_sane());
    }

    #[test]
    fn test_high_below_body() {
        let bar = Bar::new(1000.0, 100.0, 101.0, 95.0, 102.0, 1000);
        assert!(!bar.is_sane());
    }

    #[test]
    fn test_non_finite_price() {
        let bar = Bar::new(1000.0, f32::NAN, 105.0, 95.0, 102.0, 1000);
        assert!(!bar.is_sane());
    }

    #[test]
    fn test_zero_price() {
        let bar = Bar::new(1000.0, 0.0, 105.0, 0.0, 102.0, 1000);
        assert!(!bar.is_sane());
    }
}
