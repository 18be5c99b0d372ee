//! Direction marker groups.

use serde::Serialize;
use spyglass_core::{Bar, Direction};

/// Long markers sit just below the candle low.
pub const LONG_OFFSET: f32 = 0.99;
/// Short markers sit just above the candle high.
pub const SHORT_OFFSET: f32 = 1.01;

/// Fixed glyph description for a marker group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub symbol: &'static str,
    pub color: &'static str,
    pub size: u32,
}

pub const LONG_STYLE: MarkerStyle = MarkerStyle {
    symbol: "triangle-up",
    color: "green",
    size: 15,
};

pub const SHORT_STYLE: MarkerStyle = MarkerStyle {
    symbol: "triangle-down",
    color: "red",
    size: 15,
};

pub const NEUTRAL_STYLE: MarkerStyle = MarkerStyle {
    symbol: "circle",
    color: "yellow",
    size: 10,
};

/// One marker group: aligned positions plus the group's glyph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerTrace {
    pub style: MarkerStyle,
    pub x: Vec<f64>,
    pub y: Vec<f32>,
}

impl MarkerTrace {
    fn with_style(style: MarkerStyle) -> Self {
        Self {
            style,
            x: Vec::new(),
            y: Vec::new(),
        }
    }

    fn push(&mut self, x: f64, y: f32) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// The three marker groups of a frame, partitioned by bar direction.
///
/// Every bar lands in exactly one group; any group may be empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionMarkers {
    pub long: MarkerTrace,
    pub short: MarkerTrace,
    pub neutral: MarkerTrace,
}

impl DirectionMarkers {
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut markers = Self {
            long: MarkerTrace::with_style(LONG_STYLE),
            short: MarkerTrace::with_style(SHORT_STYLE),
            neutral: MarkerTrace::with_style(NEUTRAL_STYLE),
        };

        for bar in bars {
            match bar.direction {
                Direction::Long => markers.long.push(bar.timestamp, bar.low * LONG_OFFSET),
                Direction::Short => markers.short.push(bar.timestamp, bar.high * SHORT_OFFSET),
                Direction::Neutral => markers.neutral.push(bar.timestamp, bar.close),
            }
        }

        markers
    }

    pub fn total(&self) -> usize {
        self.long.len() + self.short.len() + self.neutral.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: f64, direction: Direction) -> Bar {
        let mut bar = Bar::new(ts, 100.0, 105.0, 99.0, 102.0, 1000);
        bar.direction = direction;
        bar
    }

    #[test]
    fn test_partition_is_exclusive() {
        let bars = vec![
            bar(1.0, Direction::Long),
            bar(2.0, Direction::Short),
            bar(3.0, Direction::Neutral),
        ];
        let markers = DirectionMarkers::from_bars(&bars);

        assert_eq!(markers.long.x, vec![1.0]);
        assert_eq!(markers.short.x, vec![2.0]);
        assert_eq!(markers.neutral.x, vec![3.0]);
        assert_eq!(markers.total(), bars.len());
    }

    #[test]
    fn test_marker_positions() {
        let bars = vec![
            bar(1.0, Direction::Long),
            bar(2.0, Direction::Short),
            bar(3.0, Direction::Neutral),
        ];
        let markers = DirectionMarkers::from_bars(&bars);

        assert!((markers.long.y[0] - 99.0 * 0.99).abs() < 1e-4);
        assert!((markers.short.y[0] - 105.0 * 1.01).abs() < 1e-4);
        assert_eq!(markers.neutral.y[0], 102.0);
    }

    #[test]
    fn test_groups_may_be_empty() {
        let markers = DirectionMarkers::from_bars(&[bar(1.0, Direction::Long)]);
        assert!(markers.short.is_empty());
        assert!(markers.neutral.is_empty());
        assert_eq!(markers.long.len(), 1);
    }
}
