//! The load-once bar table.

use crate::Bar;

/// An ordered collection of bars, non-decreasing by timestamp.
///
/// A table is built once per session and only read afterwards; all
/// derived chart data borrows from it.
#[derive(Debug, Clone, Default)]
pub struct Table {
    bars: Vec<Bar>,
}

impl Table {
    /// Build a table from unordered bars.
    ///
    /// Sorts ascending by timestamp with a stable sort, so rows sharing a
    /// timestamp keep their input order.
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// The first `count` bars, clamped to the table length.
    pub fn prefix(&self, count: usize) -> &[Bar] {
        &self.bars[..count.min(self.bars.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_at(ts: f64, close: f32) -> Bar {
        Bar::new(ts, close, close + 1.0, close - 1.0, close, 100)
    }

    #[test]
    fn test_sorts_by_timestamp() {
        let table = Table::from_bars(vec![bar_at(300.0, 3.0), bar_at(100.0, 1.0), bar_at(200.0, 2.0)]);
        let ts: Vec<f64> = table.bars().iter().map(|b| b.timestamp).collect();
        assert_eq!(ts, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_stable_on_ties() {
        let table = Table::from_bars(vec![bar_at(100.0, 1.0), bar_at(100.0, 2.0), bar_at(50.0, 3.0)]);
        assert_eq!(table.bars()[1].close, 1.0);
        assert_eq!(table.bars()[2].close, 2.0);
    }

    #[test]
    fn test_prefix_clamps() {
        let table = Table::from_bars(vec![bar_at(1.0, 1.0), bar_at(2.0, 2.0)]);
        assert_eq!(table.prefix(1).len(), 1);
        assert_eq!(table.prefix(10).len(), 2);
    }
}
