//! Support/resistance band polygons.

use serde::Serialize;
use spyglass_core::Bar;

/// Which level list a band is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandKind {
    Support,
    Resistance,
}

impl BandKind {
    /// Fill color used by renderers for this band.
    pub fn fill_color(self) -> &'static str {
        match self {
            BandKind::Support => "rgba(0,255,0,0.2)",
            BandKind::Resistance => "rgba(255,0,0,0.2)",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BandKind::Support => "Support Band",
            BandKind::Resistance => "Resistance Band",
        }
    }

    fn levels(self, bar: &Bar) -> &[f32] {
        match self {
            BandKind::Support => &bar.support,
            BandKind::Resistance => &bar.resistance,
        }
    }
}

/// A closed shaded region: upper band edge walked forward, lower edge
/// walked back.
///
/// `x` and `y` always have equal length. The outline self-closes without
/// crossing because the bars it is built from are time-sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandTrace {
    pub kind: BandKind,
    pub x: Vec<f64>,
    pub y: Vec<f32>,
}

impl BandTrace {
    /// Build the band polygon for `kind` over the given bars.
    ///
    /// Bars with no levels for the kind contribute nothing. Returns
    /// `None` when no bar carries levels at all; the band is absent from
    /// the frame rather than degenerate. A single-level bar yields a
    /// zero-height segment, which is valid.
    pub fn from_bars(bars: &[Bar], kind: BandKind) -> Option<Self> {
        let mut xs = Vec::new();
        let mut upper = Vec::new();
        let mut lower = Vec::new();

        for bar in bars {
            let levels = kind.levels(bar);
            if levels.is_empty() {
                continue;
            }
            let hi = levels.iter().copied().fold(f32::MIN, f32::max);
            let lo = levels.iter().copied().fold(f32::MAX, f32::min);
            xs.push(bar.timestamp);
            upper.push(hi);
            lower.push(lo);
        }

        if xs.is_empty() {
            return None;
        }

        let mut x = xs.clone();
        x.extend(xs.iter().rev());
        let mut y = upper;
        y.extend(lower.iter().rev());

        Some(Self { kind, x, y })
    }
}
