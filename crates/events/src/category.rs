//! Severity categories (Hobday et al. 2018).
//!
//! A time step's category is `floor(1 + relThreshNorm)`, i.e. how many
//! multiples of the threshold-minus-climatology difference the temperature
//! reaches above the seasonal mean.

use std::fmt;

use mhw_stats::nanmax;

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Category 1.
    Moderate,
    /// Category 2.
    Strong,
    /// Category 3.
    Severe,
    /// Category 4 and above.
    Extreme,
}

impl Category {
    /// All categories in increasing severity.
    pub const ALL: [Category; 4] = [
        Category::Moderate,
        Category::Strong,
        Category::Severe,
        Category::Extreme,
    ];

    /// Category from a 0-based index, clamped to `0..=3`.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.clamp(0, 3) as usize]
    }

    /// 1-based severity level.
    pub fn level(self) -> u8 {
        self as u8 + 1
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Moderate => "Moderate",
            Self::Strong => "Strong",
            Self::Severe => "Severe",
            Self::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-step category values `floor(1 + relThreshNorm)`; NaN stays NaN.
pub fn step_categories(rel_thresh_norm: &[f64]) -> Vec<f64> {
    rel_thresh_norm.iter().map(|x| (1.0 + x).floor()).collect()
}

/// Category of an event from its per-step values.
///
/// The largest step value is clamped into `[1, 4]` and shifted to a 0-based
/// index. Values below 1, including `-inf` from a threshold equal to the
/// seasonal mean, are reported as [`Category::Moderate`].
pub fn event_category(cats: &[f64]) -> Category {
    let peak = nanmax(cats);
    if peak.is_nan() {
        return Category::Moderate;
    }
    Category::from_index((peak.clamp(1.0, 4.0) - 1.0) as i64)
}

/// Number of steps at exactly each severity level, Moderate first.
pub fn category_durations(cats: &[f64]) -> [usize; 4] {
    Category::ALL.map(|category| {
        let level = f64::from(category.level());
        cats.iter().filter(|&&c| c == level).count()
    })
}
