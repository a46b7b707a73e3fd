//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Risk category taxonomy and classification rules."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::fmt;

use serde::{Deserialize, Serialize};

/// Margin below which a rack is considered critical, in degrees Celsius.
pub(crate) const CRITICAL_MARGIN_C: f64 = 1.8;
const FRAGILE_MARGIN_C: f64 = 3.0;
const TIGHT_MARGIN_C: f64 = 4.5;

/// Headroom risk category for a rack, ordered from safest to most at-risk.
///
/// The declaration order is the total order used by worst-case reductions
/// and by the simulator's ranking; comparisons go through the discriminant,
/// never through the serialized name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Stable,
    Tight,
    Fragile,
    Critical,
}

impl Category {
    /// All categories in ascending risk order.
    pub const ORDER: [Category; 4] = [
        Category::Stable,
        Category::Tight,
        Category::Fragile,
        Category::Critical,
    ];

    /// Position in the total order.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Stable => "Stable",
            Category::Tight => "Tight",
            Category::Fragile => "Fragile",
            Category::Critical => "Critical",
        }
    }

    /// Classify a rack reading. Rules are evaluated in order, first match wins:
    ///
    /// 1. inlet above threshold, or margin below 1.8 °C → `Critical`
    /// 2. margin below 3.0 °C → `Fragile`
    /// 3. margin below 4.5 °C → `Tight`
    /// 4. otherwise → `Stable`
    ///
    /// Total over all real-valued inputs; there is no error path.
    pub fn classify(thermal_margin: f64, inlet_temp: f64, threshold: f64) -> Self {
        if inlet_temp > threshold || thermal_margin < CRITICAL_MARGIN_C {
            return Category::Critical;
        }
        if thermal_margin < FRAGILE_MARGIN_C {
            return Category::Fragile;
        }
        if thermal_margin < TIGHT_MARGIN_C {
            return Category::Tight;
        }
        Category::Stable
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
