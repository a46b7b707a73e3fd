//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Rack state and derived-field construction."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::round::round1;

/// Workload intensity band, derived from the raw inlet temperature at
/// generation time and fixed thereafter. Simulation changes temperature and
/// category but never the load band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadBand {
    Nominal,
    Elevated,
    Peak,
}

impl LoadBand {
    /// Band thresholds apply to the raw (pre-rounding) inlet temperature.
    pub fn from_inlet(inlet_temp: f64) -> Self {
        if inlet_temp > 31.5 {
            LoadBand::Peak
        } else if inlet_temp > 29.0 {
            LoadBand::Elevated
        } else {
            LoadBand::Nominal
        }
    }
}

/// One equipment rack with its thermal reading.
///
/// Fields are private: the only constructors round the reading to one
/// decimal and then derive `thermal_margin` and `category` from the stored
/// values, so no code path can hold a category the classifier disagrees
/// with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    id: String,
    zone: String,
    row: char,
    col: usize,
    threshold: f64,
    inlet_temp: f64,
    thermal_margin: f64,
    category: Category,
    load_band: LoadBand,
}

impl Rack {
    /// Build a rack from a raw telemetry reading.
    ///
    /// `row` is the hall row letter (`A`..`Z`), `col` the 1-based column.
    pub fn from_reading(
        row: char,
        col: usize,
        threshold: f64,
        inlet_temp: f64,
        load_band: LoadBand,
    ) -> Self {
        Self::assemble(
            format!("R{row}{col:02}"),
            format!("Zone-{row}"),
            row,
            col,
            round1(threshold),
            inlet_temp,
            load_band,
        )
    }

    /// Derived copy with a new inlet temperature. Identity, threshold, and
    /// load band carry through; margin and category are recomputed.
    pub fn with_inlet(&self, inlet_temp: f64) -> Self {
        Self::assemble(
            self.id.clone(),
            self.zone.clone(),
            self.row,
            self.col,
            self.threshold,
            inlet_temp,
            self.load_band,
        )
    }

    // `threshold` must already be rounded here.
    fn assemble(
        id: String,
        zone: String,
        row: char,
        col: usize,
        threshold: f64,
        inlet_temp: f64,
        load_band: LoadBand,
    ) -> Self {
        let inlet_temp = round1(inlet_temp);
        let thermal_margin = round1(threshold - inlet_temp);
        let category = Category::classify(thermal_margin, inlet_temp, threshold);
        Self {
            id,
            zone,
            row,
            col,
            threshold,
            inlet_temp,
            thermal_margin,
            category,
            load_band,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    /// Safe-operation ceiling in °C, fixed for the lifetime of a snapshot.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn inlet_temp(&self) -> f64 {
        self.inlet_temp
    }

    /// Remaining safety buffer: `threshold - inlet_temp`.
    pub fn thermal_margin(&self) -> f64 {
        self.thermal_margin
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn load_band(&self) -> LoadBand {
        self.load_band
    }
}
