//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Hall snapshot assembly and derived indicators."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trs_common::config::AppConfig;

use crate::aggregate::{
    count_critical, count_fragile_or_critical, overall_category, stress_rack_index,
};
use crate::category::Category;
use crate::rack::Rack;

/// Legal range for a proposed setpoint change, as advertised to operator
/// tooling. Advisory: the simulator clamps independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for DeltaRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 2.0,
            step: 0.2,
        }
    }
}

/// Static description of the hall being modelled.
#[derive(Debug, Clone)]
pub struct HallProfile {
    pub site: String,
    pub source: String,
    pub rows: usize,
    pub cols: usize,
    pub delta_range: DeltaRange,
}

impl HallProfile {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            site: config.site.name.clone(),
            source: config.site.telemetry_source.clone(),
            rows: config.hall.rows,
            cols: config.hall.cols,
            delta_range: DeltaRange {
                min: config.policy.delta_min,
                max: config.policy.delta_max,
                step: config.policy.delta_step,
            },
        }
    }
}

impl Default for HallProfile {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// One complete, internally consistent reading of the hall.
///
/// Snapshots are immutable once assembled; a refresh produces a whole new
/// snapshot rather than touching an existing one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HallSnapshot {
    timestamp: DateTime<Utc>,
    site: String,
    source: String,
    current_setpoint: f64,
    overall_headroom: Category,
    fragile_or_critical_count: usize,
    critical_count: usize,
    racks: Vec<Rack>,
    stress_rack: Rack,
    allowed_delta_range: DeltaRange,
}

impl HallSnapshot {
    /// Assemble a snapshot, recomputing every derived hall-level indicator
    /// from the rack population.
    ///
    /// The population must be non-empty; hall geometry is validated at
    /// configuration load, so an empty population is a caller defect.
    pub fn assemble(
        site: String,
        source: String,
        current_setpoint: f64,
        racks: Vec<Rack>,
        allowed_delta_range: DeltaRange,
    ) -> Self {
        let stress_index =
            stress_rack_index(&racks).expect("snapshot requires at least one rack");
        Self {
            timestamp: Utc::now(),
            site,
            source,
            current_setpoint,
            overall_headroom: overall_category(&racks),
            fragile_or_critical_count: count_fragile_or_critical(&racks),
            critical_count: count_critical(&racks),
            stress_rack: racks[stress_index].clone(),
            racks,
            allowed_delta_range,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn current_setpoint(&self) -> f64 {
        self.current_setpoint
    }

    /// Worst category across the hall.
    pub fn overall_headroom(&self) -> Category {
        self.overall_headroom
    }

    pub fn fragile_or_critical_count(&self) -> usize {
        self.fragile_or_critical_count
    }

    pub fn critical_count(&self) -> usize {
        self.critical_count
    }

    pub fn racks(&self) -> &[Rack] {
        &self.racks
    }

    /// The rack with the smallest thermal margin.
    pub fn stress_rack(&self) -> &Rack {
        &self.stress_rack
    }

    pub fn allowed_delta_range(&self) -> DeltaRange {
        self.allowed_delta_range
    }
}
