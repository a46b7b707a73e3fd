//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Setpoint what-if projection over a hall snapshot."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
use std::cmp::Ordering;

use serde::Serialize;

use crate::aggregate::{count_critical, count_fragile_or_critical, overall_category};
use crate::category::{Category, CRITICAL_MARGIN_C};
use crate::rack::{LoadBand, Rack};
use crate::round::round1;
use crate::snapshot::HallSnapshot;

/// Hard safety clamp for proposed setpoint deltas. Independent of the
/// advertised `allowedDeltaRange`; must not be loosened even if the range
/// configuration changes.
pub const DELTA_HARD_MIN: f64 = 0.0;
pub const DELTA_HARD_MAX: f64 = 2.0;

/// Deltas above this magnitude count as large, risk-increasing changes for
/// the cooling-safe-range flag.
const LARGE_DELTA_C: f64 = 1.6;

/// Baseline thermal-response coefficient shared by every rack.
const BASE_RESPONSE: f64 = 0.65;

const TOP_AFFECTED_LIMIT: usize = 3;

/// A rack's projected state, carrying its pre-change category and whether
/// the projection moved it across a category boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedRack {
    #[serde(flatten)]
    rack: Rack,
    prev_category: Category,
    changed: bool,
}

impl ProjectedRack {
    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn prev_category(&self) -> Category {
        self.prev_category
    }

    pub fn changed(&self) -> bool {
        self.changed
    }
}

/// Ranking entry for the racks most affected by the proposed change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedRack {
    pub id: String,
    pub category: Category,
    pub prev_category: Category,
}

/// Informational safety flags. Never raised as errors; the consumer decides
/// how to present them.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureFlags {
    pub inlet_safe_threshold_breached: bool,
    pub headroom_margin_breached: bool,
    pub cooling_safe_range_breached: bool,
}

/// Ephemeral what-if projection. Recomputed fully on every simulate call and
/// owned by the caller; never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub setpoint_delta: f64,
    pub proposed_setpoint: f64,
    pub post_headroom: Category,
    pub post_critical_count: usize,
    pub post_fragile_or_critical_count: usize,
    pub top_affected: Vec<AffectedRack>,
    pub post_racks: Vec<ProjectedRack>,
    pub failure_flags: FailureFlags,
}

/// Project the effect of raising the cooling setpoint by `setpoint_delta`
/// degrees on every rack in the base snapshot.
///
/// The base snapshot is never mutated; each output rack is a derived copy.
pub fn simulate(base: &HallSnapshot, setpoint_delta: f64) -> SimulationResult {
    let delta = setpoint_delta.clamp(DELTA_HARD_MIN, DELTA_HARD_MAX);

    let post_racks: Vec<ProjectedRack> = base
        .racks()
        .iter()
        .map(|rack| project_rack(rack, delta))
        .collect();

    let post_headroom = overall_category(post_racks.iter().map(ProjectedRack::rack));
    let post_critical_count = count_critical(post_racks.iter().map(ProjectedRack::rack));
    let post_fragile_or_critical_count =
        count_fragile_or_critical(post_racks.iter().map(ProjectedRack::rack));

    let top_affected = rank_top_affected(&post_racks);

    let failure_flags = FailureFlags {
        inlet_safe_threshold_breached: post_racks
            .iter()
            .any(|p| p.rack.inlet_temp() > p.rack.threshold()),
        headroom_margin_breached: post_racks
            .iter()
            .any(|p| p.rack.thermal_margin() < CRITICAL_MARGIN_C),
        cooling_safe_range_breached: delta > LARGE_DELTA_C
            && post_fragile_or_critical_count > base.fragile_or_critical_count(),
    };

    SimulationResult {
        setpoint_delta: round1(delta),
        proposed_setpoint: round1(base.current_setpoint() + delta),
        post_headroom,
        post_critical_count,
        post_fragile_or_critical_count,
        top_affected,
        post_racks,
        failure_flags,
    }
}

fn project_rack(rack: &Rack, delta: f64) -> ProjectedRack {
    let k = BASE_RESPONSE + zone_weight(rack.zone()) + load_weight(rack.load_band());
    let projected = rack.with_inlet(rack.inlet_temp() + k * delta);
    ProjectedRack {
        prev_category: rack.category(),
        changed: projected.category() != rack.category(),
        rack: projected,
    }
}

/// Zones further from the computer-room air handler respond more strongly
/// to a setpoint change.
fn zone_weight(zone: &str) -> f64 {
    if zone.ends_with('D') {
        0.14
    } else if zone.ends_with('C') {
        0.10
    } else {
        0.06
    }
}

fn load_weight(band: LoadBand) -> f64 {
    match band {
        LoadBand::Peak => 0.20,
        LoadBand::Elevated => 0.12,
        LoadBand::Nominal => 0.04,
    }
}

/// Racks sorted by post-category rank descending, then by ascending margin
/// so the rack closest to breach ranks first within a category. The sort is
/// stable; remaining ties keep population order.
fn rank_top_affected(post_racks: &[ProjectedRack]) -> Vec<AffectedRack> {
    let mut ranked: Vec<&ProjectedRack> = post_racks.iter().collect();
    ranked.sort_by(|a, b| {
        b.rack
            .category()
            .rank()
            .cmp(&a.rack.category().rank())
            .then_with(|| {
                a.rack
                    .thermal_margin()
                    .partial_cmp(&b.rack.thermal_margin())
                    .unwrap_or(Ordering::Equal)
            })
    });
    ranked
        .into_iter()
        .take(TOP_AFFECTED_LIMIT)
        .map(|p| AffectedRack {
            id: p.rack.id().to_owned(),
            category: p.rack.category(),
            prev_category: p.prev_category,
        })
        .collect()
}
