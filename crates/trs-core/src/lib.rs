//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Thermal risk model exports and shared types."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
//! Thermal risk core for the TRS project.
//!
//! Classifies rack inlet-temperature telemetry into ordered risk categories,
//! generates synthetic hall populations, and projects the effect of a
//! proposed cooling-setpoint change before it is applied. Everything in this
//! crate is synchronous and pure; the transport layer lives in `trs-api`.

pub mod aggregate;
pub mod category;
pub mod generator;
pub mod rack;
pub mod round;
pub mod simulator;
pub mod snapshot;
pub mod store;

pub use aggregate::{
    count_critical, count_fragile_or_critical, lowest_margin_indices, overall_category,
    stress_rack_index,
};
pub use category::Category;
pub use generator::HallGenerator;
pub use rack::{LoadBand, Rack};
pub use round::round1;
pub use simulator::{
    simulate, AffectedRack, FailureFlags, ProjectedRack, SimulationResult, DELTA_HARD_MAX,
    DELTA_HARD_MIN,
};
pub use snapshot::{DeltaRange, HallProfile, HallSnapshot};
pub use store::StateStore;
