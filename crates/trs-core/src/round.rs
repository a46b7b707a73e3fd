//! ---
//! trs_section: "08-thermal-risk-model"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Numeric helpers shared by the thermal risk model."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---

/// Round to one decimal place, the precision of every temperature and
/// setpoint value on the wire.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
