//! ---
//! trs_section: "01-core-functionality"
//! trs_subsection: "module"
//! trs_type: "source"
//! trs_scope: "code"
//! trs_description: "Shared primitives and utilities for the TRS runtime."
//! trs_version: "v0.1.0"
//! trs_owner: "tbd"
//! ---
//! Shared primitives for the TRS workspace.
//! This crate exposes configuration loading and logging bootstrap
//! utilities consumed by the daemon and the API crate.

pub mod config;
pub mod logging;

pub use config::{
    ApiConfig, AppConfig, HallConfig, LoadedAppConfig, LoggingConfig, PolicyConfig,
    SimulationConfig, SiteConfig,
};
pub use logging::{init_tracing, LogFormat};
