//! Jurisdiction rule tables for the CTC engine.
//!
//! This module loads the static per-state Professional Tax, Labour Welfare
//! Fund and ESIC tables plus the statutory policy rates from YAML. The tables
//! are immutable once built and are passed by reference into every lookup.
//!
//! # Example
//!
//! ```no_run
//! use ctc_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/india").unwrap();
//! println!("States covered: {}", loader.tables().states().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EsicConfig, JurisdictionTables, LwfConfig, LwfFrequency, MonthOverride,
    ProfessionalTaxConfig, ProfessionalTaxSlab, RulesMetadata, StatutoryRates, TaxMode,
    default_esic_threshold,
};
