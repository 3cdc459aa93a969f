//! CTC Engine for Indian payroll
//!
//! This crate works backwards from a desired monthly take-home salary to the
//! Cost to Company (CTC) and full salary structure that produces it, applying
//! Provident Fund, ESIC, state Professional Tax and Labour Welfare Fund rules
//! loaded from YAML tables.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod offer;
