//! Core data models for the CTC engine.
//!
//! This module contains the salary breakdown record, its offer-letter
//! schedule, and the audit types attached to offer calculations.

mod audit;
mod offer_result;
mod salary_breakdown;

pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningSeverity};
pub use offer_result::OfferComputation;
pub use salary_breakdown::{BreakdownComponent, SalaryBreakdown, ScheduleLine};
