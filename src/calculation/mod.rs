//! Calculation logic for the CTC engine.
//!
//! This module contains the statutory lookups (Professional Tax, Labour
//! Welfare Fund, ESIC applicability), the forward payroll computation from a
//! Monthly CTC, and the reverse solver that finds the CTC for a target net
//! salary.

mod esic;
mod forward;
mod lwf;
mod professional_tax;
mod rounding;
mod solver;

pub use esic::is_esic_applicable;
pub use forward::{EsiIteration, PayrollEvaluation, PayrollInputs, evaluate_at_ctc};
pub use lwf::{LwfContribution, get_lwf_for_month};
pub use professional_tax::{DEFAULT_PT_AMOUNT, DEFAULT_PT_EXEMPT_GROSS, calculate_professional_tax};
pub use rounding::{round_paise, round_rupees};
pub use solver::{
    SalarySolver, SolveOptions, SolveReport, SolveSummary, SolverSettings,
    calculate_salary_breakdown, current_month,
};
