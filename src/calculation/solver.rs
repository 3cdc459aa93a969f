//! Reverse salary solver.
//!
//! Finds the Monthly CTC whose forward computation produces a target net
//! salary. Net is piecewise and only roughly linear in CTC: PF caps and PT
//! slabs introduce kinks, while the ESI threshold and the mandatory-PF switch
//! make net jump upwards. The solver takes secant steps from a
//! forward-difference slope until it has evaluations on both sides of the
//! target, then narrows that bracket on whole-rupee CTC (interpolating, and
//! halving whenever interpolation stalls). The closest evaluation seen is the
//! one returned.

use std::cmp::Ordering;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::JurisdictionTables;
use crate::models::SalaryBreakdown;

use super::forward::{EsiIteration, PayrollEvaluation, PayrollInputs, evaluate_at_ctc};
use super::lwf::get_lwf_for_month;
use super::rounding::{round_paise, round_rupees};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Tunable parameters of the reverse solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverSettings {
    /// Maximum solver steps.
    pub max_iterations: u32,
    /// Accepted distance between achieved and target net.
    pub tolerance: Decimal,
    /// Lowest Monthly CTC the solver will try.
    pub min_monthly_ctc: Decimal,
    /// Initial guess as a multiple of the target net.
    pub initial_multiplier: Decimal,
    /// Lower bound on the initial guess.
    pub initial_floor: Decimal,
    /// Smallest CTC offset used to estimate the slope.
    pub min_slope_offset: Decimal,
    /// Slope offset as a fraction of the current CTC.
    pub slope_offset_ratio: Decimal,
    /// Slopes at or below this are treated as flat.
    pub min_slope: Decimal,
    /// Slopes above this span a statutory jump; a unit slope is used instead.
    pub max_slope: Decimal,
    /// Step multiplier applied to the net gap on a flat region.
    pub flat_step_factor: Decimal,
    /// Bounds for the employer-ESI fixed point inside each evaluation.
    pub esi_iteration: EsiIteration,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            tolerance: Decimal::ONE,
            min_monthly_ctc: Decimal::from(10000),
            initial_multiplier: Decimal::new(17, 1),
            initial_floor: Decimal::from(15000),
            min_slope_offset: Decimal::from(100),
            slope_offset_ratio: Decimal::new(1, 2),
            min_slope: Decimal::new(1, 4),
            max_slope: Decimal::from(2),
            flat_step_factor: Decimal::new(15, 1),
            esi_iteration: EsiIteration::default(),
        }
    }
}

/// Per-solve options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveOptions {
    /// Force PF on when Basic is at or below the PF wage ceiling.
    pub enforce_pf_mandatory: bool,
    /// Calendar month (1-12); the current local month when `None`.
    pub month: Option<u32>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            enforce_pf_mandatory: true,
            month: None,
        }
    }
}

impl SolveOptions {
    /// Options for a specific calendar month.
    pub fn for_month(month: u32) -> Self {
        Self {
            month: Some(month),
            ..Self::default()
        }
    }
}

/// Convergence details of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Calendar month the rules were applied for.
    pub month: u32,
    /// Secant steps taken.
    pub iterations: u32,
    /// Whether the achieved net is within tolerance of the target.
    pub converged: bool,
    /// Target net minus achieved net.
    pub residual: Decimal,
}

/// The outcome of a solve with its diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveReport {
    /// The assembled breakdown.
    pub breakdown: SalaryBreakdown,
    /// The unrounded forward evaluation behind the breakdown.
    pub evaluation: PayrollEvaluation,
    /// Convergence details.
    pub summary: SolveSummary,
}

/// Reverse solver bound to a set of rule tables.
#[derive(Debug, Clone, Copy)]
pub struct SalarySolver<'a> {
    tables: &'a JurisdictionTables,
    settings: SolverSettings,
}

impl<'a> SalarySolver<'a> {
    /// Creates a solver with default settings.
    pub fn new(tables: &'a JurisdictionTables) -> Self {
        Self::with_settings(tables, SolverSettings::default())
    }

    /// Creates a solver with custom settings.
    pub fn with_settings(tables: &'a JurisdictionTables, settings: SolverSettings) -> Self {
        Self { tables, settings }
    }

    /// The settings in use.
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Solves for the breakdown whose net salary matches `net_salary`.
    pub fn solve(
        &self,
        net_salary: Decimal,
        state: &str,
        pf_enabled: bool,
        options: SolveOptions,
    ) -> SalaryBreakdown {
        self.solve_with_report(net_salary, state, pf_enabled, options)
            .breakdown
    }

    /// Solves and returns the breakdown with convergence details.
    ///
    /// The solve never fails. When the target cannot be reached (inside a
    /// statutory discontinuity, or below what the minimum CTC yields) the
    /// closest evaluation found is returned with `converged == false`.
    pub fn solve_with_report(
        &self,
        net_salary: Decimal,
        state: &str,
        pf_enabled: bool,
        options: SolveOptions,
    ) -> SolveReport {
        let settings = &self.settings;
        let month = options.month.unwrap_or_else(current_month);
        let inputs = PayrollInputs {
            state,
            pf_enabled,
            enforce_pf_mandatory: options.enforce_pf_mandatory,
            month,
            lwf: get_lwf_for_month(state, month, self.tables),
        };
        let evaluate = |monthly_ctc: Decimal| {
            evaluate_at_ctc(monthly_ctc, &inputs, self.tables, settings.esi_iteration)
        };

        let mut monthly_ctc =
            round_rupees((net_salary * settings.initial_multiplier).max(settings.initial_floor));
        let mut current = evaluate(monthly_ctc);
        let mut search = Search::new(net_salary, current.clone());
        let mut last_width: Option<Decimal> = None;
        let mut iterations = 0;

        while iterations < settings.max_iterations {
            if search.distance(&search.best) <= settings.tolerance {
                break;
            }

            let next_ctc = if let Some((below, above)) = search.bracket() {
                let low = below.monthly_ctc.min(above.monthly_ctc);
                let high = below.monthly_ctc.max(above.monthly_ctc);
                let width = high - low;
                if width <= Decimal::ONE {
                    break;
                }

                let midpoint = ((low + high) / Decimal::TWO).floor();
                let stalled = last_width.is_some_and(|previous| width * Decimal::TWO > previous);
                last_width = Some(width);
                let candidate = if stalled {
                    midpoint
                } else {
                    let span = above.monthly_ctc - below.monthly_ctc;
                    let rise = above.net_salary - below.net_salary;
                    let interpolated =
                        round_rupees(below.monthly_ctc + (net_salary - below.net_salary) * span / rise);
                    if interpolated > low && interpolated < high {
                        interpolated
                    } else {
                        midpoint
                    }
                };

                debug!(
                    iteration = iterations + 1,
                    %low,
                    %high,
                    monthly_ctc = %candidate,
                    target = %net_salary,
                    "bracketed step"
                );
                candidate
            } else {
                let gap = net_salary - current.net_salary;
                let delta = round_rupees(
                    (monthly_ctc * settings.slope_offset_ratio).max(settings.min_slope_offset),
                );
                let offset = evaluate(monthly_ctc + delta);
                let mut slope = (offset.net_salary - current.net_salary) / delta;
                search.note(offset);
                if search.bracket().is_some() {
                    iterations += 1;
                    continue;
                }

                if slope > settings.max_slope {
                    slope = Decimal::ONE;
                }
                let step = if slope > settings.min_slope {
                    gap / slope
                } else {
                    gap * settings.flat_step_factor
                };

                let mut candidate = round_rupees((monthly_ctc + step).max(settings.min_monthly_ctc));
                if candidate == monthly_ctc {
                    if gap < Decimal::ZERO && monthly_ctc <= settings.min_monthly_ctc {
                        break;
                    }
                    candidate = if gap > Decimal::ZERO {
                        monthly_ctc + Decimal::ONE
                    } else {
                        monthly_ctc - Decimal::ONE
                    };
                }

                debug!(
                    iteration = iterations + 1,
                    %slope,
                    monthly_ctc = %candidate,
                    target = %net_salary,
                    "secant step"
                );
                candidate
            };

            monthly_ctc = next_ctc;
            current = evaluate(monthly_ctc);
            search.note(current.clone());
            iterations += 1;
        }

        let best = search.best;
        let residual = net_salary - best.net_salary;
        let converged = residual.abs() <= settings.tolerance;
        if !converged {
            warn!(
                state,
                month,
                pf_enabled,
                target = %net_salary,
                achieved = %best.net_salary,
                iterations,
                "salary solve did not converge"
            );
        }

        SolveReport {
            breakdown: assemble_breakdown(&best),
            evaluation: best,
            summary: SolveSummary {
                month,
                iterations,
                converged,
                residual,
            },
        }
    }
}

/// Solves for the salary breakdown that yields a target monthly net salary.
///
/// # Examples
///
/// ```
/// use ctc_engine::calculation::{SolveOptions, calculate_salary_breakdown};
/// use ctc_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded().unwrap();
/// let breakdown = calculate_salary_breakdown(
///     loader.tables(),
///     Decimal::from(50000),
///     "Maharashtra",
///     true,
///     SolveOptions::for_month(4),
/// );
///
/// assert!((breakdown.net_salary - Decimal::from(50000)).abs() <= Decimal::ONE);
/// assert_eq!(breakdown.pf_employee, Decimal::from(1800));
/// ```
pub fn calculate_salary_breakdown(
    tables: &JurisdictionTables,
    net_salary: Decimal,
    state: &str,
    pf_enabled: bool,
    options: SolveOptions,
) -> SalaryBreakdown {
    SalarySolver::new(tables).solve(net_salary, state, pf_enabled, options)
}

/// The current calendar month in local time.
pub fn current_month() -> u32 {
    chrono::Local::now().month()
}

/// Evaluations seen during a solve: the closest to the target, and the
/// tightest pair on either side of it.
struct Search {
    target: Decimal,
    best: PayrollEvaluation,
    below: Option<PayrollEvaluation>,
    above: Option<PayrollEvaluation>,
}

impl Search {
    fn new(target: Decimal, first: PayrollEvaluation) -> Self {
        let mut search = Self {
            target,
            best: first.clone(),
            below: None,
            above: None,
        };
        search.note(first);
        search
    }

    fn distance(&self, evaluation: &PayrollEvaluation) -> Decimal {
        (self.target - evaluation.net_salary).abs()
    }

    /// Records an evaluation. `best` only moves on a strict improvement.
    fn note(&mut self, evaluation: PayrollEvaluation) {
        if self.distance(&evaluation) < self.distance(&self.best) {
            self.best = evaluation.clone();
        }

        match evaluation.net_salary.cmp(&self.target) {
            Ordering::Less => {
                if tightens(self.below.as_ref(), self.above.as_ref(), &evaluation) {
                    self.below = Some(evaluation);
                }
            }
            Ordering::Greater => {
                if tightens(self.above.as_ref(), self.below.as_ref(), &evaluation) {
                    self.above = Some(evaluation);
                }
            }
            Ordering::Equal => {}
        }
    }

    /// The (below, above) pair once the target is bracketed.
    fn bracket(&self) -> Option<(&PayrollEvaluation, &PayrollEvaluation)> {
        Some((self.below.as_ref()?, self.above.as_ref()?))
    }
}

/// Whether `candidate` should replace `same_side`: always before a bracket
/// exists, afterwards only when it lies closer to the opposite end.
fn tightens(
    same_side: Option<&PayrollEvaluation>,
    opposite: Option<&PayrollEvaluation>,
    candidate: &PayrollEvaluation,
) -> bool {
    match (same_side, opposite) {
        (Some(current), Some(opposite)) => {
            (candidate.monthly_ctc - opposite.monthly_ctc).abs()
                < (current.monthly_ctc - opposite.monthly_ctc).abs()
        }
        _ => true,
    }
}

/// Rounds an evaluation into the published record.
///
/// Net is derived as `gross − total_deductions` and total benefits as
/// `monthly CTC − gross`, so both balances hold exactly even with fractional
/// LWF. Any paise left over from LWF rounding sit in `total_benefits`.
fn assemble_breakdown(evaluation: &PayrollEvaluation) -> SalaryBreakdown {
    let monthly_ctc = round_rupees(evaluation.monthly_ctc);
    let gross_total_earnings = round_rupees(evaluation.gross_total_earnings);
    let total_deductions = round_rupees(evaluation.total_deductions);

    SalaryBreakdown {
        basic: round_rupees(evaluation.basic),
        hra: round_rupees(evaluation.hra),
        special_allowance: round_rupees(evaluation.special_allowance),
        bonus_amount: round_rupees(evaluation.bonus_amount),
        gross_total_earnings,
        pf_employee: round_rupees(evaluation.pf_employee),
        esi_employee: round_rupees(evaluation.esi_employee),
        professional_tax: round_rupees(evaluation.professional_tax),
        employee_lwf: round_paise(evaluation.employee_lwf),
        medicclaim_deduction: round_rupees(evaluation.medicclaim_deduction),
        total_deductions,
        net_salary: gross_total_earnings - total_deductions,
        variable_incentive: Decimal::ZERO,
        pf_employer: round_rupees(evaluation.pf_employer),
        pf_admin_charge: round_rupees(evaluation.pf_admin_charge),
        pf_edli_charge: round_rupees(evaluation.pf_edli_charge),
        esi_employer: round_rupees(evaluation.esi_employer),
        employer_lwf: round_paise(evaluation.employer_lwf),
        total_benefits: monthly_ctc - gross_total_earnings,
        ctc: monthly_ctc * MONTHS_PER_YEAR,
        travel_allowance: None,
    }
}
