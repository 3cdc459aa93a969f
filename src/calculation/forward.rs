//! Forward payroll computation.
//!
//! Given a candidate Monthly CTC this module derives the full salary
//! structure and the resulting net salary. It is a pure function of its
//! inputs and the rule tables; the reverse solver calls it repeatedly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::JurisdictionTables;

use super::esic::is_esic_applicable;
use super::lwf::LwfContribution;
use super::professional_tax::calculate_professional_tax;
use super::rounding::round_rupees;

/// Bounds for the employer-ESI / gross fixed-point iteration.
///
/// Employer ESI depends on gross salary, while gross is whatever remains of
/// CTC after employer contributions. The loop stops once successive gross
/// estimates move by less than `convergence`, or after `max_passes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EsiIteration {
    /// Maximum number of passes.
    pub max_passes: u32,
    /// Gross movement below which the estimate is considered settled.
    pub convergence: Decimal,
}

impl Default for EsiIteration {
    fn default() -> Self {
        Self {
            max_passes: 12,
            convergence: Decimal::new(5, 1),
        }
    }
}

/// The fixed inputs of a forward evaluation.
#[derive(Debug, Clone, Copy)]
pub struct PayrollInputs<'a> {
    /// The work state, matched against the rule tables.
    pub state: &'a str,
    /// Whether the employee opted into PF.
    pub pf_enabled: bool,
    /// Whether PF is forced on when Basic is at or below the wage ceiling.
    pub enforce_pf_mandatory: bool,
    /// Calendar month (1-12) used for month-specific Professional Tax.
    pub month: u32,
    /// LWF due in `month`.
    pub lwf: LwfContribution,
}

/// Every intermediate figure of one forward evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEvaluation {
    /// The candidate Monthly CTC evaluated.
    pub monthly_ctc: Decimal,
    /// Basic salary.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// Statutory bonus.
    pub bonus_amount: Decimal,
    /// The balancing earnings component.
    pub special_allowance: Decimal,
    /// Sum of all earnings.
    pub gross_total_earnings: Decimal,
    /// Whether PF contributions were applied.
    pub pf_applies: bool,
    /// Employee PF.
    pub pf_employee: Decimal,
    /// Employer PF.
    pub pf_employer: Decimal,
    /// PF administration charge.
    pub pf_admin_charge: Decimal,
    /// EDLI charge.
    pub pf_edli_charge: Decimal,
    /// Employee ESI.
    pub esi_employee: Decimal,
    /// Employer ESI.
    pub esi_employer: Decimal,
    /// Professional Tax.
    pub professional_tax: Decimal,
    /// Employee LWF.
    pub employee_lwf: Decimal,
    /// Employer LWF.
    pub employer_lwf: Decimal,
    /// Mediclaim deduction (always zero).
    pub medicclaim_deduction: Decimal,
    /// Sum of employee deductions.
    pub total_deductions: Decimal,
    /// Sum of employer contributions.
    pub total_benefits: Decimal,
    /// Gross earnings less deductions.
    pub net_salary: Decimal,
    /// Passes used by the employer-ESI fixed point.
    pub esi_passes: u32,
    /// Whether the employer-ESI fixed point settled within its pass budget.
    pub esi_settled: bool,
}

/// Computes the salary structure produced by a Monthly CTC.
///
/// Steps:
/// 1. Basic = `round(ctc × basic_ratio)`; HRA and bonus are rounded
///    fractions of Basic.
/// 2. PF applies when opted in, or when enforcement is on and Basic is at or
///    below the wage ceiling. Each side is `min(cap, round(basic × rate))`
///    plus the fixed admin and EDLI charges on the employer side.
/// 3. Employer ESI and gross are resolved by a bounded fixed point on
///    `gross = ctc − total_benefits`.
/// 4. Special allowance balances the earnings to that gross.
/// 5. Employee ESI (on Basic) is due while the final gross is under the ESIC
///    threshold; Professional Tax is looked up on the final gross.
///
/// PF is based on Basic while ESI eligibility uses the balanced gross.
pub fn evaluate_at_ctc(
    monthly_ctc: Decimal,
    inputs: &PayrollInputs<'_>,
    tables: &JurisdictionTables,
    esi_iteration: EsiIteration,
) -> PayrollEvaluation {
    let rates = tables.rates();

    let basic = round_rupees(monthly_ctc * rates.basic_ratio);
    let hra = round_rupees(basic * rates.hra_ratio);
    let bonus_amount = round_rupees(basic * rates.bonus_ratio);

    let pf_applies = inputs.pf_enabled
        || (inputs.enforce_pf_mandatory && basic <= rates.pf_wage_ceiling);
    let (pf_contribution, pf_admin_charge, pf_edli_charge) = if pf_applies {
        (
            round_rupees(basic * rates.pf_rate).min(rates.pf_monthly_cap),
            rates.pf_admin_charge,
            rates.pf_edli_charge,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    };

    let fixed_benefits = pf_contribution + pf_admin_charge + pf_edli_charge + inputs.lwf.employer;
    let mut gross = monthly_ctc - fixed_benefits;
    let mut esi_employer = Decimal::ZERO;
    let mut esi_passes = 0;
    let mut esi_settled = false;

    while esi_passes < esi_iteration.max_passes {
        esi_passes += 1;
        esi_employer = if is_esic_applicable(gross, inputs.state, tables) {
            round_rupees(gross * rates.esi_employer_rate)
        } else {
            Decimal::ZERO
        };

        let next_gross = monthly_ctc - (fixed_benefits + esi_employer);
        let movement = (next_gross - gross).abs();
        gross = next_gross;
        if movement < esi_iteration.convergence {
            esi_settled = true;
            break;
        }
    }

    let total_benefits = fixed_benefits + esi_employer;

    let special_allowance = round_rupees(gross - (basic + hra + bonus_amount));
    let gross_total_earnings = basic + hra + special_allowance + bonus_amount;

    let esi_employee = if is_esic_applicable(gross_total_earnings, inputs.state, tables) {
        round_rupees(basic * rates.esi_employee_rate)
    } else {
        Decimal::ZERO
    };

    let professional_tax =
        calculate_professional_tax(gross_total_earnings, inputs.state, inputs.month, tables);
    let medicclaim_deduction = Decimal::ZERO;

    let total_deductions =
        pf_contribution + esi_employee + professional_tax + inputs.lwf.employee + medicclaim_deduction;
    let net_salary = gross_total_earnings - total_deductions;

    PayrollEvaluation {
        monthly_ctc,
        basic,
        hra,
        bonus_amount,
        special_allowance,
        gross_total_earnings,
        pf_applies,
        pf_employee: pf_contribution,
        pf_employer: pf_contribution,
        pf_admin_charge,
        pf_edli_charge,
        esi_employee,
        esi_employer,
        professional_tax,
        employee_lwf: inputs.lwf.employee,
        employer_lwf: inputs.lwf.employer,
        medicclaim_deduction,
        total_deductions,
        total_benefits,
        net_salary,
        esi_passes,
        esi_settled,
    }
}
