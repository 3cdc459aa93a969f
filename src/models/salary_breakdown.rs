//! The salary breakdown record produced by the solver.
//!
//! This module contains [`SalaryBreakdown`] and the [`ScheduleLine`]
//! projection that a document renderer turns into the offer-letter table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Months in a year, for annualising monthly amounts.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// A complete monthly payroll breakdown for one employee.
///
/// All amounts are monthly INR except `ctc`, which is annual. Amounts are
/// whole rupees except the two LWF fields, which keep two decimal places.
///
/// # Example
///
/// ```
/// use ctc_engine::models::SalaryBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = SalaryBreakdown {
///     basic: Decimal::from(7785),
///     hra: Decimal::from(3114),
///     special_allowance: Decimal::from(2411),
///     bonus_amount: Decimal::from(692),
///     gross_total_earnings: Decimal::from(14002),
///     pf_employee: Decimal::from(934),
///     esi_employee: Decimal::from(58),
///     professional_tax: Decimal::ZERO,
///     employee_lwf: Decimal::from(34),
///     medicclaim_deduction: Decimal::ZERO,
///     total_deductions: Decimal::from(1026),
///     net_salary: Decimal::from(12976),
///     variable_incentive: Decimal::ZERO,
///     pf_employer: Decimal::from(934),
///     pf_admin_charge: Decimal::from(55),
///     pf_edli_charge: Decimal::from(55),
///     esi_employer: Decimal::from(455),
///     employer_lwf: Decimal::from(68),
///     total_benefits: Decimal::from(1567),
///     ctc: Decimal::from(186828),
///     travel_allowance: None,
/// };
/// assert_eq!(breakdown.monthly_ctc(), Decimal::from(15569));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Basic salary, fixed at half of Monthly CTC.
    pub basic: Decimal,
    /// House rent allowance.
    pub hra: Decimal,
    /// The balancing earnings component.
    pub special_allowance: Decimal,
    /// Statutory bonus.
    pub bonus_amount: Decimal,
    /// Sum of all earnings.
    pub gross_total_earnings: Decimal,

    /// Employee Provident Fund contribution.
    pub pf_employee: Decimal,
    /// Employee ESI contribution.
    pub esi_employee: Decimal,
    /// State Professional Tax.
    pub professional_tax: Decimal,
    /// Employee Labour Welfare Fund contribution.
    pub employee_lwf: Decimal,
    /// Mediclaim premium deducted from salary.
    pub medicclaim_deduction: Decimal,
    /// Sum of employee deductions.
    pub total_deductions: Decimal,
    /// Take-home salary.
    pub net_salary: Decimal,

    /// Variable incentive (not part of the solve).
    pub variable_incentive: Decimal,
    /// Employer Provident Fund contribution.
    pub pf_employer: Decimal,
    /// PF administration charge.
    pub pf_admin_charge: Decimal,
    /// Employees' Deposit Linked Insurance charge.
    pub pf_edli_charge: Decimal,
    /// Employer ESI contribution.
    pub esi_employer: Decimal,
    /// Employer Labour Welfare Fund contribution.
    pub employer_lwf: Decimal,
    /// Sum of employer contributions.
    pub total_benefits: Decimal,

    /// Annual Cost to Company.
    pub ctc: Decimal,
    /// Travel allowance supplied by the caller, outside the solve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_allowance: Option<Decimal>,
}

impl SalaryBreakdown {
    /// Monthly Cost to Company.
    pub fn monthly_ctc(&self) -> Decimal {
        self.ctc / MONTHS_PER_YEAR
    }

    /// Sets the caller-supplied travel allowance, keeping only positive values.
    pub fn with_travel_allowance(mut self, travel_allowance: Option<Decimal>) -> Self {
        self.travel_allowance = travel_allowance.filter(|amount| *amount > Decimal::ZERO);
        self
    }

    /// Projects the breakdown into the monthly/annual table used on offer
    /// letters, in display order.
    pub fn schedule(&self) -> Vec<ScheduleLine> {
        use BreakdownComponent as C;

        let mut lines: Vec<ScheduleLine> = [
            (C::Basic, self.basic),
            (C::Hra, self.hra),
            (C::SpecialAllowance, self.special_allowance),
            (C::BonusAmount, self.bonus_amount),
            (C::GrossTotalEarnings, self.gross_total_earnings),
            (C::PfEmployee, self.pf_employee),
            (C::EsiEmployee, self.esi_employee),
            (C::ProfessionalTax, self.professional_tax),
            (C::EmployeeLwf, self.employee_lwf),
            (C::MedicclaimDeduction, self.medicclaim_deduction),
            (C::TotalDeductions, self.total_deductions),
            (C::NetSalary, self.net_salary),
            (C::VariableIncentive, self.variable_incentive),
            (C::PfEmployer, self.pf_employer),
            (C::PfAdminCharge, self.pf_admin_charge),
            (C::PfEdliCharge, self.pf_edli_charge),
            (C::EsiEmployer, self.esi_employer),
            (C::EmployerLwf, self.employer_lwf),
            (C::TotalBenefits, self.total_benefits),
        ]
        .into_iter()
        .map(|(component, monthly)| ScheduleLine::monthly(component, monthly))
        .collect();

        lines.push(ScheduleLine {
            component: C::Ctc,
            label: C::Ctc.label().to_string(),
            monthly: self.monthly_ctc(),
            annual: self.ctc,
        });

        if let Some(travel_allowance) = self.travel_allowance {
            lines.push(ScheduleLine::monthly(C::TravelAllowance, travel_allowance));
        }

        lines
    }
}

/// A component of the salary breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownComponent {
    /// Basic salary.
    Basic,
    /// House rent allowance.
    Hra,
    /// Special allowance.
    SpecialAllowance,
    /// Statutory bonus.
    BonusAmount,
    /// Gross total earnings.
    GrossTotalEarnings,
    /// Employee PF.
    PfEmployee,
    /// Employee ESI.
    EsiEmployee,
    /// Professional Tax.
    ProfessionalTax,
    /// Employee LWF.
    EmployeeLwf,
    /// Mediclaim deduction.
    MedicclaimDeduction,
    /// Total deductions.
    TotalDeductions,
    /// Net salary.
    NetSalary,
    /// Variable incentive.
    VariableIncentive,
    /// Employer PF.
    PfEmployer,
    /// PF admin charge.
    PfAdminCharge,
    /// EDLI charge.
    PfEdliCharge,
    /// Employer ESI.
    EsiEmployer,
    /// Employer LWF.
    EmployerLwf,
    /// Total employer benefits.
    TotalBenefits,
    /// Cost to Company.
    Ctc,
    /// Travel allowance.
    TravelAllowance,
}

impl BreakdownComponent {
    /// The row label printed on offer letters.
    pub fn label(self) -> &'static str {
        match self {
            BreakdownComponent::Basic => "Basic Salary",
            BreakdownComponent::Hra => "HRA",
            BreakdownComponent::SpecialAllowance => "Special Allowance",
            BreakdownComponent::BonusAmount => "Bonus Amount",
            BreakdownComponent::GrossTotalEarnings => "Gross Total Earnings",
            BreakdownComponent::PfEmployee => "Employee PF",
            BreakdownComponent::EsiEmployee => "Employee ESI",
            BreakdownComponent::ProfessionalTax => "Professional Tax",
            BreakdownComponent::EmployeeLwf => "Employee LWF",
            BreakdownComponent::MedicclaimDeduction => "Mediclaim Deduction",
            BreakdownComponent::TotalDeductions => "Total Deductions",
            BreakdownComponent::NetSalary => "Net Salary",
            BreakdownComponent::VariableIncentive => "Variable Incentive",
            BreakdownComponent::PfEmployer => "Employer PF",
            BreakdownComponent::PfAdminCharge => "PF Admin Charge",
            BreakdownComponent::PfEdliCharge => "PF EDLI Charge",
            BreakdownComponent::EsiEmployer => "Employer ESI",
            BreakdownComponent::EmployerLwf => "Employer LWF",
            BreakdownComponent::TotalBenefits => "Total Benefits",
            BreakdownComponent::Ctc => "Cost to Company",
            BreakdownComponent::TravelAllowance => "Travel Allowance",
        }
    }
}

/// One row of the compensation schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleLine {
    /// The component this row shows.
    pub component: BreakdownComponent,
    /// The printed label.
    pub label: String,
    /// Monthly amount.
    pub monthly: Decimal,
    /// Annual amount.
    pub annual: Decimal,
}

impl ScheduleLine {
    fn monthly(component: BreakdownComponent, monthly: Decimal) -> Self {
        Self {
            component,
            label: component.label().to_string(),
            monthly,
            annual: monthly * MONTHS_PER_YEAR,
        }
    }
}
