//! Prices a single offer.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    SalarySolver, SolveOptions, SolveReport, SolverSettings, get_lwf_for_month,
};
use crate::config::{JurisdictionTables, default_esic_threshold};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, OfferComputation, WarningSeverity};

use super::request::{OfferRequest, ValidatedOffer};

const PF_STATUTE: &str = "EPF & MP Act, 1952";
const ESI_STATUTE: &str = "ESI Act, 1948";
const PT_STATUTE: &str = "State Professional Tax Act";
const LWF_STATUTE: &str = "State Labour Welfare Fund Act";

/// Turns offer requests into priced breakdowns.
///
/// # Example
///
/// ```
/// use ctc_engine::config::ConfigLoader;
/// use ctc_engine::offer::{OfferCalculator, OfferRequest};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded().unwrap();
/// let calculator = OfferCalculator::new(loader.tables());
///
/// let mut request = OfferRequest::new("OFF-001", "Haryana", Decimal::from(12975));
/// request.month = Some(1);
///
/// let result = calculator.calculate(&request).unwrap();
/// assert_eq!(result.breakdown.basic, Decimal::from(7785));
/// assert!(result.solver.converged);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OfferCalculator<'a> {
    tables: &'a JurisdictionTables,
    solver: SalarySolver<'a>,
}

impl<'a> OfferCalculator<'a> {
    /// Creates a calculator with default solver settings.
    pub fn new(tables: &'a JurisdictionTables) -> Self {
        Self::with_settings(tables, SolverSettings::default())
    }

    /// Creates a calculator with custom solver settings.
    pub fn with_settings(tables: &'a JurisdictionTables, settings: SolverSettings) -> Self {
        Self {
            tables,
            solver: SalarySolver::with_settings(tables, settings),
        }
    }

    /// Validates and prices one offer.
    ///
    /// A declined PF election is honoured only when Basic ends up above the
    /// PF wage ceiling; otherwise the offer is rejected with
    /// [`EngineError::PfMandatory`].
    pub fn calculate(&self, request: &OfferRequest) -> EngineResult<OfferComputation> {
        let correlation_id = Uuid::new_v4();
        info!(
            correlation_id = %correlation_id,
            offer_id = %request.offer_id,
            "Processing offer"
        );

        let offer = request.validate().inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Offer rejected");
        })?;

        let start_time = Instant::now();
        let report = self.solve(&offer).inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Offer rejected");
        })?;

        let mut audit_trace = self.audit(request, &offer, &report);
        audit_trace.duration_us = start_time.elapsed().as_micros() as u64;

        let breakdown = report.breakdown.with_travel_allowance(offer.travel_allowance);

        info!(
            correlation_id = %correlation_id,
            offer_id = %offer.offer_id,
            state = %offer.state,
            month = offer.month,
            ctc = %breakdown.ctc,
            net_salary = %breakdown.net_salary,
            iterations = report.summary.iterations,
            converged = report.summary.converged,
            duration_us = audit_trace.duration_us,
            "Offer calculated"
        );

        Ok(OfferComputation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            offer_id: offer.offer_id,
            state: offer.state,
            month: offer.month,
            pf_enabled: offer.pf_enabled,
            breakdown,
            solver: report.summary,
            audit_trace,
        })
    }

    fn solve(&self, offer: &ValidatedOffer) -> EngineResult<SolveReport> {
        if offer.pf_enabled {
            return Ok(self.solver.solve_with_report(
                offer.net_salary,
                &offer.state,
                true,
                SolveOptions::for_month(offer.month),
            ));
        }

        let report = self.solver.solve_with_report(
            offer.net_salary,
            &offer.state,
            false,
            SolveOptions {
                enforce_pf_mandatory: false,
                month: Some(offer.month),
            },
        );

        if report.breakdown.basic <= self.tables.rates().pf_wage_ceiling {
            return Err(EngineError::PfMandatory {
                basic: report.breakdown.basic,
            });
        }

        Ok(report)
    }

    fn audit(
        &self,
        request: &OfferRequest,
        offer: &ValidatedOffer,
        report: &SolveReport,
    ) -> AuditTrace {
        let mut trace = AuditTrace::default();
        let rates = self.tables.rates();
        let breakdown = &report.breakdown;
        let state = offer.state.as_str();

        trace.record(
            "month_resolution",
            "Payroll month",
            "Offer terms",
            json!({
                "month": request.month,
                "date_of_joining": request.date_of_joining,
            }),
            json!({ "month": offer.month }),
            match (request.month, request.date_of_joining) {
                (Some(_), _) => "Explicit month supplied".to_string(),
                (None, Some(date)) => format!("Month taken from date of joining {}", date),
                (None, None) => "No month or joining date; current month used".to_string(),
            },
        );

        let lwf = get_lwf_for_month(state, offer.month, self.tables);
        trace.record(
            "lwf_lookup",
            "Labour Welfare Fund",
            LWF_STATUTE,
            json!({ "state": state, "month": offer.month }),
            json!({ "employee": lwf.employee, "employer": lwf.employer }),
            match self.tables.lwf(state) {
                Some(config) if config.collected_in(offer.month) => {
                    format!("{} collects LWF in month {}", state, offer.month)
                }
                Some(_) => format!("{} does not collect LWF in month {}", state, offer.month),
                None => format!("No LWF rules for {}", state),
            },
        );

        trace.record(
            "pf_contribution",
            "Provident Fund",
            PF_STATUTE,
            json!({
                "basic": breakdown.basic,
                "pf_requested": offer.pf_enabled,
                "wage_ceiling": rates.pf_wage_ceiling,
            }),
            json!({
                "pf_employee": breakdown.pf_employee,
                "pf_employer": breakdown.pf_employer,
                "pf_admin_charge": breakdown.pf_admin_charge,
                "pf_edli_charge": breakdown.pf_edli_charge,
            }),
            if !report.evaluation.pf_applies {
                format!(
                    "PF declined and basic {} is above the {} wage ceiling",
                    breakdown.basic, rates.pf_wage_ceiling
                )
            } else if breakdown.pf_employee == rates.pf_monthly_cap {
                format!("PF at {} capped at {}", rates.pf_rate, rates.pf_monthly_cap)
            } else {
                format!("PF at {} of basic {}", rates.pf_rate, breakdown.basic)
            },
        );

        let threshold = self
            .tables
            .esic(state)
            .map(|config| config.threshold)
            .unwrap_or_else(default_esic_threshold);
        let esi_applies =
            breakdown.esi_employer > Decimal::ZERO || breakdown.esi_employee > Decimal::ZERO;
        trace.record(
            "esic_applicability",
            "Employees' State Insurance",
            ESI_STATUTE,
            json!({
                "gross_total_earnings": breakdown.gross_total_earnings,
                "threshold": threshold,
            }),
            json!({
                "esi_employee": breakdown.esi_employee,
                "esi_employer": breakdown.esi_employer,
            }),
            match self.tables.esic(state) {
                Some(config) if !config.applicable => format!("ESIC not applicable in {}", state),
                _ if esi_applies => format!(
                    "Gross {} below the {} threshold",
                    breakdown.gross_total_earnings, threshold
                ),
                _ => format!(
                    "Gross {} at or above the {} threshold",
                    breakdown.gross_total_earnings, threshold
                ),
            },
        );

        trace.record(
            "professional_tax",
            "Professional Tax",
            PT_STATUTE,
            json!({
                "state": state,
                "month": offer.month,
                "gross_total_earnings": breakdown.gross_total_earnings,
            }),
            json!({ "amount": breakdown.professional_tax }),
            match self.tables.professional_tax(state) {
                Some(config) if config.month_overrides.iter().any(|o| o.month == offer.month) => {
                    format!("{} month {} override applied", state, offer.month)
                }
                Some(_) => format!("{} slab table applied", state),
                None => format!("No PT table for {}; default policy applied", state),
            },
        );

        trace.record(
            "ctc_solve",
            "Reverse CTC solve",
            "Offer terms",
            json!({ "target_net_salary": offer.net_salary }),
            json!({
                "ctc": breakdown.ctc,
                "net_salary": breakdown.net_salary,
                "iterations": report.summary.iterations,
                "converged": report.summary.converged,
            }),
            format!(
                "Annual CTC {} yields net {} after {} iterations",
                breakdown.ctc, breakdown.net_salary, report.summary.iterations
            ),
        );

        if !report.summary.converged {
            trace.warn(
                "solver_not_converged",
                format!(
                    "Achieved net {} differs from target {} by {}",
                    breakdown.net_salary, offer.net_salary, report.summary.residual
                ),
                WarningSeverity::High,
            );
        }

        if self.tables.professional_tax(state).is_none()
            && self.tables.lwf(state).is_none()
            && self.tables.esic(state).is_none()
        {
            trace.warn(
                "unknown_state",
                format!("No rules configured for '{}'; defaults applied", state),
                WarningSeverity::Medium,
            );
        }

        trace
    }
}
