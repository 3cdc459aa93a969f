//! Professional Tax lookup.
//!
//! Professional Tax is a state levy on salaried income. Most states charge a
//! monthly amount from a slab table on gross salary; Kerala, Tamil Nadu and
//! Puducherry assess on half-yearly income. Karnataka and Madhya Pradesh
//! charge a different amount in one month of the year.

use rust_decimal::Decimal;

use crate::config::{JurisdictionTables, TaxMode};

use super::rounding::round_rupees;

/// Gross salary up to which states without a table pay no Professional Tax.
pub const DEFAULT_PT_EXEMPT_GROSS: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

/// The Professional Tax charged by states without a table above the exemption.
pub const DEFAULT_PT_AMOUNT: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// Months in a half-yearly Professional Tax assessment.
const HALF_YEAR_MONTHS: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Calculates the monthly Professional Tax for a gross salary.
///
/// Resolution order:
/// 1. State without a table: 0 up to ₹15,000 gross, ₹200 above.
/// 2. A month override for `month` (e.g. Karnataka in February).
/// 3. Half-yearly mode: slab on `gross × 6`, then divided by 6 and rounded.
/// 4. Slab mode: the first slab whose `max` covers gross.
///
/// When no slab covers the value the last slab is used.
///
/// # Examples
///
/// ```
/// use ctc_engine::calculation::calculate_professional_tax;
/// use ctc_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded().unwrap();
/// let tables = loader.tables();
///
/// let gross = Decimal::from(30000);
/// assert_eq!(calculate_professional_tax(gross, "Karnataka", 2, tables), Decimal::from(300));
/// assert_eq!(calculate_professional_tax(gross, "Karnataka", 5, tables), Decimal::from(200));
/// ```
pub fn calculate_professional_tax(
    gross_salary: Decimal,
    state: &str,
    month: u32,
    tables: &JurisdictionTables,
) -> Decimal {
    let Some(config) = tables.professional_tax(state) else {
        return if gross_salary <= DEFAULT_PT_EXEMPT_GROSS {
            Decimal::ZERO
        } else {
            DEFAULT_PT_AMOUNT
        };
    };

    if let Some(month_override) = config.month_overrides.iter().find(|o| o.month == month) {
        return month_override.amount_for(gross_salary);
    }

    let assessed = match config.mode {
        TaxMode::Slab => gross_salary,
        TaxMode::HalfYearly => gross_salary * HALF_YEAR_MONTHS,
    };

    let amount = config
        .slabs
        .iter()
        .find(|slab| slab.covers(assessed))
        .or_else(|| config.slabs.last())
        .map(|slab| slab.amount)
        .unwrap_or(Decimal::ZERO);

    match config.mode {
        TaxMode::Slab => amount,
        TaxMode::HalfYearly => round_rupees(amount / HALF_YEAR_MONTHS),
    }
}
