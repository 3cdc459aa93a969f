//! Labour Welfare Fund lookup.
//!
//! LWF is a small state welfare contribution. Several states collect it only
//! in specific months, so the amount due depends on the calendar month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::JurisdictionTables;

/// Employee and employer LWF due in a given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LwfContribution {
    /// Deducted from the employee's salary.
    pub employee: Decimal,
    /// Paid by the employer on top of salary.
    pub employer: Decimal,
}

impl LwfContribution {
    /// No contribution due.
    pub const ZERO: LwfContribution = LwfContribution {
        employee: Decimal::ZERO,
        employer: Decimal::ZERO,
    };
}

/// Resolves the LWF due for a state in a calendar month.
///
/// States without a table owe nothing. Monthly states always owe their
/// configured amounts; other states owe them only in their collection months
/// (explicit `deduction_months`, else June and December for half-yearly and
/// December for yearly) and nothing otherwise.
///
/// # Examples
///
/// ```
/// use ctc_engine::calculation::get_lwf_for_month;
/// use ctc_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded().unwrap();
/// let lwf = get_lwf_for_month("Maharashtra", 3, loader.tables());
/// assert_eq!(lwf.employee, Decimal::from(25));
/// assert_eq!(lwf.employer, Decimal::from(75));
/// ```
pub fn get_lwf_for_month(state: &str, month: u32, tables: &JurisdictionTables) -> LwfContribution {
    match tables.lwf(state) {
        Some(config) if config.collected_in(month) => LwfContribution {
            employee: config.employee,
            employer: config.employer,
        },
        _ => LwfContribution::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LwfConfig, LwfFrequency, RulesMetadata, StatutoryRates};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_tables() -> JurisdictionTables {
        let mut lwf = HashMap::new();
        lwf.insert(
            "Monthlyland".to_string(),
            LwfConfig {
                employee: dec("25"),
                employer: dec("75"),
                frequency: LwfFrequency::Monthly,
                deduction_months: None,
            },
        );
        lwf.insert(
            "Halfland".to_string(),
            LwfConfig {
                employee: dec("12"),
                employer: dec("36"),
                frequency: LwfFrequency::HalfYearly,
                deduction_months: None,
            },
        );
        lwf.insert(
            "Yearland".to_string(),
            LwfConfig {
                employee: dec("0.75"),
                employer: dec("2.25"),
                frequency: LwfFrequency::Yearly,
                deduction_months: None,
            },
        );
        lwf.insert(
            "Januaryland".to_string(),
            LwfConfig {
                employee: dec("6"),
                employer: dec("18"),
                frequency: LwfFrequency::Yearly,
                deduction_months: Some(vec![1]),
            },
        );

        JurisdictionTables::new(
            RulesMetadata {
                name: "Test".to_string(),
                version: "test".to_string(),
            },
            StatutoryRates::default(),
            HashMap::new(),
            lwf,
            HashMap::new(),
        )
        .unwrap()
    }

    /// LWF-001: half-yearly state owes nothing outside June/December
    #[test]
    fn test_half_yearly_is_zero_outside_collection_months() {
        let tables = create_test_tables();
        assert_eq!(get_lwf_for_month("Halfland", 3, &tables), LwfContribution::ZERO);
    }

    /// LWF-002: half-yearly state owes configured amounts in June
    #[test]
    fn test_half_yearly_charges_in_june_and_december() {
        let tables = create_test_tables();
        let expected = LwfContribution {
            employee: dec("12"),
            employer: dec("36"),
        };
        assert_eq!(get_lwf_for_month("Halfland", 6, &tables), expected);
        assert_eq!(get_lwf_for_month("Halfland", 12, &tables), expected);
    }

    #[test]
    fn test_monthly_charges_every_month() {
        let tables = create_test_tables();
        for month in 1..=12 {
            let lwf = get_lwf_for_month("Monthlyland", month, &tables);
            assert_eq!(lwf.employee, dec("25"));
            assert_eq!(lwf.employer, dec("75"));
        }
    }

    #[test]
    fn test_yearly_keeps_fractional_amounts_in_december() {
        let tables = create_test_tables();
        let lwf = get_lwf_for_month("Yearland", 12, &tables);
        assert_eq!(lwf.employee, dec("0.75"));
        assert_eq!(lwf.employer, dec("2.25"));
        assert_eq!(get_lwf_for_month("Yearland", 6, &tables), LwfContribution::ZERO);
    }

    #[test]
    fn test_explicit_months_override_frequency_defaults() {
        let tables = create_test_tables();
        assert_eq!(get_lwf_for_month("Januaryland", 1, &tables).employee, dec("6"));
        assert_eq!(get_lwf_for_month("Januaryland", 12, &tables), LwfContribution::ZERO);
    }

    #[test]
    fn test_unknown_state_owes_nothing() {
        let tables = create_test_tables();
        assert_eq!(get_lwf_for_month("Nowhere", 6, &tables), LwfContribution::ZERO);
    }
}
