//! ESIC applicability check.

use rust_decimal::Decimal;

use crate::config::{JurisdictionTables, default_esic_threshold};

/// Returns true if ESI contributions apply to a gross salary in a state.
///
/// ESI applies while gross is strictly below the state's threshold. States
/// without a table are covered at the default ₹21,000 threshold; states marked
/// not applicable never are.
///
/// # Examples
///
/// ```
/// use ctc_engine::calculation::is_esic_applicable;
/// use ctc_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::embedded().unwrap();
/// assert!(is_esic_applicable(Decimal::from(20999), "Delhi", loader.tables()));
/// assert!(!is_esic_applicable(Decimal::from(21000), "Delhi", loader.tables()));
/// assert!(!is_esic_applicable(Decimal::from(15000), "Sikkim", loader.tables()));
/// ```
pub fn is_esic_applicable(gross_salary: Decimal, state: &str, tables: &JurisdictionTables) -> bool {
    match tables.esic(state) {
        Some(config) if !config.applicable => false,
        Some(config) => gross_salary < config.threshold,
        None => gross_salary < default_esic_threshold(),
    }
}
