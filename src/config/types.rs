//! Configuration types for the jurisdiction rule tables.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML files under `config/india/`, and the [`JurisdictionTables`] aggregate
//! that every lookup and solve reads from.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

/// Metadata describing a rule set.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesMetadata {
    /// Human-readable name of the rule set.
    pub name: String,
    /// Version or financial year of the rules (e.g. "2025-26").
    pub version: String,
}

/// Statutory policy rates shared by every state.
///
/// The defaults match the rates the engine has always used; `statutory.yaml`
/// may override any of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatutoryRates {
    /// Basic as a fraction of Monthly CTC.
    pub basic_ratio: Decimal,
    /// HRA as a fraction of Basic.
    pub hra_ratio: Decimal,
    /// Statutory bonus as a fraction of Basic.
    pub bonus_ratio: Decimal,
    /// PF contribution rate on Basic, each side.
    pub pf_rate: Decimal,
    /// Monthly PF contribution cap, each side.
    pub pf_monthly_cap: Decimal,
    /// Basic at or below which PF enrollment is mandatory.
    pub pf_wage_ceiling: Decimal,
    /// Fixed monthly PF administration charge.
    pub pf_admin_charge: Decimal,
    /// Fixed monthly EDLI insurance charge.
    pub pf_edli_charge: Decimal,
    /// Employee ESI rate, applied to Basic.
    pub esi_employee_rate: Decimal,
    /// Employer ESI rate, applied to gross earnings.
    pub esi_employer_rate: Decimal,
}

impl Default for StatutoryRates {
    fn default() -> Self {
        Self {
            basic_ratio: Decimal::new(5, 1),
            hra_ratio: Decimal::new(40, 2),
            bonus_ratio: Decimal::new(889, 4),
            pf_rate: Decimal::new(12, 2),
            pf_monthly_cap: Decimal::from(1800),
            pf_wage_ceiling: Decimal::from(15000),
            pf_admin_charge: Decimal::from(55),
            pf_edli_charge: Decimal::from(55),
            esi_employee_rate: Decimal::new(75, 4),
            esi_employer_rate: Decimal::new(325, 4),
        }
    }
}

/// How a state's Professional Tax slabs are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaxMode {
    /// Monthly slab lookup on gross salary.
    Slab,
    /// Slab lookup on six months of gross, divided back to a monthly amount.
    HalfYearly,
}

/// A single Professional Tax slab.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfessionalTaxSlab {
    /// Upper bound of the slab (inclusive). `None` means unbounded.
    #[serde(default)]
    pub max: Option<Decimal>,
    /// The tax charged within this slab.
    pub amount: Decimal,
}

impl ProfessionalTaxSlab {
    /// Returns true if `value` falls at or below this slab's upper bound.
    pub fn covers(&self, value: Decimal) -> bool {
        self.max.is_none_or(|max| value <= max)
    }
}

/// A month in which a state charges a different Professional Tax amount.
///
/// During `month` the tax is `amount` when gross is above `threshold` (at or
/// above it when `inclusive`), and zero otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonthOverride {
    /// Calendar month (1-12).
    pub month: u32,
    /// Gross salary threshold.
    pub threshold: Decimal,
    /// Whether a gross equal to the threshold is charged.
    #[serde(default)]
    pub inclusive: bool,
    /// The amount charged in that month.
    pub amount: Decimal,
}

impl MonthOverride {
    /// The amount due for `gross` in the override month.
    pub fn amount_for(&self, gross: Decimal) -> Decimal {
        let charged = if self.inclusive {
            gross >= self.threshold
        } else {
            gross > self.threshold
        };
        if charged { self.amount } else { Decimal::ZERO }
    }
}

/// Professional Tax rules for one state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfessionalTaxConfig {
    /// The slab evaluation mode.
    pub mode: TaxMode,
    /// Slabs in ascending order of `max`.
    pub slabs: Vec<ProfessionalTaxSlab>,
    /// Free-text notes about the state's rules.
    #[serde(default)]
    pub note: Option<String>,
    /// Month-specific amounts that replace the slab lookup.
    #[serde(default)]
    pub month_overrides: Vec<MonthOverride>,
}

/// How often a state's Labour Welfare Fund is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LwfFrequency {
    /// Collected every month.
    #[default]
    Monthly,
    /// Collected twice a year.
    HalfYearly,
    /// Collected once a year.
    Yearly,
}

impl LwfFrequency {
    /// The months in which the contribution is collected when a state does
    /// not list them explicitly.
    pub fn default_months(self) -> &'static [u32] {
        match self {
            LwfFrequency::Monthly => &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12],
            LwfFrequency::HalfYearly => &[6, 12],
            LwfFrequency::Yearly => &[12],
        }
    }
}

/// Labour Welfare Fund rules for one state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LwfConfig {
    /// Employee contribution per collection.
    pub employee: Decimal,
    /// Employer contribution per collection.
    pub employer: Decimal,
    /// Collection frequency.
    #[serde(default)]
    pub frequency: LwfFrequency,
    /// Explicit collection months, overriding the frequency defaults.
    #[serde(default)]
    pub deduction_months: Option<Vec<u32>>,
}

impl LwfConfig {
    /// Returns true if the contribution is collected in `month`.
    pub fn collected_in(&self, month: u32) -> bool {
        if self.frequency == LwfFrequency::Monthly {
            return true;
        }
        match &self.deduction_months {
            Some(months) => months.contains(&month),
            None => self.frequency.default_months().contains(&month),
        }
    }
}

/// ESIC applicability for one state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EsicConfig {
    /// Whether ESIC is notified in the state at all.
    pub applicable: bool,
    /// Gross salary below which ESIC applies.
    #[serde(default = "default_esic_threshold")]
    pub threshold: Decimal,
}

/// The ESIC wage threshold used when a state does not specify one.
pub fn default_esic_threshold() -> Decimal {
    Decimal::from(21000)
}

/// Top-level shape of `statutory.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryFile {
    /// Rule set metadata.
    pub metadata: RulesMetadata,
    /// Policy rates.
    #[serde(default)]
    pub rates: StatutoryRates,
}

/// Top-level shape of `professional_tax.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessionalTaxFile {
    /// Rules keyed by state name.
    pub states: HashMap<String, ProfessionalTaxConfig>,
}

/// Top-level shape of `lwf.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LwfFile {
    /// Rules keyed by state name.
    pub states: HashMap<String, LwfConfig>,
}

/// Top-level shape of `esic.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EsicFile {
    /// Rules keyed by state name.
    pub states: HashMap<String, EsicConfig>,
}

/// The complete set of jurisdiction rules.
///
/// Built once and passed by reference into every lookup and solve. The
/// constructor validates every table so lookups can rely on non-empty,
/// ascending slabs.
#[derive(Debug, Clone)]
pub struct JurisdictionTables {
    metadata: RulesMetadata,
    rates: StatutoryRates,
    professional_tax: HashMap<String, ProfessionalTaxConfig>,
    lwf: HashMap<String, LwfConfig>,
    esic: HashMap<String, EsicConfig>,
}

impl JurisdictionTables {
    /// Creates the tables from their component parts, validating each entry.
    pub fn new(
        metadata: RulesMetadata,
        rates: StatutoryRates,
        professional_tax: HashMap<String, ProfessionalTaxConfig>,
        lwf: HashMap<String, LwfConfig>,
        esic: HashMap<String, EsicConfig>,
    ) -> EngineResult<Self> {
        for (state, config) in &professional_tax {
            validate_professional_tax(state, config)?;
        }
        for (state, config) in &lwf {
            validate_lwf(state, config)?;
        }

        Ok(Self {
            metadata,
            rates,
            professional_tax,
            lwf,
            esic,
        })
    }

    /// Returns the rule set metadata.
    pub fn metadata(&self) -> &RulesMetadata {
        &self.metadata
    }

    /// Returns the statutory policy rates.
    pub fn rates(&self) -> &StatutoryRates {
        &self.rates
    }

    /// Professional Tax rules for a state, if it has any.
    pub fn professional_tax(&self, state: &str) -> Option<&ProfessionalTaxConfig> {
        self.professional_tax.get(state)
    }

    /// LWF rules for a state, if it has any.
    pub fn lwf(&self, state: &str) -> Option<&LwfConfig> {
        self.lwf.get(state)
    }

    /// ESIC rules for a state, if it has any.
    pub fn esic(&self, state: &str) -> Option<&EsicConfig> {
        self.esic.get(state)
    }

    /// Every state named by at least one table, in sorted order.
    pub fn states(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .professional_tax
            .keys()
            .chain(self.lwf.keys())
            .chain(self.esic.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().collect()
    }
}

fn invalid(table: &str, state: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        table: table.to_string(),
        state: state.to_string(),
        message: message.into(),
    }
}

fn validate_month(table: &str, state: &str, month: u32) -> EngineResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(invalid(table, state, format!("month {} is outside 1-12", month)))
    }
}

fn validate_professional_tax(state: &str, config: &ProfessionalTaxConfig) -> EngineResult<()> {
    const TABLE: &str = "professional_tax";

    if config.slabs.is_empty() {
        return Err(invalid(TABLE, state, "at least one slab is required"));
    }

    let mut previous: Option<Decimal> = None;
    for (index, slab) in config.slabs.iter().enumerate() {
        if slab.amount < Decimal::ZERO {
            return Err(invalid(TABLE, state, "slab amounts must not be negative"));
        }
        match slab.max {
            None if index + 1 != config.slabs.len() => {
                return Err(invalid(TABLE, state, "only the last slab may be unbounded"));
            }
            None => {}
            Some(max) => {
                if previous.is_some_and(|prev| max < prev) {
                    return Err(invalid(TABLE, state, "slabs must be in ascending order"));
                }
                previous = Some(max);
            }
        }
    }

    for month_override in &config.month_overrides {
        validate_month(TABLE, state, month_override.month)?;
    }

    Ok(())
}

fn validate_lwf(state: &str, config: &LwfConfig) -> EngineResult<()> {
    const TABLE: &str = "lwf";

    if config.employee < Decimal::ZERO || config.employer < Decimal::ZERO {
        return Err(invalid(TABLE, state, "contributions must not be negative"));
    }
    if let Some(months) = &config.deduction_months {
        for &month in months {
            validate_month(TABLE, state, month)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: i64) -> Decimal {
        Decimal::from(value)
    }

    fn metadata() -> RulesMetadata {
        RulesMetadata {
            name: "Test rules".to_string(),
            version: "test".to_string(),
        }
    }

    fn slab(max: Option<i64>, amount: i64) -> ProfessionalTaxSlab {
        ProfessionalTaxSlab {
            max: max.map(dec),
            amount: dec(amount),
        }
    }

    fn tables_with_pt(config: ProfessionalTaxConfig) -> EngineResult<JurisdictionTables> {
        let mut pt = HashMap::new();
        pt.insert("Testland".to_string(), config);
        JurisdictionTables::new(
            metadata(),
            StatutoryRates::default(),
            pt,
            HashMap::new(),
            HashMap::new(),
        )
    }

    #[test]
    fn test_default_rates_match_policy() {
        let rates = StatutoryRates::default();
        assert_eq!(rates.basic_ratio, Decimal::new(5, 1));
        assert_eq!(rates.pf_monthly_cap, dec(1800));
        assert_eq!(rates.pf_wage_ceiling, dec(15000));
        assert_eq!(rates.esi_employer_rate, Decimal::new(325, 4));
    }

    #[test]
    fn test_slab_without_max_covers_everything() {
        let unbounded = slab(None, 200);
        assert!(unbounded.covers(dec(10_000_000)));

        let bounded = slab(Some(15000), 0);
        assert!(bounded.covers(dec(15000)));
        assert!(!bounded.covers(dec(15001)));
    }

    #[test]
    fn test_month_override_inclusive_and_exclusive() {
        let karnataka = MonthOverride {
            month: 2,
            threshold: dec(25000),
            inclusive: true,
            amount: dec(300),
        };
        assert_eq!(karnataka.amount_for(dec(25000)), dec(300));
        assert_eq!(karnataka.amount_for(dec(24999)), Decimal::ZERO);

        let madhya_pradesh = MonthOverride {
            month: 12,
            threshold: dec(225000),
            inclusive: false,
            amount: dec(212),
        };
        assert_eq!(madhya_pradesh.amount_for(dec(225000)), Decimal::ZERO);
        assert_eq!(madhya_pradesh.amount_for(dec(225001)), dec(212));
    }

    #[test]
    fn test_lwf_collection_months() {
        let half_yearly = LwfConfig {
            employee: dec(6),
            employer: dec(12),
            frequency: LwfFrequency::HalfYearly,
            deduction_months: None,
        };
        assert!(half_yearly.collected_in(6));
        assert!(half_yearly.collected_in(12));
        assert!(!half_yearly.collected_in(3));

        let explicit = LwfConfig {
            deduction_months: Some(vec![1, 7]),
            ..half_yearly.clone()
        };
        assert!(explicit.collected_in(7));
        assert!(!explicit.collected_in(6));

        let yearly = LwfConfig {
            frequency: LwfFrequency::Yearly,
            ..half_yearly
        };
        assert!(yearly.collected_in(12));
        assert!(!yearly.collected_in(6));
    }

    #[test]
    fn test_deserialize_professional_tax_config() {
        let yaml = r#"
mode: half-yearly
slabs:
  - max: 11999
    amount: 0
  - amount: 1250
note: Collected half-yearly
"#;
        let config: ProfessionalTaxConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.mode, TaxMode::HalfYearly);
        assert_eq!(config.slabs.len(), 2);
        assert_eq!(config.slabs[1].max, None);
        assert!(config.month_overrides.is_empty());
    }

    #[test]
    fn test_deserialize_lwf_defaults_to_monthly() {
        let config: LwfConfig = serde_yaml::from_str("employee: 0.75\nemployer: 2.25\n").unwrap();
        assert_eq!(config.frequency, LwfFrequency::Monthly);
        assert_eq!(config.employee, Decimal::new(75, 2));
    }

    #[test]
    fn test_deserialize_esic_default_threshold() {
        let config: EsicConfig = serde_yaml::from_str("applicable: true\n").unwrap();
        assert_eq!(config.threshold, dec(21000));
    }

    #[test]
    fn test_rejects_empty_slabs() {
        let result = tables_with_pt(ProfessionalTaxConfig {
            mode: TaxMode::Slab,
            slabs: vec![],
            note: None,
            month_overrides: vec![],
        });
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_descending_slabs() {
        let result = tables_with_pt(ProfessionalTaxConfig {
            mode: TaxMode::Slab,
            slabs: vec![slab(Some(20000), 150), slab(Some(15000), 0), slab(None, 200)],
            note: None,
            month_overrides: vec![],
        });
        match result {
            Err(EngineError::InvalidConfig { table, state, .. }) => {
                assert_eq!(table, "professional_tax");
                assert_eq!(state, "Testland");
            }
            other => panic!("Expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unbounded_slab_before_last() {
        let result = tables_with_pt(ProfessionalTaxConfig {
            mode: TaxMode::Slab,
            slabs: vec![slab(None, 0), slab(Some(15000), 200)],
            note: None,
            month_overrides: vec![],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_override_month_out_of_range() {
        let result = tables_with_pt(ProfessionalTaxConfig {
            mode: TaxMode::Slab,
            slabs: vec![slab(None, 200)],
            note: None,
            month_overrides: vec![MonthOverride {
                month: 13,
                threshold: dec(0),
                inclusive: true,
                amount: dec(300),
            }],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_states_lists_union_of_tables() {
        let mut lwf = HashMap::new();
        lwf.insert(
            "Beta".to_string(),
            LwfConfig {
                employee: dec(10),
                employer: dec(20),
                frequency: LwfFrequency::Monthly,
                deduction_months: None,
            },
        );
        let mut esic = HashMap::new();
        esic.insert(
            "Alpha".to_string(),
            EsicConfig {
                applicable: false,
                threshold: default_esic_threshold(),
            },
        );
        esic.insert(
            "Beta".to_string(),
            EsicConfig {
                applicable: true,
                threshold: default_esic_threshold(),
            },
        );

        let tables = JurisdictionTables::new(
            metadata(),
            StatutoryRates::default(),
            HashMap::new(),
            lwf,
            esic,
        )
        .unwrap();

        assert_eq!(tables.states(), vec!["Alpha", "Beta"]);
    }
}
