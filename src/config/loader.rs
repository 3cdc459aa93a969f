//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the jurisdiction
//! rule tables from YAML files, either from a directory on disk or from the
//! copies compiled into the crate.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    EsicFile, JurisdictionTables, LwfFile, ProfessionalTaxFile, StatutoryFile,
};

const STATUTORY_FILE: &str = "statutory.yaml";
const PROFESSIONAL_TAX_FILE: &str = "professional_tax.yaml";
const LWF_FILE: &str = "lwf.yaml";
const ESIC_FILE: &str = "esic.yaml";

const EMBEDDED_STATUTORY: &str = include_str!("../../config/india/statutory.yaml");
const EMBEDDED_PROFESSIONAL_TAX: &str = include_str!("../../config/india/professional_tax.yaml");
const EMBEDDED_LWF: &str = include_str!("../../config/india/lwf.yaml");
const EMBEDDED_ESIC: &str = include_str!("../../config/india/esic.yaml");

/// Loads and provides access to the jurisdiction rule tables.
///
/// # Directory Structure
///
/// ```text
/// config/india/
/// ├── statutory.yaml         # Metadata and PF/ESI/salary-structure rates
/// ├── professional_tax.yaml  # Per-state PT slabs and month overrides
/// ├── lwf.yaml               # Per-state Labour Welfare Fund amounts
/// └── esic.yaml              # Per-state ESIC applicability
/// ```
///
/// # Example
///
/// ```no_run
/// use ctc_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/india")?;
/// println!("Loaded rules: {}", loader.tables().metadata().name);
/// # Ok::<(), ctc_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: JurisdictionTables,
}

impl ConfigLoader {
    /// Loads the rule tables from the specified directory.
    ///
    /// Returns an error if any file is missing, is not valid YAML, or holds
    /// inconsistent rules (see [`JurisdictionTables::new`]).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let statutory: StatutoryFile = Self::load_yaml(&path.join(STATUTORY_FILE))?;
        let professional_tax: ProfessionalTaxFile =
            Self::load_yaml(&path.join(PROFESSIONAL_TAX_FILE))?;
        let lwf: LwfFile = Self::load_yaml(&path.join(LWF_FILE))?;
        let esic: EsicFile = Self::load_yaml(&path.join(ESIC_FILE))?;

        Self::assemble(statutory, professional_tax, lwf, esic)
    }

    /// Builds the rule tables from the copies compiled into the crate.
    ///
    /// # Example
    ///
    /// ```
    /// use ctc_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::embedded().unwrap();
    /// assert!(loader.tables().professional_tax("Karnataka").is_some());
    /// ```
    pub fn embedded() -> EngineResult<Self> {
        let statutory = Self::parse_yaml(EMBEDDED_STATUTORY, STATUTORY_FILE)?;
        let professional_tax = Self::parse_yaml(EMBEDDED_PROFESSIONAL_TAX, PROFESSIONAL_TAX_FILE)?;
        let lwf = Self::parse_yaml(EMBEDDED_LWF, LWF_FILE)?;
        let esic = Self::parse_yaml(EMBEDDED_ESIC, ESIC_FILE)?;

        Self::assemble(statutory, professional_tax, lwf, esic)
    }

    fn assemble(
        statutory: StatutoryFile,
        professional_tax: ProfessionalTaxFile,
        lwf: LwfFile,
        esic: EsicFile,
    ) -> EngineResult<Self> {
        debug!(
            rules = %statutory.metadata.name,
            version = %statutory.metadata.version,
            professional_tax_states = professional_tax.states.len(),
            lwf_states = lwf.states.len(),
            esic_states = esic.states.len(),
            "Loaded jurisdiction rule tables"
        );

        let tables = JurisdictionTables::new(
            statutory.metadata,
            statutory.rates,
            professional_tax.states,
            lwf.states,
            esic.states,
        )?;

        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the loaded rule tables.
    pub fn tables(&self) -> &JurisdictionTables {
        &self.tables
    }

    /// Consumes the loader, returning the rule tables.
    pub fn into_tables(self) -> JurisdictionTables {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LwfFrequency, TaxMode};
    use rust_decimal::Decimal;

    fn config_path() -> &'static str {
        "./config/india"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.tables().metadata().version, "2025-26");
    }

    #[test]
    fn test_embedded_matches_disk() {
        let disk = ConfigLoader::load(config_path()).unwrap();
        let embedded = ConfigLoader::embedded().unwrap();

        assert_eq!(disk.tables().states(), embedded.tables().states());
        assert_eq!(disk.tables().rates(), embedded.tables().rates());
    }

    #[test]
    fn test_karnataka_has_february_override() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let karnataka = loader.tables().professional_tax("Karnataka").unwrap();

        assert_eq!(karnataka.mode, TaxMode::Slab);
        assert_eq!(karnataka.month_overrides.len(), 1);
        assert_eq!(karnataka.month_overrides[0].month, 2);
        assert_eq!(karnataka.month_overrides[0].amount, Decimal::from(300));
        assert!(karnataka.month_overrides[0].inclusive);
    }

    #[test]
    fn test_kerala_is_half_yearly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let kerala = loader.tables().professional_tax("Kerala").unwrap();

        assert_eq!(kerala.mode, TaxMode::HalfYearly);
        assert_eq!(kerala.slabs.last().unwrap().max, None);
    }

    #[test]
    fn test_lwf_loaded_for_haryana() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let haryana = loader.tables().lwf("Haryana").unwrap();

        assert_eq!(haryana.employee, Decimal::from(34));
        assert_eq!(haryana.employer, Decimal::from(68));
        assert_eq!(haryana.frequency, LwfFrequency::Monthly);
    }

    #[test]
    fn test_esic_not_applicable_in_sikkim() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let sikkim = loader.tables().esic("Sikkim").unwrap();

        assert!(!sikkim.applicable);
        assert_eq!(sikkim.threshold, Decimal::from(21000));
    }

    #[test]
    fn test_delhi_has_no_professional_tax_below_50000() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let delhi = loader.tables().professional_tax("Delhi").unwrap();

        assert_eq!(delhi.slabs[0].max, Some(Decimal::from(50000)));
        assert_eq!(delhi.slabs[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("statutory.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_parse_error_reports_path() {
        let result: EngineResult<StatutoryFile> =
            ConfigLoader::parse_yaml("metadata: [unterminated", "statutory.yaml");

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert_eq!(path, "statutory.yaml");
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }
}
