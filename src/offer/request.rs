//! Offer request types.
//!
//! Requests usually arrive from spreadsheets, so amounts may be text and the
//! PF column is a loose Yes/No. Everything is normalized by
//! [`OfferRequest::validate`] before the solver sees it.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::current_month;
use crate::error::{EngineError, EngineResult};

/// An amount given either as a number or as text.
///
/// # Example
///
/// ```
/// use ctc_engine::offer::AmountInput;
/// use rust_decimal::Decimal;
///
/// let amount: AmountInput = serde_json::from_str("\"1,25,000\"").unwrap();
/// assert_eq!(amount.parse(), Some(Decimal::from(125000)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A numeric amount.
    Amount(Decimal),
    /// Free text such as `"45000"` or `"45,000"`.
    Text(String),
}

impl AmountInput {
    /// Parses the amount, ignoring surrounding whitespace and digit-group
    /// commas. Returns `None` for text that is not a number.
    pub fn parse(&self) -> Option<Decimal> {
        match self {
            AmountInput::Amount(amount) => Some(*amount),
            AmountInput::Text(text) => {
                let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
                Decimal::from_str(&cleaned).ok()
            }
        }
    }
}

impl From<Decimal> for AmountInput {
    fn from(amount: Decimal) -> Self {
        AmountInput::Amount(amount)
    }
}

impl From<&str> for AmountInput {
    fn from(text: &str) -> Self {
        AmountInput::Text(text.to_string())
    }
}

/// The candidate's PF election.
///
/// Deserializes leniently: `"no"`, `"n"`, `"false"` and `"0"` (any case) mean
/// [`PfChoice::No`]; any other text means [`PfChoice::Yes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum PfChoice {
    /// PF contributions requested.
    #[default]
    Yes,
    /// PF declined.
    No,
}

impl PfChoice {
    /// Whether PF was requested.
    pub fn is_enabled(self) -> bool {
        self == PfChoice::Yes
    }
}

impl From<&str> for PfChoice {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "no" | "n" | "false" | "0" => PfChoice::No,
            _ => PfChoice::Yes,
        }
    }
}

impl From<String> for PfChoice {
    fn from(value: String) -> Self {
        PfChoice::from(value.as_str())
    }
}

/// One offer to be priced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRequest {
    /// Identifier of the offer.
    pub offer_id: String,
    /// Name of the candidate, for the letter.
    #[serde(default)]
    pub candidate_name: Option<String>,
    /// Work state.
    pub state: String,
    /// Target monthly take-home.
    pub net_salary: AmountInput,
    /// PF election.
    #[serde(default)]
    pub pf: PfChoice,
    /// Date of joining; its month selects month-specific rules.
    #[serde(default)]
    pub date_of_joining: Option<NaiveDate>,
    /// Explicit calendar month (1-12), taking precedence over the joining date.
    #[serde(default)]
    pub month: Option<u32>,
    /// Monthly travel allowance, shown outside the solve.
    #[serde(default)]
    pub travel_allowance: Option<AmountInput>,
}

/// A request whose fields have been checked and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOffer {
    /// Identifier of the offer.
    pub offer_id: String,
    /// Trimmed work state.
    pub state: String,
    /// Target monthly net, positive.
    pub net_salary: Decimal,
    /// Whether PF was requested.
    pub pf_enabled: bool,
    /// Calendar month the rules apply for.
    pub month: u32,
    /// Positive travel allowance, if any.
    pub travel_allowance: Option<Decimal>,
}

impl OfferRequest {
    /// Creates a request with PF requested and no optional fields.
    pub fn new(
        offer_id: impl Into<String>,
        state: impl Into<String>,
        net_salary: impl Into<AmountInput>,
    ) -> Self {
        Self {
            offer_id: offer_id.into(),
            candidate_name: None,
            state: state.into(),
            net_salary: net_salary.into(),
            pf: PfChoice::Yes,
            date_of_joining: None,
            month: None,
            travel_allowance: None,
        }
    }

    /// Checks required fields and resolves the month.
    ///
    /// The month is the explicit `month`, else the month of
    /// `date_of_joining`, else the current month.
    pub fn validate(&self) -> EngineResult<ValidatedOffer> {
        let offer_id = self.offer_id.trim();
        if offer_id.is_empty() {
            return Err(EngineError::invalid_request("offer_id", "is required"));
        }

        let state = self.state.trim();
        if state.is_empty() {
            return Err(EngineError::invalid_request("state", "is required"));
        }

        let net_salary = self.net_salary.parse().ok_or_else(|| {
            EngineError::invalid_request("net_salary", format!("'{}' is not a number", self.raw_net_salary()))
        })?;
        if net_salary <= Decimal::ZERO {
            return Err(EngineError::invalid_request(
                "net_salary",
                format!("must be positive, got {}", net_salary),
            ));
        }

        let month = match (self.month, self.date_of_joining) {
            (Some(month), _) if !(1..=12).contains(&month) => {
                return Err(EngineError::invalid_request(
                    "month",
                    format!("must be between 1 and 12, got {}", month),
                ));
            }
            (Some(month), _) => month,
            (None, Some(date)) => date.month(),
            (None, None) => current_month(),
        };

        let travel_allowance = self
            .travel_allowance
            .as_ref()
            .and_then(AmountInput::parse)
            .filter(|amount| *amount > Decimal::ZERO);

        Ok(ValidatedOffer {
            offer_id: offer_id.to_string(),
            state: state.to_string(),
            net_salary,
            pf_enabled: self.pf.is_enabled(),
            month,
            travel_allowance,
        })
    }

    fn raw_net_salary(&self) -> String {
        match &self.net_salary {
            AmountInput::Amount(amount) => amount.to_string(),
            AmountInput::Text(text) => text.clone(),
        }
    }
}
