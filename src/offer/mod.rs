//! Offer pricing.
//!
//! Wraps the solver with the policy applied to real offers: request
//! validation, month resolution from the joining date, the mandatory-PF
//! guardrail, travel allowance, an audit trace, and batch processing.

mod batch;
mod calculator;
mod request;

pub use batch::calculate_batch;
pub use calculator::OfferCalculator;
pub use request::{AmountInput, OfferRequest, PfChoice, ValidatedOffer};
