//! The result of pricing one offer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::SolveSummary;

use super::{AuditTrace, SalaryBreakdown};

/// The complete result of an offer calculation.
///
/// Carries the breakdown that goes onto the offer letter together with the
/// rule decisions and solver diagnostics behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferComputation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The offer this calculation belongs to.
    pub offer_id: String,
    /// The work state, trimmed.
    pub state: String,
    /// Calendar month the rules were applied for.
    pub month: u32,
    /// Whether PF was applied at the candidate's request.
    pub pf_enabled: bool,
    /// The solved breakdown.
    pub breakdown: SalaryBreakdown,
    /// Solver diagnostics.
    pub solver: SolveSummary,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
