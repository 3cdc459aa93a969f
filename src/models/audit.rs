//! Audit trace types.
//!
//! Every statutory decision taken while pricing an offer is recorded as an
//! [`AuditStep`] so that a payroll reviewer can see why each figure came out
//! the way it did.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The statute or scheme the rule comes from.
    pub statute_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Severity of an [`AuditWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Worth a look before the offer goes out.
    Medium,
    /// The figures should not be used without review.
    High,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// How serious the warning is.
    pub severity: WarningSeverity,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use ctc_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        statute_ref: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            statute_ref: statute_ref.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: WarningSeverity) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity,
        });
    }
}
