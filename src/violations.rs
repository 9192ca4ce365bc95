//! Enforcement violations and the roll-up shown above the violations list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationStatus {
    Active,
    Resolved,
    UnderReview,
}

/// Ordered low to critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    pub company: String,
    pub facility: String,
    pub violation_type: String,
    pub description: String,
    pub date: NaiveDate,
    /// Assessed fine in whole dollars.
    pub fine: u64,
    pub status: ViolationStatus,
    pub severity: ViolationSeverity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViolationSummary {
    pub total_fines: u64,
    pub active: usize,
    pub under_review: usize,
    pub resolved: usize,
    pub worst_severity: Option<ViolationSeverity>,
}

impl ViolationSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        let mut summary = ViolationSummary::default();
        for v in violations {
            summary.total_fines = summary.total_fines.saturating_add(v.fine);
            match v.status {
                ViolationStatus::Active => summary.active += 1,
                ViolationStatus::UnderReview => summary.under_review += 1,
                ViolationStatus::Resolved => summary.resolved += 1,
            }
            summary.worst_severity = summary.worst_severity.max(Some(v.severity));
        }
        summary
    }
}

/// Critical first; within a severity, most recent first.
pub fn sorted_by_severity(violations: &[Violation]) -> Vec<&Violation> {
    let mut out: Vec<&Violation> = violations.iter().collect();
    out.sort_by(|a, b| b.severity.cmp(&a.severity).then(b.date.cmp(&a.date)));
    out
}
