//! Workload report models.
//!
//! This module contains the [`WorkloadReport`] type and its associated
//! structures that capture the outputs of a batch run: one summary per
//! faculty member, the rows left out of the calculation, and an audit trace
//! of every adjustment the run made.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AdjustmentMode, InstructorId, RawRecord, Track};

/// A single step in the audit trace recording an adjustment decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a run.
///
/// Warnings flag conditions that did not stop the run but may need attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a run.
///
/// # Example
///
/// ```
/// use workload_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert_eq!(trace.next_step_number(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of adjustment steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the run.
    pub warnings: Vec<AuditWarning>,
    /// The total run duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns the number the next recorded step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        });
    }
}

/// Why a row was left out of the workload calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnclassifiedReason {
    /// A structurally required cell was blank.
    MissingField {
        /// Column header of the missing cell.
        field: String,
    },
    /// The instructor id is not a number.
    UnresolvedInstructorId {
        /// The supplied value.
        value: String,
    },
    /// The instructor has no entry in the track mapping.
    UnknownInstructorTrack {
        /// The resolved instructor id.
        instructor_id: InstructorId,
    },
}

/// A row excluded from faculty load computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclassifiedRecord {
    /// Why the row was excluded.
    pub reason: UnclassifiedReason,
    /// The row as supplied.
    pub record: RawRecord,
}

/// One faculty member's line in the report.
///
/// Loads and percentages are rounded to two decimal places here and nowhere
/// earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultySummary {
    /// Instructor display name.
    pub name: String,
    /// Instructor id.
    pub instructor_id: InstructorId,
    /// Instructor email.
    pub email: String,
    /// Track designation.
    pub track: Track,
    /// Total load, rounded.
    pub total_load: Decimal,
    /// Total load as a percentage of the track baseline, rounded.
    ///
    /// `None` when the track has no baseline; such instructors are out of
    /// range and need manual review.
    pub percentage: Option<Decimal>,
    /// Distinct organizational units taught, sorted.
    pub units: Vec<String>,
    /// Course labels with companion annotations, sorted.
    pub courses: Vec<String>,
}

impl FacultySummary {
    /// Units joined for display, e.g. `"BIO, CHM"`.
    pub fn units_taught(&self) -> String {
        self.units.join(", ")
    }

    /// Course labels joined for display.
    pub fn courses_taught(&self) -> String {
        self.courses.join("; ")
    }
}

/// The complete result of a workload batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that performed the run.
    pub engine_version: String,
    /// The co-convened adjustment mode used.
    pub adjustment_mode: AdjustmentMode,
    /// Number of input rows.
    pub records_processed: usize,
    /// One summary per faculty member, ordered by instructor id.
    pub faculty: Vec<FacultySummary>,
    /// Rows excluded from the calculation.
    pub unclassified: Vec<UnclassifiedRecord>,
    /// Audit trace of adjustments and warnings.
    pub audit_trace: AuditTrace,
}

impl WorkloadReport {
    /// Returns the summary for an instructor, if present.
    pub fn faculty_summary(&self, instructor_id: InstructorId) -> Option<&FacultySummary> {
        self.faculty.iter().find(|f| f.instructor_id == instructor_id)
    }
}
