//! Core data models for the workload engine.
//!
//! This module contains all the domain models used throughout the engine.

mod adjustment_mode;
mod course;
mod faculty;
mod raw_record;
mod report;

pub use adjustment_mode::AdjustmentMode;
pub use course::{
    CollapsingKey, Course, CourseBook, CourseCategory, CourseId, LoadState, MeetingSignature,
    TeachingGroupKey,
};
pub use faculty::{FacultyMember, InstructorId, Track};
pub use raw_record::RawRecord;
pub use report::{
    AuditStep, AuditTrace, AuditWarning, FacultySummary, UnclassifiedReason, UnclassifiedRecord,
    WorkloadReport,
};
