//! The batch workload run.
//!
//! Drives one table of course rows through intake, team-taught division,
//! co-convened adjustment and aggregation, and assembles the report. The run
//! owns every course and faculty record it creates, so no other caller can
//! observe or mutate them between passes.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{InstructorTracks, SpecialCourses, WorkloadPolicy};
use crate::error::EngineResult;
use crate::models::{
    AdjustmentMode, AuditTrace, CourseBook, FacultyMember, InstructorId, RawRecord, Track,
    UnclassifiedReason, UnclassifiedRecord, WorkloadReport,
};

use super::aggregate::{build_summary, calculate_total_load};
use super::classifier::build_course;
use super::co_convened::apply_co_convened_adjustment;
use super::team_taught::apply_team_taught_division;
use super::validation::{resolve_instructor_id, validate_record};

/// Everything a workload run needs besides the course rows.
#[derive(Debug, Clone, Default)]
pub struct WorkloadRun {
    /// Rate policy.
    pub policy: WorkloadPolicy,
    /// Instructor track mapping. Instructors absent here are not reported.
    pub tracks: InstructorTracks,
    /// Courses eligible for the special-course bonus.
    pub special_courses: SpecialCourses,
    /// Co-convened adjustment mode.
    pub mode: AdjustmentMode,
}

/// Courses and faculty accepted during intake.
struct Intake {
    book: CourseBook,
    faculty: BTreeMap<InstructorId, FacultyMember>,
    unclassified: Vec<UnclassifiedRecord>,
}

impl WorkloadRun {
    /// Creates a run with the default collapse mode.
    ///
    /// Out-of-range policy values are replaced with defaults.
    pub fn new(
        policy: WorkloadPolicy,
        tracks: InstructorTracks,
        special_courses: SpecialCourses,
    ) -> Self {
        Self {
            policy: policy.sanitized(),
            tracks,
            special_courses,
            mode: AdjustmentMode::default(),
        }
    }

    /// Sets the co-convened adjustment mode.
    pub fn with_mode(mut self, mode: AdjustmentMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runs the whole batch and returns the report.
    ///
    /// Rejected rows end up in [`WorkloadReport::unclassified`]. An invalid
    /// load transition aborts the run; no partial report is produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use workload_engine::calculation::WorkloadRun;
    /// use workload_engine::config::{InstructorTracks, SpecialCourses, WorkloadPolicy};
    /// use workload_engine::models::{RawRecord, Track};
    /// use rust_decimal::Decimal;
    ///
    /// let tracks: InstructorTracks = [(1001, Track::CareerTrack)].into_iter().collect();
    /// let run = WorkloadRun::new(WorkloadPolicy::default(), tracks, SpecialCourses::new());
    ///
    /// let record = RawRecord {
    ///     instructor_role: Some("PI".to_string()),
    ///     instructor_id: Some("1001".to_string()),
    ///     instructor_name: Some("Ada Lovelace".to_string()),
    ///     course_category: Some("Independent Study".to_string()),
    ///     max_units: Some("3".to_string()),
    ///     enroll_total: Some("2".to_string()),
    ///     subject: Some("CS".to_string()),
    ///     catalog_number: Some("485".to_string()),
    ///     section: Some("001".to_string()),
    ///     ..RawRecord::default()
    /// };
    ///
    /// let report = run.run(vec![record]).unwrap();
    /// let summary = report.faculty_summary(1001).unwrap();
    /// assert_eq!(summary.total_load, Decimal::from(3));
    /// assert_eq!(summary.percentage, Some(Decimal::new(750, 2)));
    /// ```
    pub fn run(&self, records: Vec<RawRecord>) -> EngineResult<WorkloadReport> {
        let started = Instant::now();
        let records_processed = records.len();
        let mut trace = AuditTrace::default();

        info!(
            records = records_processed,
            mode = %self.mode,
            instructors = self.tracks.len(),
            special_courses = self.special_courses.len(),
            "Starting workload run"
        );

        let Intake {
            mut book,
            mut faculty,
            unclassified,
        } = self.intake(records, &mut trace);

        let divided = apply_team_taught_division(&mut book, &self.policy, &mut trace)?;
        let bundles = apply_co_convened_adjustment(&mut book, &self.policy, self.mode, &mut trace)?;
        debug!(team_taught_courses = divided, co_convened_bundles = bundles, "Adjustments applied");

        let mut summaries = Vec::with_capacity(faculty.len());
        for member in faculty.values_mut() {
            calculate_total_load(member, &mut book, &self.policy)?;
            if self.policy.baseline_for(&member.track).is_none() {
                trace.warn(
                    "NO_TRACK_BASELINE",
                    format!(
                        "Instructor {} has track '{}' with no baseline; \
                         percentage needs manual review",
                        member.instructor_id, member.track
                    ),
                    "medium",
                );
            }
            summaries.push(build_summary(member, &book, &self.policy));
        }

        trace.duration_us = started.elapsed().as_micros() as u64;
        info!(
            faculty = summaries.len(),
            courses = book.len(),
            unclassified = unclassified.len(),
            duration_us = trace.duration_us,
            "Workload run complete"
        );

        Ok(WorkloadReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            adjustment_mode: self.mode,
            records_processed,
            faculty: summaries,
            unclassified,
            audit_trace: trace,
        })
    }

    fn intake(&self, records: Vec<RawRecord>, trace: &mut AuditTrace) -> Intake {
        let mut intake = Intake {
            book: CourseBook::new(),
            faculty: BTreeMap::new(),
            unclassified: Vec::new(),
        };

        for record in records {
            let (instructor_id, track) = match self.admit(&record) {
                Ok(admitted) => admitted,
                Err(reason) => {
                    debug!(?reason, "Row left unclassified");
                    trace.warn(
                        "UNCLASSIFIED_RECORD",
                        unclassified_message(&reason),
                        "low",
                    );
                    intake.unclassified.push(UnclassifiedRecord { reason, record });
                    continue;
                }
            };

            let course = build_course(&record, &self.special_courses);
            let member = intake.faculty.entry(instructor_id).or_insert_with(|| {
                FacultyMember::new(
                    instructor_id,
                    course.instructor_name.clone(),
                    record.instructor_email.as_deref().unwrap_or_default().trim(),
                    track,
                )
            });

            if member.has_course(course.teaching_key()) {
                warn!(
                    instructor_id,
                    section = %course.label(),
                    "Duplicate section row ignored"
                );
                trace.warn(
                    "DUPLICATE_SECTION",
                    format!(
                        "Instructor {} already has {} at this meeting; row ignored",
                        instructor_id,
                        course.label()
                    ),
                    "low",
                );
                member.roles.insert(course.instructor_role.clone());
                continue;
            }

            let id = intake.book.insert(course);
            member.add_course(&intake.book[id], id);
        }

        intake
    }

    fn admit(&self, record: &RawRecord) -> Result<(InstructorId, Track), UnclassifiedReason> {
        validate_record(record)?;
        let raw_id = record.instructor_id.as_deref().unwrap_or_default();
        let instructor_id =
            resolve_instructor_id(raw_id).ok_or_else(|| UnclassifiedReason::UnresolvedInstructorId {
                value: raw_id.trim().to_string(),
            })?;
        let track = self
            .tracks
            .get(instructor_id)
            .cloned()
            .ok_or(UnclassifiedReason::UnknownInstructorTrack { instructor_id })?;
        Ok((instructor_id, track))
    }
}

fn unclassified_message(reason: &UnclassifiedReason) -> String {
    match reason {
        UnclassifiedReason::MissingField { field } => {
            format!("Row missing required field '{field}'")
        }
        UnclassifiedReason::UnresolvedInstructorId { value } => {
            format!("Instructor id '{value}' is not numeric")
        }
        UnclassifiedReason::UnknownInstructorTrack { instructor_id } => {
            format!("Instructor {instructor_id} has no track assignment")
        }
    }
}

/// Runs a batch in one call.
///
/// Equivalent to building a [`WorkloadRun`] and calling [`WorkloadRun::run`].
pub fn run_workload(
    records: Vec<RawRecord>,
    policy: WorkloadPolicy,
    tracks: InstructorTracks,
    special_courses: SpecialCourses,
    mode: AdjustmentMode,
) -> EngineResult<WorkloadReport> {
    WorkloadRun::new(policy, tracks, special_courses)
        .with_mode(mode)
        .run(records)
}
