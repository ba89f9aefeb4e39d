//! Course model and the grouping keys derived from it.
//!
//! A [`Course`] is one classified course-section-instructor assignment. Its
//! load moves through an explicit [`LoadState`] so that the adjustment passes
//! cannot silently recompute over an already divided value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{EngineError, EngineResult};

use super::InstructorId;

/// The closed set of course categories.
///
/// Produced once by the classifier from the free-text category, catalog
/// number, class code and instructor role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    /// Thesis or dissertation supervision, including reserved catalog numbers.
    Thesis,
    /// Independent study, research, fieldwork and individualized study.
    IndependentStudy,
    /// Laboratory sections.
    Laboratory,
    /// Supplemental instruction for designated low-numbered courses.
    SupplementalInstruction,
    /// Lectures, which scale with enrollment.
    Lecture,
    /// Any other classroom course (seminar, recitation, ...).
    Standard,
}

/// When and where a section meets.
///
/// Building and room are lower-cased; date and time are kept as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeetingSignature {
    /// Meeting start date.
    pub date: Option<String>,
    /// Meeting start time.
    pub time: Option<String>,
    /// Facility building.
    pub building: Option<String>,
    /// Facility room.
    pub room: Option<String>,
}

impl MeetingSignature {
    /// Returns true when date, time, building and room are all present.
    ///
    /// Only complete signatures take part in collision detection.
    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.time.is_some() && self.building.is_some() && self.room.is_some()
    }
}

/// Identifies one section meeting, regardless of who teaches it.
///
/// Several instructors holding the same key teach the section jointly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeachingGroupKey {
    /// Normalized term.
    pub term: String,
    /// Normalized subject.
    pub subject: String,
    /// Normalized catalog number.
    pub catalog_number: String,
    /// Normalized section.
    pub section: String,
    /// Meeting signature.
    pub meeting: MeetingSignature,
}

/// Identifies one instructor's meeting slot across course records.
///
/// Several courses holding the same key are co-convened.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollapsingKey {
    /// Instructor teaching the meeting.
    pub instructor_id: Option<InstructorId>,
    /// Normalized term.
    pub term: String,
    /// Normalized subject.
    pub subject: String,
    /// Normalized section.
    pub section: String,
    /// Meeting signature.
    pub meeting: MeetingSignature,
}

/// The lifecycle of a course load.
///
/// Transitions run `Unset -> Computed -> Adjusted`. The only way back is an
/// explicit forced recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum LoadState {
    /// Not calculated yet.
    Unset,
    /// Calculated from the course's own attributes.
    Computed(Decimal),
    /// Divided, collapsed or split by an adjustment pass.
    Adjusted(Decimal),
}

impl LoadState {
    /// Returns the load value if one has been set.
    pub fn value(self) -> Option<Decimal> {
        match self {
            LoadState::Unset => None,
            LoadState::Computed(v) | LoadState::Adjusted(v) => Some(v),
        }
    }
}

/// A classified course-section assignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    /// Resolved instructor id.
    pub instructor_id: Option<InstructorId>,
    /// Instructor display name.
    pub instructor_name: String,
    /// Upper-cased instructor role (e.g. "PI").
    pub instructor_role: String,
    /// Course category.
    pub category: CourseCategory,
    /// On the special-course list.
    pub special: bool,
    /// Includes a field trip.
    pub field_trip: bool,
    /// Grading-intensive (capstone, writing intensive).
    pub grading_intensive: bool,
    /// Maximum units, never negative.
    pub max_units: Decimal,
    /// Enrollment total. Grows when co-convened sections collapse into this one.
    pub enrollment: u32,
    /// Subject as supplied.
    pub subject: String,
    /// Catalog number, integral floats normalized.
    pub catalog_number: String,
    /// Section as supplied.
    pub section: String,
    /// Class description as supplied.
    pub class_description: String,
    /// Organizational unit, if any.
    pub unit: Option<String>,
    /// Meeting signature.
    pub meeting: MeetingSignature,
    /// Labels of co-convened companion sections.
    pub co_convened_with: Vec<String>,
    /// Names of co-teaching instructors.
    pub team_taught_with: Vec<String>,
    pub(crate) teaching_key: TeachingGroupKey,
    pub(crate) collapsing_key: CollapsingKey,
    load: LoadState,
    team_divisor: u32,
    co_convened_applied: bool,
    finalized: bool,
}

impl Course {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        instructor_id: Option<InstructorId>,
        instructor_name: String,
        instructor_role: String,
        category: CourseCategory,
        max_units: Decimal,
        enrollment: u32,
        subject: String,
        catalog_number: String,
        section: String,
        class_description: String,
        unit: Option<String>,
        meeting: MeetingSignature,
        teaching_key: TeachingGroupKey,
        collapsing_key: CollapsingKey,
    ) -> Self {
        Self {
            instructor_id,
            instructor_name,
            instructor_role,
            category,
            special: false,
            field_trip: false,
            grading_intensive: false,
            max_units,
            enrollment,
            subject,
            catalog_number,
            section,
            class_description,
            unit,
            meeting,
            co_convened_with: Vec::new(),
            team_taught_with: Vec::new(),
            teaching_key,
            collapsing_key,
            load: LoadState::Unset,
            team_divisor: 1,
            co_convened_applied: false,
            finalized: false,
        }
    }

    /// Short label identifying the section, e.g. `BIO 181-001`.
    pub fn label(&self) -> String {
        format!("{} {}-{}", self.subject, self.catalog_number, self.section)
    }

    /// Returns the teaching-group key.
    pub fn teaching_key(&self) -> &TeachingGroupKey {
        &self.teaching_key
    }

    /// Returns the collapsing key.
    pub fn collapsing_key(&self) -> &CollapsingKey {
        &self.collapsing_key
    }

    /// Returns the current load state.
    pub fn load_state(&self) -> LoadState {
        self.load
    }

    /// Returns the load if it has been calculated.
    pub fn load(&self) -> Option<Decimal> {
        self.load.value()
    }

    /// Number of instructors the load was divided among (1 if not team-taught).
    pub fn team_divisor(&self) -> u32 {
        self.team_divisor
    }

    /// Returns true once the aggregator has read the load.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn transition_error(&self, message: impl Into<String>) -> EngineError {
        EngineError::InvalidLoadTransition {
            course: self.label(),
            message: message.into(),
        }
    }

    fn ensure_mutable(&self) -> EngineResult<()> {
        if self.finalized {
            return Err(self.transition_error("load already finalized"));
        }
        Ok(())
    }

    fn require_load(&self) -> EngineResult<Decimal> {
        self.load
            .value()
            .ok_or_else(|| self.transition_error("load has not been calculated"))
    }

    /// Stores a freshly calculated load. Only valid from `Unset`.
    pub(crate) fn memoize(&mut self, value: Decimal) -> Decimal {
        debug_assert_eq!(self.load, LoadState::Unset);
        self.load = LoadState::Computed(value);
        value
    }

    /// Stores a forcibly recalculated load, re-applying any team division.
    pub(crate) fn store_recomputed(&mut self, value: Decimal) -> EngineResult<Decimal> {
        self.ensure_mutable()?;
        self.load = if self.team_divisor > 1 {
            LoadState::Adjusted(value / Decimal::from(self.team_divisor))
        } else {
            LoadState::Computed(value)
        };
        self.require_load()
    }

    /// Divides the load among `instructors` co-teachers. Applied at most once.
    pub(crate) fn divide_for_team(&mut self, instructors: u32) -> EngineResult<Decimal> {
        self.ensure_mutable()?;
        if instructors == 0 {
            return Err(self.transition_error("team divisor must be positive"));
        }
        let current = match self.load {
            LoadState::Computed(v) => v,
            LoadState::Unset => return Err(self.transition_error("load has not been calculated")),
            LoadState::Adjusted(_) => {
                return Err(self.transition_error("team division on an already adjusted load"));
            }
        };
        let divided = current / Decimal::from(instructors);
        self.team_divisor = instructors;
        self.load = LoadState::Adjusted(divided);
        Ok(divided)
    }

    fn begin_co_convened(&mut self) -> EngineResult<()> {
        self.ensure_mutable()?;
        if self.co_convened_applied {
            return Err(self.transition_error("co-convened adjustment already applied"));
        }
        self.co_convened_applied = true;
        Ok(())
    }

    /// Scales the load to this course's share of a split bundle.
    pub(crate) fn apply_co_convened_share(&mut self, bundle_size: u32) -> EngineResult<Decimal> {
        let current = self.require_load()?;
        if bundle_size == 0 {
            return Err(self.transition_error("bundle size must be positive"));
        }
        self.begin_co_convened()?;
        let share = current / Decimal::from(bundle_size);
        self.load = LoadState::Adjusted(share);
        Ok(share)
    }

    /// Replaces the load with the companion placeholder of a collapsed bundle.
    pub(crate) fn assign_companion_load(&mut self, placeholder: Decimal) -> EngineResult<()> {
        self.begin_co_convened()?;
        self.load = LoadState::Adjusted(placeholder);
        Ok(())
    }

    /// Takes over the combined enrollment of a collapsed bundle.
    ///
    /// The caller must recalculate the load afterwards.
    pub(crate) fn absorb_enrollment(&mut self, combined: u32) -> EngineResult<()> {
        self.begin_co_convened()?;
        self.enrollment = combined;
        Ok(())
    }

    /// Freezes the load for aggregation and returns it.
    pub(crate) fn finalize(&mut self) -> EngineResult<Decimal> {
        let value = self.require_load()?;
        self.finalized = true;
        Ok(value)
    }
}

/// Index of a course within a [`CourseBook`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(usize);

/// Owns every course of a run.
///
/// Faculty members and adjustment bundles refer to courses by [`CourseId`].
#[derive(Debug, Clone, Default)]
pub struct CourseBook {
    courses: Vec<Course>,
}

impl CourseBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course and returns its id.
    pub fn insert(&mut self, course: Course) -> CourseId {
        self.courses.push(course);
        CourseId(self.courses.len() - 1)
    }

    /// Returns the course with the given id.
    pub fn get(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0)
    }

    /// Iterates over all courses in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CourseId, &Course)> {
        self.courses.iter().enumerate().map(|(i, c)| (CourseId(i), c))
    }

    /// Returns the number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Returns true if the book holds no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl Index<CourseId> for CourseBook {
    type Output = Course;

    fn index(&self, id: CourseId) -> &Course {
        &self.courses[id.0]
    }
}

impl IndexMut<CourseId> for CourseBook {
    fn index_mut(&mut self, id: CourseId) -> &mut Course {
        &mut self.courses[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn meeting() -> MeetingSignature {
        MeetingSignature {
            date: Some("2025-01-13".to_string()),
            time: Some("09:10".to_string()),
            building: Some("sci".to_string()),
            room: Some("101".to_string()),
        }
    }

    fn sample_course() -> Course {
        let meeting = meeting();
        Course::new(
            Some(1001),
            "Ada Lovelace".to_string(),
            "PI".to_string(),
            CourseCategory::Lecture,
            dec("3"),
            40,
            "CS".to_string(),
            "126".to_string(),
            "001".to_string(),
            "Computer Science I".to_string(),
            None,
            meeting.clone(),
            TeachingGroupKey {
                term: "1251".to_string(),
                subject: "cs".to_string(),
                catalog_number: "126".to_string(),
                section: "001".to_string(),
                meeting: meeting.clone(),
            },
            CollapsingKey {
                instructor_id: Some(1001),
                term: "1251".to_string(),
                subject: "cs".to_string(),
                section: "001".to_string(),
                meeting,
            },
        )
    }

    #[test]
    fn test_meeting_signature_completeness() {
        assert!(meeting().is_complete());
        let partial = MeetingSignature {
            room: None,
            ..meeting()
        };
        assert!(!partial.is_complete());
        assert!(!MeetingSignature::default().is_complete());
    }

    #[test]
    fn test_label_format() {
        assert_eq!(sample_course().label(), "CS 126-001");
    }

    #[test]
    fn test_new_course_has_unset_load() {
        let course = sample_course();
        assert_eq!(course.load_state(), LoadState::Unset);
        assert_eq!(course.load(), None);
        assert_eq!(course.team_divisor(), 1);
    }

    #[test]
    fn test_team_division_moves_to_adjusted() {
        let mut course = sample_course();
        course.memoize(dec("9.99"));
        let divided = course.divide_for_team(3).unwrap();
        assert_eq!(divided, dec("3.33"));
        assert_eq!(course.load_state(), LoadState::Adjusted(dec("3.33")));
        assert_eq!(course.team_divisor(), 3);
    }

    #[test]
    fn test_team_division_twice_is_rejected() {
        let mut course = sample_course();
        course.memoize(dec("9"));
        course.divide_for_team(3).unwrap();
        let err = course.divide_for_team(3).unwrap_err();
        assert!(matches!(err, EngineError::InvalidLoadTransition { .. }));
    }

    #[test]
    fn test_team_division_requires_load() {
        let mut course = sample_course();
        assert!(course.divide_for_team(2).is_err());
    }

    #[test]
    fn test_recompute_reapplies_team_divisor() {
        let mut course = sample_course();
        course.memoize(dec("10"));
        course.divide_for_team(2).unwrap();
        let value = course.store_recomputed(dec("12")).unwrap();
        assert_eq!(value, dec("6"));
        assert_eq!(course.load_state(), LoadState::Adjusted(dec("6")));
    }

    #[test]
    fn test_co_convened_adjustment_applies_once() {
        let mut course = sample_course();
        course.memoize(dec("10"));
        assert_eq!(course.apply_co_convened_share(2).unwrap(), dec("5"));
        assert!(course.assign_companion_load(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_finalized_load_is_read_only() {
        let mut course = sample_course();
        course.memoize(dec("10"));
        assert_eq!(course.finalize().unwrap(), dec("10"));
        assert!(course.is_finalized());
        assert!(course.store_recomputed(dec("11")).is_err());
        assert!(course.apply_co_convened_share(2).is_err());
        assert_eq!(course.load(), Some(dec("10")));
    }

    #[test]
    fn test_course_book_indexes_by_id() {
        let mut book = CourseBook::new();
        let first = book.insert(sample_course());
        let second = book.insert(sample_course());
        assert_ne!(first, second);
        assert_eq!(book.len(), 2);
        book[second].enrollment = 12;
        assert_eq!(book.get(second).map(|c| c.enrollment), Some(12));
        assert_eq!(book[first].enrollment, 40);
    }
}
