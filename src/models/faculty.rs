//! Faculty member model and track designation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::{Course, CourseId, TeachingGroupKey};

/// Numeric instructor identifier.
pub type InstructorId = u64;

/// An instructor's track designation.
///
/// Each known track has its own expected workload baseline. Codes other than
/// `CT` and `TT` are kept verbatim as [`Track::Unknown`].
///
/// # Example
///
/// ```
/// use workload_engine::models::Track;
///
/// assert_eq!(Track::from(" ct "), Track::CareerTrack);
/// assert_eq!(Track::from("TT").code(), "TT");
/// assert_eq!(Track::from("LT"), Track::Unknown("LT".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Track {
    /// Career-track faculty ("CT").
    CareerTrack,
    /// Tenure-track faculty ("TT").
    TenureTrack,
    /// Any other designation, including a missing one.
    Unknown(String),
}

impl Track {
    /// Returns the track code.
    pub fn code(&self) -> &str {
        match self {
            Track::CareerTrack => "CT",
            Track::TenureTrack => "TT",
            Track::Unknown(code) if code.is_empty() => "Unknown",
            Track::Unknown(code) => code,
        }
    }
}

impl From<&str> for Track {
    fn from(code: &str) -> Self {
        let code = code.trim();
        match code.to_uppercase().as_str() {
            "CT" => Track::CareerTrack,
            "TT" => Track::TenureTrack,
            _ => Track::Unknown(code.to_string()),
        }
    }
}

impl From<String> for Track {
    fn from(code: String) -> Self {
        Track::from(code.as_str())
    }
}

impl From<Track> for String {
    fn from(track: Track) -> Self {
        track.code().to_string()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An instructor and the courses indexed on them.
///
/// Courses are keyed by teaching-group key, so a repeated row for the same
/// section meeting does not add a second course.
#[derive(Debug, Clone, PartialEq)]
pub struct FacultyMember {
    /// Instructor id.
    pub instructor_id: InstructorId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Track designation.
    pub track: Track,
    /// Every instructor role seen for this instructor.
    pub roles: BTreeSet<String>,
    courses: BTreeMap<TeachingGroupKey, CourseId>,
    total_load: Option<Decimal>,
}

impl FacultyMember {
    /// Creates a faculty member with no courses.
    pub fn new(
        instructor_id: InstructorId,
        name: impl Into<String>,
        email: impl Into<String>,
        track: Track,
    ) -> Self {
        Self {
            instructor_id,
            name: name.into(),
            email: email.into(),
            track,
            roles: BTreeSet::new(),
            courses: BTreeMap::new(),
            total_load: None,
        }
    }

    /// Indexes a course on this instructor.
    ///
    /// Returns `false`, leaving the existing entry in place, when a course with
    /// the same teaching-group key is already indexed.
    pub fn add_course(&mut self, course: &Course, id: CourseId) -> bool {
        self.roles.insert(course.instructor_role.clone());
        if self.courses.contains_key(course.teaching_key()) {
            return false;
        }
        self.courses.insert(course.teaching_key().clone(), id);
        true
    }

    /// Returns true if a course with this key is already indexed.
    pub fn has_course(&self, key: &TeachingGroupKey) -> bool {
        self.courses.contains_key(key)
    }

    /// Iterates over the indexed course ids in key order.
    pub fn course_ids(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.courses.values().copied()
    }

    /// Returns the number of indexed courses.
    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Returns the aggregated load, once calculated.
    pub fn total_load(&self) -> Option<Decimal> {
        self.total_load
    }

    pub(crate) fn set_total_load(&mut self, total: Decimal) {
        self.total_load = Some(total);
    }
}
