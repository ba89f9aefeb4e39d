//! Collision detection over the course set.
//!
//! Finds team-taught groups (one section meeting, several primary
//! instructors) and co-convened bundles (one instructor meeting, several
//! course records). Only courses with a complete meeting signature take part.
//! Groups come back in key order so that every run visits them identically.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CollapsingKey, CourseBook, CourseId, InstructorId, TeachingGroupKey};

/// Role code of a primary instructor.
pub const PRIMARY_INSTRUCTOR_ROLE: &str = "PI";

/// Primary-instructor courses sharing one section meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamTaughtGroup {
    /// The shared section meeting.
    pub key: TeachingGroupKey,
    /// Member courses in insertion order.
    pub members: Vec<CourseId>,
    /// Number of distinct instructors in the group.
    pub instructor_count: u32,
}

/// Courses one instructor teaches at the same meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoConvenedBundle {
    /// The shared instructor meeting.
    pub key: CollapsingKey,
    /// Member courses in insertion order.
    pub members: Vec<CourseId>,
}

impl CoConvenedBundle {
    /// Number of member courses.
    pub fn size(&self) -> u32 {
        self.members.len() as u32
    }
}

/// Returns every section meeting held by at least two distinct primary instructors.
pub fn team_taught_groups(book: &CourseBook) -> Vec<TeamTaughtGroup> {
    let mut groups: BTreeMap<&TeachingGroupKey, Vec<CourseId>> = BTreeMap::new();
    for (id, course) in book.iter() {
        if course.meeting.is_complete() && course.instructor_role == PRIMARY_INSTRUCTOR_ROLE {
            groups.entry(course.teaching_key()).or_default().push(id);
        }
    }

    groups
        .into_iter()
        .filter_map(|(key, members)| {
            let instructors: BTreeSet<InstructorId> = members
                .iter()
                .filter_map(|id| book[*id].instructor_id)
                .collect();
            (instructors.len() >= 2).then(|| TeamTaughtGroup {
                key: key.clone(),
                members,
                instructor_count: instructors.len() as u32,
            })
        })
        .collect()
}

/// Returns every instructor meeting shared by at least two course records.
pub fn co_convened_bundles(book: &CourseBook) -> Vec<CoConvenedBundle> {
    let mut bundles: BTreeMap<&CollapsingKey, Vec<CourseId>> = BTreeMap::new();
    for (id, course) in book.iter() {
        if course.meeting.is_complete() && course.instructor_id.is_some() {
            bundles.entry(course.collapsing_key()).or_default().push(id);
        }
    }

    bundles
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(key, members)| CoConvenedBundle {
            key: key.clone(),
            members,
        })
        .collect()
}
