//! Row fixtures shared by the calculation tests.

use crate::config::SpecialCourses;
use crate::models::{Course, InstructorId, RawRecord};

use super::build_course;

/// A complete three-unit lecture row with forty students, meeting Monday 9:10 in SCI 101.
pub(crate) fn lecture_record(
    instructor_id: InstructorId,
    subject: &str,
    catalog_number: &str,
    section: &str,
) -> RawRecord {
    RawRecord {
        instructor_role: Some("PI".to_string()),
        instructor_id: Some(instructor_id.to_string()),
        instructor_name: Some(format!("Instructor {instructor_id}")),
        instructor_email: Some(format!("i{instructor_id}@example.edu")),
        course_category: Some("Lecture".to_string()),
        max_units: Some("3".to_string()),
        enroll_total: Some("40".to_string()),
        start_date: Some("2025-01-13".to_string()),
        start_time: Some("09:10".to_string()),
        facility_building: Some("SCI".to_string()),
        facility_room: Some("101".to_string()),
        term: Some("1251".to_string()),
        subject: Some(subject.to_string()),
        catalog_number: Some(catalog_number.to_string()),
        section: Some(section.to_string()),
        class_number: None,
        class_code: None,
        unit: Some(subject.to_string()),
        class_description: Some("introductory topics".to_string()),
    }
}

/// Builds a course of the given category text, units and enrollment.
pub(crate) fn course(category: &str, units: &str, enrollment: &str) -> Course {
    let record = RawRecord {
        course_category: Some(category.to_string()),
        max_units: Some(units.to_string()),
        enroll_total: Some(enrollment.to_string()),
        ..lecture_record(1001, "CS", "126", "001")
    };
    build_course(&record, &SpecialCourses::new())
}
