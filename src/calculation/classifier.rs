//! Course classification.
//!
//! Turns a raw row into a typed [`Course`]. The free-text category is
//! resolved once, through an ordered rule table, into a closed
//! [`CourseCategory`]; no other module inspects category text.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::{SpecialCourses, parse_decimal};
use crate::models::{
    CollapsingKey, Course, CourseCategory, MeetingSignature, RawRecord, TeachingGroupKey,
};

use super::validation::resolve_instructor_id;

/// Catalog numbers reserved for graduate research.
pub const THESIS_CATALOG_NUMBERS: [&str; 2] = ["699", "799"];

/// Class codes that carry supplemental instruction when taught by an `ST`.
pub const SUPPLEMENTAL_INSTRUCTION_CODES: [&str; 4] = ["mat 100", "mat 108", "mat 114", "mat 125"];

/// Role code of a supplemental-instruction leader.
pub const SUPPLEMENTAL_INSTRUCTION_ROLE: &str = "ST";

const THESIS_KEYWORDS: [&str; 2] = ["thesis", "dissertation"];
const INDEPENDENT_STUDY_KEYWORDS: [&str; 4] = [
    "independent study",
    "research",
    "fieldwork",
    "individualized study",
];
const GRADING_INTENSIVE_KEYWORDS: [&str; 3] = ["capstone", "writing intensive", "w-intensive"];
const FIELD_TRIP_KEYWORDS: [&str; 1] = ["field trip"];

/// Normalized text the category rules look at.
struct ClassifierInput {
    category: String,
    class_code: String,
    catalog_number: String,
    role: String,
}

struct CategoryRule {
    category: CourseCategory,
    applies: fn(&ClassifierInput) -> bool,
}

/// Evaluated top to bottom; the first match wins.
const CATEGORY_RULES: [CategoryRule; 4] = [
    CategoryRule {
        category: CourseCategory::Thesis,
        applies: is_thesis,
    },
    CategoryRule {
        category: CourseCategory::IndependentStudy,
        applies: is_independent_study,
    },
    CategoryRule {
        category: CourseCategory::Laboratory,
        applies: is_laboratory,
    },
    CategoryRule {
        category: CourseCategory::SupplementalInstruction,
        applies: is_supplemental_instruction,
    },
];

fn is_thesis(input: &ClassifierInput) -> bool {
    THESIS_KEYWORDS.iter().any(|k| input.category.contains(k))
        || THESIS_CATALOG_NUMBERS.contains(&input.catalog_number.as_str())
}

fn is_independent_study(input: &ClassifierInput) -> bool {
    INDEPENDENT_STUDY_KEYWORDS
        .iter()
        .any(|k| input.category.contains(k))
}

fn is_laboratory(input: &ClassifierInput) -> bool {
    input.category.contains("laboratory")
}

fn is_supplemental_instruction(input: &ClassifierInput) -> bool {
    input.role == SUPPLEMENTAL_INSTRUCTION_ROLE
        && SUPPLEMENTAL_INSTRUCTION_CODES
            .iter()
            .any(|code| input.class_code.contains(code))
}

fn classify(input: &ClassifierInput) -> CourseCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.applies)(input))
        .map(|rule| rule.category)
        .unwrap_or(if input.category.contains("lecture") {
            CourseCategory::Lecture
        } else {
            CourseCategory::Standard
        })
}

/// Builds a classified course from a raw row.
///
/// Never fails: non-numeric or negative units and enrollment become zero,
/// and missing text cells become empty strings.
///
/// # Examples
///
/// ```
/// use workload_engine::calculation::build_course;
/// use workload_engine::config::SpecialCourses;
/// use workload_engine::models::{CourseCategory, RawRecord};
///
/// let record = RawRecord {
///     instructor_role: Some("PI".to_string()),
///     instructor_id: Some("1001".to_string()),
///     course_category: Some("Thesis Research".to_string()),
///     max_units: Some("three".to_string()),
///     enroll_total: Some("4".to_string()),
///     ..RawRecord::default()
/// };
///
/// let course = build_course(&record, &SpecialCourses::new());
/// assert_eq!(course.category, CourseCategory::Thesis);
/// assert!(course.max_units.is_zero());
/// assert_eq!(course.enrollment, 4);
/// ```
pub fn build_course(record: &RawRecord, special: &SpecialCourses) -> Course {
    let role = text(&record.instructor_role).to_uppercase();
    let subject = text(&record.subject);
    let catalog_number = normalize_catalog_number(&text(&record.catalog_number));
    let section = text(&record.section);
    let description = text(&record.class_description);
    let class_code = match record.class_code.as_deref() {
        Some(code) if !code.trim().is_empty() => code.trim().to_string(),
        _ => format!("{} {}", subject, catalog_number),
    };

    let input = ClassifierInput {
        category: normalize(&record.course_category),
        class_code: class_code.to_lowercase(),
        catalog_number: catalog_number.to_lowercase(),
        role: role.clone(),
    };
    let category = classify(&input);

    let meeting = MeetingSignature {
        date: cell(&record.start_date),
        time: cell(&record.start_time),
        building: cell(&record.facility_building).map(|b| b.to_lowercase()),
        room: cell(&record.facility_room).map(|r| r.to_lowercase()),
    };
    let instructor_id = record
        .instructor_id
        .as_deref()
        .and_then(resolve_instructor_id);
    let term = normalize(&record.term);
    let teaching_key = TeachingGroupKey {
        term: term.clone(),
        subject: subject.to_lowercase(),
        catalog_number: input.catalog_number.clone(),
        section: section.to_lowercase(),
        meeting: meeting.clone(),
    };
    let collapsing_key = CollapsingKey {
        instructor_id,
        term,
        subject: subject.to_lowercase(),
        section: section.to_lowercase(),
        meeting: meeting.clone(),
    };

    let normalized_description = description.to_lowercase();
    let mut course = Course::new(
        instructor_id,
        text(&record.instructor_name),
        role,
        category,
        coerce_units(&record.max_units),
        coerce_enrollment(&record.enroll_total),
        subject,
        catalog_number.clone(),
        section,
        description,
        cell(&record.unit),
        meeting,
        teaching_key,
        collapsing_key,
    );
    course.special = special.matches(&class_code, &normalized_description);
    course.grading_intensive = GRADING_INTENSIVE_KEYWORDS
        .iter()
        .any(|k| normalized_description.contains(k))
        || catalog_number.to_uppercase().ends_with('W');
    course.field_trip = FIELD_TRIP_KEYWORDS
        .iter()
        .any(|k| normalized_description.contains(k));
    course
}

fn cell(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text(value: &Option<String>) -> String {
    cell(value).unwrap_or_default()
}

fn normalize(value: &Option<String>) -> String {
    text(value).to_lowercase()
}

/// Renders integral numeric catalog numbers without a fraction (`"699.0"` -> `"699"`).
fn normalize_catalog_number(raw: &str) -> String {
    match parse_decimal(raw) {
        Some(n) if n.fract().is_zero() && n >= Decimal::ZERO => n.trunc().normalize().to_string(),
        _ => raw.to_string(),
    }
}

fn coerce_units(value: &Option<String>) -> Decimal {
    value
        .as_deref()
        .and_then(parse_decimal)
        .filter(|d| *d > Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

fn coerce_enrollment(value: &Option<String>) -> u32 {
    value
        .as_deref()
        .and_then(parse_decimal)
        .filter(|d| *d > Decimal::ZERO)
        .and_then(|d| d.trunc().to_u32())
        .unwrap_or(0)
}
