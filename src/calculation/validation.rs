//! Record validation.
//!
//! Decides whether a raw row carries enough information to enter the
//! workload calculation, and resolves its instructor id.

use rust_decimal::prelude::ToPrimitive;

use crate::config::parse_decimal;
use crate::models::{InstructorId, RawRecord, UnclassifiedReason};

/// Category keywords whose rows need no meeting information.
pub const MEETING_EXEMPT_KEYWORDS: [&str; 5] = [
    "independent study",
    "research",
    "thesis",
    "dissertation",
    "fieldwork",
];

/// Checks that a row has every structurally required cell.
///
/// Instructor role and instructor id are always required. Start date, start
/// time, facility building and facility room are required unless the course
/// category names independent study, research, thesis, dissertation or
/// fieldwork.
///
/// # Examples
///
/// ```
/// use workload_engine::calculation::validate_record;
/// use workload_engine::models::{RawRecord, UnclassifiedReason};
///
/// let record = RawRecord {
///     instructor_role: Some("PI".to_string()),
///     instructor_id: Some("1001".to_string()),
///     course_category: Some("Independent Study".to_string()),
///     ..RawRecord::default()
/// };
/// assert!(validate_record(&record).is_ok());
///
/// let lecture = RawRecord {
///     course_category: Some("Lecture".to_string()),
///     ..record
/// };
/// assert_eq!(
///     validate_record(&lecture),
///     Err(UnclassifiedReason::MissingField { field: "Start Date".to_string() })
/// );
/// ```
pub fn validate_record(record: &RawRecord) -> Result<(), UnclassifiedReason> {
    require(&record.instructor_role, "Instructor Role")?;
    require(&record.instructor_id, "Instructor Emplid")?;

    let category = record
        .course_category
        .as_deref()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    if MEETING_EXEMPT_KEYWORDS.iter().any(|k| category.contains(k)) {
        return Ok(());
    }

    require(&record.start_date, "Start Date")?;
    require(&record.start_time, "Start Time")?;
    require(&record.facility_building, "Facility Building")?;
    require(&record.facility_room, "Facility Room")?;
    Ok(())
}

fn require(cell: &Option<String>, field: &str) -> Result<(), UnclassifiedReason> {
    match cell.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(UnclassifiedReason::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Resolves an instructor id cell to a number.
///
/// Accepts plain integers and integral decimals (`"1001.0"`). Anything else,
/// including negative or fractional values, does not resolve.
pub fn resolve_instructor_id(raw: &str) -> Option<InstructorId> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<InstructorId>() {
        return Some(id);
    }
    parse_decimal(trimmed)
        .filter(|d| d.fract().is_zero())
        .and_then(|d| d.to_u64())
}
