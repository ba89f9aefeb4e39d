//! Raw course-assignment row model.
//!
//! A [`RawRecord`] mirrors one row of the schedule export: every cell is
//! optional text. Numeric interpretation happens later, in the classifier,
//! so that a malformed cell degrades to zero instead of rejecting the batch.

use serde::{Deserialize, Deserializer, Serialize};

/// One course-section-instructor assignment row.
///
/// Field names follow the schedule export's column headers when serialized.
/// Cells may be supplied as text or as numbers; blank cells are treated as
/// missing.
///
/// # Example
///
/// ```
/// use workload_engine::models::RawRecord;
///
/// let record: RawRecord = serde_json::from_str(r#"{
///     "Instructor Role": "PI",
///     "Instructor Emplid": 1234567.0,
///     "Course Category (CCAT)": "Lecture",
///     "Cat Nbr": 181,
///     "Facility Room": "  "
/// }"#).unwrap();
///
/// assert_eq!(record.instructor_id.as_deref(), Some("1234567"));
/// assert_eq!(record.catalog_number.as_deref(), Some("181"));
/// assert_eq!(record.facility_room, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Instructor role on the section (e.g. "PI", "ST").
    #[serde(
        rename = "Instructor Role",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub instructor_role: Option<String>,
    /// Instructor identifier.
    #[serde(
        rename = "Instructor Emplid",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub instructor_id: Option<String>,
    /// Instructor display name.
    #[serde(
        rename = "Instructor",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub instructor_name: Option<String>,
    /// Instructor email address.
    #[serde(
        rename = "Instructor Email",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub instructor_email: Option<String>,
    /// Free-text course category (e.g. "Lecture", "Independent Study").
    #[serde(
        rename = "Course Category (CCAT)",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_category: Option<String>,
    /// Maximum units for the section.
    #[serde(
        rename = "Max Units",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_units: Option<String>,
    /// Total enrollment.
    #[serde(
        rename = "Enroll Total",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub enroll_total: Option<String>,
    /// Meeting start date.
    #[serde(
        rename = "Start Date",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<String>,
    /// Meeting start time.
    #[serde(
        rename = "Start Time",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_time: Option<String>,
    /// Facility building.
    #[serde(
        rename = "Facility Building",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub facility_building: Option<String>,
    /// Facility room.
    #[serde(
        rename = "Facility Room",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub facility_room: Option<String>,
    /// Academic term.
    #[serde(
        rename = "Term",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub term: Option<String>,
    /// Subject code (e.g. "BIO").
    #[serde(
        rename = "Subject",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub subject: Option<String>,
    /// Catalog number (e.g. "181", "699", "300W").
    #[serde(
        rename = "Cat Nbr",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub catalog_number: Option<String>,
    /// Section identifier.
    #[serde(
        rename = "Section",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub section: Option<String>,
    /// Class number.
    #[serde(
        rename = "Class Nbr",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_number: Option<String>,
    /// Combined class code (e.g. "MAT 100").
    #[serde(
        rename = "Class",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_code: Option<String>,
    /// Organizational unit offering the section.
    #[serde(
        rename = "Unit",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit: Option<String>,
    /// Class description.
    #[serde(
        rename = "Class Description",
        default,
        deserialize_with = "cell",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_description: Option<String>,
}

/// Deserializes a spreadsheet cell into trimmed text.
///
/// Integral floats such as `1234.0` are rendered without the fraction, the way
/// spreadsheet readers hand back integer columns.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
    }

    let text = match Option::<Cell>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Cell::Text(s)) => s,
        Some(Cell::Integer(n)) => n.to_string(),
        Some(Cell::Float(f)) if !f.is_finite() => return Ok(None),
        Some(Cell::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(Cell::Float(f)) => f.to_string(),
        Some(Cell::Flag(b)) => b.to_string(),
    };

    let trimmed = text.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_column_headers() {
        let json = r#"{
            "Instructor Role": "PI",
            "Instructor Emplid": "1001",
            "Instructor": "Ada Lovelace",
            "Instructor Email": "ada@example.edu",
            "Course Category (CCAT)": "Lecture",
            "Max Units": 3,
            "Enroll Total": 45,
            "Start Date": "2025-01-13",
            "Start Time": "09:10",
            "Facility Building": "SCI",
            "Facility Room": "101",
            "Term": "1251",
            "Subject": "CS",
            "Cat Nbr": "126",
            "Section": "001",
            "Class Nbr": 4821,
            "Class": "CS 126",
            "Unit": "SICCS",
            "Class Description": "Computer Science I"
        }"#;

        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.instructor_role.as_deref(), Some("PI"));
        assert_eq!(record.max_units.as_deref(), Some("3"));
        assert_eq!(record.enroll_total.as_deref(), Some("45"));
        assert_eq!(record.class_number.as_deref(), Some("4821"));
        assert_eq!(record.class_description.as_deref(), Some("Computer Science I"));
    }

    #[test]
    fn test_missing_and_blank_cells_are_none() {
        let record: RawRecord =
            serde_json::from_str(r#"{"Instructor Role": "  ", "Facility Room": null}"#).unwrap();
        assert_eq!(record.instructor_role, None);
        assert_eq!(record.facility_room, None);
        assert_eq!(record.term, None);
    }

    #[test]
    fn test_integral_float_cells_drop_fraction() {
        let record: RawRecord =
            serde_json::from_str(r#"{"Instructor Emplid": 1234567.0, "Max Units": 1.5}"#).unwrap();
        assert_eq!(record.instructor_id.as_deref(), Some("1234567"));
        assert_eq!(record.max_units.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_serialize_skips_missing_cells() {
        let record = RawRecord {
            subject: Some("BIO".to_string()),
            ..RawRecord::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({"Subject": "BIO"}));
    }
}
