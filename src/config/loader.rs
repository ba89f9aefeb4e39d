//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the workload
//! policy, the instructor-track mapping and the special-course list from a
//! configuration directory.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::calculation::resolve_instructor_id;
use crate::error::{EngineError, EngineResult};
use crate::models::{RawRecord, Track};

use super::types::{InstructorTracks, SpecialCourses, WorkloadPolicy};

/// Typed policy file name.
pub const POLICY_YAML: &str = "policy.yaml";
/// Key/value policy table file name.
pub const POLICY_TABLE: &str = "policy.csv";
/// Instructor-track table file name.
pub const TRACK_TABLE: &str = "tracks.csv";
/// Special-course list file name.
pub const SPECIAL_COURSES: &str = "special_courses.csv";

/// Loads and provides access to workload configuration.
///
/// # Directory Structure
///
/// ```text
/// config/workload/
/// ├── policy.yaml          # Typed rate policy (preferred)
/// ├── policy.csv           # Key/value rate policy, used when no policy.yaml
/// ├── tracks.csv           # Instructor Emplid, Track
/// └── special_courses.csv  # Course
/// ```
///
/// Only the directory itself is required. A missing or unreadable file falls
/// back to the built-in default policy, or to an empty mapping, with a logged
/// warning.
///
/// # Example
///
/// ```no_run
/// use workload_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/workload").unwrap();
/// println!("Lecture rate: {}", loader.policy().lecture_rate);
/// println!("Instructors with a track: {}", loader.tracks().len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    policy: WorkloadPolicy,
    tracks: InstructorTracks,
    special_courses: SpecialCourses,
}

#[derive(Debug, Deserialize)]
struct TrackRow {
    #[serde(rename = "Instructor Emplid")]
    instructor_id: String,
    #[serde(rename = "Track")]
    track: String,
}

#[derive(Debug, Deserialize)]
struct SpecialCourseRow {
    #[serde(rename = "Course", default)]
    course: Option<String>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns [`EngineError::ConfigNotFound`] if the directory does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(EngineError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let policy = Self::load_policy(path);
        let tracks = Self::read_track_table(path.join(TRACK_TABLE)).unwrap_or_else(|e| {
            warn!(
                error = %e,
                "Instructor track table unavailable, no instructor will be classified"
            );
            InstructorTracks::new()
        });
        let special_courses =
            Self::read_special_courses(path.join(SPECIAL_COURSES)).unwrap_or_else(|e| {
                warn!(error = %e, "Special course list unavailable, no special bonus will apply");
                SpecialCourses::new()
            });

        info!(
            path = %path.display(),
            instructors = tracks.len(),
            special_courses = special_courses.len(),
            "Workload configuration loaded"
        );

        Ok(Self {
            policy,
            tracks,
            special_courses,
        })
    }

    fn load_policy(dir: &Path) -> WorkloadPolicy {
        let yaml = dir.join(POLICY_YAML);
        let table = dir.join(POLICY_TABLE);
        let result = if yaml.exists() {
            Self::read_policy_yaml(&yaml)
        } else if table.exists() {
            Self::read_policy_table(&table)
        } else {
            Err(EngineError::ConfigNotFound {
                path: format!("{} or {}", yaml.display(), table.display()),
            })
        };

        result.unwrap_or_else(|e| {
            warn!(error = %e, "Policy unavailable, using default rates");
            WorkloadPolicy::default()
        })
    }

    /// Assembles a loader from values already in memory.
    pub fn from_parts(
        policy: WorkloadPolicy,
        tracks: InstructorTracks,
        special_courses: SpecialCourses,
    ) -> Self {
        Self {
            policy: policy.sanitized(),
            tracks,
            special_courses,
        }
    }

    /// Reads a typed YAML policy. Out-of-range values are replaced with defaults.
    pub fn read_policy_yaml<P: AsRef<Path>>(path: P) -> EngineResult<WorkloadPolicy> {
        let path = path.as_ref();
        let content = read_file(path)?;
        let policy: WorkloadPolicy =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(policy.sanitized())
    }

    /// Reads a key/value policy table.
    ///
    /// The first row is a header. The first column holds keys and the second
    /// holds values; further columns are ignored.
    pub fn read_policy_table<P: AsRef<Path>>(path: P) -> EngineResult<WorkloadPolicy> {
        let path = path.as_ref();
        let mut reader = csv_reader(path)?;
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| parse_error(path, e))?;
            let key = record.get(0).unwrap_or_default();
            let value = record.get(1).unwrap_or_default();
            rows.push((key.to_string(), value.to_string()));
        }
        Ok(WorkloadPolicy::from_rows(rows))
    }

    /// Reads the instructor-track table (`Instructor Emplid`, `Track`).
    ///
    /// Rows whose id does not resolve to a number are skipped with a warning.
    pub fn read_track_table<P: AsRef<Path>>(path: P) -> EngineResult<InstructorTracks> {
        let path = path.as_ref();
        let mut reader = csv_reader(path)?;
        let mut tracks = InstructorTracks::new();
        for result in reader.deserialize::<TrackRow>() {
            let row = result.map_err(|e| parse_error(path, e))?;
            match resolve_instructor_id(&row.instructor_id) {
                Some(id) => tracks.insert(id, Track::from(row.track.as_str())),
                None => warn!(
                    value = %row.instructor_id,
                    "Skipping track row with unresolved instructor id"
                ),
            }
        }
        Ok(tracks)
    }

    /// Reads the special-course list (`Course`).
    pub fn read_special_courses<P: AsRef<Path>>(path: P) -> EngineResult<SpecialCourses> {
        let path = path.as_ref();
        let mut reader = csv_reader(path)?;
        let mut entries = Vec::new();
        for result in reader.deserialize::<SpecialCourseRow>() {
            let row = result.map_err(|e| parse_error(path, e))?;
            entries.extend(row.course);
        }
        Ok(entries.into_iter().collect())
    }

    /// Reads a course-assignment table whose headers match [`RawRecord`]'s columns.
    ///
    /// Columns not named by [`RawRecord`] are ignored. Cells are read as text,
    /// so zero-padded values such as section `001` survive unchanged.
    pub fn read_course_table<P: AsRef<Path>>(path: P) -> EngineResult<Vec<RawRecord>> {
        let path = path.as_ref();
        let mut reader = csv_reader(path)?;
        let mut records = Vec::new();
        for result in reader.deserialize::<HashMap<String, String>>() {
            let row = result.map_err(|e| parse_error(path, e))?;
            let value = serde_json::to_value(row).map_err(|e| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            let record =
                serde_json::from_value(value).map_err(|e| EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Returns the rate policy.
    pub fn policy(&self) -> &WorkloadPolicy {
        &self.policy
    }

    /// Returns the instructor-track mapping.
    pub fn tracks(&self) -> &InstructorTracks {
        &self.tracks
    }

    /// Returns the special-course list.
    pub fn special_courses(&self) -> &SpecialCourses {
        &self.special_courses
    }
}

fn read_file(path: &Path) -> EngineResult<String> {
    fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path.display().to_string(),
    })
}

fn csv_reader(path: &Path) -> EngineResult<csv::Reader<fs::File>> {
    let file = fs::File::open(path).map_err(|_| EngineError::ConfigNotFound {
        path: path.display().to_string(),
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file))
}

fn parse_error(path: &Path, error: csv::Error) -> EngineError {
    EngineError::ConfigParseError {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn config_path() -> &'static str {
        "./config/workload"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    #[test]
    fn test_load_bundled_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.policy().lecture_rate, dec("3.33"));
        assert_eq!(loader.policy().lecture_threshold.mid, dec("150"));
        assert_eq!(loader.tracks().get(1001), Some(&Track::CareerTrack));
        assert_eq!(loader.tracks().get(1002), Some(&Track::TenureTrack));
        assert!(loader.special_courses().matches("BIO 181", ""));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        match ConfigLoader::load("./config/does-not-exist") {
            Err(EngineError::ConfigNotFound { path }) => assert!(path.contains("does-not-exist")),
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_directory_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.policy(), &WorkloadPolicy::default());
        assert!(loader.tracks().is_empty());
        assert!(loader.special_courses().is_empty());
    }

    #[test]
    fn test_policy_table_overrides_and_keeps_unknown_keys() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            POLICY_TABLE,
            "Key,Value\nlaboratoryRate,4.5\nlectureThreshold_low,80\nlectureThreshold_mid,140\n\
             lectureThreshold_high,190\nmidRate,not-a-number\ndepartmentName,Biology\n",
        );
        let loader = ConfigLoader::load(dir.path()).unwrap();
        let policy = loader.policy();
        assert_eq!(policy.laboratory_rate, dec("4.5"));
        assert_eq!(policy.lecture_threshold.low, dec("80"));
        assert_eq!(policy.mid_rate, dec("4.17"));
        assert_eq!(
            policy.extras.get("departmentName"),
            Some(&crate::config::PolicyValue::Text("Biology".to_string()))
        );
    }

    #[test]
    fn test_yaml_policy_takes_precedence() {
        let dir = TempDir::new().unwrap();
        write(&dir, POLICY_YAML, "lectureRate: \"3.5\"\nflatBonus: \"0.2\"\n");
        write(&dir, POLICY_TABLE, "Key,Value\nlectureRate,9\n");
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.policy().lecture_rate, dec("3.5"));
        assert_eq!(loader.policy().flat_bonus, dec("0.2"));
        assert_eq!(loader.policy().laboratory_rate, dec("5"));
    }

    #[test]
    fn test_malformed_yaml_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        write(&dir, POLICY_YAML, "lectureRate: [unclosed\n");
        assert!(matches!(
            ConfigLoader::read_policy_yaml(dir.path().join(POLICY_YAML)),
            Err(EngineError::ConfigParseError { .. })
        ));
        let loader = ConfigLoader::load(dir.path()).unwrap();
        assert_eq!(loader.policy(), &WorkloadPolicy::default());
    }

    #[test]
    fn test_track_table_skips_unresolved_ids() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            TRACK_TABLE,
            "Instructor Emplid,Track\n1001,CT\n1002.0,tt\nTBA,CT\n1003,Lecturer\n",
        );
        let tracks = ConfigLoader::read_track_table(dir.path().join(TRACK_TABLE)).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks.get(1002), Some(&Track::TenureTrack));
        assert_eq!(tracks.get(1003), Some(&Track::Unknown("Lecturer".to_string())));
    }

    #[test]
    fn test_track_table_without_expected_headers_degrades() {
        let dir = TempDir::new().unwrap();
        write(&dir, TRACK_TABLE, "Id,Kind\n1001,CT\n");
        assert!(ConfigLoader::read_track_table(dir.path().join(TRACK_TABLE)).is_err());
        assert!(ConfigLoader::load(dir.path()).unwrap().tracks().is_empty());
    }

    #[test]
    fn test_special_courses_are_normalized() {
        let dir = TempDir::new().unwrap();
        write(&dir, SPECIAL_COURSES, "Course\n BIO 181 \n\nChem Lab\n");
        let special = ConfigLoader::read_special_courses(dir.path().join(SPECIAL_COURSES)).unwrap();
        assert_eq!(special.len(), 2);
        assert!(special.matches("bio 181", ""));
        assert!(special.matches("", "General CHEM LAB I"));
    }

    #[test]
    fn test_read_course_table() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "courses.csv",
            "Instructor Role,Instructor Emplid,Instructor,Subject,Cat Nbr,Section,\
             Max Units,Enroll Total,Extra\n\
             PI,1001,Ada Lovelace,CS,126,001,3,40,ignored\n",
        );
        let records = ConfigLoader::read_course_table(dir.path().join("courses.csv")).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].instructor_id.as_deref(), Some("1001"));
        assert_eq!(records[0].enroll_total.as_deref(), Some("40"));
        assert_eq!(records[0].section.as_deref(), Some("001"));
        assert_eq!(records[0].start_date, None);
    }

    #[test]
    fn test_from_parts_sanitizes_policy() {
        let policy = WorkloadPolicy {
            career_track_baseline: Decimal::ZERO,
            ..WorkloadPolicy::default()
        };
        let loader =
            ConfigLoader::from_parts(policy, InstructorTracks::new(), SpecialCourses::new());
        assert_eq!(loader.policy().career_track_baseline, dec("40"));
    }
}
