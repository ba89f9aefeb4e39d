//! Request types for the workload engine API.
//!
//! This module defines the JSON request structure for the `/workload` endpoint.

use serde::{Deserialize, Serialize};

use crate::calculation::WorkloadRun;
use crate::config::{ConfigLoader, InstructorTracks, SpecialCourses, WorkloadPolicy};
use crate::error::EngineResult;
use crate::models::{AdjustmentMode, RawRecord};

/// Request body for the `/workload` endpoint.
///
/// Only `records` is required. Any of `policy`, `tracks` or `special_courses`
/// replaces the server's loaded value for this run only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkloadRequest {
    /// Course-assignment rows keyed by their column headers.
    pub records: Vec<RawRecord>,
    /// Co-convened adjustment mode, `collapse` (default) or `split`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Rate policy override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<WorkloadPolicy>,
    /// Instructor-track mapping override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<InstructorTracks>,
    /// Special-course list override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_courses: Option<SpecialCourses>,
}

impl WorkloadRequest {
    /// Resolves the run settings against the loaded configuration.
    ///
    /// Fails with [`crate::error::EngineError::UnsupportedAdjustmentMode`]
    /// before any row is looked at.
    pub fn into_run(self, config: &ConfigLoader) -> EngineResult<(WorkloadRun, Vec<RawRecord>)> {
        let mode = match self.mode.as_deref() {
            Some(mode) => mode.parse::<AdjustmentMode>()?,
            None => AdjustmentMode::default(),
        };
        let run = WorkloadRun::new(
            self.policy.unwrap_or_else(|| config.policy().clone()),
            self.tracks.unwrap_or_else(|| config.tracks().clone()),
            self.special_courses
                .unwrap_or_else(|| config.special_courses().clone()),
        )
        .with_mode(mode);
        Ok((run, self.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::Track;
    use rust_decimal::Decimal;

    #[test]
    fn test_minimal_request_deserializes() {
        let request: WorkloadRequest = serde_json::from_str(r#"{"records": []}"#).unwrap();
        assert!(request.records.is_empty());
        assert!(request.mode.is_none());
        assert!(request.policy.is_none());
    }

    #[test]
    fn test_overrides_deserialize() {
        let json = r#"{
            "records": [{"Instructor Emplid": 1001, "Section": "001"}],
            "mode": "split",
            "policy": {"lectureRate": "3.5"},
            "tracks": {"1001": "tt"},
            "special_courses": ["BIO 181"]
        }"#;
        let request: WorkloadRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.records[0].instructor_id.as_deref(), Some("1001"));
        assert_eq!(request.policy.as_ref().unwrap().lecture_rate, Decimal::new(35, 1));
        assert_eq!(request.tracks.as_ref().unwrap().get(1001), Some(&Track::TenureTrack));

        let (run, records) = request.into_run(&ConfigLoader::default()).unwrap();
        assert_eq!(run.mode, AdjustmentMode::Split);
        assert!(run.special_courses.matches("bio 181", ""));
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_missing_overrides_use_loaded_configuration() {
        let tracks: InstructorTracks = [(5, Track::CareerTrack)].into_iter().collect();
        let config =
            ConfigLoader::from_parts(WorkloadPolicy::default(), tracks, SpecialCourses::new());
        let (run, _) = WorkloadRequest::default().into_run(&config).unwrap();
        assert_eq!(run.tracks.get(5), Some(&Track::CareerTrack));
        assert_eq!(run.mode, AdjustmentMode::Collapse);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let request = WorkloadRequest {
            mode: Some("average".to_string()),
            ..WorkloadRequest::default()
        };
        assert!(matches!(
            request.into_run(&ConfigLoader::default()),
            Err(EngineError::UnsupportedAdjustmentMode { .. })
        ));
    }
}
