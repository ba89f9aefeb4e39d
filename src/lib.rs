//! Instructional workload engine.
//!
//! This crate turns a term's course-assignment rows into per-instructor
//! teaching loads. Rows are validated and classified into course categories,
//! loads are derived from a configurable rate policy, team-taught and
//! co-convened sections are adjusted so that shared teaching is not double
//! counted, and each instructor's total is related to the expected load of
//! their track.
//!
//! # Example
//!
//! ```
//! use workload_engine::calculation::WorkloadRun;
//! use workload_engine::config::{InstructorTracks, SpecialCourses, WorkloadPolicy};
//! use workload_engine::models::{RawRecord, Track};
//!
//! let tracks: InstructorTracks = [(1001, Track::TenureTrack)].into_iter().collect();
//! let run = WorkloadRun::new(WorkloadPolicy::default(), tracks, SpecialCourses::new());
//! let report = run.run(Vec::<RawRecord>::new()).unwrap();
//! assert!(report.faculty.is_empty());
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
