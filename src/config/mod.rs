//! Configuration loading and management for the workload engine.
//!
//! This module provides the typed rate policy, the instructor-track mapping
//! and the special-course list, and loads them from a configuration
//! directory of YAML and CSV files.
//!
//! # Example
//!
//! ```no_run
//! use workload_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/workload").unwrap();
//! println!("Career-track baseline: {}", config.policy().career_track_baseline);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, POLICY_TABLE, POLICY_YAML, SPECIAL_COURSES, TRACK_TABLE};
pub use types::{InstructorTracks, LectureThresholds, PolicyValue, SpecialCourses, WorkloadPolicy};

pub(crate) use types::parse_decimal;
