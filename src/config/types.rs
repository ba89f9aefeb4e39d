//! Configuration types for workload calculation.
//!
//! This module contains the strongly-typed policy structure together with the
//! instructor-track mapping and the special-course list. The policy can be
//! deserialized from YAML or assembled from two-column key/value rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::str::FromStr;
use tracing::warn;

use crate::models::{InstructorId, Track};

/// Enrollment thresholds that drive lecture rate interpolation.
///
/// Must be strictly increasing: `low < mid < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureThresholds {
    /// Enrollment below which the plain lecture rate applies.
    pub low: Decimal,
    /// Enrollment at which the mid rate is reached.
    pub mid: Decimal,
    /// Enrollment at which the high rate is reached.
    pub high: Decimal,
}

impl LectureThresholds {
    fn is_increasing(&self) -> bool {
        Decimal::ZERO <= self.low && self.low < self.mid && self.mid < self.high
    }
}

impl Default for LectureThresholds {
    fn default() -> Self {
        Self {
            low: Decimal::from(90),
            mid: Decimal::from(150),
            high: Decimal::from(200),
        }
    }
}

/// A policy value under a key the engine does not recognize.
///
/// Kept for forward compatibility so that newer policy files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PolicyValue {
    /// The value parsed as a number.
    Number(Decimal),
    /// Any other value, kept verbatim.
    Text(String),
}

impl PolicyValue {
    fn parse(raw: &str) -> Self {
        parse_decimal(raw)
            .map(PolicyValue::Number)
            .unwrap_or_else(|| PolicyValue::Text(raw.trim().to_string()))
    }
}

/// The workload rate policy.
///
/// Every field has a built-in default, so a partial policy file only needs
/// to name the parameters it changes.
///
/// # Example
///
/// ```
/// use workload_engine::config::WorkloadPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = WorkloadPolicy::from_rows([
///     ("laboratoryRate".to_string(), "4.17".to_string()),
///     ("lectureThreshold_low".to_string(), "80".to_string()),
///     ("lectureThreshold_mid".to_string(), "140".to_string()),
///     ("lectureThreshold_high".to_string(), "190".to_string()),
/// ]);
/// assert_eq!(policy.laboratory_rate, Decimal::new(417, 2));
/// assert_eq!(policy.lecture_threshold.mid, Decimal::from(140));
/// assert_eq!(policy.lecture_rate, Decimal::new(333, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkloadPolicy {
    /// Per-student rate for independent study of at most two units.
    pub independent_study_rate_low: Decimal,
    /// Per-student rate for independent study above two units.
    pub independent_study_rate_high: Decimal,
    /// Per-unit rate for laboratories.
    pub laboratory_rate: Decimal,
    /// Per-unit rate for lectures and any other classroom course.
    pub lecture_rate: Decimal,
    /// Flat load for a supplemental-instruction section.
    pub supplemental_instruction_rate: Decimal,
    /// Per-student rate for thesis and dissertation supervision.
    pub thesis_rate: Decimal,
    /// Lecture enrollment thresholds.
    pub lecture_threshold: LectureThresholds,
    /// Per-unit lecture rate reached at the mid threshold.
    pub mid_rate: Decimal,
    /// Per-unit lecture rate reached at the high threshold.
    pub high_rate: Decimal,
    /// Per-unit lecture rate above the high threshold.
    pub max_rate: Decimal,
    /// Ceiling on a single independent-study load.
    pub max_load_cap: Decimal,
    /// Ceiling on a single thesis load.
    pub thesis_cap: Decimal,
    /// Extra per-unit rate for courses on the special-course list.
    pub special_courses_rate: Decimal,
    /// Flat bonus for field-trip or grading-intensive courses.
    pub flat_bonus: Decimal,
    /// Load assigned to the non-representative members of a collapsed bundle.
    pub co_convened_companion_load: Decimal,
    /// Expected load of a career-track instructor.
    pub career_track_baseline: Decimal,
    /// Expected load of a tenure-track instructor.
    pub tenure_track_baseline: Decimal,
    /// Keys this engine does not recognize.
    #[serde(flatten)]
    pub extras: BTreeMap<String, PolicyValue>,
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            independent_study_rate_low: Decimal::new(25, 2),
            independent_study_rate_high: Decimal::new(5, 1),
            laboratory_rate: Decimal::from(5),
            lecture_rate: Decimal::new(333, 2),
            supplemental_instruction_rate: Decimal::ONE,
            thesis_rate: Decimal::ONE,
            lecture_threshold: LectureThresholds::default(),
            mid_rate: Decimal::new(417, 2),
            high_rate: Decimal::from(5),
            max_rate: Decimal::new(666, 2),
            max_load_cap: Decimal::from(5),
            thesis_cap: Decimal::from(5),
            special_courses_rate: Decimal::new(5, 3),
            flat_bonus: Decimal::new(15, 2),
            co_convened_companion_load: Decimal::ZERO,
            career_track_baseline: Decimal::from(40),
            tenure_track_baseline: Decimal::from(30),
            extras: BTreeMap::new(),
        }
    }
}

const THRESHOLD_LOW: &str = "lectureThreshold_low";
const THRESHOLD_MID: &str = "lectureThreshold_mid";
const THRESHOLD_HIGH: &str = "lectureThreshold_high";

impl WorkloadPolicy {
    /// Builds a policy from two-column key/value rows.
    ///
    /// Known keys with numeric values override the defaults. A known key with
    /// a malformed value keeps its default. The three `lectureThreshold_*`
    /// keys are applied together only when all of them are present and
    /// increasing. Everything else is retained in [`WorkloadPolicy::extras`].
    pub fn from_rows<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut policy = Self::default();
        let mut pending: BTreeMap<String, String> = rows
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_string(), v.as_ref().trim().to_string()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        policy.take_thresholds(&mut pending);

        for (key, raw) in pending {
            match policy.field_mut(&key) {
                Some(slot) => match parse_decimal(&raw) {
                    Some(value) if value >= Decimal::ZERO => *slot = value,
                    _ => warn!(key = %key, value = %raw, "Malformed policy value, keeping default"),
                },
                None => {
                    warn!(key = %key, "Unrecognized policy key retained as-is");
                    policy.extras.insert(key, PolicyValue::parse(&raw));
                }
            }
        }

        policy.sanitized()
    }

    fn take_thresholds(&mut self, pending: &mut BTreeMap<String, String>) {
        let keys = [THRESHOLD_LOW, THRESHOLD_MID, THRESHOLD_HIGH];
        if !keys.iter().all(|k| pending.contains_key(*k)) {
            if keys.iter().any(|k| pending.contains_key(*k)) {
                warn!("Incomplete lecture threshold keys, keeping default thresholds");
            }
            return;
        }

        let parsed: Vec<Option<Decimal>> = keys
            .iter()
            .filter_map(|k| pending.remove(*k))
            .map(|raw| parse_decimal(&raw))
            .collect();

        match parsed.as_slice() {
            [Some(low), Some(mid), Some(high)] => {
                let candidate = LectureThresholds {
                    low: *low,
                    mid: *mid,
                    high: *high,
                };
                if candidate.is_increasing() {
                    self.lecture_threshold = candidate;
                } else {
                    warn!(?candidate, "Lecture thresholds not increasing, keeping defaults");
                }
            }
            _ => warn!("Malformed lecture threshold value, keeping default thresholds"),
        }
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut Decimal> {
        let slot = match key {
            "independentStudyRateLow" => &mut self.independent_study_rate_low,
            "independentStudyRateHigh" => &mut self.independent_study_rate_high,
            "laboratoryRate" => &mut self.laboratory_rate,
            "lectureRate" => &mut self.lecture_rate,
            "supplementalInstructionRate" => &mut self.supplemental_instruction_rate,
            "thesisRate" => &mut self.thesis_rate,
            "midRate" => &mut self.mid_rate,
            "highRate" => &mut self.high_rate,
            "maxRate" => &mut self.max_rate,
            "maxLoadCap" => &mut self.max_load_cap,
            "thesisCap" => &mut self.thesis_cap,
            "specialCoursesRate" => &mut self.special_courses_rate,
            "flatBonus" => &mut self.flat_bonus,
            "coConvenedCompanionLoad" => &mut self.co_convened_companion_load,
            "careerTrackBaseline" => &mut self.career_track_baseline,
            "tenureTrackBaseline" => &mut self.tenure_track_baseline,
            _ => return None,
        };
        Some(slot)
    }

    /// Replaces values that would break the calculation with their defaults.
    ///
    /// Used after deserializing a typed policy file, where serde has already
    /// checked the shape but not the ranges.
    pub fn sanitized(mut self) -> Self {
        let mut defaults = Self::default();

        if !self.lecture_threshold.is_increasing() {
            warn!(
                thresholds = ?self.lecture_threshold,
                "Lecture thresholds not increasing, using defaults"
            );
            self.lecture_threshold = defaults.lecture_threshold;
        }

        for key in POLICY_KEYS {
            let fallback = defaults.field_mut(key).map(|v| *v);
            let is_baseline = key.ends_with("Baseline");
            if let (Some(slot), Some(fallback)) = (self.field_mut(key), fallback) {
                let invalid = *slot < Decimal::ZERO || (is_baseline && slot.is_zero());
                if invalid {
                    warn!(key, value = %slot, "Out-of-range policy value, using default");
                    *slot = fallback;
                }
            }
        }

        if !self.rates_are_ordered() {
            warn!(
                lecture_rate = %self.lecture_rate,
                mid_rate = %self.mid_rate,
                high_rate = %self.high_rate,
                max_rate = %self.max_rate,
                "Lecture rates not ordered, using default rates"
            );
            self.lecture_rate = defaults.lecture_rate;
            self.mid_rate = defaults.mid_rate;
            self.high_rate = defaults.high_rate;
            self.max_rate = defaults.max_rate;
        }

        self
    }

    /// Lecture interpolation needs `lecture <= mid <= high <= max`.
    fn rates_are_ordered(&self) -> bool {
        self.lecture_rate <= self.mid_rate
            && self.mid_rate <= self.high_rate
            && self.high_rate <= self.max_rate
    }

    /// Returns the expected load for an instructor track.
    ///
    /// Unknown tracks have no baseline.
    pub fn baseline_for(&self, track: &Track) -> Option<Decimal> {
        match track {
            Track::CareerTrack => Some(self.career_track_baseline),
            Track::TenureTrack => Some(self.tenure_track_baseline),
            Track::Unknown(_) => None,
        }
    }
}

const POLICY_KEYS: [&str; 16] = [
    "independentStudyRateLow",
    "independentStudyRateHigh",
    "laboratoryRate",
    "lectureRate",
    "supplementalInstructionRate",
    "thesisRate",
    "midRate",
    "highRate",
    "maxRate",
    "maxLoadCap",
    "thesisCap",
    "specialCoursesRate",
    "flatBonus",
    "coConvenedCompanionLoad",
    "careerTrackBaseline",
    "tenureTrackBaseline",
];

/// Parses a spreadsheet cell as a decimal number.
///
/// Accepts plain and scientific notation. Returns `None` for anything else.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Maps instructor ids to their track designation.
///
/// Instructors absent from this mapping are out of scope for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructorTracks(HashMap<InstructorId, Track>);

impl InstructorTracks {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the track for an instructor.
    pub fn insert(&mut self, id: InstructorId, track: Track) {
        self.0.insert(id, track);
    }

    /// Returns the track for an instructor, if known.
    pub fn get(&self, id: InstructorId) -> Option<&Track> {
        self.0.get(&id)
    }

    /// Returns the number of instructors in the mapping.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(InstructorId, Track)> for InstructorTracks {
    fn from_iter<T: IntoIterator<Item = (InstructorId, Track)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Course codes or descriptions eligible for the special-course bonus.
///
/// Entries are stored trimmed and lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SpecialCourses(BTreeSet<String>);

impl SpecialCourses {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any entry occurs in the class code or description.
    pub fn matches(&self, class_code: &str, description: &str) -> bool {
        let class_code = class_code.trim().to_lowercase();
        let description = description.trim().to_lowercase();
        self.0.iter().any(|entry| {
            class_code.contains(entry.as_str()) || description.contains(entry.as_str())
        })
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SpecialCourses {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

impl From<Vec<String>> for SpecialCourses {
    fn from(entries: Vec<String>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<SpecialCourses> for Vec<String> {
    fn from(special: SpecialCourses) -> Self {
        special.0.into_iter().collect()
    }
}
