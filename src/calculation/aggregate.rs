//! Faculty aggregation.
//!
//! Sums course loads per instructor, relates the total to the track baseline,
//! and renders the per-instructor summary line.

use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::config::WorkloadPolicy;
use crate::error::EngineResult;
use crate::models::{Course, CourseBook, FacultyMember, FacultySummary};

use super::load::calculate_load;

/// Decimal places kept in reported loads and percentages.
pub const REPORT_DECIMAL_PLACES: u32 = 2;

/// Sums and finalizes the load of every course indexed on a faculty member.
///
/// Courses no adjustment pass touched are calculated here. Once finalized, a
/// course load can no longer change.
pub fn calculate_total_load(
    faculty: &mut FacultyMember,
    book: &mut CourseBook,
    policy: &WorkloadPolicy,
) -> EngineResult<Decimal> {
    let mut total = Decimal::ZERO;
    for id in faculty.course_ids() {
        let course = &mut book[id];
        calculate_load(course, policy);
        total = total.saturating_add(course.finalize()?);
    }
    faculty.set_total_load(total);
    Ok(total)
}

/// Returns the total load as a percentage of the track baseline.
///
/// `None` for tracks without a baseline, and for a faculty member whose total
/// has not been calculated.
///
/// # Examples
///
/// ```
/// use workload_engine::calculation::{calculate_percentage, calculate_total_load};
/// use workload_engine::config::WorkloadPolicy;
/// use workload_engine::models::{CourseBook, FacultyMember, Track};
///
/// let policy = WorkloadPolicy::default();
/// let mut faculty = FacultyMember::new(1001, "Ada", "ada@example.edu", Track::CareerTrack);
/// assert_eq!(calculate_percentage(&faculty, &policy), None);
///
/// calculate_total_load(&mut faculty, &mut CourseBook::new(), &policy).unwrap();
/// assert_eq!(calculate_percentage(&faculty, &policy), Some(0.into()));
/// ```
pub fn calculate_percentage(faculty: &FacultyMember, policy: &WorkloadPolicy) -> Option<Decimal> {
    let total = faculty.total_load()?;
    let baseline = policy.baseline_for(&faculty.track)?;
    total
        .checked_div(baseline)
        .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
}

/// Human-readable course label with companion annotations.
///
/// `BIO 481-001 - Field Ecology (co-convened with BIO 581-001) (team-taught with Grace Hopper)`
pub fn course_display_label(course: &Course) -> String {
    let mut label = format!("{} - {}", course.label(), title_case(&course.class_description));
    if !course.co_convened_with.is_empty() {
        label.push_str(&format!(
            " (co-convened with {})",
            course.co_convened_with.join(", ")
        ));
    }
    if !course.team_taught_with.is_empty() {
        label.push_str(&format!(
            " (team-taught with {})",
            course.team_taught_with.join(", ")
        ));
    }
    label
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.trim().chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Builds the report line for an aggregated faculty member.
pub fn build_summary(
    faculty: &FacultyMember,
    book: &CourseBook,
    policy: &WorkloadPolicy,
) -> FacultySummary {
    let units: BTreeSet<String> = faculty
        .course_ids()
        .filter_map(|id| book[id].unit.clone())
        .collect();
    let mut courses: Vec<String> = faculty
        .course_ids()
        .map(|id| course_display_label(&book[id]))
        .collect();
    courses.sort();

    FacultySummary {
        name: faculty.name.clone(),
        instructor_id: faculty.instructor_id,
        email: faculty.email.clone(),
        track: faculty.track.clone(),
        total_load: faculty
            .total_load()
            .unwrap_or_default()
            .round_dp(REPORT_DECIMAL_PLACES),
        percentage: calculate_percentage(faculty, policy)
            .map(|p| p.round_dp(REPORT_DECIMAL_PLACES)),
        units: units.into_iter().collect(),
        courses,
    }
}
