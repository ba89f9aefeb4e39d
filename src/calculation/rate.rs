//! Rate selection.
//!
//! Maps a course category to its configured rate, and replaces the lecture
//! rate with an enrollment-driven value for lecture sections.

use rust_decimal::Decimal;

use crate::config::WorkloadPolicy;
use crate::models::{Course, CourseCategory};

/// Returns the configured rate for a category, before any enrollment scaling.
///
/// Independent study is tiered by unit count: at most two units use the low
/// rate, anything above uses the high rate.
pub fn base_rate(category: CourseCategory, max_units: Decimal, policy: &WorkloadPolicy) -> Decimal {
    match category {
        CourseCategory::Thesis => policy.thesis_rate,
        CourseCategory::IndependentStudy if max_units <= Decimal::TWO => {
            policy.independent_study_rate_low
        }
        CourseCategory::IndependentStudy => policy.independent_study_rate_high,
        CourseCategory::Laboratory => policy.laboratory_rate,
        CourseCategory::SupplementalInstruction => policy.supplemental_instruction_rate,
        CourseCategory::Lecture | CourseCategory::Standard => policy.lecture_rate,
    }
}

/// Returns the per-unit lecture rate for an enrollment.
///
/// | Enrollment        | Rate                                   |
/// |-------------------|----------------------------------------|
/// | below `low`       | lecture rate                           |
/// | `low` to `mid`    | linear from lecture rate to mid rate   |
/// | `mid` to `high`   | linear from mid rate to high rate      |
/// | above `high`      | max rate                               |
///
/// # Examples
///
/// ```
/// use workload_engine::calculation::lecture_rate_for;
/// use workload_engine::config::WorkloadPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = WorkloadPolicy::default();
/// assert_eq!(lecture_rate_for(40, &policy), policy.lecture_rate);
/// assert_eq!(lecture_rate_for(150, &policy), policy.mid_rate);
/// assert_eq!(lecture_rate_for(200, &policy), policy.high_rate);
/// assert_eq!(lecture_rate_for(201, &policy), policy.max_rate);
/// ```
pub fn lecture_rate_for(enrollment: u32, policy: &WorkloadPolicy) -> Decimal {
    let enrollment = Decimal::from(enrollment);
    let thresholds = &policy.lecture_threshold;

    if enrollment < thresholds.low {
        policy.lecture_rate
    } else if enrollment <= thresholds.mid {
        interpolate(
            enrollment,
            (thresholds.low, policy.lecture_rate),
            (thresholds.mid, policy.mid_rate),
        )
    } else if enrollment <= thresholds.high {
        interpolate(
            enrollment,
            (thresholds.mid, policy.mid_rate),
            (thresholds.high, policy.high_rate),
        )
    } else {
        policy.max_rate
    }
}

fn interpolate(x: Decimal, (x0, y0): (Decimal, Decimal), (x1, y1): (Decimal, Decimal)) -> Decimal {
    match (x - x0).checked_div(x1 - x0) {
        Some(fraction) => y0 + fraction * (y1 - y0),
        None => y1,
    }
}

/// Returns the rate that applies to a course.
///
/// Lecture sections use [`lecture_rate_for`]; every other category uses its
/// [`base_rate`].
pub fn effective_rate(course: &Course, policy: &WorkloadPolicy) -> Decimal {
    match course.category {
        CourseCategory::Lecture => lecture_rate_for(course.enrollment, policy),
        category => base_rate(category, course.max_units, policy),
    }
}
