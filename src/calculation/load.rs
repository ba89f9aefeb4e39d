//! Course load calculation.
//!
//! Combines the effective rate with units, enrollment, caps and bonuses into
//! a single course load. Values stay unrounded here; rounding happens when the
//! report is built.

use rust_decimal::Decimal;

use crate::config::WorkloadPolicy;
use crate::error::EngineResult;
use crate::models::{Course, CourseCategory};

use super::rate::effective_rate;

/// Ceiling on a lecture load: `units x 20/3`.
///
/// Saturates at [`Decimal::MAX`] for units too large to scale.
pub fn lecture_load_cap(units: Decimal) -> Decimal {
    units
        .checked_mul(Decimal::from(20))
        .map(|scaled| scaled / Decimal::from(3))
        .unwrap_or(Decimal::MAX)
}

/// Multiplies the factors, or `None` once the product leaves the decimal range.
fn checked_product(factors: &[Decimal]) -> Option<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |product, factor| product.checked_mul(*factor))
}

/// Renders loads for audit step payloads.
pub(crate) fn audit_loads(loads: &[Decimal]) -> Vec<String> {
    loads.iter().map(|load| load.normalize().to_string()).collect()
}

/// How a course load was derived.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadBreakdown {
    /// The course category.
    pub category: CourseCategory,
    /// The rate used.
    pub rate: Decimal,
    /// Load before caps and bonuses.
    pub base_load: Decimal,
    /// Whether a ceiling reduced the base load.
    pub capped: bool,
    /// Special-course and flat bonuses added on top.
    pub bonus: Decimal,
    /// The final load.
    pub load: Decimal,
}

/// Derives a course load from the course's own attributes.
///
/// Ignores any load already stored on the course.
pub fn compute_breakdown(course: &Course, policy: &WorkloadPolicy) -> LoadBreakdown {
    let rate = effective_rate(course, policy);
    let units = course.max_units;

    if course.enrollment == 0 || units.is_zero() {
        return LoadBreakdown {
            category: course.category,
            rate,
            base_load: Decimal::ZERO,
            capped: false,
            bonus: Decimal::ZERO,
            load: Decimal::ZERO,
        };
    }

    let enrollment = Decimal::from(course.enrollment);
    let (product, ceiling) = match course.category {
        CourseCategory::Thesis => (
            checked_product(&[rate, enrollment, units]),
            Some(policy.thesis_cap),
        ),
        CourseCategory::IndependentStudy => (
            checked_product(&[rate, enrollment, units]),
            Some(policy.max_load_cap),
        ),
        CourseCategory::SupplementalInstruction => (Some(rate), None),
        CourseCategory::Lecture => (
            checked_product(&[units, rate]),
            Some(lecture_load_cap(units)),
        ),
        CourseCategory::Laboratory | CourseCategory::Standard => {
            (checked_product(&[units, rate]), None)
        }
    };
    // An out-of-range product saturates and then meets the ceiling, if any.
    let base_load = product.unwrap_or(Decimal::MAX);
    let capped_load = match ceiling {
        Some(ceiling) if base_load > ceiling => ceiling,
        _ => base_load,
    };

    let mut bonus = Decimal::ZERO;
    if course.special {
        bonus = bonus.saturating_add(units.saturating_mul(policy.special_courses_rate));
    }
    if course.field_trip || course.grading_intensive {
        bonus = bonus.saturating_add(policy.flat_bonus);
    }

    LoadBreakdown {
        category: course.category,
        rate,
        base_load,
        capped: capped_load < base_load,
        bonus,
        load: capped_load.saturating_add(bonus).max(Decimal::ZERO),
    }
}

/// Returns the course load, calculating and storing it on first use.
///
/// Later calls return the stored value, including any adjustment applied to
/// it since.
///
/// # Examples
///
/// ```
/// use workload_engine::calculation::{build_course, calculate_load};
/// use workload_engine::config::{SpecialCourses, WorkloadPolicy};
/// use workload_engine::models::RawRecord;
/// use rust_decimal::Decimal;
///
/// let record = RawRecord {
///     course_category: Some("Laboratory".to_string()),
///     max_units: Some("1".to_string()),
///     enroll_total: Some("24".to_string()),
///     ..RawRecord::default()
/// };
/// let mut course = build_course(&record, &SpecialCourses::new());
/// let policy = WorkloadPolicy::default();
///
/// assert_eq!(calculate_load(&mut course, &policy), Decimal::from(5));
/// assert_eq!(calculate_load(&mut course, &policy), Decimal::from(5));
/// ```
pub fn calculate_load(course: &mut Course, policy: &WorkloadPolicy) -> Decimal {
    if let Some(load) = course.load() {
        return load;
    }
    let breakdown = compute_breakdown(course, policy);
    course.memoize(breakdown.load)
}

/// Recalculates the load after the course's attributes changed.
///
/// Any team division already applied to the course is applied again to the
/// new value.
pub fn recalculate_load(course: &mut Course, policy: &WorkloadPolicy) -> EngineResult<Decimal> {
    let breakdown = compute_breakdown(course, policy);
    course.store_recomputed(breakdown.load)
}
