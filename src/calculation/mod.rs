//! Calculation logic for the workload engine.
//!
//! This module contains record validation, course classification, rate and
//! load calculation, team-taught and co-convened adjustment, faculty
//! aggregation, and the batch pipeline that runs them in order.

mod aggregate;
mod classifier;
mod co_convened;
mod grouping;
mod load;
mod pipeline;
mod rate;
mod team_taught;
mod validation;

#[cfg(test)]
mod test_support;

pub use aggregate::{
    REPORT_DECIMAL_PLACES, build_summary, calculate_percentage, calculate_total_load,
    course_display_label,
};
pub use classifier::{
    SUPPLEMENTAL_INSTRUCTION_CODES, SUPPLEMENTAL_INSTRUCTION_ROLE, THESIS_CATALOG_NUMBERS,
    build_course,
};
pub use co_convened::{apply_co_convened_adjustment, select_representative};
pub use grouping::{
    CoConvenedBundle, PRIMARY_INSTRUCTOR_ROLE, TeamTaughtGroup, co_convened_bundles,
    team_taught_groups,
};
pub use load::{
    LoadBreakdown, calculate_load, compute_breakdown, lecture_load_cap, recalculate_load,
};
pub use pipeline::{WorkloadRun, run_workload};
pub use rate::{base_rate, effective_rate, lecture_rate_for};
pub use team_taught::apply_team_taught_division;
pub use validation::{MEETING_EXEMPT_KEYWORDS, resolve_instructor_id, validate_record};
