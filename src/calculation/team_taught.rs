//! Team-taught load division.
//!
//! A section taught jointly by N primary instructors gives each of them one
//! N-th of the section load.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::WorkloadPolicy;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, CourseBook, InstructorId};

use super::grouping::team_taught_groups;
use super::load::{audit_loads, calculate_load};

/// Divides the load of every team-taught course by its group's instructor count.
///
/// Each member also records the names of its co-teachers. Returns the number
/// of courses adjusted. A course can be divided once only; a second pass over
/// the same book fails with [`crate::error::EngineError::InvalidLoadTransition`].
pub fn apply_team_taught_division(
    book: &mut CourseBook,
    policy: &WorkloadPolicy,
    trace: &mut AuditTrace,
) -> EngineResult<usize> {
    let mut adjusted = 0;

    for group in team_taught_groups(book) {
        let mut loads_before = Vec::with_capacity(group.members.len());
        for &id in &group.members {
            loads_before.push(calculate_load(&mut book[id], policy));
        }

        let roster: Vec<(Option<InstructorId>, String)> = group
            .members
            .iter()
            .map(|&id| (book[id].instructor_id, book[id].instructor_name.clone()))
            .collect();

        let mut loads_after: Vec<Decimal> = Vec::with_capacity(group.members.len());
        for &id in &group.members {
            let course = &mut book[id];
            let mut partners: Vec<String> = roster
                .iter()
                .filter(|(other, name)| *other != course.instructor_id && !name.is_empty())
                .map(|(_, name)| name.clone())
                .collect();
            partners.sort();
            partners.dedup();
            course.team_taught_with = partners;
            loads_after.push(course.divide_for_team(group.instructor_count)?);
        }

        let label = book[group.members[0]].label();
        debug!(
            section = %label,
            instructors = group.instructor_count,
            "Team-taught section divided"
        );
        trace.steps.push(AuditStep {
            step_number: trace.next_step_number(),
            rule_id: "team_taught_division".to_string(),
            rule_name: "Team-Taught Division".to_string(),
            input: serde_json::json!({
                "section": label,
                "instructors": roster.iter().map(|(_, name)| name.as_str()).collect::<Vec<_>>(),
                "loads_before": audit_loads(&loads_before),
            }),
            output: serde_json::json!({
                "divisor": group.instructor_count,
                "loads_after": audit_loads(&loads_after),
            }),
            reasoning: format!(
                "{} taught by {} primary instructors, each load divided by {}",
                label, group.instructor_count, group.instructor_count
            ),
        });
        adjusted += group.members.len();
    }

    Ok(adjusted)
}
