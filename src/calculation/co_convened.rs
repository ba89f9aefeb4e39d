//! Co-convened bundle adjustment.
//!
//! Cross-listed sections that one instructor teaches in a single meeting are
//! one teaching effort. They are either collapsed onto a representative or
//! split evenly, depending on the [`AdjustmentMode`].

use rust_decimal::Decimal;
use std::cmp::Reverse;
use tracing::debug;

use crate::config::WorkloadPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AdjustmentMode, AuditStep, AuditTrace, CourseBook, CourseId};

use super::grouping::{CoConvenedBundle, co_convened_bundles};
use super::load::{audit_loads, calculate_load, recalculate_load};

/// Picks the course that carries a collapsed bundle.
///
/// Highest max units wins; ties go to the smallest label, then the earliest
/// course id, so the choice never depends on row order alone.
pub fn select_representative(book: &CourseBook, members: &[CourseId]) -> Option<CourseId> {
    members
        .iter()
        .copied()
        .min_by_key(|&id| (Reverse(book[id].max_units), book[id].label(), id))
}

/// Adjusts every co-convened bundle in the book.
///
/// Must run after [`super::apply_team_taught_division`], since both modes
/// start from the possibly divided course loads. Returns the number of
/// bundles adjusted.
pub fn apply_co_convened_adjustment(
    book: &mut CourseBook,
    policy: &WorkloadPolicy,
    mode: AdjustmentMode,
    trace: &mut AuditTrace,
) -> EngineResult<usize> {
    let bundles = co_convened_bundles(book);

    for bundle in &bundles {
        let loads_before: Vec<Decimal> = bundle
            .members
            .iter()
            .map(|&id| calculate_load(&mut book[id], policy))
            .collect();
        record_companions(book, bundle);

        let (reasoning, representative) = match mode {
            AdjustmentMode::Collapse => {
                let representative = collapse(book, bundle, policy)?;
                let combined = book[representative].enrollment;
                (
                    format!(
                        "{} carries combined enrollment {}; {} companion(s) set to {}",
                        book[representative].label(),
                        combined,
                        bundle.members.len() - 1,
                        policy.co_convened_companion_load.normalize()
                    ),
                    Some(representative),
                )
            }
            AdjustmentMode::Split => {
                for &id in &bundle.members {
                    book[id].apply_co_convened_share(bundle.size())?;
                }
                (
                    format!(
                        "{} sections each carry 1/{} of their load",
                        bundle.size(),
                        bundle.size()
                    ),
                    None,
                )
            }
        };

        let loads_after: Vec<String> = bundle
            .members
            .iter()
            .map(|&id| {
                book[id]
                    .load()
                    .map(|l| l.normalize().to_string())
                    .unwrap_or_default()
            })
            .collect();
        let labels: Vec<String> = bundle.members.iter().map(|&id| book[id].label()).collect();

        debug!(sections = ?labels, %mode, "Co-convened bundle adjusted");
        trace.steps.push(AuditStep {
            step_number: trace.next_step_number(),
            rule_id: "co_convened_adjustment".to_string(),
            rule_name: "Co-Convened Adjustment".to_string(),
            input: serde_json::json!({
                "mode": mode.to_string(),
                "sections": labels,
                "loads_before": audit_loads(&loads_before),
            }),
            output: serde_json::json!({
                "representative": representative.map(|id| book[id].label()),
                "loads_after": loads_after,
            }),
            reasoning,
        });
    }

    Ok(bundles.len())
}

fn record_companions(book: &mut CourseBook, bundle: &CoConvenedBundle) {
    let labels: Vec<String> = bundle.members.iter().map(|&id| book[id].label()).collect();
    for (index, &id) in bundle.members.iter().enumerate() {
        let mut companions: Vec<String> = labels
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, label)| label.clone())
            .collect();
        companions.sort();
        book[id].co_convened_with = companions;
    }
}

fn collapse(
    book: &mut CourseBook,
    bundle: &CoConvenedBundle,
    policy: &WorkloadPolicy,
) -> EngineResult<CourseId> {
    let representative = select_representative(book, &bundle.members).ok_or_else(|| {
        EngineError::CalculationError {
            message: "co-convened bundle has no members".to_string(),
        }
    })?;

    let combined = bundle
        .members
        .iter()
        .fold(0u32, |sum, &id| sum.saturating_add(book[id].enrollment));

    for &id in &bundle.members {
        if id == representative {
            book[id].absorb_enrollment(combined)?;
            recalculate_load(&mut book[id], policy)?;
        } else {
            book[id].assign_companion_load(policy.co_convened_companion_load)?;
        }
    }

    Ok(representative)
}
