//! Preference Learning System
//!
//! For every UAV and every candidate action, simulates a short look-ahead
//! on copied positions, re-running assignment and contribution on each
//! hypothetical state, and nudges the preference score toward actions that
//! raise the UAV's credited utility.

use bevy_ecs::prelude::*;

use crate::components::{ActionSet, PreferenceTable, UavPositions, UserPositions};
use crate::config::Config;
use crate::error::SimError;
use crate::geometry::{in_bounds, Point};

use super::assignment::{assign_users, Assignments};
use super::contribution::marginal_contributions;
use super::StepStatus;

/// Tuning inputs for one preference update call
#[derive(Debug, Clone, Copy)]
pub struct LearningParams {
    pub coverage_radius: f64,
    pub grid_size: f64,
    pub learning_rate: f64,
    /// Look-ahead horizon T
    pub horizon: u32,
    /// Grid units moved per unit of action displacement
    pub step_size: f64,
}

fn validate(
    params: &LearningParams,
    table: &PreferenceTable,
    actions: &ActionSet,
    num_uavs: usize,
) -> Result<(), SimError> {
    let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));

    if actions.is_empty() {
        return invalid("action set must not be empty".into());
    }
    if !(params.coverage_radius > 0.0) || !params.coverage_radius.is_finite() {
        return invalid(format!(
            "coverage_radius must be positive and finite, got {}",
            params.coverage_radius
        ));
    }
    if !(params.grid_size > 0.0) || !params.grid_size.is_finite() {
        return invalid(format!(
            "grid_size must be positive and finite, got {}",
            params.grid_size
        ));
    }
    if params.learning_rate < 0.0 || !params.learning_rate.is_finite() {
        return invalid(format!(
            "learning_rate must be non-negative and finite, got {}",
            params.learning_rate
        ));
    }
    if params.horizon == 0 {
        return invalid("horizon must be at least 1".into());
    }
    if !(params.step_size > 0.0) || !params.step_size.is_finite() {
        return invalid(format!(
            "step_size must be positive and finite, got {}",
            params.step_size
        ));
    }
    if table.rows.len() != num_uavs {
        return invalid(format!(
            "preference table has {} rows for {} UAVs",
            table.rows.len(),
            num_uavs
        ));
    }
    if table.rows.iter().any(|row| row.len() != actions.len()) {
        return invalid(format!(
            "preference rows must have one entry per action ({})",
            actions.len()
        ));
    }
    Ok(())
}

/// Update the preference table in place from a look-ahead over every
/// candidate action of every UAV.
///
/// Starting from the true positions, each action is applied to one UAV up
/// to `horizon` times (step size scaled, other UAVs held fixed); every
/// committed simulated step re-runs assignment and contribution and
/// accumulates the UAV's credit. A step that would leave the grid ends the
/// look-ahead early without penalty. The accumulated credit is divided by
/// the full horizon even when the look-ahead stopped early, so actions
/// that run off the grid are diluted rather than skipped. The per-action
/// delta is `learning_rate * (average credit - current credit)`.
///
/// Validation runs before any mutation; on error the table is untouched.
/// Caller positions and assignments are never modified.
pub fn update_preferences(
    table: &mut PreferenceTable,
    uav_positions: &[Point],
    user_positions: &[Point],
    assignments: &Assignments,
    actions: &ActionSet,
    params: &LearningParams,
) -> Result<(), SimError> {
    validate(params, table, actions, uav_positions.len())?;

    // Credit for the true, unsimulated state; the same baseline serves
    // every action of a UAV.
    let baseline =
        marginal_contributions(uav_positions, assignments, params.coverage_radius, user_positions);

    for i in 0..uav_positions.len() {
        for (action_idx, displacement) in actions.displacements.iter().enumerate() {
            let mut total = 0.0;
            let mut simulated = uav_positions.to_vec();

            for _ in 0..params.horizon {
                let candidate = Point::new(
                    simulated[i].x + params.step_size * displacement[0],
                    simulated[i].y + params.step_size * displacement[1],
                );
                if !in_bounds(candidate, params.grid_size) {
                    break;
                }
                simulated[i] = candidate;

                let sim_assignments =
                    assign_users(&simulated, user_positions, params.coverage_radius);
                let sim_record = marginal_contributions(
                    &simulated,
                    &sim_assignments,
                    params.coverage_radius,
                    user_positions,
                );
                total += sim_record.values[i];
            }

            // Divided by the full horizon regardless of how many simulated
            // steps actually committed.
            let average = total / f64::from(params.horizon);
            table.rows[i][action_idx] +=
                params.learning_rate * (average - baseline.values[i]);
        }
    }

    Ok(())
}

/// System: run the preference update for the current step
pub fn update_preference_table(
    config: Res<Config>,
    uavs: Res<UavPositions>,
    users: Res<UserPositions>,
    assignments: Res<Assignments>,
    actions: Res<ActionSet>,
    mut table: ResMut<PreferenceTable>,
    mut status: ResMut<StepStatus>,
) {
    if !status.is_ok() {
        return;
    }
    let params = config.learning_params();
    if let Err(error) = update_preferences(
        &mut table,
        &uavs.positions,
        &users.positions,
        &assignments,
        &actions,
        &params,
    ) {
        tracing::error!(%error, "preference update failed");
        status.record(error);
    }
}
