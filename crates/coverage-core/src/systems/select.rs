//! Action Selection System
//!
//! Converts learned preferences into a numerically stable softmax
//! distribution per UAV and draws one action index per UAV.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::{ChosenActions, PreferenceTable};
use crate::config::Config;
use crate::error::SimError;
use crate::SimRng;

use super::StepStatus;

/// Compute the softmax probability matrix over the preference table.
///
/// Each row is shifted by its maximum before exponentiation, which leaves
/// the distribution unchanged and keeps the normalizer finite for any
/// finite preferences. `beta` is the inverse temperature: 0 yields the
/// uniform distribution, larger values sharpen toward the best-preference
/// action. A row that still normalizes to a non-finite or non-positive
/// value (possible only with non-finite preferences) is surfaced as
/// `NumericInstability` rather than propagated as NaN probabilities.
pub fn action_probabilities(
    table: &PreferenceTable,
    beta: f64,
) -> Result<Vec<Vec<f64>>, SimError> {
    if beta < 0.0 || !beta.is_finite() {
        return Err(SimError::InvalidConfiguration(format!(
            "beta must be non-negative and finite, got {beta}"
        )));
    }

    let mut matrix = Vec::with_capacity(table.rows.len());
    for (uav, row) in table.rows.iter().enumerate() {
        if row.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "preference row is empty, action set must not be empty".into(),
            ));
        }

        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = row.iter().map(|&p| (beta * (p - max)).exp()).collect();
        let norm: f64 = exp.iter().sum();
        if !norm.is_finite() || norm <= 0.0 {
            return Err(SimError::NumericInstability(format!(
                "softmax normalizer for UAV {uav} is {norm}"
            )));
        }

        matrix.push(exp.into_iter().map(|e| e / norm).collect());
    }
    Ok(matrix)
}

/// Draw one action index per UAV according to the softmax policy. Returns
/// the drawn indices together with the full probability matrix.
pub fn choose_actions<R: Rng>(
    rng: &mut R,
    table: &PreferenceTable,
    beta: f64,
) -> Result<(Vec<usize>, Vec<Vec<f64>>), SimError> {
    let matrix = action_probabilities(table, beta)?;
    let chosen = matrix.iter().map(|probs| sample_index(rng, probs)).collect();
    Ok((chosen, matrix))
}

/// Draw an index from a normalized probability vector via cumulative roll
fn sample_index<R: Rng>(rng: &mut R, probabilities: &[f64]) -> usize {
    let mut roll: f64 = rng.gen();
    for (idx, &p) in probabilities.iter().enumerate() {
        roll -= p;
        if roll <= 0.0 {
            return idx;
        }
    }
    // Floating-point slack; the roll exhausted the mass
    probabilities.len() - 1
}

/// System: sample this step's action for every UAV
pub fn select_uav_actions(
    config: Res<Config>,
    table: Res<PreferenceTable>,
    mut rng: ResMut<SimRng>,
    mut chosen: ResMut<ChosenActions>,
    mut status: ResMut<StepStatus>,
) {
    if !status.is_ok() {
        return;
    }
    match choose_actions(&mut rng.0, &table, config.learning.beta) {
        Ok((actions, probabilities)) => {
            chosen.actions = actions;
            chosen.probabilities = probabilities;
        }
        Err(error) => {
            tracing::error!(%error, "action selection failed");
            chosen.clear();
            status.record(error);
        }
    }
}
