//! Contribution System
//!
//! Turns the shared team objective (distinct users served) into a
//! per-UAV credit signal: the leave-one-out marginal contribution. One
//! counterfactual is evaluated per UAV, not the full coalition game.

use bevy_ecs::prelude::*;
use std::collections::HashSet;

use crate::components::{UavPositions, UserPositions};
use crate::config::Config;
use crate::geometry::Point;

use super::assignment::{nearest_uav_within, Assignments};

/// Resource: per-UAV marginal contribution and the users behind it
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ContributionRecord {
    /// `values[i]` is the drop in global utility if UAV i were removed and
    /// its users reassigned to the nearest remaining UAV in radius
    pub values: Vec<f64>,
    /// `dependents[i]` are the users that would lose coverage entirely
    /// without UAV i
    pub dependents: Vec<Vec<usize>>,
}

impl ContributionRecord {
    pub fn empty(num_uavs: usize) -> Self {
        Self {
            values: vec![0.0; num_uavs],
            dependents: vec![Vec::new(); num_uavs],
        }
    }
}

/// Global utility: the number of distinct users served by the whole team.
/// The assignment invariant forbids duplicates, but deduplicate anyway so
/// a malformed input cannot inflate the count.
pub fn global_utility(assignments: &Assignments) -> usize {
    let mut unique = HashSet::new();
    for users in &assignments.per_uav {
        for &user in users {
            unique.insert(user);
        }
    }
    unique.len()
}

/// Compute the leave-one-out marginal contribution of every UAV.
///
/// For each UAV i, a counterfactual assignment is built on an independent
/// copy: i is excluded from the candidate set (an index mask, never a
/// sentinel coordinate), and each of its users moves to the nearest other
/// UAV strictly within radius or drops out entirely. The contribution is
/// the utility difference between the real and counterfactual assignments.
pub fn marginal_contributions(
    uav_positions: &[Point],
    assignments: &Assignments,
    coverage_radius: f64,
    user_positions: &[Point],
) -> ContributionRecord {
    let baseline = global_utility(assignments);
    let mut record = ContributionRecord::empty(uav_positions.len());

    for i in 0..uav_positions.len() {
        let mut counterfactual = assignments.clone();
        let orphans = std::mem::take(&mut counterfactual.per_uav[i]);

        for &user in &orphans {
            match nearest_uav_within(user_positions[user], uav_positions, coverage_radius, Some(i))
            {
                Some(rescuer) => counterfactual.per_uav[rescuer].push(user),
                None => record.dependents[i].push(user),
            }
        }

        record.values[i] = baseline as f64 - global_utility(&counterfactual) as f64;
    }

    record
}

/// System: recompute the credit signal for the current assignment
pub fn compute_contributions(
    config: Res<Config>,
    uavs: Res<UavPositions>,
    users: Res<UserPositions>,
    assignments: Res<Assignments>,
    mut record: ResMut<ContributionRecord>,
) {
    *record = marginal_contributions(
        &uavs.positions,
        &assignments,
        config.coverage.coverage_radius,
        &users.positions,
    );
    tracing::debug!(utility = global_utility(&assignments), "contributions updated");
}
