//! Policy State
//!
//! The shared action catalogue, the learned preference table, and the
//! actions drawn for the current step.

use bevy_ecs::prelude::*;

/// Resource: the fixed, ordered catalogue of discrete displacement options
/// shared by all UAVs. Indices into this list are the canonical action
/// identifiers used by the learner, the sampler, and the movement system.
#[derive(Resource, Debug, Clone)]
pub struct ActionSet {
    /// Unit displacements `(dx, dy)`, scaled by the step size when applied
    pub displacements: Vec<[f64; 2]>,
}

impl ActionSet {
    pub fn new(displacements: Vec<[f64; 2]>) -> Self {
        Self { displacements }
    }

    pub fn len(&self) -> usize {
        self.displacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }
}

/// Resource: one learned preference score per UAV per action. The only
/// state carried across decision steps; grows without bound by design.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PreferenceTable {
    /// `rows[uav][action]`
    pub rows: Vec<Vec<f64>>,
}

impl PreferenceTable {
    /// A zero-initialized table for `num_uavs` UAVs over `num_actions` actions
    pub fn zeros(num_uavs: usize, num_actions: usize) -> Self {
        Self {
            rows: vec![vec![0.0; num_actions]; num_uavs],
        }
    }

    pub fn num_uavs(&self) -> usize {
        self.rows.len()
    }
}

/// Resource: the action index drawn for each UAV this step, plus the full
/// probability matrix the draw was made from (kept for inspection)
#[derive(Resource, Debug, Clone, Default)]
pub struct ChosenActions {
    pub actions: Vec<usize>,
    pub probabilities: Vec<Vec<f64>>,
}

impl ChosenActions {
    pub fn clear(&mut self) {
        self.actions.clear();
        self.probabilities.clear();
    }
}
