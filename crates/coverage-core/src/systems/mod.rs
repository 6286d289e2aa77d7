//! Simulation Systems
//!
//! The per-step decision chain, run in strict order:
//! assignment → contribution → preference update → action selection →
//! movement. Each system wraps a pure function that is also usable (and
//! tested) on its own.

pub mod assignment;
pub mod contribution;
pub mod movement;
pub mod preference;
pub mod select;

pub use assignment::{assign_users, build_assignments, link_quality, Assignments};
pub use contribution::{
    compute_contributions, global_utility, marginal_contributions, ContributionRecord,
};
pub use movement::{apply_chosen_actions, apply_displacement};
pub use preference::{update_preference_table, update_preferences, LearningParams};
pub use select::{action_probabilities, choose_actions, select_uav_actions};

use bevy_ecs::prelude::*;
use coverage_events::StepEvent;

use crate::error::SimError;

/// Resource collecting the events emitted while applying chosen actions
#[derive(Resource, Debug, Default)]
pub struct StepEvents {
    pub events: Vec<StepEvent>,
}

impl StepEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: StepEvent) {
        self.events.push(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Resource carrying the first error raised by a fallible system. Later
/// systems in the chain skip their work once an error is recorded; the
/// outer loop checks it after every schedule run and stops the run.
#[derive(Resource, Debug, Default)]
pub struct StepStatus {
    pub error: Option<SimError>,
}

impl StepStatus {
    pub fn record(&mut self, error: SimError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
