//! UAV Coverage Learning Engine
//!
//! Public API for the coverage simulation: a team of aerial base stations
//! learns, through a leave-one-out marginal-contribution reward and a
//! softmax policy over discrete moves, where to position itself to serve
//! as many ground users as possible.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod components;
pub mod config;
pub mod error;
pub mod geometry;
pub mod output;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::Config;
pub use error::SimError;
pub use geometry::{distance, in_bounds, Point};

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Global simulation state resource
#[derive(Resource)]
pub struct SimulationState {
    pub current_step: u64,
    pub max_steps: u64,
}
