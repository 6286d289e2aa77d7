//! Movement System
//!
//! Applies each UAV's drawn action to its true position. Moves that would
//! leave the grid are rejected, not clamped; the UAV holds position and a
//! blocked-move event is recorded instead.

use bevy_ecs::prelude::*;
use coverage_events::{EventType, StepEvent};

use crate::components::{ActionSet, ChosenActions, UavPositions};
use crate::config::Config;
use crate::geometry::{in_bounds, Point};
use crate::SimulationState;

use super::{StepEvents, StepStatus};

/// Apply one displacement to `position`, scaled by `step_size`. Returns
/// `None` when the destination lies outside the grid.
pub fn apply_displacement(
    position: Point,
    displacement: [f64; 2],
    step_size: f64,
    grid_size: f64,
) -> Option<Point> {
    let candidate = Point::new(
        position.x + step_size * displacement[0],
        position.y + step_size * displacement[1],
    );
    in_bounds(candidate, grid_size).then_some(candidate)
}

/// System: commit this step's chosen actions to the true positions
pub fn apply_chosen_actions(
    state: Res<SimulationState>,
    config: Res<Config>,
    actions: Res<ActionSet>,
    chosen: Res<ChosenActions>,
    status: Res<StepStatus>,
    mut uavs: ResMut<UavPositions>,
    mut events: ResMut<StepEvents>,
) {
    if !status.is_ok() {
        return;
    }
    let step_size = config.learning.step_size;
    let grid_size = f64::from(config.world.grid_size);

    for (uav_idx, &action_idx) in chosen.actions.iter().enumerate() {
        let displacement = actions.displacements[action_idx];
        match apply_displacement(uavs.positions[uav_idx], displacement, step_size, grid_size) {
            Some(next) => {
                uavs.positions[uav_idx] = next;
                events.push(StepEvent::new(
                    state.current_step,
                    EventType::Moved,
                    uav_idx,
                    action_idx,
                    [next.x, next.y],
                ));
            }
            None => {
                let held = uavs.positions[uav_idx];
                tracing::debug!(uav = uav_idx, action = action_idx, "move rejected at grid edge");
                events.push(StepEvent::new(
                    state.current_step,
                    EventType::MoveBlocked,
                    uav_idx,
                    action_idx,
                    [held.x, held.y],
                ));
            }
        }
    }
}
