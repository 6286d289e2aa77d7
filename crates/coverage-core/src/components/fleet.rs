//! Fleet Positions
//!
//! True positions of UAVs and ground users. UAV positions are mutated only
//! by the movement system between decision steps; user positions are fixed
//! for the lifetime of a run.

use bevy_ecs::prelude::*;

use crate::geometry::Point;

/// Resource: current position of every UAV, indexed `0..N`
#[derive(Resource, Debug, Clone, Default)]
pub struct UavPositions {
    pub positions: Vec<Point>,
}

impl UavPositions {
    pub fn new(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Resource: position of every ground user, indexed `0..M`
#[derive(Resource, Debug, Clone, Default)]
pub struct UserPositions {
    pub positions: Vec<Point>,
}

impl UserPositions {
    pub fn new(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
