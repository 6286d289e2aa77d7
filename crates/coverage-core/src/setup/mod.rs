//! Initial Placement
//!
//! Seeded random placement of UAVs and users on the grid. All randomness
//! flows through the caller's generator; nothing touches global state.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::geometry::Point;

/// Generate random initial positions for UAVs and users within the grid.
///
/// Positions land on integer grid cells in `[0, grid_size)`, which keeps
/// experiment setups easy to read while the simulation itself runs on
/// real-valued coordinates.
pub fn initialize_positions(
    rng: &mut SmallRng,
    grid_size: u32,
    num_uavs: usize,
    num_users: usize,
) -> (Vec<Point>, Vec<Point>) {
    let cell = |rng: &mut SmallRng| -> Point {
        Point::new(
            rng.gen_range(0..grid_size) as f64,
            rng.gen_range(0..grid_size) as f64,
        )
    };

    let uavs = (0..num_uavs).map(|_| cell(rng)).collect();
    let users = (0..num_users).map(|_| cell(rng)).collect();
    (uavs, users)
}
