//! User Assignment System
//!
//! Greedy deterministic mapping of ground users to UAVs: each user goes to
//! its nearest UAV strictly within the coverage radius, or stays
//! unassigned. Recomputed from scratch every step; carries no state.

use bevy_ecs::prelude::*;

use crate::components::{UavPositions, UserPositions};
use crate::config::Config;
use crate::geometry::{distance, Point};

/// Resource: the current user → UAV assignment
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Assignments {
    /// `per_uav[i]` holds the indices of the users assigned to UAV i.
    /// Invariant: a user index appears in at most one list.
    pub per_uav: Vec<Vec<usize>>,
}

impl Assignments {
    /// An assignment with every UAV's list empty
    pub fn empty(num_uavs: usize) -> Self {
        Self {
            per_uav: vec![Vec::new(); num_uavs],
        }
    }

    /// The UAV currently serving `user`, if any
    pub fn serving_uav(&self, user: usize) -> Option<usize> {
        self.per_uav
            .iter()
            .position(|users| users.contains(&user))
    }
}

/// Distance-derived signal quality proxy, `1 / (1 + distance)`. Reported
/// alongside assignments but never used as an assignment gate.
pub fn link_quality(dist: f64) -> f64 {
    1.0 / (1.0 + dist)
}

/// Find the UAV at strict minimum distance from `point` among those
/// strictly within `coverage_radius`, skipping `exclude`. Ties resolve to
/// the lower index because the scan runs in index order and only a
/// strictly smaller distance displaces the current best.
pub(crate) fn nearest_uav_within(
    point: Point,
    uav_positions: &[Point],
    coverage_radius: f64,
    exclude: Option<usize>,
) -> Option<usize> {
    let mut best = None;
    let mut min_dist = f64::INFINITY;
    for (uav_idx, uav) in uav_positions.iter().enumerate() {
        if Some(uav_idx) == exclude {
            continue;
        }
        let dist = distance(point, *uav);
        if dist < coverage_radius && dist < min_dist {
            best = Some(uav_idx);
            min_dist = dist;
        }
    }
    best
}

/// Assign each user to the closest UAV within the coverage radius.
///
/// Users are evaluated independently in index order; each contributes to
/// at most one UAV. This is a greedy nearest-available rule, not a global
/// optimum, and callers must not assume otherwise. Empty lists are a valid
/// result.
pub fn assign_users(
    uav_positions: &[Point],
    user_positions: &[Point],
    coverage_radius: f64,
) -> Assignments {
    let mut assignments = Assignments::empty(uav_positions.len());
    for (user_idx, user) in user_positions.iter().enumerate() {
        if let Some(uav_idx) = nearest_uav_within(*user, uav_positions, coverage_radius, None) {
            assignments.per_uav[uav_idx].push(user_idx);
        }
    }
    assignments
}

/// System: rebuild the assignment for the current true positions
pub fn build_assignments(
    config: Res<Config>,
    uavs: Res<UavPositions>,
    users: Res<UserPositions>,
    mut assignments: ResMut<Assignments>,
) {
    *assignments = assign_users(
        &uavs.positions,
        &users.positions,
        config.coverage.coverage_radius,
    );
    let served: usize = assignments.per_uav.iter().map(Vec::len).sum();
    tracing::debug!(served, total = users.len(), "assignment rebuilt");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_within_radius_is_assigned() {
        // Single UAV at the origin, single user one unit away
        let uavs = vec![Point::new(0.0, 0.0)];
        let users = vec![Point::new(1.0, 0.0)];

        let assignments = assign_users(&uavs, &users, 2.0);
        assert_eq!(assignments.per_uav, vec![vec![0]]);
    }

    #[test]
    fn test_user_out_of_radius_stays_unassigned() {
        let uavs = vec![Point::new(0.0, 0.0)];
        let users = vec![Point::new(5.0, 0.0)];

        let assignments = assign_users(&uavs, &users, 2.0);
        assert!(assignments.per_uav[0].is_empty());
        assert_eq!(assignments.serving_uav(0), None);
    }

    #[test]
    fn test_radius_boundary_is_exclusive() {
        let uavs = vec![Point::new(0.0, 0.0)];
        let users = vec![Point::new(2.0, 0.0)];

        // Distance exactly equal to the radius does not qualify
        let assignments = assign_users(&uavs, &users, 2.0);
        assert!(assignments.per_uav[0].is_empty());
    }

    #[test]
    fn test_user_goes_to_strictly_closest_uav() {
        let uavs = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let users = vec![Point::new(7.0, 0.0)];

        let assignments = assign_users(&uavs, &users, 20.0);
        assert_eq!(assignments.per_uav, vec![vec![], vec![0]]);
    }

    #[test]
    fn test_equidistant_tie_goes_to_lower_index() {
        let uavs = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let users = vec![Point::new(5.0, 0.0)];

        let assignments = assign_users(&uavs, &users, 20.0);
        assert_eq!(assignments.per_uav, vec![vec![0], vec![]]);
    }

    #[test]
    fn test_exclusivity_over_many_users() {
        let uavs = vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(50.0, 10.0),
        ];
        let users: Vec<Point> = (0..40)
            .map(|k| Point::new((k * 7 % 60) as f64, (k * 13 % 60) as f64))
            .collect();

        let assignments = assign_users(&uavs, &users, 25.0);

        let mut seen = std::collections::HashSet::new();
        for list in &assignments.per_uav {
            for &user in list {
                assert!(seen.insert(user), "user {user} assigned twice");
            }
        }
        // Every assigned pair satisfies the coverage bound
        for (uav_idx, list) in assignments.per_uav.iter().enumerate() {
            for &user in list {
                assert!(distance(uavs[uav_idx], users[user]) < 25.0);
            }
        }
    }

    #[test]
    fn test_excluded_uav_never_wins() {
        let uavs = vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)];
        let point = Point::new(0.5, 0.0);

        assert_eq!(nearest_uav_within(point, &uavs, 10.0, None), Some(0));
        assert_eq!(nearest_uav_within(point, &uavs, 10.0, Some(0)), Some(1));
        assert_eq!(nearest_uav_within(point, &uavs, 2.0, Some(0)), None);
    }

    #[test]
    fn test_link_quality_decreases_with_distance() {
        assert_eq!(link_quality(0.0), 1.0);
        assert!(link_quality(1.0) > link_quality(5.0));
    }

    #[test]
    fn test_no_uavs_is_valid() {
        let assignments = assign_users(&[], &[Point::new(1.0, 1.0)], 5.0);
        assert!(assignments.per_uav.is_empty());
    }
}
