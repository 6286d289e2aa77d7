//! Snapshot Generation
//!
//! Assembles the full decision state (positions, assignment, credit
//! signal, policy) into `coverage-events` schema types and writes them as
//! JSON at regular intervals. Consumers are strictly read-only.

use bevy_ecs::prelude::*;
use std::fs;
use std::io;
use std::path::Path;

use coverage_events::{generate_snapshot_id, StepSnapshot, UavSnapshot, UserSnapshot};

use crate::components::{ChosenActions, PreferenceTable, UavPositions, UserPositions};
use crate::geometry::distance;
use crate::systems::{global_utility, link_quality, Assignments, ContributionRecord};
use crate::SimulationState;

/// Directory for periodic snapshots
pub const SNAPSHOT_DIR: &str = "output/snapshots";
/// Path of the always-current state file
pub const CURRENT_STATE_PATH: &str = "output/current_state.json";

/// Resource to track snapshot generation
#[derive(Resource)]
pub struct SnapshotGenerator {
    next_snapshot_id: u64,
    snapshot_interval: u64,
    last_snapshot_step: u64,
}

impl SnapshotGenerator {
    pub fn new(snapshot_interval: u64) -> Self {
        Self {
            next_snapshot_id: 1,
            snapshot_interval,
            last_snapshot_step: 0,
        }
    }

    /// True when a full interval has elapsed since the last recorded
    /// snapshot. Step 0 never qualifies; the start-of-run snapshot is
    /// written unconditionally.
    pub fn should_snapshot(&self, current_step: u64) -> bool {
        self.snapshot_interval > 0
            && current_step > self.last_snapshot_step
            && current_step % self.snapshot_interval == 0
    }

    pub fn next_id(&mut self) -> String {
        let id = generate_snapshot_id(self.next_snapshot_id);
        self.next_snapshot_id += 1;
        id
    }

    pub fn mark_snapshot(&mut self, step: u64) {
        self.last_snapshot_step = step;
    }

    pub fn snapshot_count(&self) -> u64 {
        self.next_snapshot_id - 1
    }
}

/// Generate a complete simulation snapshot
pub fn generate_snapshot(world: &mut World, triggered_by: &str) -> StepSnapshot {
    let step = world.resource::<SimulationState>().current_step;
    let snapshot_id = {
        let mut generator = world.resource_mut::<SnapshotGenerator>();
        generator.next_id()
    };

    let uavs = world.resource::<UavPositions>();
    let users = world.resource::<UserPositions>();
    let assignments = world.resource::<Assignments>();
    let record = world.resource::<ContributionRecord>();
    let table = world.resource::<PreferenceTable>();
    let chosen = world.resource::<ChosenActions>();

    let mut snapshot = StepSnapshot::new(snapshot_id, step, triggered_by);
    snapshot.global_utility = global_utility(assignments);

    for (uav_idx, position) in uavs.positions.iter().enumerate() {
        snapshot.uavs.push(UavSnapshot {
            uav: uav_idx,
            position: [position.x, position.y],
            assigned_users: assignments.per_uav.get(uav_idx).cloned().unwrap_or_default(),
            contribution: record.values.get(uav_idx).copied().unwrap_or(0.0),
            dependent_users: record.dependents.get(uav_idx).cloned().unwrap_or_default(),
            preferences: table.rows.get(uav_idx).cloned().unwrap_or_default(),
            action_probabilities: chosen.probabilities.get(uav_idx).cloned().unwrap_or_default(),
            chosen_action: chosen.actions.get(uav_idx).copied(),
        });
    }

    for (user_idx, position) in users.positions.iter().enumerate() {
        let served_by = assignments.serving_uav(user_idx);
        let link = served_by.map(|uav_idx| {
            link_quality(distance(*position, uavs.positions[uav_idx]))
        });
        snapshot.users.push(UserSnapshot {
            user: user_idx,
            position: [position.x, position.y],
            served_by,
            link_quality: link,
        });
    }

    snapshot
}

fn to_json(snapshot: &StepSnapshot) -> io::Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Write a snapshot into the snapshot directory
pub fn write_snapshot_to_dir(snapshot: &StepSnapshot) -> io::Result<()> {
    let dir = Path::new(SNAPSHOT_DIR);
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", snapshot.snapshot_id));
    fs::write(path, to_json(snapshot)?)
}

/// Overwrite the always-current state file
pub fn write_current_state(snapshot: &StepSnapshot) -> io::Result<()> {
    if let Some(parent) = Path::new(CURRENT_STATE_PATH).parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(CURRENT_STATE_PATH, to_json(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ActionSet, ChosenActions, PreferenceTable};
    use crate::geometry::Point;
    use crate::systems::{assign_users, marginal_contributions};

    fn test_world() -> World {
        let uavs = vec![Point::new(10.0, 10.0), Point::new(80.0, 80.0)];
        let users = vec![Point::new(12.0, 10.0), Point::new(50.0, 50.0)];
        let radius = 15.0;
        let assignments = assign_users(&uavs, &users, radius);
        let record = marginal_contributions(&uavs, &assignments, radius, &users);

        let mut world = World::new();
        world.insert_resource(SimulationState {
            current_step: 3,
            max_steps: 10,
        });
        world.insert_resource(SnapshotGenerator::new(5));
        world.insert_resource(UavPositions::new(uavs));
        world.insert_resource(UserPositions::new(users));
        world.insert_resource(assignments);
        world.insert_resource(record);
        world.insert_resource(PreferenceTable::zeros(2, 5));
        world.insert_resource(ChosenActions::default());
        world.insert_resource(ActionSet::new(vec![[0.0, 0.0]]));
        world
    }

    #[test]
    fn test_snapshot_reflects_world_state() {
        let mut world = test_world();
        let snapshot = generate_snapshot(&mut world, "periodic");

        assert_eq!(snapshot.snapshot_id, "snap_000001");
        assert_eq!(snapshot.step, 3);
        assert_eq!(snapshot.global_utility, 1);
        assert_eq!(snapshot.uavs.len(), 2);
        assert_eq!(snapshot.users.len(), 2);

        // User 0 is served by UAV 0 at distance 2
        assert_eq!(snapshot.users[0].served_by, Some(0));
        let link = snapshot.users[0].link_quality.unwrap();
        assert!((link - 1.0 / 3.0).abs() < 1e-12);

        // User 1 is out of everyone's radius
        assert_eq!(snapshot.users[1].served_by, None);
        assert_eq!(snapshot.users[1].link_quality, None);

        // No draw has happened yet
        assert_eq!(snapshot.uavs[0].chosen_action, None);
        assert!(snapshot.uavs[0].action_probabilities.is_empty());
    }

    #[test]
    fn test_snapshot_ids_are_sequential() {
        let mut world = test_world();
        let first = generate_snapshot(&mut world, "a");
        let second = generate_snapshot(&mut world, "b");
        assert_eq!(first.snapshot_id, "snap_000001");
        assert_eq!(second.snapshot_id, "snap_000002");
        assert_eq!(world.resource::<SnapshotGenerator>().snapshot_count(), 2);
    }

    #[test]
    fn test_snapshot_interval_gating() {
        let mut generator = SnapshotGenerator::new(20);
        assert!(!generator.should_snapshot(0));
        assert!(!generator.should_snapshot(7));
        assert!(generator.should_snapshot(20));
        assert!(generator.should_snapshot(40));

        // Marking a step consumes it; later multiples still fire
        generator.mark_snapshot(20);
        assert!(!generator.should_snapshot(20));
        assert!(generator.should_snapshot(40));
    }
}
