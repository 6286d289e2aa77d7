//! Snapshot Types
//!
//! Serialization structs for simulation state output.
//!
//! Snapshots capture the complete decision state at a point in time:
//! positions, the user assignment, the credit signal, and the learned
//! policy. Used for analysis, visualization, and debugging.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// State of one UAV at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UavSnapshot {
    pub uav: usize,
    pub position: [f64; 2],
    /// Users currently assigned to this UAV
    #[serde(default)]
    pub assigned_users: Vec<usize>,
    /// Leave-one-out marginal contribution
    pub contribution: f64,
    /// Users that would lose coverage if this UAV were removed
    #[serde(default)]
    pub dependent_users: Vec<usize>,
    /// Learned preference score per action
    pub preferences: Vec<f64>,
    /// Softmax probability per action, if the policy ran this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_probabilities: Vec<f64>,
    /// Action index drawn this step, if any
    #[serde(default)]
    pub chosen_action: Option<usize>,
}

/// State of one ground user at snapshot time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub user: usize,
    pub position: [f64; 2],
    /// UAV serving this user, if any
    #[serde(default)]
    pub served_by: Option<usize>,
    /// Distance-derived signal quality proxy toward the serving UAV
    #[serde(default)]
    pub link_quality: Option<f64>,
}

/// Complete simulation snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSnapshot {
    pub snapshot_id: String,
    pub step: u64,
    /// What caused this snapshot (simulation_start, periodic, simulation_end)
    pub triggered_by: String,
    /// Count of distinct users served by the whole team
    pub global_utility: usize,
    pub uavs: Vec<UavSnapshot>,
    pub users: Vec<UserSnapshot>,
}

impl StepSnapshot {
    pub fn new(snapshot_id: impl Into<String>, step: u64, triggered_by: impl Into<String>) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            step,
            triggered_by: triggered_by.into(),
            global_utility: 0,
            uavs: Vec::new(),
            users: Vec::new(),
        }
    }
}
