//! Event Types
//!
//! Per-step event records emitted by the simulation loop.

use serde::{Deserialize, Serialize};

/// Event type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A UAV committed its chosen displacement
    Moved,
    /// The chosen displacement would have left the grid and was rejected
    MoveBlocked,
}

/// A single event produced while applying chosen actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepEvent {
    /// Simulation step the event occurred in
    pub step: u64,
    pub event_type: EventType,
    /// Index of the UAV the event concerns
    pub uav: usize,
    /// Index into the action set that was drawn for this UAV
    pub action: usize,
    /// Position after the event was applied (unchanged for blocked moves)
    pub position: [f64; 2],
}

impl StepEvent {
    pub fn new(
        step: u64,
        event_type: EventType,
        uav: usize,
        action: usize,
        position: [f64; 2],
    ) -> Self {
        Self {
            step,
            event_type,
            uav,
            action,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&EventType::MoveBlocked).unwrap();
        assert_eq!(json, "\"move_blocked\"");

        let back: EventType = serde_json::from_str("\"moved\"").unwrap();
        assert_eq!(back, EventType::Moved);
    }

    #[test]
    fn test_step_event_round_trip() {
        let event = StepEvent::new(7, EventType::Moved, 2, 4, [10.0, 30.0]);
        let json = serde_json::to_string(&event).unwrap();
        let back: StepEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.step, 7);
        assert_eq!(back.uav, 2);
        assert_eq!(back.position, [10.0, 30.0]);
    }
}
