//! Shared schema types for the UAV coverage simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine writes them; offline analysis and plotting tools read them.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{EventType, StepEvent};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, StepSnapshot, UavSnapshot, UserSnapshot,
};
