//! Simulation Data Resources
//!
//! Position state and the learned policy tables.

pub mod fleet;
pub mod policy;

pub use fleet::{UavPositions, UserPositions};
pub use policy::{ActionSet, ChosenActions, PreferenceTable};
