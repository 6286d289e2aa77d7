//! Output Generation
//!
//! Snapshot assembly and JSON writing for offline analysis and plotting.

pub mod snapshot;

pub use snapshot::{
    generate_snapshot, write_current_state, write_snapshot_to_dir, SnapshotGenerator,
};
