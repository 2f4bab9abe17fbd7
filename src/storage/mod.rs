//! On-disk persistence
//!
//! Only flat JSON snapshots of the fetched reviews are kept.

pub mod snapshot;

pub use snapshot::SnapshotStore;
