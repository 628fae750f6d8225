//! Replication engine for hsdump.
//!
//! Walks a domain's object-version history and reconstructs a consistent
//! hierarchical snapshot: either the most recent state or, given a cutoff
//! timestamp, the newest state no later than that instant.

pub mod config;
pub mod engine;
pub mod error;
pub mod resolve;

pub use config::ReplicaConfig;
pub use engine::{DomainListing, ObjectListing, ReplicaSummary, Replicator};
pub use error::{EngineError, EngineResult};
pub use resolve::select_version;
