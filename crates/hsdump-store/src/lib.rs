//! Storage collaborators for hsdump.
//!
//! Two capability traits carry all I/O: [`DomainSource`] enumerates and
//! fetches a domain's contents, [`HierarchicalSink`] persists them locally.
//! Production code pairs [`S3DomainSource`] with [`FsSink`]; tests pair
//! [`MemorySource`] with [`MemorySink`] against the same contracts.

pub mod error;
pub mod fs;
pub mod memory;
mod path;
pub mod s3;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsSink;
pub use memory::{MemorySink, MemorySource};
pub use s3::S3DomainSource;
pub use traits::{DomainSource, HierarchicalSink, VersionHistory};
