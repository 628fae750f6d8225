//! Foundation types for hsdump.
//!
//! This crate provides the HSDS entity identifier codec and the domain model
//! shared by the store and engine crates.
//!
//! # Key Types
//!
//! - [`EntityId`] — 17-byte typed identifier (one type byte + 128-bit UUID)
//!   with its fixed 38-character text form
//! - [`EntityType`] — group, dataset, or committed type
//! - [`IdPrefix`] / [`IdSuffix`] / [`EntityUuid`] — fixed-width projections
//!   of an identifier, each with its own text codec
//! - [`Domain`] — an HSDS domain document (`.domain.json`)
//! - [`ObjectVersion`] — one historical revision of a stored object

pub mod domain;
pub mod entity;
pub mod error;
pub mod version;

pub use domain::{Acl, Domain, Permissions};
pub use entity::{EntityId, EntityType, EntityUuid, IdPrefix, IdSuffix};
pub use error::IdError;
pub use version::ObjectVersion;
