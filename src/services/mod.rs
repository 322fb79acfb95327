//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `policy.rs`: policy construction and validation (annotation + JSON).
//! - `lifecycle.rs`: lifecycle state from a policy and a date.
//! - `render.rs`: banners, listing tags, severity painting.
//! - `compose.rs`: the deprecation wrapper around command handlers.
//! - `metadata.rs`: remote metadata ingestion and merge onto the tree.
//! - `storage.rs`: settings and metadata cache persistence.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - `policy`, `lifecycle` and `render` are pure; no clock, no I/O.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod compose;
pub mod lifecycle;
pub mod metadata;
pub mod output;
pub mod policy;
pub mod render;
pub mod storage;
