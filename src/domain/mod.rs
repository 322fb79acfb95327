//! Shared data model layer (structs/enums only).
//!
//! ## Purpose
//! - Keep policy, lifecycle and report types in one place.
//! - Avoid cyclic imports between services.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects and
//! no validation logic (that lives in `services::policy`).
//!
//! ## Compatibility note
//! Changes in the report structs affect `--json` outputs.
//! Keep schema-impacting changes synchronized with `docs/contracts/*`.

pub mod errors;
pub mod models;
