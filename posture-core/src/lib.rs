//! Core types, traits, errors, config, and events for the Posture
//! compliance engine.
//!
//! Everything the engine and the storage collaborator share lives here:
//! the domain records (controls, baselines, assessments, the four-level
//! organizational tree), the per-subsystem error enums, the TOML
//! configuration layer, the synchronous event system, and the trait
//! seams that keep persistence and time injectable.

pub mod config;
pub mod errors;
pub mod events;
pub mod traits;
pub mod types;
