//! Debounced autosave.

pub mod queue;

pub use queue::AutosaveQueue;
