//! SQLite persistence for the Posture compliance engine.
//!
//! One serialized write connection behind a mutex, a round-robin pool
//! of read-only connections, versioned STRICT-schema migrations, and
//! the [`SqliteProvider`] that implements the engine's data seams.

pub mod connection;
pub mod migrations;
pub mod provider;
pub mod queries;

pub use connection::DatabaseManager;
pub use provider::SqliteProvider;
