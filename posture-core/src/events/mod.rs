//! Synchronous event system for mutation and rollup lifecycle.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::PostureEventHandler;
pub use types::{
    AssessmentDeletedEvent, AssessmentSavedEvent, BaselineChangedEvent, RollupCompletedEvent,
    RollupSupersededEvent, SystemChangedEvent, ViewsInvalidatedEvent, WriteFailedEvent,
};
