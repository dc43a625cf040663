//! Trait seams: cancellation, time, and the external data collaborators.

pub mod cancellation;
pub mod clock;
pub mod provider;

pub use cancellation::{Cancellable, CancellationToken};
pub use clock::{Clock, ManualClock, SystemClock};
pub use provider::{AssessmentStore, ComplianceProvider};
