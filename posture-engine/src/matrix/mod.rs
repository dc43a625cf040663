//! Assessment matrix — controls × systems for interactive assessment.

pub mod builder;
pub mod filters;
pub mod types;

pub use builder::build;
pub use filters::MatrixFilter;
pub use types::{AssessmentMatrix, MatrixCell, MatrixRow};
