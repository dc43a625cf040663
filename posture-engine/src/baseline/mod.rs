//! Baseline resolution — which controls apply to a product.

pub mod resolver;

pub use resolver::{resolve, ResolvedBaseline};
