pub mod component;
pub mod estimator;
pub mod walker;

pub use component::ComplexityComponent;
pub use estimator::{ComplexityEstimate, ComplexityEstimator};
pub use walker::ComplexityComponentWalker;
