pub mod feature;
pub mod layer;

pub use crate::domain::DomainError;
pub use feature::Feature;
pub use layer::Layer;
