mod errors;
mod geometry;
mod reactor;
mod syringe;

pub use errors::DomainError;
pub use geometry::{resolve_dimension, Dimension, ResolvedDimension};
pub use reactor::{InletSource, Outlet, Reactor};
pub use syringe::Syringe;
