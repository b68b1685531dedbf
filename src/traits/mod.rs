//! Core traits for the container.

mod injectable;
mod resolver;

pub use injectable::Injectable;
pub use resolver::{Resolver, ResolverCore};
