//! Opt-in introspection for autowired types.

use std::any::Any;

use crate::descriptors::TypeDescriptor;

/// A type the container can construct and call into.
///
/// Rust has no runtime reflection, so each injectable type hands the
/// container a descriptor table listing its constructor and methods with
/// their ordered parameters.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Container, Injectable, TypeDescriptor, ParameterDescriptor, key_of_type, Entity};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// struct UserService {
///     db: Arc<Database>,
///     page_size: u32,
/// }
///
/// impl Injectable for UserService {
///     fn descriptor() -> TypeDescriptor {
///         TypeDescriptor::builder::<Self>()
///             .constructor(
///                 vec![
///                     ParameterDescriptor::typed::<Database>("db"),
///                     ParameterDescriptor::untyped("page_size"),
///                 ],
///                 |mut args| Ok(UserService { db: args.take()?, page_size: args.take_cloned()? }),
///             )
///             .build()
///     }
/// }
///
/// let container = Container::new();
/// container
///     .set(key_of_type::<Database>(), Entity::instance(Database { url: "postgres://localhost".to_string() }), None)
///     .unwrap()
///     .argument("page_size", 50u32)
///     .unwrap();
///
/// let service = container.make_type::<UserService>().unwrap();
/// assert_eq!(service.db.url, "postgres://localhost");
/// assert_eq!(service.page_size, 50);
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    /// Descriptor table for `Self`.
    fn descriptor() -> TypeDescriptor;
}
