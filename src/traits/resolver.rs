//! Resolver traits for looking up bound values.

use std::any::Any;
use std::sync::Arc;

use crate::error::DiResult;
use crate::value::Value;

/// Object-safe lookup of bound values.
///
/// Autowiring only needs this much from whatever backs it. Most callers use
/// the typed [`Resolver`] methods instead.
pub trait ResolverCore: Send + Sync {
    /// Returns the value bound to `id`, following one alias if `id` is one.
    fn resolve_value(&self, id: &str) -> DiResult<Value>;

    /// True if `id` is a bound identifier or an alias.
    fn has_entity(&self, id: &str) -> bool;
}

/// Typed lookups built on [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use ferrous_autowire::{Container, Entity, Resolver, key_of_type, key_of_trait};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str) -> String;
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) -> String { format!("LOG: {}", msg) }
/// }
///
/// let container = Container::new();
/// container.argument("retries", 3u8).unwrap();
/// container
///     .set(key_of_trait::<dyn Logger>(), Entity::trait_object::<dyn Logger>(Arc::new(ConsoleLogger)), Some("logger"))
///     .unwrap();
///
/// assert_eq!(*container.get_as::<u8>("retries").unwrap(), 3);
/// assert_eq!(container.get_trait::<dyn Logger>().unwrap().log("hi"), "LOG: hi");
/// assert!(container.get_as::<String>("retries").is_err());
/// ```
pub trait Resolver: ResolverCore {
    /// Value bound to `id`, downcast to `T`.
    fn get_as<T: Any + Send + Sync>(&self, id: &str) -> DiResult<Arc<T>> {
        self.resolve_value(id)?.downcast::<T>()
    }

    /// Value bound under `T`'s own type identifier.
    fn get_type<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.get_as::<T>(std::any::type_name::<T>())
    }

    /// Trait object bound under the trait's identifier.
    fn get_trait<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.get_trait_as::<T>(std::any::type_name::<T>())
    }

    /// Trait object bound to `id`.
    fn get_trait_as<T: ?Sized + Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        self.resolve_value(id)?.downcast_trait::<T>()
    }

    /// Like [`get_type`](Self::get_type) but panics on failure.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not bound under its type identifier.
    fn get_required<T: Any + Send + Sync>(&self) -> Arc<T> {
        match self.get_type::<T>() {
            Ok(value) => value,
            Err(err) => panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), err),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
