//! Type-erased values and bindable entities.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A type-erased, cheaply clonable value held by the container.
///
/// Values carry the [`TypeKey`] of what they hold, so the container can check
/// assignability at bind time and report useful names on failure.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::Value;
/// use std::sync::Arc;
///
/// let value = Value::new(8080u16);
/// assert!(value.is::<u16>());
/// assert_eq!(*value.downcast::<u16>().unwrap(), 8080);
/// assert!(value.downcast::<String>().is_err());
///
/// // Clones share the same instance
/// let again = value.clone();
/// assert!(value.ptr_eq(&again));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: AnyArc,
    key: TypeKey,
}

impl Value {
    /// Wraps a concrete value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without re-allocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            key: TypeKey::of::<T>(),
        }
    }

    /// Wraps a trait object.
    ///
    /// ```rust
    /// use ferrous_autowire::Value;
    /// use std::sync::Arc;
    ///
    /// trait Greeter: Send + Sync {
    ///     fn greet(&self) -> String;
    /// }
    ///
    /// struct English;
    /// impl Greeter for English {
    ///     fn greet(&self) -> String { "hello".to_string() }
    /// }
    ///
    /// let value = Value::from_trait::<dyn Greeter>(Arc::new(English));
    /// let greeter = value.downcast_trait::<dyn Greeter>().unwrap();
    /// assert_eq!(greeter.greet(), "hello");
    /// ```
    pub fn from_trait<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: Arc::new(value),
            key: TypeKey::of_trait::<T>(),
        }
    }

    /// Type key of the held value.
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Type name of the held value.
    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// True if the value holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.key.type_id() == TypeId::of::<T>()
    }

    /// Borrows the held value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).downcast_ref::<T>()
    }

    /// Returns the held value as `Arc<T>`.
    ///
    /// Fails with [`DiError::DifferentTypeExpected`] if the value is not a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.inner
            .clone()
            .downcast::<T>()
            .map_err(|_| self.mismatch(std::any::type_name::<T>()))
    }

    /// Returns the held trait object.
    pub fn downcast_trait<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.inner
            .clone()
            .downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| self.mismatch(std::any::type_name::<T>()))
    }

    /// True if both values share the same allocation.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mismatch(&self, expected: &str) -> DiError {
        DiError::DifferentTypeExpected {
            expected: expected.to_string(),
            found: self.key.name(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&self.key.name()).finish()
    }
}

/// Deferred producer evaluated once, at bind time.
pub type Factory = Box<dyn FnOnce(&Container) -> DiResult<Value>>;

/// Something that can be bound with [`Container::set`].
///
/// Either a ready-made instance or a factory that receives the container and
/// produces the instance. Factories run exactly once, when the entity is
/// bound, and their result is stored thereafter.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Container, Entity, Resolver, key_of_type};
///
/// struct Config { port: u16 }
/// struct Server { port: u16 }
///
/// let container = Container::new();
/// container
///     .set(key_of_type::<Config>(), Entity::instance(Config { port: 8080 }), None)
///     .unwrap()
///     .set(key_of_type::<Server>(), Entity::try_factory(|c: &Container| {
///         let config = c.get_type::<Config>()?;
///         Ok(Server { port: config.port })
///     }), Some("server"))
///     .unwrap();
///
/// let server = container.get_as::<Server>("server").unwrap();
/// assert_eq!(server.port, 8080);
/// ```
pub enum Entity {
    /// Ready-made value
    Instance(Value),
    /// Producer invoked with the container at bind time
    Factory(Factory),
}

impl Entity {
    /// Entity holding a concrete instance.
    pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
        Entity::Instance(Value::new(value))
    }

    /// Entity holding an already shared instance.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Entity::Instance(Value::from_arc(value))
    }

    /// Entity holding a trait object.
    pub fn trait_object<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Entity::Instance(Value::from_trait(value))
    }

    /// Entity produced by an infallible factory.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(&Container) -> T + 'static,
    {
        Entity::Factory(Box::new(move |c: &Container| Ok(Value::new(factory(c)))))
    }

    /// Entity produced by a fallible factory.
    pub fn try_factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: FnOnce(&Container) -> DiResult<T> + 'static,
    {
        Entity::Factory(Box::new(move |c: &Container| factory(c).map(Value::new)))
    }

    /// Entity produced by a factory returning a trait object.
    pub fn trait_factory<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: FnOnce(&Container) -> Arc<T> + 'static,
    {
        Entity::Factory(Box::new(move |c: &Container| Ok(Value::from_trait(factory(c)))))
    }

    /// True for deferred entities.
    pub fn is_factory(&self) -> bool {
        matches!(self, Entity::Factory(_))
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        Entity::Instance(value)
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Instance(value) => f.debug_tuple("Instance").field(value).finish(),
            Entity::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}
