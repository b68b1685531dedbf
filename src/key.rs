//! Type keys and identifier helpers.

use std::any::TypeId;

/// Identity of a concrete type or trait object as seen by the container.
///
/// Pairs the `TypeId` of the stored representation with the human-readable
/// name that doubles as the conventional binding identifier.
///
/// Concrete types are stored as `Arc<T>`, so their key is `T` itself. Trait
/// objects are stored as `Arc<Arc<dyn Trait>>`, so their key carries the
/// `TypeId` of `Arc<dyn Trait>` and the name of `dyn Trait`.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{TypeKey, key_of_type};
///
/// struct Database;
///
/// let key = TypeKey::of::<Database>();
/// assert_eq!(key.name(), key_of_type::<Database>());
/// assert!(key.name().ends_with("Database"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for a concrete type.
    #[inline(always)]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key for a trait object such as `dyn Logger`.
    ///
    /// ```rust
    /// use ferrous_autowire::{TypeKey, key_of_trait};
    ///
    /// trait Logger: Send + Sync {}
    ///
    /// let key = TypeKey::of_trait::<dyn Logger>();
    /// assert_eq!(key.name(), key_of_trait::<dyn Logger>());
    /// assert!(key.name().starts_with("dyn "));
    /// ```
    #[inline(always)]
    pub fn of_trait<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<std::sync::Arc<T>>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// `TypeId` of the stored representation.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Names are diagnostics only; identity is the TypeId.
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Conventional identifier for a concrete type.
#[inline(always)]
pub fn key_of_type<T: 'static>() -> &'static str {
    std::any::type_name::<T>()
}

/// Conventional identifier for a trait object.
#[inline(always)]
pub fn key_of_trait<T: ?Sized + 'static>() -> &'static str {
    std::any::type_name::<T>()
}
