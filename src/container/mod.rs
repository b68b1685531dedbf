//! The container: bindings, aliases and the type catalog behind one handle.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::catalog::TypeCatalog;
use crate::descriptors::{FunctionDescriptor, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::RwLock;
use crate::key::TypeKey;
use crate::materialize::materialize;
use crate::observer::{ContainerObserver, Observers};
use crate::registration::{Registry, Slot};
use crate::traits::{Injectable, ResolverCore};
use crate::value::{Entity, Value};

mod calls;

/// Construction options for a [`Container`].
#[derive(Debug, Clone)]
pub struct ContainerOptions {
    /// Extra alias for the container's self-binding
    pub self_alias: Option<String>,
    /// Bind the container under its own type identifier
    pub bind_self: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            self_alias: None,
            bind_self: true,
        }
    }
}

impl ContainerOptions {
    /// Default options with a self alias.
    pub fn with_alias(alias: impl Into<String>) -> Self {
        Self {
            self_alias: Some(alias.into()),
            ..Self::default()
        }
    }
}

pub(crate) struct ContainerInner {
    registry: RwLock<Registry>,
    catalog: RwLock<TypeCatalog>,
    observers: RwLock<Observers>,
    options: ContainerOptions,
}

/// Runtime dependency container keyed by string identifiers.
///
/// A container binds values (or factories evaluated once, at bind time) to
/// identifiers, keeps aliases to those identifiers, and uses a catalog of
/// type descriptors to construct objects and call methods with their
/// parameters filled from the bindings.
///
/// Handles are cheap to clone and share the same state. All operations take
/// `&self`; internal locks are never held while user code runs, so factories,
/// constructors and methods may use the container re-entrantly.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Container, Entity, Resolver, key_of_type};
///
/// struct Database { url: String }
///
/// let container = Container::with_alias("app");
/// container
///     .argument("db.url", "postgres://localhost".to_string()).unwrap()
///     .set("db", Entity::try_factory(|c: &Container| {
///         let url = c.get_as::<String>("db.url")?;
///         Ok(Database { url: url.to_string() })
///     }), Some("database")).unwrap();
///
/// assert!(container.has("database"));
/// assert_eq!(container.get_as::<Database>("database").unwrap().url, "postgres://localhost");
///
/// // The container resolves itself
/// let this = container.get_as::<Container>("app").unwrap();
/// assert!(this.has("db"));
/// assert!(container.has(key_of_type::<Container>()));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    /// Empty container bound under its own type identifier.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    /// Like [`new`](Self::new), with an extra alias for the self-binding.
    pub fn with_alias(alias: impl Into<String>) -> Self {
        Self::with_options(ContainerOptions::with_alias(alias))
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        let container = Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::new()),
                catalog: RwLock::new(TypeCatalog::new()),
                observers: RwLock::new(Observers::new()),
                options,
            }),
        };
        container.bind_self();
        container
    }

    pub(crate) fn from_inner(inner: Arc<ContainerInner>) -> Self {
        Self { inner }
    }

    /// Options this container was created with.
    pub fn options(&self) -> &ContainerOptions {
        &self.inner.options
    }

    fn bind_self(&self) {
        if !self.inner.options.bind_self {
            return;
        }

        let key = TypeKey::of::<Container>();
        self.inner.catalog.write().declare(key);

        let mut registry = self.inner.registry.write();
        let inserted = registry.insert(
            key.name().to_string(),
            Slot::Container(Arc::downgrade(&self.inner)),
        );
        // The registry is fresh at this point
        debug_assert!(inserted.is_ok());
        if let Some(alias) = &self.inner.options.self_alias {
            registry.add_alias(alias.clone(), key.name().to_string());
        }
    }

    // ===== Bindings =====

    /// Binds `entity` to `id`, optionally recording `alias -> id`.
    ///
    /// Factories run here, exactly once, with this container as argument. If
    /// `id` denotes a known type the produced value must be of that type.
    /// Nothing is stored when any check fails, and a factory is not run at
    /// all when `id` is already taken.
    ///
    /// ```rust
    /// use ferrous_autowire::{Container, DiError, Entity};
    ///
    /// let container = Container::new();
    /// container.set("port", Entity::instance(8080u16), Some("p")).unwrap();
    ///
    /// let err = container.set("port", Entity::instance(9090u16), None).unwrap_err();
    /// assert_eq!(err, DiError::EntityAlreadyExists("port".to_string()));
    /// ```
    pub fn set(&self, id: impl Into<String>, entity: impl Into<Entity>, alias: Option<&str>) -> DiResult<&Self> {
        self.set_declared(id.into(), entity.into(), alias, None)
    }

    fn set_declared(&self, id: String, entity: Entity, alias: Option<&str>, declared: Option<TypeKey>) -> DiResult<&Self> {
        let observers = self.observers();
        observers.binding(&id);
        let started = Instant::now();

        match self.bind_entity(&id, entity, alias, declared) {
            Ok(()) => {
                observers.bound(&id, started.elapsed());
                Ok(self)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "Binding rejected");
                observers.failed(&id, None, &err);
                Err(err)
            }
        }
    }

    /// Same as [`set`](Self::set).
    pub fn bind(&self, id: impl Into<String>, entity: impl Into<Entity>, alias: Option<&str>) -> DiResult<&Self> {
        self.set(id, entity, alias)
    }

    /// Binds under `T`'s type identifier. The value is verified against `T`,
    /// and `T` is declared once the binding succeeds.
    pub fn set_type<T: Any + Send + Sync>(&self, entity: impl Into<Entity>, alias: Option<&str>) -> DiResult<&Self> {
        let key = TypeKey::of::<T>();
        self.set_declared(key.name().to_string(), entity.into(), alias, Some(key))?;
        Ok(self.declare_type::<T>())
    }

    /// Binds a trait object under the trait's identifier.
    pub fn set_trait<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>, alias: Option<&str>) -> DiResult<&Self> {
        let key = TypeKey::of_trait::<T>();
        self.set_declared(key.name().to_string(), Entity::trait_object(value), alias, Some(key))?;
        Ok(self.declare_trait::<T>())
    }

    /// Binds a raw value without any type verification.
    pub fn argument<T: Any + Send + Sync>(&self, id: impl Into<String>, value: T) -> DiResult<&Self> {
        self.argument_value(id, Value::new(value))
    }

    /// Binds an already erased value without any type verification.
    pub fn argument_value(&self, id: impl Into<String>, value: Value) -> DiResult<&Self> {
        let id = id.into();
        let observers = self.observers();
        observers.binding(&id);
        let started = Instant::now();

        let result = self.inner.registry.write().insert(id.clone(), Slot::Value(value));
        match result {
            Ok(()) => {
                debug!(id = %id, "Bound argument");
                observers.bound(&id, started.elapsed());
                Ok(self)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "Binding rejected");
                observers.failed(&id, None, &err);
                Err(err)
            }
        }
    }

    /// Binds every argument and then records every alias, under one registry
    /// lock. Nothing is bound when any identifier is already taken.
    #[cfg(feature = "config")]
    pub(crate) fn bind_all(&self, arguments: Vec<(String, Value)>, aliases: Vec<(String, String)>) -> DiResult<&Self> {
        let observers = self.observers();
        for (id, _) in &arguments {
            observers.binding(id);
        }
        let started = Instant::now();
        let ids: Vec<String> = arguments.iter().map(|(id, _)| id.clone()).collect();
        let slots = arguments
            .into_iter()
            .map(|(id, value)| (id, Slot::Value(value)))
            .collect();

        let mut registry = self.inner.registry.write();
        if let Err(err) = registry.insert_all(slots) {
            drop(registry);
            debug!(error = %err, "Batch binding rejected");
            for id in &ids {
                observers.failed(id, None, &err);
            }
            return Err(err);
        }
        for (alias, id) in aliases {
            registry.add_alias(alias, id);
        }
        drop(registry);

        for id in &ids {
            observers.bound(id, started.elapsed());
        }
        Ok(self)
    }

    /// Records `alias -> id`. Re-aliasing replaces the previous target, and
    /// `id` does not need to be bound yet.
    pub fn add_alias(&self, alias: impl Into<String>, id: impl Into<String>) -> &Self {
        let alias = alias.into();
        let id = id.into();
        debug!(alias = %alias, id = %id, "Adding alias");
        if let Some(previous) = self.inner.registry.write().add_alias(alias.clone(), id) {
            debug!(alias = %alias, previous = %previous, "Alias retargeted");
        }
        self
    }

    /// True if `id` is bound or is an alias.
    pub fn has(&self, id: &str) -> bool {
        self.inner.registry.read().has(id)
    }

    /// Value bound to `id`. Aliases are followed first.
    pub fn get(&self, id: &str) -> DiResult<Value> {
        let slot = self.inner.registry.read().lookup(id)?.clone();
        slot.into_value(id)
    }

    /// Same as [`get`](Self::get).
    pub fn resolve(&self, id: &str) -> DiResult<Value> {
        self.get(id)
    }

    fn bind_entity(&self, id: &str, entity: Entity, alias: Option<&str>, declared: Option<TypeKey>) -> DiResult<()> {
        self.inner.registry.read().guard(id)?;

        let value = materialize(self, id, entity, declared)?;

        // A re-entrant factory may have taken the id meanwhile; insert re-checks
        let mut registry = self.inner.registry.write();
        registry.insert(id.to_string(), Slot::Value(value))?;
        if let Some(alias) = alias {
            registry.add_alias(alias.to_string(), id.to_string());
        }
        drop(registry);

        debug!(id, alias, "Bound entity");
        Ok(())
    }

    // ===== Type catalog =====

    /// Registers `T`'s descriptor table.
    pub fn register<T: Injectable>(&self) -> &Self {
        self.register_descriptor(T::descriptor())
    }

    /// Registers a descriptor table, replacing any previous one for the type.
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) -> &Self {
        debug!(type_name = descriptor.name(), "Registering type");
        self.inner.catalog.write().insert_type(descriptor);
        self
    }

    /// Registers a standalone function for [`call_function`](Self::call_function).
    pub fn register_function(&self, descriptor: FunctionDescriptor) -> &Self {
        debug!(function = descriptor.name(), "Registering function");
        self.inner.catalog.write().insert_function(descriptor);
        self
    }

    /// Makes `T`'s type identifier denote `T`, so values bound under it are
    /// verified.
    pub fn declare_type<T: Any>(&self) -> &Self {
        self.inner.catalog.write().declare(TypeKey::of::<T>());
        self
    }

    /// Makes a trait's identifier denote the trait object type.
    pub fn declare_trait<T: ?Sized + 'static>(&self) -> &Self {
        self.inner.catalog.write().declare(TypeKey::of_trait::<T>());
        self
    }

    /// True if a descriptor table is registered for `type_name`.
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.inner.catalog.read().contains_type(type_name)
    }

    pub(crate) fn declared_type(&self, id: &str) -> Option<TypeKey> {
        self.inner.catalog.read().declared_type(id)
    }

    pub(crate) fn type_descriptor(&self, name: &str) -> DiResult<Arc<TypeDescriptor>> {
        self.inner
            .catalog
            .read()
            .type_descriptor(name)
            .ok_or_else(|| DiError::UnknownType(name.to_string()))
    }

    pub(crate) fn function_descriptor(&self, name: &str) -> DiResult<Arc<FunctionDescriptor>> {
        self.inner
            .catalog
            .read()
            .function(name)
            .ok_or_else(|| DiError::InvalidMethod {
                target: calls::FUNCTION_TARGET.to_string(),
                member: name.to_string(),
            })
    }

    pub(crate) fn types(&self) -> Vec<Arc<TypeDescriptor>> {
        self.inner.catalog.read().types()
    }

    pub(crate) fn functions(&self) -> Vec<Arc<FunctionDescriptor>> {
        self.inner.catalog.read().functions()
    }

    // ===== Observation =====

    /// Adds an observer notified of bindings, constructions and calls.
    pub fn add_observer(&self, observer: Arc<dyn ContainerObserver>) -> &Self {
        let mut observers = self.inner.observers.write();
        *observers = observers.with(observer);
        self
    }

    pub(crate) fn observers(&self) -> Observers {
        self.inner.observers.read().clone()
    }

    // ===== Introspection =====

    /// Number of bound identifiers, the self-binding included.
    pub fn len(&self) -> usize {
        self.inner.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound identifiers in binding order.
    pub fn identifiers(&self) -> Vec<String> {
        self.inner
            .registry
            .read()
            .bindings()
            .map(|(id, _)| id.to_string())
            .collect()
    }

    /// Bound identifiers with the type names of their values, in binding order.
    pub fn bindings(&self) -> Vec<(String, &'static str)> {
        self.inner
            .registry
            .read()
            .bindings()
            .map(|(id, type_name)| (id.to_string(), type_name))
            .collect()
    }

    /// `(alias, id)` pairs sorted by alias.
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.inner
            .registry
            .read()
            .aliases()
            .into_iter()
            .map(|(alias, id)| (alias.to_string(), id.to_string()))
            .collect()
    }

    /// Target identifier of `alias`, if it is one.
    pub fn alias_target(&self, alias: &str) -> Option<String> {
        self.inner.registry.read().alias_target(alias).map(str::to_string)
    }

    /// True if `id` is bound directly, aliases not considered.
    pub fn is_bound(&self, id: &str) -> bool {
        self.inner.registry.read().is_bound(id)
    }

    /// Human-readable dump of bindings, aliases and the type catalog.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        let _ = writeln!(out, "Container");
        let _ = writeln!(out, "  Bindings:");
        for (id, type_name) in self.bindings() {
            let _ = writeln!(out, "    {} => {}", id, type_name);
        }
        let _ = writeln!(out, "  Aliases:");
        for (alias, id) in self.aliases() {
            let _ = writeln!(out, "    {} -> {}", alias, id);
        }
        let _ = writeln!(out, "  Types:");
        for descriptor in self.types() {
            let constructor = match descriptor.constructor() {
                Some(ctor) => format!("constructor({})", parameter_list(ctor.parameters())),
                None => "no constructor".to_string(),
            };
            let _ = writeln!(out, "    {} [{}]", descriptor.name(), constructor);
            for method in descriptor.methods() {
                let kind = if method.is_static() { "static " } else { "" };
                let _ = writeln!(
                    out,
                    "      {}{}({})",
                    kind,
                    method.name(),
                    parameter_list(method.parameters())
                );
            }
        }
        let _ = writeln!(out, "  Functions:");
        for function in self.functions() {
            let _ = writeln!(out, "    {}({})", function.name(), parameter_list(function.parameters()));
        }
        out
    }
}

#[cfg(feature = "diagnostics")]
fn parameter_list(parameters: &[crate::descriptors::ParameterDescriptor]) -> String {
    parameters
        .iter()
        .map(|p| match p.type_hint() {
            Some(hint) => format!("{}: {}", p.name(), hint),
            None => p.name().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.registry.read();
        f.debug_struct("Container")
            .field("bindings", &registry.len())
            .field("aliases", &registry.alias_count())
            .finish()
    }
}

impl ResolverCore for Container {
    fn resolve_value(&self, id: &str) -> DiResult<Value> {
        self.get(id)
    }

    fn has_entity(&self, id: &str) -> bool {
        self.has(id)
    }
}
