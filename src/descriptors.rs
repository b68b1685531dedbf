//! Descriptor tables standing in for runtime reflection.
//!
//! A [`TypeDescriptor`] lists what the container needs to know about an
//! injectable type: its constructor and methods, each with the ordered
//! [`ParameterDescriptor`]s used for autowiring and a type-erased closure that
//! performs the actual construction or call. Standalone functions get a
//! [`FunctionDescriptor`] of the same shape.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::arguments::Arguments;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;
use crate::value::Value;

pub(crate) type BuildFn = Arc<dyn Fn(Arguments) -> DiResult<Value> + Send + Sync>;
pub(crate) type InvokeFn = Arc<dyn Fn(Option<&Value>, Arguments) -> DiResult<Value> + Send + Sync>;

/// One formal parameter of a constructor, method or function.
///
/// The resolution key is the type hint when present, otherwise the
/// parameter's own name. Typed parameters are satisfied by the binding stored
/// under the type's identifier; untyped ones by a binding (usually an
/// [`argument`](crate::Container::argument)) named like the parameter.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{ParameterDescriptor, key_of_type};
///
/// struct Database;
///
/// let db = ParameterDescriptor::typed::<Database>("db");
/// assert_eq!(db.name(), "db");
/// assert_eq!(db.key(), key_of_type::<Database>());
///
/// let timeout = ParameterDescriptor::untyped("timeout");
/// assert_eq!(timeout.type_hint(), None);
/// assert_eq!(timeout.key(), "timeout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterDescriptor {
    name: String,
    type_hint: Option<String>,
}

impl ParameterDescriptor {
    /// Parameter declared with a concrete type.
    pub fn typed<T: 'static>(name: impl Into<String>) -> Self {
        Self::with_hint(name, std::any::type_name::<T>())
    }

    /// Parameter declared with a trait object type such as `dyn Logger`.
    pub fn trait_object<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::with_hint(name, std::any::type_name::<T>())
    }

    /// Parameter with an explicit type hint.
    pub fn with_hint(name: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: Some(type_hint.into()),
        }
    }

    /// Parameter without a resolvable type; resolved by name.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
        }
    }

    /// Declared parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type, if any.
    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    /// Registry key this parameter resolves through.
    pub fn key(&self) -> &str {
        self.type_hint.as_deref().unwrap_or(&self.name)
    }
}

/// Whether a method needs a receiver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// Needs a live instance of the owning type
    Instance,
    /// Callable on the type itself
    Static,
}

/// A constructor entry of a [`TypeDescriptor`].
pub struct ConstructorDescriptor {
    parameters: Vec<ParameterDescriptor>,
    build: BuildFn,
    implicit: bool,
}

impl ConstructorDescriptor {
    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// True for the zero-argument constructor derived from `Default`.
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub(crate) fn build(&self, args: Arguments) -> DiResult<Value> {
        (self.build)(args)
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("parameters", &self.parameters)
            .field("implicit", &self.implicit)
            .finish()
    }
}

/// A method entry of a [`TypeDescriptor`].
pub struct MethodDescriptor {
    name: String,
    receiver: Receiver,
    parameters: Vec<ParameterDescriptor>,
    invoke: InvokeFn,
}

impl MethodDescriptor {
    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Receiver requirement.
    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// True for methods callable without an instance.
    pub fn is_static(&self) -> bool {
        self.receiver == Receiver::Static
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn invoke(&self, receiver: Option<&Value>, args: Arguments) -> DiResult<Value> {
        (self.invoke)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("receiver", &self.receiver)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// Everything the container knows about an injectable type.
///
/// Built with [`TypeDescriptor::builder`], usually inside an
/// [`Injectable`](crate::Injectable) implementation.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{TypeDescriptor, ParameterDescriptor, Receiver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db: Arc<Database>, table: String }
///
/// impl Repository {
///     fn count(&self, limit: u32) -> u32 { limit }
/// }
///
/// let descriptor = TypeDescriptor::builder::<Repository>()
///     .constructor(
///         vec![
///             ParameterDescriptor::typed::<Database>("db"),
///             ParameterDescriptor::untyped("table"),
///         ],
///         |mut args| Ok(Repository { db: args.take()?, table: args.take_cloned()? }),
///     )
///     .method("count", vec![ParameterDescriptor::untyped("limit")], |this: &Repository, mut args| {
///         Ok(this.count(args.take_cloned()?))
///     })
///     .static_method("table_prefix", vec![], |_args| Ok("app_".to_string()))
///     .build();
///
/// assert_eq!(descriptor.constructor().unwrap().parameters().len(), 2);
/// assert_eq!(descriptor.method("count").unwrap().receiver(), Receiver::Instance);
/// assert!(descriptor.method("table_prefix").unwrap().is_static());
/// assert!(descriptor.method("missing").is_none());
/// ```
pub struct TypeDescriptor {
    key: TypeKey,
    constructor: Option<ConstructorDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Starts a descriptor for `T`.
    pub fn builder<T: Any + Send + Sync>() -> TypeBuilder<T> {
        TypeBuilder {
            constructor: None,
            methods: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Key of the described type.
    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Name of the described type.
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Constructor entry, if one is declared or derived.
    pub fn constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructor.as_ref()
    }

    /// All method entries, in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Looks up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.key.name())
            .field("constructor", &self.constructor)
            .field("methods", &self.methods)
            .finish()
    }
}

/// Builder for [`TypeDescriptor`].
pub struct TypeBuilder<T> {
    constructor: Option<ConstructorDescriptor>,
    methods: Vec<MethodDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeBuilder<T> {
    /// Declares the constructor.
    ///
    /// The closure receives the resolved arguments in the order of `parameters`.
    pub fn constructor<F>(mut self, parameters: Vec<ParameterDescriptor>, build: F) -> Self
    where
        F: Fn(Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        self.constructor = Some(ConstructorDescriptor {
            parameters,
            build: Arc::new(move |args| build(args).map(Value::new)),
            implicit: false,
        });
        self
    }

    /// Uses `T::default()` as a zero-argument constructor.
    ///
    /// Reflecting the constructor of such a type yields no parameters, the
    /// same as a type that declares none.
    pub fn default_constructor(mut self) -> Self
    where
        T: Default,
    {
        self.constructor = Some(ConstructorDescriptor {
            parameters: Vec::new(),
            build: Arc::new(|_: Arguments| -> DiResult<Value> { Ok(Value::new(T::default())) }),
            implicit: true,
        });
        self
    }

    /// Declares a method taking `&T`. Redeclaring a name replaces it.
    pub fn method<R, F>(self, name: impl Into<String>, parameters: Vec<ParameterDescriptor>, call: F) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(&T, Arguments) -> DiResult<R> + Send + Sync + 'static,
    {
        let name = name.into();
        let member = name.clone();
        let invoke: InvokeFn = Arc::new(move |receiver: Option<&Value>, args: Arguments| {
            let receiver = receiver.ok_or_else(|| DiError::InvalidMethod {
                target: std::any::type_name::<T>().to_string(),
                member: member.clone(),
            })?;
            let this = receiver
                .downcast_ref::<T>()
                .ok_or_else(|| DiError::DifferentTypeExpected {
                    expected: std::any::type_name::<T>().to_string(),
                    found: receiver.type_name(),
                })?;
            call(this, args).map(Value::new)
        });
        self.push_method(name, Receiver::Instance, parameters, invoke)
    }

    /// Declares a method callable without an instance.
    pub fn static_method<R, F>(self, name: impl Into<String>, parameters: Vec<ParameterDescriptor>, call: F) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(Arguments) -> DiResult<R> + Send + Sync + 'static,
    {
        let invoke: InvokeFn = Arc::new(move |_: Option<&Value>, args: Arguments| call(args).map(Value::new));
        self.push_method(name.into(), Receiver::Static, parameters, invoke)
    }

    fn push_method(
        mut self,
        name: String,
        receiver: Receiver,
        parameters: Vec<ParameterDescriptor>,
        invoke: InvokeFn,
    ) -> Self {
        self.methods.retain(|m| m.name != name);
        self.methods.push(MethodDescriptor {
            name,
            receiver,
            parameters,
            invoke,
        });
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> TypeDescriptor {
        TypeDescriptor {
            key: TypeKey::of::<T>(),
            constructor: self.constructor,
            methods: self.methods,
        }
    }
}

/// A standalone function the container can call with autowired arguments.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Container, FunctionDescriptor, ParameterDescriptor};
///
/// let container = Container::new();
/// container.argument("name", "world".to_string()).unwrap();
/// container.register_function(FunctionDescriptor::new(
///     "greet",
///     vec![ParameterDescriptor::untyped("name")],
///     |mut args| Ok(format!("hello {}", args.take::<String>()?)),
/// ));
///
/// let greeting = container.call_function("greet").unwrap();
/// assert_eq!(*greeting.downcast::<String>().unwrap(), "hello world");
/// ```
pub struct FunctionDescriptor {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    call: BuildFn,
}

impl FunctionDescriptor {
    /// Describes a function named `name`.
    pub fn new<R, F>(name: impl Into<String>, parameters: Vec<ParameterDescriptor>, call: F) -> Self
    where
        R: Any + Send + Sync,
        F: Fn(Arguments) -> DiResult<R> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters,
            call: Arc::new(move |args| call(args).map(Value::new)),
        }
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub(crate) fn call(&self, args: Arguments) -> DiResult<Value> {
        (self.call)(args)
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}
