//! # ferrous-autowire
//!
//! Runtime dependency container keyed by string identifiers, with aliases,
//! factories evaluated once at bind time, and autowired construction and
//! invocation driven by explicit descriptor tables.
//!
//! ## Features
//!
//! - **String identifiers**: bind anything under any name, or under a type's own name
//! - **Aliases**: second names for bound identifiers, taking precedence on lookup
//! - **Factories**: producers run once with the container and stored thereafter
//! - **Type verification**: values bound under a known type's name must be of that type
//! - **Autowiring**: constructors, methods and functions get their parameters from the bindings
//! - **Thread-safe**: cheap `Clone` handles over shared state, no lock held across user code
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_autowire::{Container, Entity, Injectable, ParameterDescriptor, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for UserService {
//!     fn descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<UserService>()
//!             .constructor(vec![ParameterDescriptor::typed::<Database>("db")], |mut args| {
//!                 Ok(UserService { db: args.take::<Database>()? })
//!             })
//!             .build()
//!     }
//! }
//!
//! let container = Container::new();
//! container
//!     .set_type::<Database>(Entity::instance(Database { url: "postgres://localhost".to_string() }), Some("db"))
//!     .unwrap();
//!
//! let users = container.make_type::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&users.db, &container.get_as::<Database>("db").unwrap()));
//! ```
//!
//! ## Calling methods
//!
//! ```rust
//! use ferrous_autowire::{Container, ParameterDescriptor, Target, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Greeter;
//!
//! let container = Container::new();
//! container.argument("name", "Ada".to_string()).unwrap();
//! container.register_descriptor(
//!     TypeDescriptor::builder::<Greeter>()
//!         .default_constructor()
//!         .method("greet", vec![ParameterDescriptor::untyped("name")], |_: &Greeter, mut args| {
//!             Ok(format!("Hello, {}!", args.take::<String>()?))
//!         })
//!         .build(),
//! );
//!
//! let greeter = container.make(Target::of::<Greeter>()).unwrap();
//! let greeting = container.call(&greeter, "greet").unwrap();
//! assert_eq!(*greeting.downcast::<String>().unwrap(), "Hello, Ada!");
//! ```
//!
//! ## Cargo features
//!
//! - `parking-lot`, `ahash`, `smallvec`: faster locks, hashing and argument storage
//!   (`performance` enables all three)
//! - `config`: [`ContainerConfig`] and [`Container::from_json_str`]
//! - `graph-export`: JSON export of [`DependencyGraph`]
//! - `diagnostics`: [`Container::to_debug_string`]

pub mod arguments;
pub mod autowire;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod graph_export;
pub mod inspector;
pub mod key;
pub mod observer;
pub mod traits;
pub mod validation;
pub mod value;

#[cfg(feature = "config")]
pub mod config;

// Internal modules
mod catalog;
mod internal;
mod invoke;
mod materialize;
mod registration;

pub use arguments::Arguments;
pub use autowire::ArgumentResolver;
pub use container::{Container, ContainerOptions};
pub use descriptors::{
    ConstructorDescriptor, FunctionDescriptor, MethodDescriptor, ParameterDescriptor, Receiver,
    TypeBuilder, TypeDescriptor,
};
pub use error::{DiError, DiResult};
pub use graph_export::{DependencyGraph, EdgeKind, GraphEdge, GraphNode, NodeKind};
pub use inspector::{Member, Target, TypeInspector, CONSTRUCTOR};
pub use key::{key_of_trait, key_of_type, TypeKey};
pub use observer::{ContainerObserver, LoggingObserver, MetricsObserver};
pub use traits::{Injectable, Resolver, ResolverCore};
pub use validation::{ValidationError, ValidationReport, ValidationWarning};
pub use value::{Entity, Factory, Value};

#[cfg(feature = "config")]
pub use config::{ConfigValue, ContainerConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_factory_runs_once_at_bind_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let container = Container::new();
        container
            .set(
                "greeting",
                Entity::factory(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "hello".to_string()
                }),
                None,
            )
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let a = container.get_as::<String>("greeting").unwrap();
        let b = container.get_as::<String>("greeting").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_factory_not_run_for_taken_identifier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let container = Container::new();
        container.argument("port", 80u16).unwrap();
        let err = container
            .set(
                "port",
                Entity::factory(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    443u16
                }),
                None,
            )
            .unwrap_err();

        assert_eq!(err, DiError::EntityAlreadyExists("port".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(*container.get_as::<u16>("port").unwrap(), 80);
    }

    #[test]
    fn test_trait_binding() {
        trait Clock: Send + Sync {
            fn now(&self) -> u64;
        }

        struct Fixed;
        impl Clock for Fixed {
            fn now(&self) -> u64 {
                42
            }
        }

        let container = Container::new();
        container.set_trait::<dyn Clock>(Arc::new(Fixed), Some("clock")).unwrap();

        assert_eq!(container.get_trait::<dyn Clock>().unwrap().now(), 42);
        assert_eq!(container.get_trait_as::<dyn Clock>("clock").unwrap().now(), 42);
    }

    #[test]
    fn test_declared_type_rejects_other_values() {
        struct Database;

        let container = Container::new();
        container.declare_type::<Database>();
        let err = container
            .set(key_of_type::<Database>(), Entity::instance(1u8), None)
            .unwrap_err();

        assert_eq!(
            err,
            DiError::DifferentTypeExpected {
                expected: key_of_type::<Database>().to_string(),
                found: "u8",
            }
        );
        assert!(!container.has(key_of_type::<Database>()));
    }
}
