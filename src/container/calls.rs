//! Reflection, construction and invocation on a [`Container`].
//!
//! Every operation follows the same path: inspect the target, resolve its
//! parameters from the bindings, then construct or invoke.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::Container;
use crate::autowire::ArgumentResolver;
use crate::descriptors::ParameterDescriptor;
use crate::error::DiResult;
use crate::inspector::{Member, Target, TypeInspector, CONSTRUCTOR};
use crate::invoke;
use crate::traits::Injectable;
use crate::value::Value;

/// Target name reported for standalone functions.
pub(crate) const FUNCTION_TARGET: &str = "fn";

impl Container {
    /// Ordered parameters of a constructor or method.
    ///
    /// `member` is [`CONSTRUCTOR`] or a method name. A type without a
    /// constructor reflects to an empty list.
    ///
    /// ```rust
    /// use ferrous_autowire::{Container, ParameterDescriptor, TypeDescriptor, Target};
    ///
    /// struct Mailer;
    ///
    /// let container = Container::new();
    /// container.register_descriptor(
    ///     TypeDescriptor::builder::<Mailer>()
    ///         .constructor(vec![ParameterDescriptor::untyped("smtp.host")], |_| Ok(Mailer))
    ///         .build(),
    /// );
    ///
    /// let params = container.reflect(Target::of::<Mailer>(), "constructor").unwrap();
    /// assert_eq!(params[0].name(), "smtp.host");
    /// assert!(container.reflect(Target::of::<Mailer>(), "send").is_err());
    /// ```
    pub fn reflect<'a>(&self, target: impl Into<Target<'a>>, member: &str) -> DiResult<Vec<ParameterDescriptor>> {
        let target = target.into();
        let descriptor = self.type_descriptor(target.type_name())?;
        TypeInspector::reflect(&descriptor, Member::parse(member))
    }

    /// Ordered parameters of a registered standalone function.
    pub fn reflect_function(&self, name: &str) -> DiResult<Vec<ParameterDescriptor>> {
        let function = self.function_descriptor(name)?;
        Ok(TypeInspector::reflect_function(&function))
    }

    /// Builds a new instance of the target's type with its constructor
    /// parameters filled from the bindings.
    ///
    /// The result is not bound; every call builds a fresh instance.
    pub fn make<'a>(&self, target: impl Into<Target<'a>>) -> DiResult<Value> {
        let target = target.into();
        let type_name = target.type_name();
        self.observe(type_name, CONSTRUCTOR, || {
            let descriptor = self.type_descriptor(type_name)?;
            let parameters = TypeInspector::reflect(&descriptor, Member::Constructor)?;
            let args = ArgumentResolver::new(self).resolve(&parameters)?;
            invoke::construct(&descriptor, args)
        })
    }

    /// Typed [`make`](Self::make). Registers `T` on first use.
    ///
    /// ```rust
    /// use ferrous_autowire::{Container, Injectable, ParameterDescriptor, TypeDescriptor};
    ///
    /// struct Greeter { name: String }
    ///
    /// impl Injectable for Greeter {
    ///     fn descriptor() -> TypeDescriptor {
    ///         TypeDescriptor::builder::<Greeter>()
    ///             .constructor(vec![ParameterDescriptor::untyped("name")], |mut args| {
    ///                 Ok(Greeter { name: args.take_cloned::<String>()? })
    ///             })
    ///             .build()
    ///     }
    /// }
    ///
    /// let container = Container::new();
    /// container.argument("name", "Ada".to_string()).unwrap();
    /// assert_eq!(container.make_type::<Greeter>().unwrap().name, "Ada");
    /// ```
    pub fn make_type<T: Injectable>(&self) -> DiResult<Arc<T>> {
        let type_name = std::any::type_name::<T>();
        if !self.is_registered(type_name) {
            self.register::<T>();
        }
        self.make(Target::Type(type_name))?.downcast::<T>()
    }

    /// Calls a method with its parameters filled from the bindings.
    ///
    /// A type target reaches static methods only; an instance target reaches
    /// both and serves as the receiver. The method's result is returned as is.
    pub fn call<'a>(&self, target: impl Into<Target<'a>>, member: &str) -> DiResult<Value> {
        let target = target.into();
        let type_name = target.type_name();
        self.observe(type_name, member, || {
            let descriptor = self.type_descriptor(type_name)?;
            let parameters = TypeInspector::reflect(&descriptor, Member::Method(member))?;
            invoke::require_receiver(&descriptor, member, target.instance())?;
            let args = ArgumentResolver::new(self).resolve(&parameters)?;
            invoke::invoke_method(&descriptor, member, target.instance(), args)
        })
    }

    /// Calls a registered standalone function with its parameters filled from
    /// the bindings.
    pub fn call_function(&self, name: &str) -> DiResult<Value> {
        self.observe(FUNCTION_TARGET, name, || {
            let function = self.function_descriptor(name)?;
            let parameters = TypeInspector::reflect_function(&function);
            let args = ArgumentResolver::new(self).resolve(&parameters)?;
            invoke::invoke_function(&function, args)
        })
    }

    fn observe<F>(&self, target: &str, member: &str, operation: F) -> DiResult<Value>
    where
        F: FnOnce() -> DiResult<Value>,
    {
        let observers = self.observers();
        if !observers.has_observers() {
            return operation().map_err(|err| {
                debug!(type_name = target, member, error = %err, "Resolution failed");
                err
            });
        }

        observers.resolving(target, member);
        let started = Instant::now();

        let result = operation();
        match &result {
            Ok(_) => observers.resolved(target, member, started.elapsed()),
            Err(err) => {
                debug!(type_name = target, member, error = %err, "Resolution failed");
                observers.failed(target, Some(member), err);
            }
        }
        result
    }
}
