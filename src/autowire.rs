//! Autowiring: parameter descriptors to positional arguments.

use tracing::trace;

use crate::arguments::Arguments;
use crate::descriptors::ParameterDescriptor;
use crate::error::{DiError, DiResult};
use crate::traits::ResolverCore;

/// Maps parameter descriptors to registry values.
///
/// Each descriptor resolves through its key (type hint, else name), in
/// declaration order. Resolution is eager and stops at the first key that
/// cannot be satisfied; there are no partial results and no defaults.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{ArgumentResolver, Container, DiError, ParameterDescriptor};
///
/// let container = Container::new();
/// container.argument("host", "localhost".to_string()).unwrap();
/// container.argument("port", 5432u16).unwrap();
///
/// let resolver = ArgumentResolver::new(&container);
/// let mut args = resolver
///     .resolve(&[ParameterDescriptor::untyped("host"), ParameterDescriptor::untyped("port")])
///     .unwrap();
/// assert_eq!(*args.take::<String>().unwrap(), "localhost");
/// assert_eq!(*args.take::<u16>().unwrap(), 5432);
///
/// let err = resolver
///     .resolve(&[ParameterDescriptor::untyped("host"), ParameterDescriptor::untyped("user")])
///     .unwrap_err();
/// assert_eq!(err, DiError::MissingEntity("user".to_string()));
/// ```
pub struct ArgumentResolver<'a, R: ?Sized> {
    source: &'a R,
}

impl<'a, R: ResolverCore + ?Sized> ArgumentResolver<'a, R> {
    /// Resolver reading from `source`.
    pub fn new(source: &'a R) -> Self {
        Self { source }
    }

    /// Resolves every parameter, in order.
    pub fn resolve(&self, parameters: &[ParameterDescriptor]) -> DiResult<Arguments> {
        let mut args = Arguments::with_capacity(parameters.len());
        for parameter in parameters {
            let key = parameter.key();
            trace!(parameter = parameter.name(), key, "Resolving argument");
            let value = self.source.resolve_value(key).map_err(|err| match err {
                // Report the parameter's key, not an alias target behind it
                DiError::MissingEntity(_) => DiError::MissingEntity(key.to_string()),
                other => other,
            })?;
            args.push(value);
        }
        Ok(args)
    }

    /// Parameters whose keys the source cannot satisfy, without resolving
    /// anything.
    pub fn unresolved<'p>(&self, parameters: &'p [ParameterDescriptor]) -> Vec<&'p ParameterDescriptor> {
        parameters
            .iter()
            .filter(|parameter| !self.source.has_entity(parameter.key()))
            .collect()
    }
}
