//! Type inspection: from a target and member name to ordered parameters.

use crate::descriptors::{FunctionDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::value::Value;

/// Member name that selects a type's constructor.
pub const CONSTRUCTOR: &str = "constructor";

/// Target of a reflection, construction or call.
///
/// A type name dispatches statically; a live instance is normalized to its
/// runtime type and, for calls, also serves as the receiver.
///
/// ```rust
/// use ferrous_autowire::{Target, Value, key_of_type};
///
/// struct Mailer;
///
/// let by_type = Target::of::<Mailer>();
/// assert_eq!(by_type.type_name(), key_of_type::<Mailer>());
///
/// let instance = Value::new(Mailer);
/// let by_instance = Target::from(&instance);
/// assert_eq!(by_instance.type_name(), key_of_type::<Mailer>());
/// assert!(by_instance.instance().is_some());
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A type, by name
    Type(&'a str),
    /// A live instance
    Instance(&'a Value),
}

impl<'a> Target<'a> {
    /// Target naming `T`.
    pub fn of<T: 'static>() -> Target<'static> {
        Target::Type(std::any::type_name::<T>())
    }

    /// Name of the targeted type.
    pub fn type_name(&self) -> &'a str {
        match *self {
            Target::Type(name) => name,
            Target::Instance(value) => value.type_name(),
        }
    }

    /// Receiver instance, if any.
    pub fn instance(&self) -> Option<&'a Value> {
        match *self {
            Target::Type(_) => None,
            Target::Instance(value) => Some(value),
        }
    }
}

impl<'a> From<&'a str> for Target<'a> {
    fn from(name: &'a str) -> Self {
        Target::Type(name)
    }
}

impl<'a> From<&'a String> for Target<'a> {
    fn from(name: &'a String) -> Self {
        Target::Type(name.as_str())
    }
}

impl<'a> From<&'a Value> for Target<'a> {
    fn from(value: &'a Value) -> Self {
        Target::Instance(value)
    }
}

/// Member selector for reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member<'a> {
    /// The type's constructor
    Constructor,
    /// A named method
    Method(&'a str),
}

impl<'a> Member<'a> {
    /// Maps [`CONSTRUCTOR`] to `Constructor`, anything else to `Method`.
    pub fn parse(name: &'a str) -> Self {
        if name == CONSTRUCTOR {
            Member::Constructor
        } else {
            Member::Method(name)
        }
    }

    /// Member name as used in error messages.
    pub fn name(&self) -> &'a str {
        match *self {
            Member::Constructor => CONSTRUCTOR,
            Member::Method(name) => name,
        }
    }
}

impl<'a> From<&'a str> for Member<'a> {
    fn from(name: &'a str) -> Self {
        Member::parse(name)
    }
}

/// Derives ordered parameter descriptors from descriptor tables.
pub struct TypeInspector;

impl TypeInspector {
    /// Parameters of a constructor or method of the described type.
    ///
    /// A type without a constructor reflects to an empty list. An undeclared
    /// method fails with [`DiError::InvalidMethod`].
    ///
    /// ```rust
    /// use ferrous_autowire::{TypeDescriptor, TypeInspector, Member, ParameterDescriptor, DiError};
    ///
    /// struct Job;
    ///
    /// let descriptor = TypeDescriptor::builder::<Job>()
    ///     .static_method("run", vec![ParameterDescriptor::untyped("retries")], |_| Ok(()))
    ///     .build();
    ///
    /// assert!(TypeInspector::reflect(&descriptor, Member::Constructor).unwrap().is_empty());
    /// assert_eq!(TypeInspector::reflect(&descriptor, Member::Method("run")).unwrap()[0].key(), "retries");
    /// assert!(matches!(
    ///     TypeInspector::reflect(&descriptor, Member::Method("stop")),
    ///     Err(DiError::InvalidMethod { .. })
    /// ));
    /// ```
    pub fn reflect(descriptor: &TypeDescriptor, member: Member<'_>) -> DiResult<Vec<ParameterDescriptor>> {
        match member {
            Member::Constructor => Ok(descriptor
                .constructor()
                .map(|ctor| ctor.parameters().to_vec())
                .unwrap_or_default()),
            Member::Method(name) => descriptor
                .method(name)
                .map(|method| method.parameters().to_vec())
                .ok_or_else(|| DiError::InvalidMethod {
                    target: descriptor.name().to_string(),
                    member: name.to_string(),
                }),
        }
    }

    /// Parameters of a standalone function.
    pub fn reflect_function(descriptor: &FunctionDescriptor) -> Vec<ParameterDescriptor> {
        descriptor.parameters().to_vec()
    }
}
