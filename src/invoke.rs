//! Construction and invocation with already resolved arguments.

use crate::arguments::Arguments;
use crate::descriptors::{FunctionDescriptor, Receiver, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::inspector::CONSTRUCTOR;
use crate::value::Value;

fn invalid(target: &str, member: &str) -> DiError {
    DiError::InvalidMethod {
        target: target.to_string(),
        member: member.to_string(),
    }
}

/// Builds a new instance through the type's constructor.
///
/// Types without any constructor entry cannot be built.
pub(crate) fn construct(descriptor: &TypeDescriptor, args: Arguments) -> DiResult<Value> {
    match descriptor.constructor() {
        Some(constructor) => constructor.build(args),
        None => Err(invalid(descriptor.name(), CONSTRUCTOR)),
    }
}

/// Fails if `member` is an instance method and there is no receiver.
pub(crate) fn require_receiver(
    descriptor: &TypeDescriptor,
    member: &str,
    receiver: Option<&Value>,
) -> DiResult<()> {
    match descriptor.method(member) {
        Some(method) if method.receiver() == Receiver::Instance && receiver.is_none() => {
            Err(invalid(descriptor.name(), member))
        }
        Some(_) => Ok(()),
        None => Err(invalid(descriptor.name(), member)),
    }
}

/// Calls a method. Static methods ignore the receiver.
pub(crate) fn invoke_method(
    descriptor: &TypeDescriptor,
    member: &str,
    receiver: Option<&Value>,
    args: Arguments,
) -> DiResult<Value> {
    let method = descriptor
        .method(member)
        .ok_or_else(|| invalid(descriptor.name(), member))?;
    let receiver = match method.receiver() {
        Receiver::Static => None,
        Receiver::Instance => Some(receiver.ok_or_else(|| invalid(descriptor.name(), member))?),
    };
    method.invoke(receiver, args)
}

/// Calls a standalone function.
pub(crate) fn invoke_function(descriptor: &FunctionDescriptor, args: Arguments) -> DiResult<Value> {
    descriptor.call(args)
}
