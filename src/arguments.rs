//! Positional argument lists produced by autowiring.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::value::Value;

#[cfg(feature = "smallvec")]
type ArgVec = smallvec::SmallVec<[Value; 4]>;

#[cfg(not(feature = "smallvec"))]
type ArgVec = Vec<Value>;

/// Resolved arguments, in parameter declaration order.
///
/// Constructor and method closures consume them front to back with the
/// `take*` methods, one call per declared parameter.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Arguments, Value};
///
/// let mut args: Arguments = vec![Value::new(5u32), Value::new("users".to_string())]
///     .into_iter()
///     .collect();
///
/// assert_eq!(args.len(), 2);
/// assert_eq!(*args.take::<u32>().unwrap(), 5);
/// assert_eq!(args.take_cloned::<String>().unwrap(), "users");
/// assert!(args.take_value().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: ArgVec,
    cursor: usize,
}

impl Arguments {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            values: ArgVec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Total number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    /// Argument at `index`, regardless of what has been taken.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterates over all arguments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Takes the next argument as a type-erased value.
    pub fn take_value(&mut self) -> DiResult<Value> {
        let value = self
            .values
            .get(self.cursor)
            .cloned()
            .ok_or_else(|| DiError::MissingEntity(format!("argument #{}", self.cursor + 1)))?;
        self.cursor += 1;
        Ok(value)
    }

    /// Takes the next argument as `Arc<T>`.
    pub fn take<T: Any + Send + Sync>(&mut self) -> DiResult<Arc<T>> {
        self.take_value()?.downcast::<T>()
    }

    /// Takes the next argument and clones it out of its `Arc`.
    pub fn take_cloned<T: Any + Send + Sync + Clone>(&mut self) -> DiResult<T> {
        self.take::<T>().map(|value| (*value).clone())
    }

    /// Takes the next argument as a trait object.
    pub fn take_trait<T: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        self.take_value()?.downcast_trait::<T>()
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_past_end_names_position() {
        let mut args: Arguments = std::iter::once(Value::new(1u8)).collect();
        args.take::<u8>().unwrap();
        assert_eq!(
            args.take::<u8>().unwrap_err(),
            DiError::MissingEntity("argument #2".to_string())
        );
    }

    #[test]
    fn test_wrong_type_is_reported() {
        let mut args: Arguments = std::iter::once(Value::new(1u8)).collect();
        assert!(matches!(
            args.take::<String>(),
            Err(DiError::DifferentTypeExpected { found: "u8", .. })
        ));
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut args = Arguments::with_capacity(2);
        args.push(Value::new(1u8));
        args.push(Value::new(2u8));
        assert_eq!(args.remaining(), 2);
        args.take_value().unwrap();
        assert_eq!(args.remaining(), 1);
        assert_eq!(args.len(), 2);
        assert!(args.get(0).unwrap().is::<u8>());
    }
}
