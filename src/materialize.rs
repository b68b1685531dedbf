//! Value materialization: run factories, then check the result's type.

use tracing::debug;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::key::TypeKey;
use crate::value::{Entity, Value};

/// Turns an [`Entity`] into the value that will be stored under `id`.
///
/// Factories are invoked here, once, with the container as their only
/// argument. No container lock is held while they run. `declared` overrides
/// the type `id` denotes in the catalog.
pub(crate) fn materialize(
    container: &Container,
    id: &str,
    entity: Entity,
    declared: Option<TypeKey>,
) -> DiResult<Value> {
    let value = match entity {
        Entity::Instance(value) => value,
        Entity::Factory(factory) => {
            debug!(id, "Invoking factory");
            factory(container)?
        }
    };
    verify(declared.or_else(|| container.declared_type(id)), id, &value)?;
    Ok(value)
}

/// Checks `value` against the type `id` denotes. Identifiers that denote no
/// known type accept anything.
pub(crate) fn verify(declared: Option<TypeKey>, id: &str, value: &Value) -> DiResult<()> {
    match declared {
        Some(expected) if expected != value.type_key() => Err(DiError::DifferentTypeExpected {
            expected: id.to_string(),
            found: value.type_name(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    trait Store: Send + Sync {}
    struct Memory;
    impl Store for Memory {}

    #[test]
    fn test_unknown_identifier_skips_verification() {
        assert!(verify(None, "anything", &Value::new(1u8)).is_ok());
    }

    #[test]
    fn test_matching_type_passes() {
        let key = TypeKey::of::<u8>();
        assert!(verify(Some(key), key.name(), &Value::new(1u8)).is_ok());
    }

    #[test]
    fn test_mismatch_names_identifier_and_found_type() {
        let err = verify(Some(TypeKey::of::<u16>()), "port", &Value::new(1u8)).unwrap_err();
        assert_eq!(
            err,
            DiError::DifferentTypeExpected {
                expected: "port".to_string(),
                found: "u8",
            }
        );
    }

    #[test]
    fn test_trait_objects_match_their_trait_key() {
        let value = Value::from_trait::<dyn Store>(Arc::new(Memory));
        let key = TypeKey::of_trait::<dyn Store>();
        assert!(verify(Some(key), key.name(), &value).is_ok());
        assert!(verify(Some(TypeKey::of::<Memory>()), "store", &value).is_err());
    }
}
