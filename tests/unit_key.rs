/// Unit tests for TypeKey and identifier helpers

use ferrous_autowire::{key_of_trait, key_of_type, TypeKey, Value};
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;

trait Plugin: Send + Sync {}
struct Noop;
impl Plugin for Noop {}

#[test]
fn test_type_key_name_matches_identifier() {
    let key = TypeKey::of::<String>();
    assert_eq!(key.name(), key_of_type::<String>());
    assert_eq!(key.name(), "alloc::string::String");
    assert_eq!(key.type_id(), TypeId::of::<String>());
}

#[test]
fn test_trait_key_uses_stored_representation() {
    let key = TypeKey::of_trait::<dyn Plugin>();
    assert_eq!(key.name(), key_of_trait::<dyn Plugin>());
    assert_eq!(key.type_id(), TypeId::of::<Arc<dyn Plugin>>());
    assert_ne!(key, TypeKey::of::<Noop>());
}

#[test]
fn test_value_keys_match() {
    assert_eq!(Value::new(1u8).type_key(), TypeKey::of::<u8>());
    assert_eq!(
        Value::from_trait::<dyn Plugin>(Arc::new(Noop)).type_key(),
        TypeKey::of_trait::<dyn Plugin>()
    );
}

#[test]
fn test_type_key_hash_and_eq() {
    let mut set = HashSet::new();
    set.insert(TypeKey::of::<u32>());
    set.insert(TypeKey::of::<u32>());
    set.insert(TypeKey::of::<u64>());
    assert_eq!(set.len(), 2);
}
