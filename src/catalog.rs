//! Per-container table of type and function descriptors.

use std::sync::Arc;

use crate::descriptors::{FunctionDescriptor, TypeDescriptor};
use crate::internal::map::{new_map, Map};
use crate::key::TypeKey;

/// Descriptor storage plus the set of identifiers known to denote a type.
///
/// Descriptors are handed out as `Arc`s so callers can drop the catalog lock
/// before running any constructor or method.
pub(crate) struct TypeCatalog {
    types: Map<String, Arc<TypeDescriptor>>,
    functions: Map<String, Arc<FunctionDescriptor>>,
    declared: Map<String, TypeKey>,
}

impl TypeCatalog {
    pub(crate) fn new() -> Self {
        Self {
            types: new_map(),
            functions: new_map(),
            declared: new_map(),
        }
    }

    /// Adds or replaces the descriptor of a type. The type's name becomes a
    /// declared type identifier.
    pub(crate) fn insert_type(&mut self, descriptor: TypeDescriptor) {
        let key = descriptor.type_key();
        self.declare(key);
        self.types.insert(key.name().to_string(), Arc::new(descriptor));
    }

    pub(crate) fn insert_function(&mut self, descriptor: FunctionDescriptor) {
        self.functions
            .insert(descriptor.name().to_string(), Arc::new(descriptor));
    }

    /// Marks `key.name()` as an identifier denoting `key`'s type.
    pub(crate) fn declare(&mut self, key: TypeKey) {
        self.declared.insert(key.name().to_string(), key);
    }

    pub(crate) fn contains_type(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub(crate) fn type_descriptor(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }

    pub(crate) fn function(&self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        self.functions.get(name).cloned()
    }

    /// Type denoted by an identifier, if the identifier names a known type.
    pub(crate) fn declared_type(&self, id: &str) -> Option<TypeKey> {
        self.declared.get(id).copied()
    }

    /// All type descriptors, sorted by type name.
    pub(crate) fn types(&self) -> Vec<Arc<TypeDescriptor>> {
        let mut types: Vec<Arc<TypeDescriptor>> = self.types.values().cloned().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types
    }

    /// All function descriptors, sorted by name.
    pub(crate) fn functions(&self) -> Vec<Arc<FunctionDescriptor>> {
        let mut functions: Vec<Arc<FunctionDescriptor>> = self.functions.values().cloned().collect();
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::ParameterDescriptor;

    #[derive(Default)]
    struct Clock;

    #[test]
    fn test_registering_a_type_declares_it() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_type(TypeDescriptor::builder::<Clock>().default_constructor().build());

        let name = std::any::type_name::<Clock>();
        assert!(catalog.contains_type(name));
        assert_eq!(catalog.declared_type(name), Some(TypeKey::of::<Clock>()));
        assert!(catalog.declared_type("clock").is_none());
    }

    #[test]
    fn test_functions_sorted_by_name() {
        let mut catalog = TypeCatalog::new();
        for name in ["b", "a", "c"] {
            catalog.insert_function(FunctionDescriptor::new(
                name,
                vec![ParameterDescriptor::untyped("x")],
                |_| Ok(()),
            ));
        }
        let names: Vec<String> = catalog
            .functions()
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
