//! Binding registry: identifiers to values, aliases to identifiers.

use std::sync::Weak;

use crate::container::{Container, ContainerInner};
use crate::error::{DiError, DiResult};
use crate::internal::map::{new_map, Map};
use crate::value::Value;

/// What a binding slot holds.
#[derive(Clone)]
pub(crate) enum Slot {
    Value(Value),
    /// The container's binding of itself. Held weakly so the container does
    /// not keep its own state alive.
    Container(Weak<ContainerInner>),
}

impl Slot {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Slot::Value(value) => value.type_name(),
            Slot::Container(_) => std::any::type_name::<Container>(),
        }
    }

    /// Turns the slot into a value the caller can own.
    pub(crate) fn into_value(self, id: &str) -> DiResult<Value> {
        match self {
            Slot::Value(value) => Ok(value),
            Slot::Container(weak) => weak
                .upgrade()
                .map(|inner| Value::new(Container::from_inner(inner)))
                .ok_or_else(|| DiError::MissingEntity(id.to_string())),
        }
    }
}

/// Registry holding all bindings and aliases of one container.
///
/// Both maps only grow. Aliases live in their own namespace and always point
/// at an identifier, never at another alias.
pub(crate) struct Registry {
    bindings: Map<String, Slot>,
    aliases: Map<String, String>,
    /// Identifiers in binding order, for stable diagnostics
    order: Vec<String>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            bindings: new_map(),
            aliases: new_map(),
            order: Vec::new(),
        }
    }

    /// True if `id` is a bound identifier or a known alias.
    #[inline]
    pub(crate) fn has(&self, id: &str) -> bool {
        self.bindings.contains_key(id) || self.aliases.contains_key(id)
    }

    /// Rejects identifiers that are already taken.
    pub(crate) fn guard(&self, id: &str) -> DiResult<()> {
        if self.has(id) {
            return Err(DiError::EntityAlreadyExists(id.to_string()));
        }
        Ok(())
    }

    /// Stores a slot under a fresh identifier.
    pub(crate) fn insert(&mut self, id: String, slot: Slot) -> DiResult<()> {
        self.guard(&id)?;
        self.order.push(id.clone());
        self.bindings.insert(id, slot);
        Ok(())
    }

    /// Stores every slot, or none of them if any identifier is taken.
    ///
    /// Identifiers repeated within `slots` count as taken.
    #[cfg_attr(not(feature = "config"), allow(dead_code))]
    pub(crate) fn insert_all(&mut self, slots: Vec<(String, Slot)>) -> DiResult<()> {
        for (i, (id, _)) in slots.iter().enumerate() {
            self.guard(id)?;
            if slots[..i].iter().any(|(earlier, _)| earlier == id) {
                return Err(DiError::EntityAlreadyExists(id.clone()));
            }
        }
        for (id, slot) in slots {
            self.order.push(id.clone());
            self.bindings.insert(id, slot);
        }
        Ok(())
    }

    /// Records `alias -> id`, replacing any previous target of `alias`.
    pub(crate) fn add_alias(&mut self, alias: String, id: String) -> Option<String> {
        self.aliases.insert(alias, id)
    }

    /// Looks up a slot. Aliases take precedence over a same-named binding.
    pub(crate) fn lookup(&self, id: &str) -> DiResult<&Slot> {
        if !self.has(id) {
            return Err(DiError::MissingEntity(id.to_string()));
        }

        match self.aliases.get(id) {
            Some(target) => self
                .bindings
                .get(target)
                .ok_or_else(|| DiError::MissingEntity(target.clone())),
            None => self
                .bindings
                .get(id)
                .ok_or_else(|| DiError::MissingEntity(id.to_string())),
        }
    }

    /// Target identifier of an alias.
    pub(crate) fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// True if `id` is bound directly (aliases not considered).
    pub(crate) fn is_bound(&self, id: &str) -> bool {
        self.bindings.contains_key(id)
    }

    /// Bound identifiers with their value type names, in binding order.
    pub(crate) fn bindings(&self) -> impl Iterator<Item = (&str, &'static str)> + '_ {
        self.order.iter().filter_map(move |id| {
            self.bindings
                .get(id)
                .map(|slot| (id.as_str(), slot.type_name()))
        })
    }

    /// All aliases, sorted by alias name.
    pub(crate) fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, id)| (alias.as_str(), id.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    pub(crate) fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
