//! Hash map used by the registry and the type catalog.

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;

#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[inline]
pub(crate) fn new_map<K, V>() -> Map<K, V> {
    Map::default()
}
