//! Declarative container setup from JSON.
//!
//! A configuration names scalar arguments and aliases. Arguments are bound
//! without type verification, exactly like [`Container::argument`].

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{Container, ContainerOptions};
use crate::error::{DiError, DiResult};
use crate::value::Value;

/// A configuration value that can be various types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Array(Vec<ConfigValue>),
    Object(HashMap<String, ConfigValue>),
}

impl ConfigValue {
    /// The value as it is bound: scalars as `String`, `i64`, `f64` or
    /// `bool`, arrays and objects as the `ConfigValue` itself.
    pub fn into_value(self) -> Value {
        match self {
            ConfigValue::String(s) => Value::new(s),
            ConfigValue::Integer(i) => Value::new(i),
            ConfigValue::Float(f) => Value::new(f),
            ConfigValue::Boolean(b) => Value::new(b),
            other => Value::new(other),
        }
    }

    /// Try to convert to string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Serializable container setup.
///
/// ```rust
/// use ferrous_autowire::{Container, Resolver};
///
/// let container = Container::from_json_str(r#"{
///     "self_alias": "container",
///     "arguments": { "db.host": "localhost", "db.port": 5432, "debug": true },
///     "aliases": { "host": "db.host" }
/// }"#).unwrap();
///
/// assert_eq!(*container.get_as::<String>("host").unwrap(), "localhost");
/// assert_eq!(*container.get_as::<i64>("db.port").unwrap(), 5432);
/// assert!(*container.get_as::<bool>("debug").unwrap());
/// assert!(container.has("container"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub self_alias: Option<String>,
    pub bind_self: bool,
    /// Identifier to raw value, bound in key order
    pub arguments: BTreeMap<String, ConfigValue>,
    /// Alias to identifier
    pub aliases: BTreeMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            self_alias: None,
            bind_self: true,
            arguments: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }
}

impl ContainerConfig {
    /// Parses a JSON document.
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|err| DiError::Config(err.to_string()))
    }

    /// Options for the container this configuration describes.
    pub fn options(&self) -> ContainerOptions {
        ContainerOptions {
            self_alias: self.self_alias.clone(),
            bind_self: self.bind_self,
        }
    }
}

impl Container {
    /// New container set up from `config`.
    pub fn from_config(config: ContainerConfig) -> DiResult<Self> {
        let container = Container::with_options(config.options());
        container.apply_config(config)?;
        Ok(container)
    }

    /// New container set up from a JSON [`ContainerConfig`].
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        Self::from_config(ContainerConfig::from_json_str(json)?)
    }

    /// Binds the configuration's arguments, then records its aliases.
    ///
    /// Self options are ignored here; they only apply at creation. If any
    /// argument identifier is already taken nothing is applied.
    pub fn apply_config(&self, config: ContainerConfig) -> DiResult<&Self> {
        debug!(
            arguments = config.arguments.len(),
            aliases = config.aliases.len(),
            "Applying container configuration"
        );
        let arguments = config
            .arguments
            .into_iter()
            .map(|(id, value)| (id, value.into_value()))
            .collect();
        self.bind_all(arguments, config.aliases.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Resolver;

    #[test]
    fn test_nested_values_bind_as_config_values() {
        let container = Container::from_json_str(
            r#"{ "arguments": { "hosts": ["a", "b"], "limits": { "rps": 10 }, "ratio": 0.5 } }"#,
        )
        .unwrap();

        let hosts = container.get_as::<ConfigValue>("hosts").unwrap();
        assert_eq!(
            *hosts,
            ConfigValue::Array(vec![
                ConfigValue::String("a".to_string()),
                ConfigValue::String("b".to_string()),
            ])
        );
        let limits = container.get_as::<ConfigValue>("limits").unwrap();
        match &*limits {
            ConfigValue::Object(map) => assert_eq!(map.get("rps").and_then(ConfigValue::as_i64), Some(10)),
            other => panic!("expected object, got {:?}", other),
        }
        assert_eq!(*container.get_as::<f64>("ratio").unwrap(), 0.5);
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = Container::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, DiError::Config(_)));
    }

    #[test]
    fn test_bind_self_false_skips_self_binding() {
        let container = Container::from_json_str(r#"{ "bind_self": false }"#).unwrap();
        assert!(container.is_empty());
    }

    #[test]
    fn test_failed_apply_leaves_nothing_behind() {
        let container = Container::new();
        container.argument("b", 1i64).unwrap();
        let before = container.len();

        let config = ContainerConfig::from_json_str(
            r#"{ "arguments": { "a": 1, "b": 2 }, "aliases": { "first": "a" } }"#,
        )
        .unwrap();
        let err = container.apply_config(config).unwrap_err();

        assert_eq!(err, DiError::EntityAlreadyExists("b".to_string()));
        assert!(!container.has("a"));
        assert!(!container.has("first"));
        assert_eq!(container.len(), before);
        assert_eq!(*container.get_as::<i64>("b").unwrap(), 1);
    }

    #[test]
    fn test_duplicate_argument_against_existing_binding() {
        let container = Container::new();
        container.argument("port", 1i64).unwrap();

        let config = ContainerConfig::from_json_str(r#"{ "arguments": { "port": 2 } }"#).unwrap();
        let err = container.apply_config(config).unwrap_err();
        assert_eq!(err, DiError::EntityAlreadyExists("port".to_string()));
        assert_eq!(*container.get_as::<i64>("port").unwrap(), 1);
    }
}
