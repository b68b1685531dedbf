//! Container setup from JSON configuration.
#![cfg(feature = "config")]

use ferrous_autowire::{ConfigValue, Container, ContainerConfig, DiError, ParameterDescriptor, Resolver, TypeDescriptor, Target};

#[test]
fn test_configured_arguments_feed_constructors() {
    struct Pool {
        url: String,
        size: i64,
    }

    let container = Container::from_json_str(
        r#"{
            "self_alias": "container",
            "arguments": { "db.url": "postgres://cfg", "db.pool_size": 16 },
            "aliases": { "url": "db.url" }
        }"#,
    )
    .unwrap();
    container.register_descriptor(
        TypeDescriptor::builder::<Pool>()
            .constructor(
                vec![ParameterDescriptor::untyped("url"), ParameterDescriptor::untyped("db.pool_size")],
                |mut args| {
                    Ok(Pool {
                        url: args.take_cloned::<String>()?,
                        size: *args.take::<i64>()?,
                    })
                },
            )
            .build(),
    );

    let pool = container.make(Target::of::<Pool>()).unwrap().downcast::<Pool>().unwrap();
    assert_eq!(pool.url, "postgres://cfg");
    assert_eq!(pool.size, 16);
    assert!(container.get_as::<Container>("container").is_ok());
}

#[test]
fn test_config_round_trips_through_serde() {
    let mut config = ContainerConfig::default();
    config.arguments.insert("retries".to_string(), ConfigValue::Integer(3));
    config.aliases.insert("r".to_string(), "retries".to_string());

    let json = serde_json::to_string(&config).unwrap();
    let parsed = ContainerConfig::from_json_str(&json).unwrap();
    assert_eq!(parsed.arguments, config.arguments);

    let container = Container::from_config(parsed).unwrap();
    assert_eq!(*container.get_as::<i64>("r").unwrap(), 3);
}

#[test]
fn test_unknown_shape_is_rejected() {
    let err = ContainerConfig::from_json_str(r#"{ "arguments": ["not", "a", "map"] }"#).unwrap_err();
    assert!(matches!(err, DiError::Config(_)));
}
