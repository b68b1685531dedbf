//! Validation, graph export and debug dumps.

use ferrous_autowire::{
    Container, EdgeKind, FunctionDescriptor, NodeKind, ParameterDescriptor, TypeDescriptor,
    ValidationError, ValidationWarning,
};

struct Mailer;

fn container() -> Container {
    let container = Container::with_alias("container");
    container.argument("smtp.host", "localhost".to_string()).unwrap();
    container.add_alias("host", "smtp.host");
    container.add_alias("queue", "jobs.queue");
    container.register_descriptor(
        TypeDescriptor::builder::<Mailer>()
            .constructor(
                vec![ParameterDescriptor::untyped("host"), ParameterDescriptor::untyped("smtp.port")],
                |_| Ok(Mailer),
            )
            .method("send", vec![ParameterDescriptor::untyped("to")], |_: &Mailer, _| Ok(()))
            .build(),
    );
    container.register_function(FunctionDescriptor::new(
        "flush",
        vec![ParameterDescriptor::untyped("queue")],
        |_| Ok(()),
    ));
    container
}

#[test]
fn test_validate_reports_exactly_unresolvable_keys() {
    let report = container().validate();

    let keys: Vec<(String, String)> = report
        .errors
        .iter()
        .map(|ValidationError::MissingDependency { member, key, .. }| (member.clone(), key.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("constructor".to_string(), "smtp.port".to_string()),
            ("send".to_string(), "to".to_string()),
        ]
    );
    // "queue" is an alias, so `has` satisfies it even though its target is unbound
    assert_eq!(
        report.warnings,
        vec![ValidationWarning::DanglingAlias {
            alias: "queue".to_string(),
            target: "jobs.queue".to_string(),
        }]
    );
}

#[test]
fn test_dependency_graph_shape() {
    let graph = container().dependency_graph();

    let mailer = format!("type:{}", std::any::type_name::<Mailer>());
    assert_eq!(graph.node(&mailer).map(|n| n.kind), Some(NodeKind::Type));

    let targets: Vec<&str> = graph.edges_from(&mailer).map(|e| e.to.as_str()).collect();
    assert_eq!(targets, vec!["alias:host", "missing:smtp.port", "missing:to"]);

    let alias_edges: Vec<(&str, &str)> = graph
        .edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Alias)
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert!(alias_edges.contains(&("alias:host", "binding:smtp.host")));
    assert!(alias_edges.contains(&("alias:queue", "missing:jobs.queue")));

    let mut missing = graph.missing();
    missing.sort_unstable();
    assert_eq!(missing, vec!["jobs.queue", "smtp.port", "to"]);
}

#[cfg(feature = "graph-export")]
#[test]
fn test_graph_json_export() {
    let json = container().dependency_graph().to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert!(parsed["nodes"].as_array().unwrap().len() >= 5);
    assert!(parsed["edges"].as_array().unwrap().iter().any(|e| e["kind"] == "Alias"));
}

#[cfg(feature = "diagnostics")]
#[test]
fn test_debug_string_lists_everything() {
    let dump = container().to_debug_string();

    assert!(dump.contains("smtp.host => alloc::string::String"));
    assert!(dump.contains("host -> smtp.host"));
    assert!(dump.contains("constructor(host, smtp.port)"));
    assert!(dump.contains("send(to)"));
    assert!(dump.contains("flush(queue)"));
}
