//! Dependency graph export for visualization and debugging.
//!
//! Nodes are bindings, aliases, registered types and functions. Edges run
//! from an alias to its target and from a constructor, method or function to
//! whatever its parameter keys resolve to. Keys that resolve to nothing get a
//! `Missing` node so gaps are visible.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;

#[cfg(feature = "graph-export")]
use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::descriptors::ParameterDescriptor;
use crate::inspector::CONSTRUCTOR;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Binding,
    Alias,
    Type,
    Function,
    /// A parameter key nothing is bound to
    Missing,
}

impl NodeKind {
    fn prefix(self) -> &'static str {
        match self {
            NodeKind::Binding => "binding",
            NodeKind::Alias => "alias",
            NodeKind::Type => "type",
            NodeKind::Function => "fn",
            NodeKind::Missing => "missing",
        }
    }
}

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphNode {
    /// Unique identifier, `<kind>:<name>`
    pub id: String,
    /// Identifier, alias, type or function name
    pub name: String,
    pub kind: NodeKind,
    /// Type name of the bound value, for bindings
    pub type_name: Option<String>,
}

/// Kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub enum EdgeKind {
    /// Alias to its target identifier
    Alias,
    /// Member to the binding a parameter resolves to
    Parameter,
}

/// An edge in the dependency graph.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    /// Member and parameter for parameter edges, e.g. `constructor(host)`
    pub label: Option<String>,
}

/// Complete dependency graph export.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "graph-export", derive(Serialize, Deserialize))]
pub struct DependencyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Escapes text for a quoted DOT string.
fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn node_id(kind: NodeKind, name: &str) -> String {
    format!("{}:{}", kind.prefix(), name)
}

impl DependencyGraph {
    /// Node with the given id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Edges leaving `id`.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |edge| edge.from == id)
    }

    /// Names of all `Missing` nodes.
    pub fn missing(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Missing)
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Graphviz DOT rendering.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph dependencies {\n");
        dot.push_str("  rankdir=LR;\n");
        for node in &self.nodes {
            let shape = match node.kind {
                NodeKind::Binding => "box",
                NodeKind::Alias => "ellipse",
                NodeKind::Type => "component",
                NodeKind::Function => "cds",
                NodeKind::Missing => "octagon",
            };
            let _ = writeln!(
                dot,
                "  \"{}\" [label=\"{}\", shape={}];",
                escape_dot(&node.id),
                escape_dot(&node.name),
                shape
            );
        }
        for edge in &self.edges {
            match &edge.label {
                Some(label) => {
                    let _ = writeln!(
                        dot,
                        "  \"{}\" -> \"{}\" [label=\"{}\"];",
                        escape_dot(&edge.from),
                        escape_dot(&edge.to),
                        escape_dot(label)
                    );
                }
                None => {
                    let _ = writeln!(
                        dot,
                        "  \"{}\" -> \"{}\" [style=dashed];",
                        escape_dot(&edge.from),
                        escape_dot(&edge.to)
                    );
                }
            }
        }
        dot.push_str("}\n");
        dot
    }

    /// Pretty-printed JSON rendering.
    #[cfg(feature = "graph-export")]
    pub fn to_json(&self) -> crate::DiResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| crate::DiError::Config(err.to_string()))
    }
}

struct GraphBuilder<'c> {
    container: &'c Container,
    graph: DependencyGraph,
    aliases: HashMap<String, String>,
    missing: BTreeSet<String>,
}

impl<'c> GraphBuilder<'c> {
    fn new(container: &'c Container) -> Self {
        Self {
            container,
            graph: DependencyGraph::default(),
            aliases: container.aliases().into_iter().collect(),
            missing: BTreeSet::new(),
        }
    }

    fn node(&mut self, kind: NodeKind, name: &str, type_name: Option<&str>) -> String {
        let id = node_id(kind, name);
        self.graph.nodes.push(GraphNode {
            id: id.clone(),
            name: name.to_string(),
            kind,
            type_name: type_name.map(str::to_string),
        });
        id
    }

    /// Node a parameter key resolves to; aliases take precedence.
    fn key_node(&mut self, key: &str) -> String {
        if self.aliases.contains_key(key) {
            node_id(NodeKind::Alias, key)
        } else if self.container.is_bound(key) {
            node_id(NodeKind::Binding, key)
        } else {
            self.missing.insert(key.to_string());
            node_id(NodeKind::Missing, key)
        }
    }

    fn parameters(&mut self, from: &str, member: &str, parameters: &[ParameterDescriptor]) {
        for parameter in parameters {
            let to = self.key_node(parameter.key());
            self.graph.edges.push(GraphEdge {
                from: from.to_string(),
                to,
                kind: EdgeKind::Parameter,
                label: Some(format!("{}({})", member, parameter.name())),
            });
        }
    }

    fn build(mut self) -> DependencyGraph {
        for (id, type_name) in self.container.bindings() {
            self.node(NodeKind::Binding, &id, Some(type_name));
        }

        let mut aliases: Vec<(String, String)> = self.aliases.clone().into_iter().collect();
        aliases.sort();
        for (alias, target) in aliases {
            let from = self.node(NodeKind::Alias, &alias, None);
            let to = if self.container.is_bound(&target) {
                node_id(NodeKind::Binding, &target)
            } else {
                self.missing.insert(target.clone());
                node_id(NodeKind::Missing, &target)
            };
            self.graph.edges.push(GraphEdge {
                from,
                to,
                kind: EdgeKind::Alias,
                label: None,
            });
        }

        for descriptor in self.container.types() {
            let from = self.node(NodeKind::Type, descriptor.name(), None);
            if let Some(constructor) = descriptor.constructor() {
                self.parameters(&from, CONSTRUCTOR, constructor.parameters());
            }
            for method in descriptor.methods() {
                self.parameters(&from, method.name(), method.parameters());
            }
        }

        for function in self.container.functions() {
            let from = self.node(NodeKind::Function, function.name(), None);
            self.parameters(&from, function.name(), function.parameters());
        }

        let missing = std::mem::take(&mut self.missing);
        for key in missing {
            self.node(NodeKind::Missing, &key, None);
        }

        self.graph
    }
}

impl Container {
    /// Snapshot of bindings, aliases, types and functions as a graph.
    ///
    /// ```rust
    /// use ferrous_autowire::{Container, EdgeKind, FunctionDescriptor, ParameterDescriptor};
    ///
    /// let container = Container::new();
    /// container.argument("smtp.host", "localhost".to_string()).unwrap();
    /// container.add_alias("host", "smtp.host");
    /// container.register_function(FunctionDescriptor::new(
    ///     "notify",
    ///     vec![ParameterDescriptor::untyped("host"), ParameterDescriptor::untyped("channel")],
    ///     |_| Ok(()),
    /// ));
    ///
    /// let graph = container.dependency_graph();
    /// assert_eq!(graph.missing(), vec!["channel"]);
    /// let targets: Vec<&str> = graph.edges_from("fn:notify").map(|e| e.to.as_str()).collect();
    /// assert_eq!(targets, vec!["alias:host", "missing:channel"]);
    /// assert!(graph.edges.iter().any(|e| e.kind == EdgeKind::Alias && e.to == "binding:smtp.host"));
    /// ```
    pub fn dependency_graph(&self) -> DependencyGraph {
        GraphBuilder::new(self).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::TypeDescriptor;

    struct Mailer;

    #[test]
    fn test_type_edges_are_labelled_by_member() {
        let container = Container::new();
        container.argument("smtp.host", "localhost".to_string()).unwrap();
        container.register_descriptor(
            TypeDescriptor::builder::<Mailer>()
                .constructor(vec![ParameterDescriptor::untyped("smtp.host")], |_| Ok(Mailer))
                .build(),
        );

        let graph = container.dependency_graph();
        let type_id = node_id(NodeKind::Type, std::any::type_name::<Mailer>());
        let edge = graph.edges_from(&type_id).next().unwrap();
        assert_eq!(edge.to, "binding:smtp.host");
        assert_eq!(edge.label.as_deref(), Some("constructor(smtp.host)"));
        assert!(graph.missing().is_empty());
    }

    #[test]
    fn test_dot_output_mentions_every_node() {
        let container = Container::with_alias("container");
        let graph = container.dependency_graph();
        let dot = graph.to_dot();

        assert!(dot.starts_with("digraph dependencies {"));
        for node in &graph.nodes {
            assert!(dot.contains(&node.id));
        }
    }

    #[test]
    fn test_dot_escapes_quotes_and_backslashes() {
        let container = Container::with_options(crate::ContainerOptions {
            self_alias: None,
            bind_self: false,
        });
        container.argument("say \"hi\"", 1u8).unwrap();
        container.add_alias("C:\\path", "say \"hi\"");

        let dot = container.dependency_graph().to_dot();
        assert!(dot.contains(r#""binding:say \"hi\"" [label="say \"hi\"", shape=box];"#));
        assert!(dot.contains(r#""alias:C:\\path" -> "binding:say \"hi\"" [style=dashed];"#));
    }
}
