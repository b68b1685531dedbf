//! Static checks over a container's bindings and type catalog.
//!
//! Validation never constructs or calls anything. It reports parameter keys
//! that autowiring would fail on right now, plus aliases pointing nowhere.

use std::fmt;

use crate::autowire::ArgumentResolver;
use crate::container::Container;
use crate::descriptors::ParameterDescriptor;
use crate::inspector::CONSTRUCTOR;

/// A problem that makes some construction or call fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A parameter's key is neither bound nor an alias
    MissingDependency {
        /// Type or `"fn"`
        target: String,
        /// Constructor, method or function name
        member: String,
        parameter: String,
        key: String,
    },
}

/// A suspicious but not necessarily failing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Alias whose target identifier is not bound
    DanglingAlias { alias: String, target: String },
}

/// Result of [`Container::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Errors in catalog order: types by name, constructor first, then functions
    pub errors: Vec<ValidationError>,
    /// Warnings sorted by alias
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// True if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Formats errors and warnings for display.
    pub fn format_issues(&self) -> String {
        let mut output = String::new();

        if !self.errors.is_empty() {
            output.push_str("Validation Errors:\n");
            for error in &self.errors {
                output.push_str(&format!("  - {}\n", error));
            }
        }

        if !self.warnings.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str("Validation Warnings:\n");
            for warning in &self.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingDependency {
                target,
                member,
                parameter,
                key,
            } => write!(
                f,
                "'{}::{}' parameter '{}' needs '{}', which is not bound",
                target, member, parameter, key
            ),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DanglingAlias { alias, target } => {
                write!(f, "Alias '{}' points to unbound '{}'", alias, target)
            }
        }
    }
}

impl Container {
    /// Checks every registered constructor, method and function for
    /// parameters the current bindings cannot satisfy.
    ///
    /// ```rust
    /// use ferrous_autowire::{Container, FunctionDescriptor, ParameterDescriptor, ValidationError};
    ///
    /// let container = Container::new();
    /// container.register_function(FunctionDescriptor::new(
    ///     "notify",
    ///     vec![ParameterDescriptor::untyped("channel")],
    ///     |_| Ok(()),
    /// ));
    ///
    /// let report = container.validate();
    /// assert!(!report.is_valid());
    /// assert!(matches!(&report.errors[0], ValidationError::MissingDependency { key, .. } if key == "channel"));
    ///
    /// container.argument("channel", "#ops".to_string()).unwrap();
    /// assert!(container.validate().is_valid());
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let resolver = ArgumentResolver::new(self);
        let mut report = ValidationReport::default();

        let mut check = |target: &str, member: &str, parameters: &[ParameterDescriptor]| {
            for parameter in resolver.unresolved(parameters) {
                report.errors.push(ValidationError::MissingDependency {
                    target: target.to_string(),
                    member: member.to_string(),
                    parameter: parameter.name().to_string(),
                    key: parameter.key().to_string(),
                });
            }
        };

        for descriptor in self.types() {
            if let Some(constructor) = descriptor.constructor() {
                check(descriptor.name(), CONSTRUCTOR, constructor.parameters());
            }
            for method in descriptor.methods() {
                check(descriptor.name(), method.name(), method.parameters());
            }
        }
        for function in self.functions() {
            check("fn", function.name(), function.parameters());
        }

        for (alias, target) in self.aliases() {
            if !self.is_bound(&target) {
                report
                    .warnings
                    .push(ValidationWarning::DanglingAlias { alias, target });
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::TypeDescriptor;

    struct Mailer;

    #[test]
    fn test_reports_each_missing_key_once_per_member() {
        let container = Container::new();
        container.argument("smtp.host", "localhost".to_string()).unwrap();
        container.register_descriptor(
            TypeDescriptor::builder::<Mailer>()
                .constructor(
                    vec![
                        ParameterDescriptor::untyped("smtp.host"),
                        ParameterDescriptor::untyped("smtp.port"),
                    ],
                    |_| Ok(Mailer),
                )
                .method("send", vec![ParameterDescriptor::untyped("to")], |_: &Mailer, _| Ok(()))
                .build(),
        );

        let report = container.validate();
        let keys: Vec<&str> = report
            .errors
            .iter()
            .map(|ValidationError::MissingDependency { key, .. }| key.as_str())
            .collect();
        assert_eq!(keys, vec!["smtp.port", "to"]);
        assert!(report.format_issues().contains("smtp.port"));
    }

    #[test]
    fn test_dangling_alias_is_a_warning() {
        let container = Container::new();
        container.add_alias("db", "app::Database");

        let report = container.validate();
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![ValidationWarning::DanglingAlias {
                alias: "db".to_string(),
                target: "app::Database".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_alias_is_not_dangling() {
        let container = Container::with_alias("container");
        assert!(!container.validate().has_warnings());
    }
}
