//! Error types for the container.

use std::fmt;

/// Container errors
///
/// Every failure aborts the current operation and is reported to the caller.
/// None of them leave the registry half-written: guards run before mutation.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Container, DiError};
///
/// let container = Container::new();
/// match container.get("not_existing") {
///     Err(DiError::MissingEntity(id)) => assert_eq!(id, "not_existing"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_autowire::DiError;
///
/// let missing = DiError::MissingEntity("app::Database".to_string());
/// let taken = DiError::EntityAlreadyExists("app::Database".to_string());
/// let invalid = DiError::InvalidMethod {
///     target: "app::Mailer".to_string(),
///     member: "send".to_string(),
/// };
///
/// println!("Error: {}", missing);
/// println!("Error: {}", taken);
/// println!("Error: {}", invalid);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Identifier, alias or resolution key not present in the registry
    MissingEntity(String),
    /// Identifier already bound
    EntityAlreadyExists(String),
    /// Bound or resolved value is not of the expected type
    DifferentTypeExpected {
        /// Identifier or type name that was expected
        expected: String,
        /// Type name of the value actually found
        found: &'static str,
    },
    /// Member is not declared on the target
    InvalidMethod {
        /// Type name, or `fn` for free functions
        target: String,
        /// Requested member name
        member: String,
    },
    /// Type has no descriptor in the catalog
    UnknownType(String),
    /// Malformed configuration input
    Config(String),
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::MissingEntity(id) => write!(f, "'{}' is missing from the container", id),
            DiError::EntityAlreadyExists(id) => {
                write!(f, "Entity '{}' already exists in the container", id)
            }
            DiError::DifferentTypeExpected { expected, found } => {
                write!(f, "Expected a value of type '{}', found '{}'", expected, found)
            }
            DiError::InvalidMethod { target, member } => {
                write!(f, "'{}' has no callable member '{}'", target, member)
            }
            DiError::UnknownType(name) => write!(f, "Type '{}' is not registered", name),
            DiError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DiError {}

impl DiError {
    /// Returns the identifier or key the error is about, if any.
    ///
    /// ```rust
    /// use ferrous_autowire::DiError;
    ///
    /// let err = DiError::MissingEntity("timeout".to_string());
    /// assert_eq!(err.key(), Some("timeout"));
    /// assert_eq!(DiError::Config("bad".to_string()).key(), None);
    /// ```
    pub fn key(&self) -> Option<&str> {
        match self {
            DiError::MissingEntity(id) | DiError::EntityAlreadyExists(id) => Some(id),
            DiError::DifferentTypeExpected { expected, .. } => Some(expected),
            DiError::InvalidMethod { member, .. } => Some(member),
            DiError::UnknownType(name) => Some(name),
            DiError::Config(_) => None,
        }
    }
}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;
