//! Diagnostic observers for container traceability.
//!
//! Observers receive hooks for bindings, constructions and calls. They are
//! invoked synchronously and without any container lock held, so an observer
//! may itself read from the container.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::DiError;

/// Observer trait for container events.
///
/// `target` is a type name (or `"fn"` for standalone functions) and `member`
/// the constructor or method involved. Binding hooks have default no-op
/// implementations.
///
/// # Examples
///
/// ```
/// use ferrous_autowire::{Container, ContainerObserver, DiError, Entity};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counting {
///     bound: AtomicUsize,
/// }
///
/// impl ContainerObserver for Counting {
///     fn bound(&self, _id: &str, _duration: Duration) {
///         self.bound.fetch_add(1, Ordering::Relaxed);
///     }
///     fn resolving(&self, _target: &str, _member: &str) {}
///     fn resolved(&self, _target: &str, _member: &str, _duration: Duration) {}
///     fn failed(&self, _target: &str, _member: Option<&str>, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(Counting::default());
/// let container = Container::new();
/// container.add_observer(observer.clone());
/// container.set("answer", Entity::instance(42u32), None).unwrap();
/// assert_eq!(observer.bound.load(Ordering::Relaxed), 1);
/// ```
pub trait ContainerObserver: Send + Sync {
    /// Called before an entity is materialized under `id`.
    fn binding(&self, id: &str) {
        let _ = id;
    }

    /// Called once `id` is bound.
    fn bound(&self, id: &str, duration: Duration) {
        let _ = (id, duration);
    }

    /// Called before a construction or call starts.
    fn resolving(&self, target: &str, member: &str);

    /// Called when a construction or call returned successfully.
    fn resolved(&self, target: &str, member: &str, duration: Duration);

    /// Called when a binding, construction or call failed. `member` is
    /// `None` for bindings.
    fn failed(&self, target: &str, member: Option<&str>, error: &DiError);
}

/// Registered observers.
///
/// Cloning is cheap; the container takes a snapshot before notifying so no
/// lock is held while observers run.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Arc<[Arc<dyn ContainerObserver>]>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `observer` appended.
    pub(crate) fn with(&self, observer: Arc<dyn ContainerObserver>) -> Self {
        let mut observers: Vec<Arc<dyn ContainerObserver>> = self.observers.to_vec();
        observers.push(observer);
        Self {
            observers: observers.into(),
        }
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn binding(&self, id: &str) {
        for observer in self.observers.iter() {
            observer.binding(id);
        }
    }

    #[inline]
    pub(crate) fn bound(&self, id: &str, duration: Duration) {
        for observer in self.observers.iter() {
            observer.bound(id, duration);
        }
    }

    #[inline]
    pub(crate) fn resolving(&self, target: &str, member: &str) {
        for observer in self.observers.iter() {
            observer.resolving(target, member);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, target: &str, member: &str, duration: Duration) {
        for observer in self.observers.iter() {
            observer.resolved(target, member, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, target: &str, member: Option<&str>, error: &DiError) {
        for observer in self.observers.iter() {
            observer.failed(target, member, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// ```
/// use ferrous_autowire::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::with_prefix("billing")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Logging observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-autowire".to_string(),
        }
    }

    /// Logging observer with a custom prefix, recorded on every event.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerObserver for LoggingObserver {
    fn binding(&self, id: &str) {
        debug!(prefix = %self.prefix, id, "Binding entity");
    }

    fn bound(&self, id: &str, duration: Duration) {
        debug!(prefix = %self.prefix, id, ?duration, "Bound entity");
    }

    fn resolving(&self, target: &str, member: &str) {
        debug!(prefix = %self.prefix, subject = target, member, "Resolving");
    }

    fn resolved(&self, target: &str, member: &str, duration: Duration) {
        info!(prefix = %self.prefix, subject = target, member, ?duration, "Resolved");
    }

    fn failed(&self, target: &str, member: Option<&str>, error: &DiError) {
        warn!(prefix = %self.prefix, subject = target, member, %error, "Container operation failed");
    }
}

/// Observer counting events, for tests and coarse metrics.
#[derive(Default)]
pub struct MetricsObserver {
    bindings: AtomicU64,
    resolutions: AtomicU64,
    failures: AtomicU64,
    total_resolution_nanos: AtomicU64,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities bound so far.
    pub fn binding_count(&self) -> u64 {
        self.bindings.load(Ordering::Relaxed)
    }

    /// Successful constructions and calls.
    pub fn resolution_count(&self) -> u64 {
        self.resolutions.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Mean duration of successful constructions and calls.
    pub fn average_resolution_time(&self) -> Option<Duration> {
        let count = self.resolution_count();
        if count == 0 {
            return None;
        }
        let total = self.total_resolution_nanos.load(Ordering::Relaxed);
        Some(Duration::from_nanos(total / count))
    }

    pub fn reset(&self) {
        self.bindings.store(0, Ordering::Relaxed);
        self.resolutions.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.total_resolution_nanos.store(0, Ordering::Relaxed);
    }
}

impl ContainerObserver for MetricsObserver {
    fn bound(&self, _id: &str, _duration: Duration) {
        self.bindings.fetch_add(1, Ordering::Relaxed);
    }

    fn resolving(&self, _target: &str, _member: &str) {}

    fn resolved(&self, _target: &str, _member: &str, duration: Duration) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.total_resolution_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    fn failed(&self, _target: &str, _member: Option<&str>, _error: &DiError) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }
}
