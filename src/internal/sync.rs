//! Read-write lock used around container state.
//!
//! Guards are only ever held for a single map read or write. Nothing in the
//! crate calls into user code (factories, constructors, methods, observers)
//! while a guard is alive, so re-entrant calls into the container cannot
//! deadlock.

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{RwLockReadGuard, RwLockWriteGuard};

#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub(crate) struct RwLock<T> {
    #[cfg(feature = "parking-lot")]
    inner: parking_lot::RwLock<T>,
    #[cfg(not(feature = "parking-lot"))]
    inner: std::sync::RwLock<T>,
}

impl<T> RwLock<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "parking-lot")]
            inner: parking_lot::RwLock::new(value),
            #[cfg(not(feature = "parking-lot"))]
            inner: std::sync::RwLock::new(value),
        }
    }

    #[inline]
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.read()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            // A panicking observer or factory never runs under the lock, so
            // poisoned state is still consistent.
            self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }

    #[inline]
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.write()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
        }
    }
}
