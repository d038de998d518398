use std::sync::Arc;

use parking_lot::RwLock;

/// Shared, lock-guarded state. Clones point at the same value.
///
/// Access goes through closures so a guard never outlives the call that took it;
/// a stream handed out by a store can therefore never keep the store locked.
pub struct Atomic<T>(Arc<RwLock<T>>);

#[inline]
pub fn atomic<T>(value: T) -> Atomic<T> {
    Atomic(Arc::new(RwLock::new(value)))
}

impl<T> Atomic<T> {
    /// Runs `f` under the read lock.
    #[inline]
    pub fn read_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.read())
    }

    /// Runs `f` under the write lock.
    #[inline]
    pub fn write_with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.write())
    }
}

impl<T> Clone for Atomic<T> {
    fn clone(&self) -> Self {
        Atomic(Arc::clone(&self.0))
    }
}

impl<T: Default> Default for Atomic<T> {
    fn default() -> Self {
        atomic(T::default())
    }
}
