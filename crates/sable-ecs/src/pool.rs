//! Per-kind component pools.
//!
//! A [`Pool<T>`] is a dense slot vector indexed by entity id. Slots are never
//! removed; whether a slot holds a live component is decided by the owning
//! entity's [`Signature`](crate::signature::Signature), not by the pool.
//!
//! The registry stores pools of different element types side by side through
//! the [`ErasedPool`] capability trait and downcasts on access.

use std::any::{type_name, Any};

use crate::component::Component;

/// Number of slots a freshly created pool starts with.
pub const DEFAULT_POOL_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// ErasedPool
// ---------------------------------------------------------------------------

/// Type-erased view of a [`Pool<T>`].
pub trait ErasedPool: Any {
    /// Current number of slots.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grow to at least `n` slots.
    fn ensure_capacity(&mut self, n: usize);

    /// Drop every stored value, keeping the slot count.
    fn clear(&mut self);

    /// Rust type name of the element type.
    fn component_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

/// Dense store for one component kind.
///
/// Unwritten slots hold `None`, so `T` needs no `Default` bound.
#[derive(Debug)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
}

impl<T: Component> Pool<T> {
    /// Create a pool with [`DEFAULT_POOL_SIZE`] empty slots.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_POOL_SIZE)
    }

    /// Create a pool with `size` empty slots.
    pub fn with_size(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        Self { slots }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grow to at least `n` slots, preserving contents. Never shrinks.
    pub fn ensure_capacity(&mut self, n: usize) {
        if n > self.slots.len() {
            self.slots.resize_with(n, || None);
        }
    }

    /// Overwrite slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the pool; call
    /// [`ensure_capacity`](Self::ensure_capacity) first.
    pub fn set(&mut self, index: usize, value: T) {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).unwrap_or_else(|| {
            panic!(
                "pool<{}> index {index} out of range (size {len})",
                type_name::<T>()
            )
        });
        *slot = Some(value);
    }

    /// The value in slot `index`, if one was ever written.
    pub fn try_get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn try_get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// The value in slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range or the slot was never written.
    pub fn get(&self, index: usize) -> &T {
        match self.try_get(index) {
            Some(value) => value,
            None => Self::empty_slot(index, self.slots.len()),
        }
    }

    /// Mutable access to slot `index`. Panics like [`get`](Self::get).
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        let len = self.slots.len();
        match self.slots.get_mut(index).and_then(Option::as_mut) {
            Some(value) => value,
            None => Self::empty_slot(index, len),
        }
    }

    /// Drop all values, keeping the slot count.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    #[cold]
    fn empty_slot(index: usize, len: usize) -> ! {
        panic!(
            "pool<{}> slot {index} holds no component (size {len})",
            type_name::<T>()
        )
    }
}

impl<T: Component> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedPool for Pool<T> {
    fn len(&self) -> usize {
        Pool::len(self)
    }

    fn ensure_capacity(&mut self, n: usize) {
        Pool::ensure_capacity(self, n);
    }

    fn clear(&mut self) {
        Pool::clear(self);
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Health(u32);

    #[test]
    fn new_pool_has_default_size() {
        let pool: Pool<Health> = Pool::new();
        assert_eq!(pool.len(), DEFAULT_POOL_SIZE);
        assert_eq!(pool.try_get(0), None);
    }

    #[test]
    fn ensure_capacity_grows_and_never_shrinks() {
        let mut pool: Pool<Health> = Pool::with_size(2);
        pool.set(1, Health(7));
        pool.ensure_capacity(10);
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.get(1), &Health(7));

        pool.ensure_capacity(3);
        assert_eq!(pool.len(), 10);
    }

    #[test]
    fn set_overwrites() {
        let mut pool: Pool<Health> = Pool::with_size(4);
        pool.set(3, Health(1));
        pool.set(3, Health(2));
        assert_eq!(pool.get(3), &Health(2));
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut pool: Pool<Health> = Pool::with_size(1);
        pool.set(0, Health(10));
        pool.get_mut(0).0 -= 3;
        assert_eq!(pool.get(0), &Health(7));
    }

    #[test]
    fn clear_keeps_size() {
        let mut pool: Pool<Health> = Pool::with_size(3);
        pool.set(0, Health(1));
        pool.clear();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.try_get(0), None);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn set_past_end_panics() {
        let mut pool: Pool<Health> = Pool::with_size(2);
        pool.set(2, Health(0));
    }

    #[test]
    #[should_panic(expected = "holds no component")]
    fn get_unwritten_slot_panics() {
        let pool: Pool<Health> = Pool::with_size(2);
        pool.get(1);
    }

    #[test]
    fn erased_pool_downcasts_back() {
        let mut erased: Box<dyn ErasedPool> = Box::new(Pool::<Health>::with_size(1));
        erased.ensure_capacity(5);
        assert_eq!(erased.len(), 5);
        assert!(erased.component_name().ends_with("Health"));

        let typed = erased
            .as_any_mut()
            .downcast_mut::<Pool<Health>>()
            .unwrap();
        typed.set(4, Health(9));
        assert_eq!(
            erased.as_any().downcast_ref::<Pool<Health>>().unwrap().get(4),
            &Health(9)
        );
        assert!(erased.as_any().downcast_ref::<Pool<u8>>().is_none());
    }
}
