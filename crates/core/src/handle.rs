//! The pluggable refcounted handle (§5, §6).
//!
//! The spec leaves the refcount discipline as a compile-time parameter so
//! single-threaded callers pay nothing for atomics while multi-threaded
//! callers can opt in. Rather than thread a generic refcount parameter
//! through every container type, this crate picks the discipline with a
//! Cargo feature and exposes a single [`Handle`] alias plus a [`Guard`]
//! wrapper with a uniform `borrow`/`borrow_mut` API over either
//! `RefCell` (default) or `RwLock` (`sync` feature).

use std::fmt;
use tracing::trace;

#[cfg(not(feature = "sync"))]
mod inner {
    use std::cell::{Ref, RefCell, RefMut};
    use std::rc::Rc;

    pub type Rc2<T> = Rc<T>;

    pub struct Guard<T>(RefCell<T>);

    impl<T> Guard<T> {
        pub fn new(value: T) -> Self {
            Guard(RefCell::new(value))
        }

        pub fn borrow(&self) -> Ref<'_, T> {
            self.0.borrow()
        }

        pub fn borrow_mut(&self) -> RefMut<'_, T> {
            self.0.borrow_mut()
        }
    }

    pub fn strong_count<T>(rc: &Rc2<T>) -> usize {
        Rc::strong_count(rc)
    }

    pub fn new_rc<T>(value: T) -> Rc2<T> {
        Rc::new(value)
    }
}

#[cfg(feature = "sync")]
mod inner {
    use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

    pub type Rc2<T> = Arc<T>;

    pub struct Guard<T>(RwLock<T>);

    impl<T> Guard<T> {
        pub fn new(value: T) -> Self {
            Guard(RwLock::new(value))
        }

        pub fn borrow(&self) -> RwLockReadGuard<'_, T> {
            self.0.read().expect("weft handle lock poisoned")
        }

        pub fn borrow_mut(&self) -> RwLockWriteGuard<'_, T> {
            self.0.write().expect("weft handle lock poisoned")
        }
    }

    pub fn strong_count<T>(rc: &Rc2<T>) -> usize {
        Arc::strong_count(rc)
    }

    pub fn new_rc<T>(value: T) -> Rc2<T> {
        Arc::new(value)
    }
}

pub use inner::Guard;

/// A reference-counted pointer to a `Guard<T>`: `Rc<Guard<T>>` by default,
/// `Arc<Guard<T>>` under the `sync` feature.
pub type Handle<T> = inner::Rc2<Guard<T>>;

/// A reference-counted pointer with no interior mutability: `Rc<T>` by
/// default, `Arc<T>` under the `sync` feature. Used for data that is fully
/// built before it's shared and never mutated afterward (e.g. the dynamic
/// string buffer), where a `Guard`'s lock would only add overhead.
pub type Shared<T> = inner::Rc2<T>;

/// Build a new handle with a fresh refcount of 1.
pub fn new_handle<T>(value: T) -> Handle<T> {
    inner::new_rc(Guard::new(value))
}

/// Build a new lock-free shared pointer with a fresh refcount of 1.
pub fn new_shared<T>(value: T) -> Shared<T> {
    inner::new_rc(value)
}

/// Current strong refcount of a handle or shared pointer.
pub fn strong_count<T>(handle: &inner::Rc2<T>) -> usize {
    inner::strong_count(handle)
}

/// Copy-on-write: clone `*handle`'s contents into a fresh handle of
/// refcount 1 if the current strong count exceeds `threshold`; otherwise
/// leave `handle` untouched. `T: Clone` because the node's contents (not
/// its descendants' handles) are what gets duplicated — descendants stay
/// shared until themselves mutated (§4.3).
pub fn cow<T: Clone>(handle: &mut Handle<T>, threshold: usize) {
    let count = strong_count(handle);
    if count > threshold {
        trace!(count, threshold, "cow: cloning shared handle");
        let cloned = handle.borrow().clone();
        *handle = new_handle(cloned);
    }
}

impl<T: fmt::Debug> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.borrow(), f)
    }
}

/// Structural equality by content, not by identity: two `Guard`s compare
/// equal when the values they wrap do, independent of how many handles
/// point at each (§8 invariant 2 needs this for comparing heap objects
/// after aliasing).
impl<T: PartialEq> PartialEq for Guard<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.borrow() == *other.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handle_has_count_one() {
        let h = new_handle(42);
        assert_eq!(strong_count(&h), 1);
    }

    #[test]
    fn cloning_a_handle_increments_count() {
        let h1 = new_handle(vec![1, 2, 3]);
        let h2 = h1.clone();
        assert_eq!(strong_count(&h1), 2);
        assert_eq!(strong_count(&h2), 2);
    }

    #[test]
    fn cow_clones_when_shared_above_threshold() {
        let mut h1 = new_handle(vec![1, 2, 3]);
        let h2 = h1.clone();
        assert_eq!(strong_count(&h1), 2);

        cow(&mut h1, 1);
        // h1 now points at a private copy; h2 is untouched.
        assert_eq!(strong_count(&h1), 1);
        assert_eq!(strong_count(&h2), 1);

        h1.borrow_mut().push(4);
        assert_eq!(*h1.borrow(), vec![1, 2, 3, 4]);
        assert_eq!(*h2.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn cow_is_noop_when_sole_owner() {
        let mut h1 = new_handle(vec![1]);
        cow(&mut h1, 1);
        assert_eq!(strong_count(&h1), 1);
    }

    #[test]
    fn cow_respects_a_higher_guard_threshold() {
        // Simulates holding a borrowed key string alongside the container
        // handle during erase: count 2 must NOT trigger a clone when the
        // guard threshold is raised to 2.
        let mut h1 = new_handle(vec![1, 2, 3]);
        let _h2 = h1.clone();
        assert_eq!(strong_count(&h1), 2);

        cow(&mut h1, 2);
        assert_eq!(strong_count(&h1), 2); // untouched
    }
}
