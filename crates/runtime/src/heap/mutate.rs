//! Heap mutation operations (§4.2) and the copy-on-write discipline that
//! guards every one of them (§4.3).

use super::array::{check_index, check_insert_index, ArrayVec};
use super::object::{ObjectMap, Str};
use super::Heap;
use crate::cursor::Cursor;
use crate::Value;
use tracing::trace;
use weft_core::{cow, Error, Result};

/// Default copy-on-write threshold: clone when the shared handle's strong
/// count exceeds this value. Raised to 2 by callers that hold a borrowed
/// key or cursor alongside the container handle during the mutation
/// (§4.3, §9).
pub const DEFAULT_COW_THRESHOLD: usize = 1;

/// A key accepted by a mutating operation: either an object field name or
/// an array index (§3 invariant 2 — integers route to array ops).
///
/// The string form is carried as a raw `String` rather than an already
/// validated `Str` (`HeapStr`): building a `Str` can fail the key-length
/// check (§3 invariant 3), and `Key` is built through the infallible
/// `From` trait, so that check is deferred to the mutating call, which
/// returns a proper `Result` instead of panicking on a bad key.
#[derive(Debug, Clone)]
pub enum Key {
    Str(String),
    Index(i64),
}

impl Key {
    fn into_str_key(self) -> Result<Str> {
        match self {
            Key::Str(s) => {
                let key = Str::new(&s)?;
                key.check_key_len()?;
                Ok(key)
            }
            Key::Index(_) => Err(Error::type_mismatch("string key", "integer key")),
        }
    }
}

impl From<Str> for Key {
    fn from(s: Str) -> Self {
        Key::Str(s.as_str().to_owned())
    }
}
impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_owned())
    }
}
impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}
impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}
impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as i64)
    }
}

/// `insert(key, value)` (§4.2). When the receiver is not already an
/// object or array, it is forced into the container matching the key's
/// kind (a string key forces an object, an integer key forces an array)
/// before the insert proceeds.
pub fn insert(heap: &mut Heap, key: impl Into<Key>, value: impl Into<Value>) -> Result<Cursor> {
    let key = key.into();
    let value = value.into();

    if !matches!(heap, Heap::Object(_) | Heap::Array(_)) {
        *heap = match &key {
            Key::Str(_) => Heap::make_object(),
            Key::Index(_) => Heap::make_array(),
        };
    }

    match (&mut *heap, key) {
        (Heap::Object(handle), key @ Key::Str(_)) => {
            let k = key.into_str_key()?;
            cow(handle, DEFAULT_COW_THRESHOLD);
            trace!(key = k.as_str(), "heap object insert");
            let mut map = handle.borrow_mut();
            let (index, _old) = map.insert_full(k, value);
            drop(map);
            Ok(Cursor::heap_object_value(handle.clone(), index))
        }
        (Heap::Array(handle), Key::Index(i)) => {
            cow(handle, DEFAULT_COW_THRESHOLD);
            let len = handle.borrow().len();
            let pos = check_insert_index(i, len)?;
            trace!(index = pos, "heap array insert");
            handle.borrow_mut().insert(pos, value);
            Ok(Cursor::heap_array(handle.clone(), pos))
        }
        _ => Err(Error::type_mismatch("object or array", heap_key_type(heap))),
    }
}

/// `set(key, value)`: the key must already name an existing entry (§4.2).
pub fn set(heap: &mut Heap, key: impl Into<Key>, value: impl Into<Value>) -> Result<Cursor> {
    let key = key.into();
    let value = value.into();
    match (&mut *heap, key) {
        (Heap::Object(handle), key @ Key::Str(_)) => {
            let k = key.into_str_key()?;
            let index = handle
                .borrow()
                .get_index_of(k.as_str())
                .ok_or_else(|| Error::out_of_range(format!("no such key {:?}", k.as_str())))?;
            cow(handle, DEFAULT_COW_THRESHOLD);
            handle.borrow_mut()[index] = value;
            Ok(Cursor::heap_object_value(handle.clone(), index))
        }
        (Heap::Array(handle), Key::Index(i)) => {
            let len = handle.borrow().len();
            let pos = check_index(i, len)?;
            cow(handle, DEFAULT_COW_THRESHOLD);
            handle.borrow_mut()[pos] = value;
            Ok(Cursor::heap_array(handle.clone(), pos))
        }
        _ => Err(Error::type_mismatch("object or array", heap_key_type(heap))),
    }
}

/// `erase(key)`: returns a cursor at the position following the removed
/// element, or `Cursor::End` if there is none. An out-of-range index is
/// not an error — it simply yields `end` (§4.2).
pub fn erase(heap: &mut Heap, key: impl Into<Key>) -> Result<Cursor> {
    match (&mut *heap, key.into()) {
        (Heap::Object(handle), key @ Key::Str(_)) => {
            let k = key.into_str_key()?;
            cow(handle, DEFAULT_COW_THRESHOLD);
            let removed = handle.borrow_mut().shift_remove_full(k.as_str());
            match removed {
                Some((index, _, _)) => {
                    let len = handle.borrow().len();
                    if index >= len {
                        Ok(Cursor::End)
                    } else {
                        Ok(Cursor::heap_object_value(handle.clone(), index))
                    }
                }
                None => Ok(Cursor::End),
            }
        }
        (Heap::Array(handle), Key::Index(i)) => {
            let len = handle.borrow().len();
            if i < 0 || i as u64 >= len as u64 {
                return Ok(Cursor::End);
            }
            cow(handle, DEFAULT_COW_THRESHOLD);
            let pos = i as usize;
            handle.borrow_mut().remove(pos);
            if pos >= handle.borrow().len() {
                Ok(Cursor::End)
            } else {
                Ok(Cursor::heap_array(handle.clone(), pos))
            }
        }
        (heap, _) => Err(Error::type_mismatch("object or array", heap.get_type().name())),
    }
}

/// Arrays only: push/pop at either end (§4.2).
pub fn push_front(heap: &mut Heap, value: impl Into<Value>) -> Result<()> {
    with_array_mut(heap, |v| v.insert(0, value.into()))
}
pub fn push_back(heap: &mut Heap, value: impl Into<Value>) -> Result<()> {
    with_array_mut(heap, |v| v.push(value.into()))
}
pub fn pop_front(heap: &mut Heap) -> Result<Option<Value>> {
    with_array_mut(heap, |v| if v.is_empty() { None } else { Some(v.remove(0)) })
}
pub fn pop_back(heap: &mut Heap) -> Result<Option<Value>> {
    with_array_mut(heap, |v| v.pop())
}

/// `clear()`: object or array only (§4.2).
pub fn clear(heap: &mut Heap) -> Result<()> {
    match heap {
        Heap::Array(handle) => {
            cow(handle, DEFAULT_COW_THRESHOLD);
            handle.borrow_mut().clear();
            Ok(())
        }
        Heap::Object(handle) => {
            cow(handle, DEFAULT_COW_THRESHOLD);
            handle.borrow_mut().clear();
            Ok(())
        }
        _ => Err(Error::type_mismatch("object or array", heap.get_type().name())),
    }
}

/// `add_field` / `remove_field`: object-only sugar over `insert`/`erase`
/// restricted to string keys on an already-object receiver (§4.2).
pub fn add_field(heap: &mut Heap, key: &str, value: impl Into<Value>) -> Result<Cursor> {
    require_object(heap)?;
    insert(heap, Key::from(key), value)
}
pub fn remove_field(heap: &mut Heap, key: &str) -> Result<Cursor> {
    require_object(heap)?;
    erase(heap, Key::from(key))
}

/// `inject(pairs)`: a new object equal to `self` with `pairs`
/// inserted/overwriting; the receiver is unchanged (§4.2).
pub fn inject(heap: &Heap, pairs: impl IntoIterator<Item = (Str, Value)>) -> Result<Heap> {
    let Heap::Object(handle) = heap else {
        return Err(Error::type_mismatch("object", heap.get_type().name()));
    };
    let mut cloned: ObjectMap = handle.borrow().clone();
    for (k, v) in pairs {
        cloned.insert(k, v);
    }
    Ok(Heap::Object(weft_core::new_handle(cloned)))
}

/// `project(keys)`: a new object retaining only entries named in `keys`;
/// absent keys are silently skipped (§4.2).
pub fn project<'a>(heap: &Heap, keys: impl IntoIterator<Item = &'a str>) -> Result<Heap> {
    let Heap::Object(handle) = heap else {
        return Err(Error::type_mismatch("object", heap.get_type().name()));
    };
    let source = handle.borrow();
    let mut projected: ObjectMap = ObjectMap::new();
    for key in keys {
        if let Some(v) = source.get(key) {
            projected.insert(Str::new(key)?, v.clone());
        }
    }
    Ok(Heap::Object(weft_core::new_handle(projected)))
}

/// `get_nested(path, sep)`: walk object fields split by `sep`; a missing
/// segment yields `null` rather than an error (§4.2).
pub fn get_nested(value: &Value, path: &str, sep: char) -> Value {
    let mut current = value.clone();
    for segment in path.split(sep) {
        current = match current.get(segment) {
            Ok(v) => v,
            Err(_) => return Value::null(),
        };
    }
    current
}

fn require_object(heap: &Heap) -> Result<()> {
    if matches!(heap, Heap::Object(_)) {
        Ok(())
    } else {
        Err(Error::type_mismatch("object", heap.get_type().name()))
    }
}

fn with_array_mut<R>(heap: &mut Heap, f: impl FnOnce(&mut ArrayVec) -> R) -> Result<R> {
    match heap {
        Heap::Array(handle) => {
            cow(handle, DEFAULT_COW_THRESHOLD);
            Ok(f(&mut handle.borrow_mut()))
        }
        _ => Err(Error::type_mismatch("array", heap.get_type().name())),
    }
}

fn heap_key_type(heap: &Heap) -> &'static str {
    heap.get_type().name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_on_null_forces_object_for_string_key() {
        let mut h = Heap::Null;
        insert(&mut h, "k", 1i64).unwrap();
        assert_eq!(h.get_type(), weft_core::Type::Object);
    }

    #[test]
    fn insert_on_null_forces_array_for_index_key() {
        let mut h = Heap::Null;
        insert(&mut h, 0usize, "x").unwrap();
        assert_eq!(h.get_type(), weft_core::Type::Array);
    }

    #[test]
    fn insert_on_non_aggregate_receiver_also_forces_container() {
        let mut h = Heap::Integer(5);
        insert(&mut h, "k", 1i64).unwrap();
        assert_eq!(h.get_type(), weft_core::Type::Object);

        let mut h = Heap::String(Str::new("hi").unwrap());
        insert(&mut h, 0usize, "x").unwrap();
        assert_eq!(h.get_type(), weft_core::Type::Array);
    }

    #[test]
    fn set_requires_existing_key() {
        let mut h = Heap::make_object();
        assert!(set(&mut h, "missing", 1i64).is_err());
        insert(&mut h, "k", 1i64).unwrap();
        assert!(set(&mut h, "k", 2i64).is_ok());
    }

    #[test]
    fn erase_out_of_range_index_is_not_an_error() {
        let mut h = Heap::make_array();
        insert(&mut h, 0usize, 1i64).unwrap();
        let cursor = erase(&mut h, 5usize).unwrap();
        assert!(matches!(cursor, Cursor::End));
    }

    #[test]
    fn cow_leaves_aliased_heap_untouched() {
        let mut h1 = Heap::make_object();
        add_field(&mut h1, "k", 1i64).unwrap();
        let mut h2 = h1.clone();
        add_field(&mut h2, "k2", 2i64).unwrap();

        let Heap::Object(o1) = &h1 else { unreachable!() };
        let Heap::Object(o2) = &h2 else { unreachable!() };
        assert!(!o1.borrow().contains_key("k2"));
        assert_eq!(o2.borrow().len(), 2);
    }

    #[test]
    fn inject_does_not_mutate_receiver() {
        let mut h = Heap::make_object();
        add_field(&mut h, "a", 1i64).unwrap();
        let injected = inject(&h, vec![(Str::new("b").unwrap(), Value::from(2i64))]).unwrap();
        let Heap::Object(orig) = &h else { unreachable!() };
        let Heap::Object(new) = &injected else { unreachable!() };
        assert_eq!(orig.borrow().len(), 1);
        assert_eq!(new.borrow().len(), 2);
    }

    #[test]
    fn project_skips_missing_keys() {
        let mut h = Heap::make_object();
        add_field(&mut h, "a", 1i64).unwrap();
        let projected = project(&h, vec!["a", "missing"]).unwrap();
        let Heap::Object(p) = &projected else { unreachable!() };
        assert_eq!(p.borrow().len(), 1);
    }

    #[test]
    fn long_key_is_rejected_on_insert() {
        let mut h = Heap::make_object();
        let long_key = "k".repeat(weft_core::MAX_KEY_LEN as usize + 1);
        let err = insert(&mut h, long_key.as_str(), 0i64);
        assert!(err.is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // §8 invariant 6: for any sequence of fields already present on
        // h1, aliasing into h2 and mutating h2 must never become visible
        // through h1 at any of its original keys.
        #[test]
        fn cow_aliasing_is_invisible_to_the_original(
            existing in prop::collection::vec("[a-z]{1,8}", 0..8),
            extra_key in "[a-z]{1,8}",
            extra_value in any::<i64>(),
        ) {
            let mut h1 = Heap::make_object();
            for (i, k) in existing.iter().enumerate() {
                add_field(&mut h1, k, i as i64).unwrap();
            }
            let snapshot_len = existing.len();

            let mut h2 = h1.clone();
            let key_is_new = !existing.iter().any(|k| k == &extra_key);
            add_field(&mut h2, &extra_key, extra_value).unwrap();

            let Heap::Object(o1) = &h1 else { unreachable!() };
            prop_assert_eq!(o1.borrow().len(), snapshot_len);
            prop_assert_eq!(o1.borrow().contains_key(extra_key.as_str()), !key_is_new);

            let Heap::Object(o2) = &h2 else { unreachable!() };
            prop_assert!(o2.borrow().contains_key(extra_key.as_str()));
        }

        // §8 invariant 4: insert always makes the key immediately
        // retrievable, and only grows the object when the key was absent.
        #[test]
        fn insert_then_get_observes_the_value(
            key in "[a-z]{1,8}",
            value in any::<i64>(),
        ) {
            let mut h = Heap::make_object();
            add_field(&mut h, &key, value).unwrap();
            let Heap::Object(handle) = &h else { unreachable!() };
            let stored = handle.borrow().get(key.as_str()).cloned();
            prop_assert_eq!(stored, Some(Value::from(value)));
        }
    }
}
