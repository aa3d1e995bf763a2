//! A single cursor type over either representation (§4.6).
//!
//! Cursors over buffer aggregates are random-access; cursors over heap
//! aggregates are bidirectional. An object cursor yields values by
//! default; [`Cursor::as_key`] switches the same position to read the
//! key instead. A "valueless" cursor ([`Cursor::End`], or one produced by
//! an out-of-range operation) fails with invalid-argument on
//! dereference, matching §4.6's "default-constructed or moved-from"
//! cursor rule.

use crate::buffer::Buffer;
use crate::heap::array::ArrayVec;
use crate::heap::object::{ObjectMap, Str};
use crate::Value;
use weft_core::{Error, Handle, Result};

/// A position within a heap array, a heap object, a buffer array, or a
/// buffer object — or no position at all.
#[derive(Clone)]
pub enum Cursor {
    /// A valueless cursor: dereferencing fails with invalid-argument.
    End,
    HeapArray { handle: Handle<ArrayVec>, index: usize },
    HeapObject { handle: Handle<ObjectMap>, index: usize },
    Buffer { buffer: Buffer, index: usize },
}

impl Cursor {
    pub fn heap_array(handle: Handle<ArrayVec>, index: usize) -> Self {
        Cursor::HeapArray { handle, index }
    }
    pub fn heap_object_value(handle: Handle<ObjectMap>, index: usize) -> Self {
        Cursor::HeapObject { handle, index }
    }

    /// Start iteration over an aggregate value's elements (or fields).
    pub fn begin(value: &Value) -> Result<Self> {
        match value {
            Value::Heap(crate::Heap::Array(h)) => Ok(Cursor::HeapArray {
                handle: h.clone(),
                index: 0,
            }),
            Value::Heap(crate::Heap::Object(h)) => Ok(Cursor::HeapObject {
                handle: h.clone(),
                index: 0,
            }),
            Value::Buffer(b) if b.get_type().is_aggregate() => Ok(Cursor::Buffer {
                buffer: b.clone(),
                index: 0,
            }),
            other => Err(Error::type_mismatch("object or array", other.get_type().name())),
        }
    }

    fn len(&self) -> usize {
        match self {
            Cursor::End => 0,
            Cursor::HeapArray { handle, .. } => handle.borrow().len(),
            Cursor::HeapObject { handle, .. } => handle.borrow().len(),
            Cursor::Buffer { buffer, .. } => buffer.size().unwrap_or(0),
        }
    }

    fn index(&self) -> Option<usize> {
        match self {
            Cursor::End => None,
            Cursor::HeapArray { index, .. }
            | Cursor::HeapObject { index, .. }
            | Cursor::Buffer { index, .. } => Some(*index),
        }
    }

    pub fn is_end(&self) -> bool {
        match self.index() {
            None => true,
            Some(i) => i >= self.len(),
        }
    }

    /// Dereference the value at this cursor's position.
    pub fn value(&self) -> Result<Value> {
        if self.is_end() {
            return Err(Error::invalid_argument("dereferenced a valueless cursor"));
        }
        match self {
            Cursor::End => unreachable!("handled by is_end above"),
            Cursor::HeapArray { handle, index } => Ok(handle.borrow()[*index].clone()),
            Cursor::HeapObject { handle, index } => {
                Ok(handle.borrow().get_index(*index).expect("index within bounds").1.clone())
            }
            Cursor::Buffer { buffer, index } => buffer.value_at_index(*index),
        }
    }

    /// The key at this position, for an object cursor used as a key
    /// cursor (§4.6 "the pair (key_cursor, value_cursor)").
    pub fn key(&self) -> Result<KeyRef> {
        if self.is_end() {
            return Err(Error::invalid_argument("dereferenced a valueless cursor"));
        }
        match self {
            Cursor::HeapObject { handle, index } => Ok(KeyRef::Heap(
                handle.borrow().get_index(*index).expect("index within bounds").0.clone(),
            )),
            Cursor::Buffer { buffer, index } => buffer.key_at(*index).map(KeyRef::Buffer),
            _ => Err(Error::type_mismatch("object cursor", "array cursor")),
        }
    }

    /// Advance to the next position (forward iteration, §4.6).
    pub fn next(&mut self) {
        match self {
            Cursor::End => {}
            Cursor::HeapArray { index, .. }
            | Cursor::HeapObject { index, .. }
            | Cursor::Buffer { index, .. } => *index += 1,
        }
        if self.is_end() {
            *self = Cursor::End;
        }
    }

    /// Step to the previous position (reverse iteration, §4.6). Walking
    /// before the first element leaves the cursor at `End`.
    pub fn prev(&mut self) {
        match self {
            Cursor::End => {}
            Cursor::HeapArray { index, .. }
            | Cursor::HeapObject { index, .. }
            | Cursor::Buffer { index, .. } => {
                if *index == 0 {
                    *self = Cursor::End;
                } else {
                    *index -= 1;
                }
            }
        }
    }
}

/// A borrowed object key, from either representation (§4.6).
pub enum KeyRef {
    Heap(Str),
    Buffer(crate::buffer::WireStr),
}

impl KeyRef {
    pub fn as_str(&self) -> &str {
        match self {
            KeyRef::Heap(s) => s.as_str(),
            KeyRef::Buffer(w) => w.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Heap;

    #[test]
    fn valueless_cursor_fails_on_dereference() {
        let c = Cursor::End;
        assert!(c.value().is_err());
    }

    #[test]
    fn array_cursor_walks_forward() {
        let mut h = Heap::make_array();
        crate::heap::mutate::insert(&mut h, 0usize, 1i64).unwrap();
        crate::heap::mutate::insert(&mut h, 1usize, 2i64).unwrap();
        let value = Value::Heap(h);
        let mut c = Cursor::begin(&value).unwrap();
        assert_eq!(c.value().unwrap().as_integer().unwrap(), 1);
        c.next();
        assert_eq!(c.value().unwrap().as_integer().unwrap(), 2);
        c.next();
        assert!(c.is_end());
    }
}
