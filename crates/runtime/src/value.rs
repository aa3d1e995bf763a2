//! The top-level value: a tagged sum over the heap and buffer
//! representations, dispatching every operation to whichever one is
//! active (§4.1, §9).

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::heap::mutate::{self, Key};
use crate::heap::object::Str;
use crate::Heap;
use weft_core::{Error, Result, Type};

/// A schemaless structured value: either a mutable heap tree or a
/// read-only view into a finalized byte buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Heap(Heap),
    Buffer(Buffer),
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

impl Value {
    pub fn null() -> Self {
        Value::Heap(Heap::Null)
    }
    pub fn make_array() -> Self {
        Value::Heap(Heap::make_array())
    }
    pub fn make_object() -> Self {
        Value::Heap(Heap::make_object())
    }

    /// §4.1: the logical type, independent of representation.
    pub fn get_type(&self) -> Type {
        match self {
            Value::Heap(h) => h.get_type(),
            Value::Buffer(b) => b.get_type(),
        }
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self, Value::Buffer(_))
    }

    pub fn is_null(&self) -> bool {
        self.get_type() == Type::Null
    }
    pub fn is_boolean(&self) -> bool {
        self.get_type() == Type::Boolean
    }
    pub fn is_integer(&self) -> bool {
        self.get_type() == Type::Integer
    }
    pub fn is_decimal(&self) -> bool {
        self.get_type() == Type::Decimal
    }
    pub fn is_str(&self) -> bool {
        self.get_type() == Type::String
    }
    pub fn is_array(&self) -> bool {
        self.get_type() == Type::Array
    }
    pub fn is_object(&self) -> bool {
        self.get_type() == Type::Object
    }
    pub fn is_numeric(&self) -> bool {
        self.get_type().is_numeric()
    }
    pub fn is_primitive(&self) -> bool {
        self.get_type().is_primitive()
    }
    pub fn is_aggregate(&self) -> bool {
        self.get_type().is_aggregate()
    }

    /// Truthiness coercion (§4.1): booleans carry their value; everything
    /// else is truthy except `null`.
    pub fn truthy(&self) -> bool {
        match self.as_boolean() {
            Ok(b) => b,
            Err(_) => !self.is_null(),
        }
    }

    pub fn as_integer(&self) -> Result<i64> {
        match self {
            Value::Heap(Heap::Integer(i)) => Ok(*i),
            Value::Buffer(b) => b.as_integer(),
            other => Err(Error::type_mismatch("integer", other.get_type().name())),
        }
    }
    pub fn as_integer_or(&self, default: i64) -> i64 {
        self.as_integer().unwrap_or(default)
    }

    pub fn as_decimal(&self) -> Result<f64> {
        match self {
            Value::Heap(Heap::Decimal(d)) => Ok(*d),
            Value::Buffer(b) => b.as_decimal(),
            other => Err(Error::type_mismatch("decimal", other.get_type().name())),
        }
    }
    pub fn as_decimal_or(&self, default: f64) -> f64 {
        self.as_decimal().unwrap_or(default)
    }

    /// Either numeric variant widened to `f64` (§4.1 `numeric`).
    pub fn as_numeric(&self) -> Result<f64> {
        match self {
            Value::Heap(Heap::Integer(i)) => Ok(*i as f64),
            Value::Heap(Heap::Decimal(d)) => Ok(*d),
            Value::Buffer(b) if b.get_type().is_numeric() => b.as_numeric(),
            other => Err(Error::type_mismatch("numeric", other.get_type().name())),
        }
    }
    pub fn as_numeric_or(&self, default: f64) -> f64 {
        self.as_numeric().unwrap_or(default)
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Value::Heap(Heap::Boolean(b)) => Ok(*b),
            Value::Buffer(b) => b.as_boolean(),
            other => Err(Error::type_mismatch("boolean", other.get_type().name())),
        }
    }
    pub fn as_boolean_or(&self, default: bool) -> bool {
        self.as_boolean().unwrap_or(default)
    }

    /// The string value, borrowed from whichever representation holds it
    /// (§6 "string-view contract").
    pub fn as_str(&self) -> Result<std::borrow::Cow<'_, str>> {
        match self {
            Value::Heap(Heap::String(s)) => Ok(std::borrow::Cow::Borrowed(s.as_str())),
            Value::Buffer(b) => b.as_str().map(std::borrow::Cow::Owned),
            other => Err(Error::type_mismatch("string", other.get_type().name())),
        }
    }
    pub fn as_str_or<'a>(&'a self, default: &'a str) -> std::borrow::Cow<'a, str> {
        self.as_str().unwrap_or(std::borrow::Cow::Borrowed(default))
    }

    /// `size()` (§4.1): byte length for strings, element/field count for
    /// aggregates; a type error for other primitives.
    pub fn size(&self) -> Result<usize> {
        match self {
            Value::Heap(Heap::String(s)) => Ok(s.len()),
            Value::Heap(Heap::Array(a)) => Ok(a.borrow().len()),
            Value::Heap(Heap::Object(o)) => Ok(o.borrow().len()),
            Value::Buffer(b) => b.size(),
            other => Err(Error::type_mismatch(
                "string, array, or object",
                other.get_type().name(),
            )),
        }
    }

    /// `get(key)`: object field by name, array element by index, a
    /// missing entry yields `null` rather than an error (§4.5, §4.2).
    pub fn get(&self, key: &str) -> Result<Value> {
        match self {
            Value::Heap(Heap::Object(o)) => Ok(o.borrow().get(key).cloned().unwrap_or_else(Value::null)),
            Value::Heap(Heap::Array(a)) => {
                let index: usize = key
                    .parse()
                    .map_err(|_| Error::type_mismatch("array index", "non-numeric key"))?;
                Ok(a.borrow().get(index).cloned().unwrap_or_else(Value::null))
            }
            Value::Buffer(b) => b.get_by_str(key),
            other => Err(Error::type_mismatch("object or array", other.get_type().name())),
        }
    }

    /// `get(index)` on an array (heap or buffer).
    pub fn get_index(&self, index: usize) -> Result<Value> {
        match self {
            Value::Heap(Heap::Array(a)) => Ok(a.borrow().get(index).cloned().unwrap_or_else(Value::null)),
            Value::Buffer(b) => b.get_index(index),
            other => Err(Error::type_mismatch("array", other.get_type().name())),
        }
    }

    /// `at(key)`: like `get`, but fails with out-of-range on a missing
    /// entry instead of returning `null` (§4.5).
    pub fn at(&self, key: &str) -> Result<Value> {
        match self {
            Value::Heap(Heap::Object(o)) => o
                .borrow()
                .get(key)
                .cloned()
                .ok_or_else(|| Error::out_of_range(format!("no such key {key:?}"))),
            Value::Buffer(b) => b.at(key),
            other => Err(Error::type_mismatch("object", other.get_type().name())),
        }
    }

    pub fn has_key(&self, key: &str) -> Result<bool> {
        match self {
            Value::Heap(Heap::Object(o)) => Ok(o.borrow().contains_key(key)),
            Value::Buffer(b) => b.has_key(key),
            other => Err(Error::type_mismatch("object", other.get_type().name())),
        }
    }

    fn heap_mut(&mut self) -> Result<&mut Heap> {
        match self {
            Value::Heap(h) => Ok(h),
            Value::Buffer(_) => Err(Error::type_mismatch("heap value", "buffer value")),
        }
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<Cursor> {
        mutate::insert(self.heap_mut()?, key, value)
    }
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<Cursor> {
        mutate::set(self.heap_mut()?, key, value)
    }
    pub fn erase(&mut self, key: impl Into<Key>) -> Result<Cursor> {
        mutate::erase(self.heap_mut()?, key)
    }
    pub fn push_front(&mut self, value: impl Into<Value>) -> Result<()> {
        mutate::push_front(self.heap_mut()?, value)
    }
    pub fn push_back(&mut self, value: impl Into<Value>) -> Result<()> {
        mutate::push_back(self.heap_mut()?, value)
    }
    pub fn pop_front(&mut self) -> Result<Option<Value>> {
        mutate::pop_front(self.heap_mut()?)
    }
    pub fn pop_back(&mut self) -> Result<Option<Value>> {
        mutate::pop_back(self.heap_mut()?)
    }
    pub fn clear(&mut self) -> Result<()> {
        mutate::clear(self.heap_mut()?)
    }
    pub fn add_field(&mut self, key: &str, value: impl Into<Value>) -> Result<Cursor> {
        mutate::add_field(self.heap_mut()?, key, value)
    }
    pub fn remove_field(&mut self, key: &str) -> Result<Cursor> {
        mutate::remove_field(self.heap_mut()?, key)
    }
    pub fn inject(&self, pairs: impl IntoIterator<Item = (Str, Value)>) -> Result<Value> {
        match self {
            Value::Heap(h) => Ok(Value::Heap(mutate::inject(h, pairs)?)),
            Value::Buffer(_) => Err(Error::type_mismatch("heap value", "buffer value")),
        }
    }
    pub fn project<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Result<Value> {
        match self {
            Value::Heap(h) => Ok(Value::Heap(mutate::project(h, keys)?)),
            Value::Buffer(_) => Err(Error::type_mismatch("heap value", "buffer value")),
        }
    }
    pub fn get_nested(&self, path: &str, sep: char) -> Value {
        mutate::get_nested(self, path, sep)
    }

    /// §4.4: lower this heap value into a finalized, byte-addressable
    /// buffer. The original heap value is unchanged.
    pub fn finalize(&self) -> Result<Value> {
        match self {
            Value::Heap(h) => Ok(Value::Buffer(crate::finalize::finalize(h)?)),
            Value::Buffer(_) => Err(Error::type_mismatch("heap value", "buffer value")),
        }
    }

    /// §4.4: rebuild an independent heap tree from a buffer value.
    pub fn lift(&self) -> Result<Value> {
        match self {
            Value::Buffer(b) => Ok(Value::Heap(crate::lift::lift(b)?)),
            Value::Heap(_) => Err(Error::type_mismatch("buffer value", "heap value")),
        }
    }

    pub fn cursor(&self) -> Result<Cursor> {
        Cursor::begin(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_boolean_then_non_null() {
        assert!(!Value::null().truthy());
        assert!(!Value::from(false).truthy());
        assert!(Value::from(0i64).truthy());
        assert!(Value::from("").truthy());
    }

    #[test]
    fn size_on_primitive_is_a_type_error() {
        assert!(Value::from(1i64).size().is_err());
    }

    #[test]
    fn missing_key_get_is_null_but_at_errors() {
        let obj = Value::make_object();
        assert!(obj.get("x").unwrap().is_null());
        assert!(obj.at("x").is_err());
    }
}
