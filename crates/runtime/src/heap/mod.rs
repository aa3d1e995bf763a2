//! The mutable heap representation (§3 "Heap form", §4.2, §4.3).
//!
//! A `Heap` value owns either a by-value scalar or a shared handle to a
//! growable array / insertion-ordered object. Aggregates are
//! copy-on-write: see `mutate::cow_*` for the entry points that clone a
//! shared container before touching it.

pub mod array;
pub mod mutate;
pub mod object;

use crate::Value;
use array::ArrayVec;
use object::{ObjectMap, Str};
use weft_core::{Handle, Type};

/// The mutable tree representation of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Heap {
    Null,
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    String(Str),
    Array(Handle<ArrayVec>),
    Object(Handle<ObjectMap>),
}

impl Heap {
    pub fn get_type(&self) -> Type {
        match self {
            Heap::Null => Type::Null,
            Heap::Boolean(_) => Type::Boolean,
            Heap::Integer(_) => Type::Integer,
            Heap::Decimal(_) => Type::Decimal,
            Heap::String(_) => Type::String,
            Heap::Array(_) => Type::Array,
            Heap::Object(_) => Type::Object,
        }
    }

    pub fn make_null() -> Self {
        Heap::Null
    }

    pub fn make_array() -> Self {
        Heap::Array(weft_core::new_handle(ArrayVec::new()))
    }

    pub fn make_object() -> Self {
        Heap::Object(weft_core::new_handle(ObjectMap::new()))
    }
}

impl Default for Heap {
    fn default() -> Self {
        Heap::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_containers_are_empty() {
        assert_eq!(Heap::make_array().get_type(), Type::Array);
        assert_eq!(Heap::make_object().get_type(), Type::Object);
    }

    #[test]
    fn get_type_matches_each_variant() {
        assert_eq!(Heap::Null.get_type(), Type::Null);
        assert_eq!(Heap::Boolean(true).get_type(), Type::Boolean);
        assert_eq!(Heap::Integer(1).get_type(), Type::Integer);
        assert_eq!(Heap::Decimal(1.0).get_type(), Type::Decimal);
    }
}
