//! Buffer → heap: the lift transcoder (§4.4).
//!
//! Reverse traversal of finalize: read the tag at the current offset,
//! dispatch by variant, build the matching heap node, and recurse into
//! children using the offset table. The resulting heap tree shares
//! nothing with the source image — every string and container is a
//! fresh allocation.

use crate::heap::object::{ObjectMap, Str};
use crate::{Buffer, Heap, Value};
use tracing::debug;
use weft_core::{new_handle, RawTag, Result};

/// Rebuild an independent heap tree from `buffer`.
pub fn lift(buffer: &Buffer) -> Result<Heap> {
    debug!(offset = buffer.offset, "lift: begin");
    let tag = buffer.tag()?;
    match tag {
        RawTag::Null => Ok(Heap::Null),
        RawTag::Boolean => Ok(Heap::Boolean(buffer.as_boolean()?)),
        RawTag::Integer => Ok(Heap::Integer(buffer.as_integer()?)),
        RawTag::Decimal => Ok(Heap::Decimal(buffer.as_decimal()?)),
        RawTag::SmallString | RawTag::String | RawTag::BigString => {
            Ok(Heap::String(Str::new(&buffer.as_str()?)?))
        }
        RawTag::Array => {
            let len = buffer.size()?;
            let mut items = Vec::with_capacity(len);
            for i in 0..len {
                let child = buffer.get_index(i)?;
                items.push(lift_value(&child)?);
            }
            Ok(Heap::Array(new_handle(items)))
        }
        RawTag::Object => {
            let len = buffer.size()?;
            let mut map = ObjectMap::with_capacity(len);
            for i in 0..len {
                let key = buffer.key_at(i)?;
                let child = buffer.value_at_index(i)?;
                map.insert(Str::new(key.as_str())?, lift_value(&child)?);
            }
            Ok(Heap::Object(new_handle(map)))
        }
    }
}

fn lift_value(value: &Value) -> Result<Value> {
    match value {
        Value::Buffer(b) => Ok(Value::Heap(lift(b)?)),
        Value::Heap(h) => Ok(Value::Heap(h.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::mutate;

    #[test]
    fn round_trip_through_finalize_and_lift_preserves_structure() {
        let mut heap = Heap::make_object();
        mutate::add_field(&mut heap, "b", 1i64).unwrap();
        mutate::add_field(&mut heap, "a", "hello").unwrap();
        let nested = Heap::make_array();
        mutate::add_field(&mut heap, "arr", Value::Heap(nested)).unwrap();

        let buf = crate::finalize::finalize(&heap).unwrap();
        let restored = lift(&buf).unwrap();
        assert_eq!(restored, heap);
    }

    #[test]
    fn empty_buffer_object_lifts_to_empty_heap_object() {
        let buf = crate::finalize::finalize(&Heap::make_object()).unwrap();
        let restored = lift(&buf).unwrap();
        assert_eq!(restored.get_type(), weft_core::Type::Object);
        assert_eq!(restored, Heap::make_object());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::heap::mutate;
    use proptest::prelude::*;

    proptest! {
        // §8 invariant 2: lift(finalize(h)) == h structurally, for an
        // object built from an arbitrary set of string/integer fields in
        // arbitrary insertion order (object equality ignores order).
        #[test]
        fn round_trip_preserves_an_arbitrary_flat_object(
            fields in prop::collection::vec(("[a-z]{1,6}", any::<i64>()), 0..20)
        ) {
            let mut heap = Heap::make_object();
            for (k, v) in &fields {
                mutate::add_field(&mut heap, k, *v).unwrap();
            }
            let buf = crate::finalize::finalize(&heap).unwrap();
            let restored = lift(&buf).unwrap();
            prop_assert_eq!(restored, heap);
        }

        // Same invariant over an array of mixed strings and integers.
        #[test]
        fn round_trip_preserves_an_arbitrary_array(
            items in prop::collection::vec(prop_oneof![
                any::<i64>().prop_map(Value::from),
                "[a-z]{0,12}".prop_map(|s| Value::from(s.as_str())),
            ], 0..20)
        ) {
            let mut heap = Heap::make_array();
            for (i, v) in items.into_iter().enumerate() {
                mutate::insert(&mut heap, i, v).unwrap();
            }
            let buf = crate::finalize::finalize(&heap).unwrap();
            let restored = lift(&buf).unwrap();
            prop_assert_eq!(restored, heap);
        }

        // §8 invariant 8: a string at/around the SSO boundary round-trips
        // through finalize/lift without loss.
        #[test]
        fn round_trip_preserves_strings_near_the_sso_boundary(len in 0usize..64) {
            let text = "q".repeat(len);
            let heap = Heap::String(weft_core::HeapStr::new(&text).unwrap());
            let buf = crate::finalize::finalize(&heap).unwrap();
            let restored = lift(&buf).unwrap();
            prop_assert_eq!(restored, heap);
        }
    }
}
