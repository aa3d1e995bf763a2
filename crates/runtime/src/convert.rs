//! The `Convert` customization point (§1, §4.7), realized the idiomatic
//! Rust way: a bank of `From<T> for Value` impls, consumed through
//! `impl Into<Value>` parameters on every mutating API in
//! `heap::mutate`. Every impl here is total on its input type — `From`
//! cannot fail by construction, so there is no error path; a fallible
//! external adapter (a JSON parser, say) converts to `Result<Value, _>`
//! at its own boundary before calling in.

use crate::heap::object::{ObjectMap, Str};
use crate::{Heap, Value};

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Heap(Heap::Integer(i))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Heap(Heap::Decimal(d))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Heap(Heap::Boolean(b))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Heap(Heap::String(
            Str::new(s).expect("conversion source strings are within the 2^32-1 length limit"),
        ))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from(s.as_str())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Heap(Heap::Array(weft_core::new_handle(items)))
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Value::Heap(Heap::Object(weft_core::new_handle(map)))
    }
}

impl From<Heap> for Value {
    fn from(h: Heap) -> Self {
        Value::Heap(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions_round_trip() {
        assert_eq!(Value::from(42i64).as_integer().unwrap(), 42);
        assert_eq!(Value::from(1.5f64).as_decimal().unwrap(), 1.5);
        assert!(Value::from(true).as_boolean().unwrap());
        assert_eq!(&*Value::from("hi").as_str().unwrap(), "hi");
        assert_eq!(&*Value::from(String::from("hi")).as_str().unwrap(), "hi");
    }

    #[test]
    fn array_and_object_conversions_build_containers() {
        let arr = Value::from(vec![Value::from(1i64), Value::from(2i64)]);
        assert_eq!(arr.size().unwrap(), 2);

        let mut map = ObjectMap::new();
        map.insert(Str::new("k").unwrap(), Value::from(1i64));
        let obj = Value::from(map);
        assert!(obj.has_key("k").unwrap());
    }
}
