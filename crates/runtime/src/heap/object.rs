//! The heap object representation: an insertion-order-preserving map from
//! heap-string keys to values, with heterogeneous lookup.
//!
//! `IndexMap` is the same choice the wider ecosystem makes for an
//! order-preserving JSON-like map (`serde_json::Map` in its
//! `preserve_order` mode): lookups stay near `HashMap` speed while
//! iteration order matches insertion order, which the finalize step then
//! overrides with byte-lexicographic key order only at the wire boundary
//! (§4.4) — the heap form itself keeps insertion order (§8 invariant 2).
//!
//! `Str: Borrow<str>` (see `weft_core::sstring`) is what lets `get`/
//! `contains_key`/`get_index_of` below take a plain `&str` query without
//! allocating a temporary key (§3, §9).

use crate::Value;
use indexmap::IndexMap;
use weft_core::HeapStr;

/// The string type used for object keys and heap strings throughout this
/// crate.
pub type Str = HeapStr;

/// The object payload behind a [`crate::Heap::Object`] handle.
pub type ObjectMap = IndexMap<Str, Value>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_borrowed_str_matches_owned_key() {
        let mut map: ObjectMap = IndexMap::new();
        map.insert(Str::new("a").unwrap(), Value::from(1i64));
        assert!(map.contains_key("a"));
        assert_eq!(map.get("a").unwrap(), &Value::from(1i64));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut map: ObjectMap = IndexMap::new();
        map.insert(Str::new("b").unwrap(), Value::from(1i64));
        map.insert(Str::new("a").unwrap(), Value::from(2i64));
        map.insert(Str::new("c").unwrap(), Value::from(3i64));
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
