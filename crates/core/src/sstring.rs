//! The heap string: a small-string layout and a dynamic-string layout,
//! selected once at construction by length, with no later promotion (§3).
//!
//! The small-string layout packs `S` inline bytes plus a one-byte
//! "bytes-remaining" count (`S - len`). When `len == S` the remaining
//! count is `0`, and that same zero byte is what a C-string reader would
//! see as the NUL terminator immediately after the inline data — the
//! struct doesn't need a separate terminator slot because position `S`
//! *is* the remaining-count byte (§9). No `unsafe` is needed to get this
//! layout: it falls out of declaring `remaining` as the field directly
//! after a `[u8; S]` array.
//!
//! The dynamic-string layout is a reference-counted, null-terminated byte
//! buffer shared by every clone of a `HeapStr` built from a long string —
//! a single allocation tier rather than a multi-source arena, since this
//! value model has no per-strand region to bulk-free.

use crate::error::{Error, Result};
use crate::handle::{new_shared, Shared};
use std::fmt;

/// Default inline capacity: within the spec's suggested "typical S ≈
/// 14–22" range.
pub const DEFAULT_SMALL_CAP: usize = 22;

/// The inline small-string representation.
///
/// `data[..len]` holds the UTF-8 bytes; `remaining = S - len` functions
/// both as the "bytes-remaining" count and, when it's `0`, as the
/// terminator for a string that fills the whole inline buffer.
#[derive(Clone, Copy)]
struct SmallString<const S: usize> {
    data: [u8; S],
    remaining: u8,
}

impl<const S: usize> SmallString<S> {
    fn new(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= S);
        let mut data = [0u8; S];
        data[..bytes.len()].copy_from_slice(bytes);
        SmallString {
            data,
            remaining: (S - bytes.len()) as u8,
        }
    }

    fn len(&self) -> usize {
        S - self.remaining as usize
    }

    fn as_str(&self) -> &str {
        // Safety-free: bytes were validated UTF-8 at construction (see
        // `HeapStr::new`), and we only ever slice at the stored length.
        std::str::from_utf8(&self.data[..self.len()]).expect("small string bytes are valid utf8")
    }
}

/// The out-of-line representation: a shared, null-terminated byte buffer.
///
/// `len` excludes the trailing NUL; `bytes` is exactly `len + 1` long.
struct DynString {
    bytes: Vec<u8>,
    len: usize,
}

impl DynString {
    fn new(s: &str) -> Self {
        let mut bytes = Vec::with_capacity(s.len() + 1);
        bytes.extend_from_slice(s.as_bytes());
        bytes.push(0);
        DynString { bytes, len: s.len() }
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..self.len]).expect("dynamic string bytes are valid utf8")
    }
}

enum Repr<const S: usize> {
    Small(SmallString<S>),
    Dynamic(Shared<DynString>),
}

/// A heap-resident UTF-8 string: inline for short strings, shared and
/// heap-allocated for long ones. The layout is chosen once at construction
/// by byte length and never changes (§3).
pub struct HeapStr<const S: usize = DEFAULT_SMALL_CAP> {
    repr: Repr<S>,
}

/// Maximum length of any string value (`2^32 - 1`, §3 invariant 3).
pub const MAX_STRING_LEN: u64 = u32::MAX as u64;

/// Maximum length of a string used as an object key (`2^16 - 1`, §3
/// invariant 3).
pub const MAX_KEY_LEN: u64 = u16::MAX as u64;

impl<const S: usize> HeapStr<S> {
    /// Build a `HeapStr`, selecting the small or dynamic layout by length.
    pub fn new(s: &str) -> Result<Self> {
        if s.len() as u64 > MAX_STRING_LEN {
            return Err(Error::invalid_argument(format!(
                "string length {} exceeds {}",
                s.len(),
                MAX_STRING_LEN
            )));
        }
        let repr = if s.len() <= S {
            Repr::Small(SmallString::new(s.as_bytes()))
        } else {
            Repr::Dynamic(new_shared(DynString::new(s)))
        };
        Ok(HeapStr { repr })
    }

    /// Validate this string's length against the object-key limit (§3
    /// invariant 3, §7 invalid-argument error).
    pub fn check_key_len(&self) -> Result<()> {
        if self.len() as u64 > MAX_KEY_LEN {
            return Err(Error::invalid_argument(format!(
                "object key length {} exceeds {}",
                self.len(),
                MAX_KEY_LEN
            )));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        match &self.repr {
            Repr::Small(s) => s.as_str(),
            // `DynString` is never mutated after construction, so a plain
            // `Rc`/`Arc` deref borrows straight through to `self`'s
            // lifetime with no lock and no unsafe code.
            Repr::Dynamic(shared) => shared.as_str(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Small(s) => s.len(),
            Repr::Dynamic(shared) => shared.len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_small(&self) -> bool {
        matches!(self.repr, Repr::Small(_))
    }
}

impl<const S: usize> Clone for HeapStr<S> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Small(s) => Repr::Small(*s),
            Repr::Dynamic(h) => Repr::Dynamic(h.clone()),
        };
        HeapStr { repr }
    }
}

impl<const S: usize> PartialEq for HeapStr<S> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl<const S: usize> Eq for HeapStr<S> {}

impl<const S: usize> std::hash::Hash for HeapStr<S> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl<const S: usize> PartialOrd for HeapStr<S> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl<const S: usize> Ord for HeapStr<S> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Byte-lexicographic, matching the wire format's canonical key
        // ordering (§4.4).
        self.as_str().as_bytes().cmp(other.as_str().as_bytes())
    }
}

impl<const S: usize> fmt::Debug for HeapStr<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeapStr({:?})", self.as_str())
    }
}

impl<const S: usize> fmt::Display for HeapStr<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Heterogeneous lookup: an object container keyed by `HeapStr` must accept
// a plain `&str` query without constructing a temporary `HeapStr` (§4.1,
// §9). `Borrow<str>` is how a `HashMap`/`IndexMap` recognizes that.
impl<const S: usize> std::borrow::Borrow<str> for HeapStr<S> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_round_trips() {
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new("").unwrap();
        assert_eq!(s.as_str(), "");
        assert_eq!(s.len(), 0);
        assert!(s.is_small());
    }

    #[test]
    fn one_byte_string_is_small() {
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new("x").unwrap();
        assert!(s.is_small());
        assert_eq!(s.as_str(), "x");
    }

    #[test]
    fn exactly_s_bytes_is_small_and_terminator_reuses_remaining_byte() {
        let text = "a".repeat(DEFAULT_SMALL_CAP);
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        assert!(s.is_small());
        assert_eq!(s.len(), DEFAULT_SMALL_CAP);
        assert_eq!(s.as_str(), text);
        if let Repr::Small(inner) = &s.repr {
            assert_eq!(inner.remaining, 0);
        } else {
            panic!("expected small representation at the SSO boundary");
        }
    }

    #[test]
    fn s_plus_one_bytes_is_dynamic() {
        let text = "a".repeat(DEFAULT_SMALL_CAP + 1);
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        assert!(!s.is_small());
        assert_eq!(s.as_str(), text);
    }

    #[test]
    fn large_string_round_trips() {
        let text = "z".repeat(1 << 20);
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        assert_eq!(s.len(), 1 << 20);
        assert_eq!(s.as_str(), text);
    }

    #[test]
    fn key_length_limit_is_enforced() {
        let text = "k".repeat(MAX_KEY_LEN as usize + 1);
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        assert!(s.check_key_len().is_err());
    }

    #[test]
    fn key_at_exactly_the_limit_is_allowed() {
        let text = "k".repeat(MAX_KEY_LEN as usize);
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        assert!(s.check_key_len().is_ok());
    }

    #[test]
    fn clone_of_dynamic_shares_storage() {
        let text = "a".repeat(DEFAULT_SMALL_CAP + 10);
        let s1 = HeapStr::<DEFAULT_SMALL_CAP>::new(&text).unwrap();
        let s2 = s1.clone();
        assert_eq!(s1, s2);
        if let (Repr::Dynamic(h1), _) = (&s1.repr, &s2.repr) {
            assert!(crate::handle::strong_count(h1) >= 2);
        } else {
            panic!("expected dynamic representation");
        }
    }

    #[test]
    fn ordering_is_byte_lexicographic() {
        let a = HeapStr::<DEFAULT_SMALL_CAP>::new("a").unwrap();
        let b = HeapStr::<DEFAULT_SMALL_CAP>::new("b").unwrap();
        assert!(a < b);
    }

    #[test]
    fn borrow_as_str_matches_owned_lookup() {
        use std::borrow::Borrow;
        let s = HeapStr::<DEFAULT_SMALL_CAP>::new("hello").unwrap();
        let borrowed: &str = s.borrow();
        assert_eq!(borrowed, "hello");
    }
}
