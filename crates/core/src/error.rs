//! Error kinds surfaced by the value model.
//!
//! Every fallible operation in `weft` returns a [`Result`], never panics on
//! bad input. The three kinds mirror the propagation policy in the design
//! spec: a type error for a variant mismatch, an out-of-range error for a
//! valid-but-absent key/index, and an invalid-argument error for malformed
//! call-site data (a valueless cursor, an oversized object key).

use thiserror::Error;

/// The error type for all fallible `weft` operations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// The operation requires a different logical type than the value
    /// currently holds (e.g. `.integer()` on a string, inserting a
    /// non-string/non-integer key, mutating a buffer-backed value).
    #[error("type error: expected {expected}, found {found}")]
    Type {
        expected: &'static str,
        found: &'static str,
    },

    /// A valid index or key pointed past the end of an aggregate, or named
    /// an entry that does not exist (`set` on a missing key, `at` on a
    /// missing key/index, erase-by-cursor of the wrong container).
    #[error("out of range: {0}")]
    OutOfRange(String),

    /// The call-site argument itself was malformed: a valueless cursor was
    /// dereferenced, or an object key exceeded the 65535-byte key limit.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::Type { expected, found }
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_error_message() {
        let e = Error::type_mismatch("integer", "string");
        assert_eq!(e.to_string(), "type error: expected integer, found string");
    }

    #[test]
    fn out_of_range_message() {
        let e = Error::out_of_range("index 5 out of bounds (len 3)");
        assert!(e.to_string().contains("index 5"));
    }

    #[test]
    fn invalid_argument_message() {
        let e = Error::invalid_argument("key length 65536 exceeds 65535");
        assert!(e.to_string().contains("65536"));
    }
}
