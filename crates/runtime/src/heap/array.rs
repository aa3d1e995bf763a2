//! The heap array representation: a shared, growable sequence of values.

use crate::Value;
use weft_core::{Error, Result};

/// The array payload behind a [`crate::Heap::Array`] handle.
pub type ArrayVec = Vec<Value>;

/// Resolve a signed, caller-supplied index against `len`, rejecting
/// negative and out-of-range values with an out-of-range error.
pub fn check_index(index: i64, len: usize) -> Result<usize> {
    if index < 0 || index as u64 >= len as u64 {
        return Err(Error::out_of_range(format!(
            "index {index} out of bounds (len {len})"
        )));
    }
    Ok(index as usize)
}

/// Resolve an insertion position: unlike [`check_index`], `index == len`
/// (append) is legal.
pub fn check_insert_index(index: i64, len: usize) -> Result<usize> {
    if index < 0 || index as u64 > len as u64 {
        return Err(Error::out_of_range(format!(
            "insertion index {index} out of bounds (len {len})"
        )));
    }
    Ok(index as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_rejects_negative_and_past_end() {
        assert!(check_index(-1, 3).is_err());
        assert!(check_index(3, 3).is_err());
        assert!(check_index(2, 3).is_ok());
    }

    #[test]
    fn check_insert_index_allows_append_position() {
        assert_eq!(check_insert_index(3, 3).unwrap(), 3);
        assert!(check_insert_index(4, 3).is_err());
    }
}
