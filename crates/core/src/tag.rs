//! Wire tag byte assignment and the logical type enumeration.
//!
//! The wire tag (§6) is a per-deployment contract; this crate fixes one
//! assignment and treats it as stable. `Type` is the logical type set
//! (§3) shared by both the heap and the buffer representations — it is
//! what `Value::get_type` returns, independent of which representation
//! produced the value.

use std::fmt;

/// The one-byte tag written at the start of every wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RawTag {
    Null = 1,
    Boolean = 2,
    Integer = 3,
    Decimal = 4,
    SmallString = 5,
    String = 6,
    BigString = 7,
    Array = 8,
    Object = 9,
}

impl RawTag {
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(RawTag::Null),
            2 => Some(RawTag::Boolean),
            3 => Some(RawTag::Integer),
            4 => Some(RawTag::Decimal),
            5 => Some(RawTag::SmallString),
            6 => Some(RawTag::String),
            7 => Some(RawTag::BigString),
            8 => Some(RawTag::Array),
            9 => Some(RawTag::Object),
            _ => None,
        }
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this tag is one of the three string widths.
    pub const fn is_string(self) -> bool {
        matches!(self, RawTag::SmallString | RawTag::String | RawTag::BigString)
    }
}

/// The logical type of a value, independent of representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Boolean,
    Integer,
    Decimal,
    String,
    Array,
    Object,
}

impl Type {
    pub const fn name(self) -> &'static str {
        match self {
            Type::Null => "null",
            Type::Boolean => "boolean",
            Type::Integer => "integer",
            Type::Decimal => "decimal",
            Type::String => "string",
            Type::Array => "array",
            Type::Object => "object",
        }
    }

    /// `numeric = integer ∨ decimal` (§3 invariant 1).
    pub const fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Decimal)
    }

    /// `primitive = ¬object ∧ ¬array ∧ ¬null` (§3 invariant 1).
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Type::Object | Type::Array | Type::Null)
    }

    pub const fn is_aggregate(self) -> bool {
        matches!(self, Type::Object | Type::Array)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<RawTag> for Type {
    fn from(tag: RawTag) -> Self {
        match tag {
            RawTag::Null => Type::Null,
            RawTag::Boolean => Type::Boolean,
            RawTag::Integer => Type::Integer,
            RawTag::Decimal => Type::Decimal,
            RawTag::SmallString | RawTag::String | RawTag::BigString => Type::String,
            RawTag::Array => Type::Array,
            RawTag::Object => Type::Object,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_round_trips_through_byte() {
        for tag in [
            RawTag::Null,
            RawTag::Boolean,
            RawTag::Integer,
            RawTag::Decimal,
            RawTag::SmallString,
            RawTag::String,
            RawTag::BigString,
            RawTag::Array,
            RawTag::Object,
        ] {
            assert_eq!(RawTag::from_byte(tag.as_byte()), Some(tag));
        }
    }

    #[test]
    fn unknown_byte_is_none() {
        assert_eq!(RawTag::from_byte(0), None);
        assert_eq!(RawTag::from_byte(200), None);
    }

    #[test]
    fn numeric_and_primitive_predicates() {
        assert!(Type::Integer.is_numeric());
        assert!(Type::Decimal.is_numeric());
        assert!(!Type::String.is_numeric());

        assert!(Type::String.is_primitive());
        assert!(Type::Boolean.is_primitive());
        assert!(!Type::Object.is_primitive());
        assert!(!Type::Array.is_primitive());
        assert!(!Type::Null.is_primitive());
    }
}
