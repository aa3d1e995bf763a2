//! Decoding the byte image: primitive accessors, array/object random
//! access, and the binary search over an object's sorted key table
//! (§4.4, §4.5).

use super::{offset_width, read_width_uint, Buffer, WireStr};
use crate::Value;
use weft_core::{Error, Ordered, RawTag, Result, Type};

const TAG_WIDTH: usize = 1;
const HEADER_FIXED_WIDTH: usize = 1 + 4 + 4; // tag + total_size + count

pub(crate) fn tag_at(image: &[u8], offset: usize) -> Result<RawTag> {
    let byte = *image
        .get(offset)
        .ok_or_else(|| Error::out_of_range(format!("buffer offset {offset} out of bounds")))?;
    RawTag::from_byte(byte).ok_or_else(|| Error::invalid_argument(format!("unknown wire tag {byte}")))
}

struct AggregateHeader {
    count: usize,
    table_start: usize,
    width: usize,
}

fn read_aggregate_header(image: &[u8], offset: usize) -> AggregateHeader {
    let total_size = Ordered::<u32>::read_from(&image[offset + 1..]).get();
    let count = Ordered::<u32>::read_from(&image[offset + 5..]).get() as usize;
    let width = offset_width(total_size);
    AggregateHeader {
        count,
        table_start: offset + HEADER_FIXED_WIDTH,
        width,
    }
}

fn read_table_entry(image: &[u8], header: &AggregateHeader, index: usize) -> usize {
    let entry_at = header.table_start + index * header.width;
    read_width_uint(&image[entry_at..], header.width)
}

/// Length (in bytes) of the tag + length-prefix portion before a
/// string's payload, and the payload length itself.
fn string_prefix_len(tag: RawTag) -> usize {
    match tag {
        RawTag::SmallString => TAG_WIDTH + 1,
        RawTag::String => TAG_WIDTH + 2,
        RawTag::BigString => TAG_WIDTH + 4,
        _ => unreachable!("string_prefix_len called on a non-string tag"),
    }
}

fn read_string_payload(image: &[u8], offset: usize, tag: RawTag) -> (usize, usize) {
    let len_width = string_prefix_len(tag) - TAG_WIDTH;
    let len = read_width_uint(&image[offset + TAG_WIDTH..], len_width);
    (offset + string_prefix_len(tag), len)
}

/// Key bytes are a bare length-prefixed UTF-8 string (no tag byte, §4.4):
/// a 2-byte little-endian length followed by the bytes.
fn read_key(image: &[u8], pair_start: usize) -> (usize, usize) {
    let len = Ordered::<u16>::read_from(&image[pair_start..]).get() as usize;
    (pair_start + 2, len)
}

impl Buffer {
    pub fn get_type(&self) -> Type {
        self.tag().map(Type::from).unwrap_or(Type::Null)
    }

    pub fn as_integer(&self) -> Result<i64> {
        match self.tag()? {
            RawTag::Integer => Ok(Ordered::<i64>::read_from(&self.image[self.offset + 1..]).get()),
            other => Err(Error::type_mismatch("integer", Type::from(other).name())),
        }
    }

    pub fn as_decimal(&self) -> Result<f64> {
        match self.tag()? {
            RawTag::Decimal => Ok(Ordered::<f64>::read_from(&self.image[self.offset + 1..]).get()),
            other => Err(Error::type_mismatch("decimal", Type::from(other).name())),
        }
    }

    pub fn as_numeric(&self) -> Result<f64> {
        match self.tag()? {
            RawTag::Integer => self.as_integer().map(|i| i as f64),
            RawTag::Decimal => self.as_decimal(),
            other => Err(Error::type_mismatch("numeric", Type::from(other).name())),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self.tag()? {
            RawTag::Boolean => Ok(self.image[self.offset + 1] != 0),
            other => Err(Error::type_mismatch("boolean", Type::from(other).name())),
        }
    }

    pub fn as_str(&self) -> Result<String> {
        let tag = self.tag()?;
        if !tag.is_string() {
            return Err(Error::type_mismatch("string", Type::from(tag).name()));
        }
        let (start, len) = read_string_payload(&self.image, self.offset, tag);
        Ok(std::str::from_utf8(&self.image[start..start + len])
            .expect("wire strings are valid utf8 by construction")
            .to_owned())
    }

    pub fn wire_str(&self) -> Result<WireStr> {
        let tag = self.tag()?;
        if !tag.is_string() {
            return Err(Error::type_mismatch("string", Type::from(tag).name()));
        }
        let (start, len) = read_string_payload(&self.image, self.offset, tag);
        Ok(WireStr::new(self.image.clone(), start, len))
    }

    pub fn size(&self) -> Result<usize> {
        let tag = self.tag()?;
        if tag.is_string() {
            let (_, len) = read_string_payload(&self.image, self.offset, tag);
            return Ok(len);
        }
        match tag {
            RawTag::Array | RawTag::Object => Ok(read_aggregate_header(&self.image, self.offset).count),
            other => Err(Error::type_mismatch("string, array, or object", Type::from(other).name())),
        }
    }

    /// §4.5: bounds-checked array element access; the result shares this
    /// buffer's owning image handle rather than copying anything.
    pub fn get_index(&self, index: usize) -> Result<Value> {
        let tag = self.tag()?;
        if tag != RawTag::Array {
            return Err(Error::type_mismatch("array", Type::from(tag).name()));
        }
        let header = read_aggregate_header(&self.image, self.offset);
        if index >= header.count {
            return Err(Error::out_of_range(format!(
                "index {index} out of bounds (len {})",
                header.count
            )));
        }
        let rel = read_table_entry(&self.image, &header, index);
        Ok(Value::Buffer(Buffer::new(self.image.clone(), self.offset + rel)))
    }

    fn object_header(&self) -> Result<AggregateHeader> {
        let tag = self.tag()?;
        if tag != RawTag::Object {
            return Err(Error::type_mismatch("object", Type::from(tag).name()));
        }
        Ok(read_aggregate_header(&self.image, self.offset))
    }

    fn pair_start(&self, header: &AggregateHeader, index: usize) -> usize {
        self.offset + read_table_entry(&self.image, header, index)
    }

    fn key_bytes_at(&self, pair_start: usize) -> &[u8] {
        let (start, len) = read_key(&self.image, pair_start);
        &self.image[start..start + len]
    }

    /// §4.5: binary search over the sorted key offset table,
    /// byte-lexicographic comparison — `O(log n)` in field count (§8
    /// invariant 7).
    fn binary_search(&self, header: &AggregateHeader, key: &str) -> Option<usize> {
        let query = key.as_bytes();
        let mut lo = 0usize;
        let mut hi = header.count;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let candidate = self.key_bytes_at(self.pair_start(header, mid));
            match candidate.cmp(query) {
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
                std::cmp::Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    pub fn get_by_str(&self, key: &str) -> Result<Value> {
        let header = self.object_header()?;
        match self.binary_search(&header, key) {
            None => Ok(Value::null()),
            Some(index) => self.value_at_pair(&header, index),
        }
    }

    pub fn at(&self, key: &str) -> Result<Value> {
        let header = self.object_header()?;
        match self.binary_search(&header, key) {
            None => Err(Error::out_of_range(format!("no such key {key:?}"))),
            Some(index) => self.value_at_pair(&header, index),
        }
    }

    pub fn has_key(&self, key: &str) -> Result<bool> {
        let header = self.object_header()?;
        Ok(self.binary_search(&header, key).is_some())
    }

    fn value_at_pair(&self, header: &AggregateHeader, index: usize) -> Result<Value> {
        let pair_start = self.pair_start(header, index);
        let (key_start, key_len) = read_key(&self.image, pair_start);
        let value_start = key_start + key_len;
        Ok(Value::Buffer(Buffer::new(self.image.clone(), value_start)))
    }

    /// The key at an object cursor position (§4.6 key cursor).
    pub fn key_at(&self, index: usize) -> Result<WireStr> {
        let header = self.object_header()?;
        if index >= header.count {
            return Err(Error::out_of_range(format!(
                "index {index} out of bounds (len {})",
                header.count
            )));
        }
        let pair_start = self.pair_start(&header, index);
        let (start, len) = read_key(&self.image, pair_start);
        Ok(WireStr::new(self.image.clone(), start, len))
    }

    /// The value at an array-or-object cursor position, by table index
    /// rather than by key (used by `Cursor::value`, which can't use
    /// `get_index` directly since that only accepts arrays).
    pub(crate) fn value_at_index(&self, index: usize) -> Result<Value> {
        match self.tag()? {
            RawTag::Array => self.get_index(index),
            RawTag::Object => {
                let header = self.object_header()?;
                self.value_at_pair(&header, index)
            }
            other => Err(Error::type_mismatch("array or object", Type::from(other).name())),
        }
    }
}
