//! Heap → buffer: the finalize transcoder (§4.4).
//!
//! A post-order traversal: each aggregate first encodes its children
//! into local byte vectors, then writes its own tag, size, count, and
//! offset table in front of them. Object children are sorted by
//! byte-lexicographic key order before layout, which is what makes a
//! finalized object's field table binary-searchable (§4.5, §8 invariant
//! 7).

use crate::buffer::{image, offset_width, write_width_uint, Buffer};
use crate::heap::object::{ObjectMap, Str};
use crate::{Heap, Value};
use tracing::debug;
use weft_core::{Error, Ordered, RawTag, Result};

const HEADER_FIXED_WIDTH: usize = 1 + 4 + 4; // tag + total_size + count

/// Lower `heap` into an immutable, self-describing byte image. `heap`
/// itself is untouched (§3 lifecycle).
pub fn finalize(heap: &Heap) -> Result<Buffer> {
    debug!("finalize: begin");
    let bytes = encode_heap(heap)?;
    debug!(bytes = bytes.len(), "finalize: done");
    Ok(Buffer::new(image::wrap(bytes), 0))
}

fn encode_value(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Heap(h) => encode_heap(h),
        // An already-finalized sub-value embedded in a heap tree is
        // re-expanded through `lift` before encoding. This keeps the
        // wire format canonical (always freshly laid out by this
        // finalize pass) at the cost of redundant work in the rare case
        // where a caller mixes buffer sub-values into a heap tree.
        Value::Buffer(b) => encode_heap(&crate::lift::lift(b)?),
    }
}

fn encode_heap(heap: &Heap) -> Result<Vec<u8>> {
    match heap {
        Heap::Null => Ok(vec![RawTag::Null.as_byte()]),
        Heap::Boolean(b) => Ok(vec![RawTag::Boolean.as_byte(), *b as u8]),
        Heap::Integer(i) => {
            let mut out = vec![RawTag::Integer.as_byte()];
            Ordered::new(*i).write_to(&mut out);
            Ok(out)
        }
        Heap::Decimal(d) => {
            let mut out = vec![RawTag::Decimal.as_byte()];
            Ordered::new(*d).write_to(&mut out);
            Ok(out)
        }
        Heap::String(s) => Ok(encode_string(s.as_str())),
        Heap::Array(handle) => encode_array(&handle.borrow()),
        Heap::Object(handle) => encode_object(&handle.borrow()),
    }
}

fn encode_string(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let (tag, width) = if bytes.len() <= u8::MAX as usize {
        (RawTag::SmallString, 1)
    } else if bytes.len() <= u16::MAX as usize {
        (RawTag::String, 2)
    } else {
        (RawTag::BigString, 4)
    };
    let mut out = vec![tag.as_byte()];
    write_width_uint(&mut out, bytes.len(), width);
    out.extend_from_slice(bytes);
    out.push(0); // terminator; reused as the remaining-count byte on the heap side (§9), written explicitly here since the wire format has no such union.
    out
}

fn encode_key(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + s.len());
    Ordered::new(s.len() as u16).write_to(&mut out);
    out.extend_from_slice(s.as_bytes());
    out
}

/// Smallest offset width and the resulting fixed header length for an
/// aggregate with `count` children totalling `children_len` bytes.
fn choose_width(count: usize, children_len: usize) -> (usize, usize) {
    for width in [1usize, 2, 4] {
        let header_len = HEADER_FIXED_WIDTH + count * width;
        let total = header_len + children_len;
        let max_addressable = match width {
            1 => u8::MAX as usize,
            2 => u16::MAX as usize,
            _ => u32::MAX as usize,
        };
        if total <= max_addressable {
            return (width, header_len);
        }
    }
    unreachable!("width 4 addresses up to u32::MAX, which every valid image fits under")
}

fn write_aggregate(
    out: &mut Vec<u8>,
    tag: RawTag,
    offsets: &[usize],
    children: &[Vec<u8>],
) -> Result<()> {
    let children_len: usize = children.iter().map(|c| c.len()).sum();
    let (width, header_len) = choose_width(children.len(), children_len);
    let total_size = header_len + children_len;
    if total_size > u32::MAX as usize {
        return Err(Error::invalid_argument("aggregate exceeds the 4GiB wire size limit"));
    }
    debug_assert_eq!(offset_width(total_size as u32), width);

    out.push(tag.as_byte());
    Ordered::new(total_size as u32).write_to(out);
    Ordered::new(children.len() as u32).write_to(out);
    for &offset in offsets {
        write_width_uint(out, offset, width);
    }
    for child in children {
        out.extend_from_slice(child);
    }
    Ok(())
}

fn encode_array(items: &[Value]) -> Result<Vec<u8>> {
    let children: Vec<Vec<u8>> = items.iter().map(encode_value).collect::<Result<_>>()?;
    let (_, header_len) = choose_width(children.len(), children.iter().map(|c| c.len()).sum());
    let mut offsets = Vec::with_capacity(children.len());
    let mut cursor = header_len;
    for child in &children {
        offsets.push(cursor);
        cursor += child.len();
    }
    let mut out = Vec::with_capacity(cursor);
    write_aggregate(&mut out, RawTag::Array, &offsets, &children)?;
    Ok(out)
}

fn encode_object(map: &ObjectMap) -> Result<Vec<u8>> {
    let mut pairs: Vec<(&Str, Vec<u8>)> = map
        .iter()
        .map(|(k, v)| encode_value(v).map(|bytes| (k, bytes)))
        .collect::<Result<_>>()?;
    pairs.sort_by(|a, b| a.0.as_str().as_bytes().cmp(b.0.as_str().as_bytes()));

    let children: Vec<Vec<u8>> = pairs
        .iter()
        .map(|(k, v)| {
            let mut pair = encode_key(k.as_str());
            pair.extend_from_slice(v);
            pair
        })
        .collect();

    let (_, header_len) = choose_width(children.len(), children.iter().map(|c| c.len()).sum());
    let mut offsets = Vec::with_capacity(children.len());
    let mut cursor = header_len;
    for child in &children {
        offsets.push(cursor);
        cursor += child.len();
    }
    let mut out = Vec::with_capacity(cursor);
    write_aggregate(&mut out, RawTag::Object, &offsets, &children)?;
    Ok(out)
}
