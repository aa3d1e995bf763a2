//! The read-only buffer representation (§3 "Buffer form", §4.4, §4.5).
//!
//! A buffer value is `(image, offset)`: the image is the shared,
//! immutable byte array produced by finalize (or supplied directly by a
//! caller); the offset selects the sub-value's tag byte within it. All
//! reads are computed directly against the image — nothing is copied
//! out except scalars and string contents.

pub mod image;
pub mod read;

use image::ByteImage;
use weft_core::RawTag;

/// A read-only view into a finalized byte image (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    pub(crate) image: ByteImage,
    pub(crate) offset: usize,
}

impl Buffer {
    pub(crate) fn new(image: ByteImage, offset: usize) -> Self {
        Buffer { image, offset }
    }

    /// Build a buffer value over a user-supplied byte image, at offset 0
    /// (§4.2 lifecycle).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Buffer::new(image::wrap(bytes), 0)
    }

    pub(crate) fn tag(&self) -> weft_core::Result<RawTag> {
        read::tag_at(&self.image, self.offset)
    }
}

/// A borrowed UTF-8 slice into a buffer's byte image: the buffer-side
/// half of §6's "string-view contract". Keeping a clone of the image
/// handle alive for as long as the `WireStr` is held is what makes
/// `as_str` a safe, ordinary borrow with no unsafe code.
#[derive(Debug, Clone)]
pub struct WireStr {
    image: ByteImage,
    start: usize,
    len: usize,
}

impl WireStr {
    pub(crate) fn new(image: ByteImage, start: usize, len: usize) -> Self {
        WireStr { image, start, len }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.image[self.start..self.start + self.len])
            .expect("wire strings are valid utf8 by construction")
    }
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for WireStr {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for WireStr {}

/// Smallest offset-table field width (in bytes) that can address a block
/// of `total_size` bytes. The writer (finalize) and the reader (here)
/// apply the same threshold rule independently, so no width tag needs to
/// be stored on the wire (§4.4 point 4).
pub(crate) fn offset_width(total_size: u32) -> usize {
    if total_size <= u8::MAX as u32 {
        1
    } else if total_size <= u16::MAX as u32 {
        2
    } else {
        4
    }
}

pub(crate) fn read_width_uint(bytes: &[u8], width: usize) -> usize {
    match width {
        1 => bytes[0] as usize,
        2 => weft_core::Ordered::<u16>::read_from(bytes).get() as usize,
        _ => weft_core::Ordered::<u32>::read_from(bytes).get() as usize,
    }
}

pub(crate) fn write_width_uint(out: &mut Vec<u8>, value: usize, width: usize) {
    match width {
        1 => out.push(value as u8),
        2 => weft_core::Ordered::new(value as u16).write_to(out),
        _ => weft_core::Ordered::new(value as u32).write_to(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_width_thresholds() {
        assert_eq!(offset_width(0), 1);
        assert_eq!(offset_width(255), 1);
        assert_eq!(offset_width(256), 2);
        assert_eq!(offset_width(65535), 2);
        assert_eq!(offset_width(65536), 4);
    }
}
