//! Fixed-endianness scalar wrapper used for every numeric field written to
//! the wire image.
//!
//! The buffer form must not assume host endianness (§4.4, §6): integers and
//! decimals are stored little-endian regardless of the platform reading or
//! writing them. `Ordered<T>` makes that explicit at the type level instead
//! of relying on call-site discipline — the same role `byteorder`'s
//! `ReadBytesExt`/`WriteBytesExt` play when reading a field out of a byte
//! slice, but kept as a `repr(transparent)` value type so offset-table
//! widths and header fields can be written with ordinary struct literals.

use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use std::marker::PhantomData;

/// A trait implemented by the scalar types the wire format stores:
/// conversion to/from a little-endian byte array of a fixed width.
pub trait WireScalar: Copy {
    const WIDTH: usize;
    fn to_le_bytes_vec(self) -> Vec<u8>;
    fn from_le_slice(bytes: &[u8]) -> Self;
}

impl WireScalar for u8 {
    const WIDTH: usize = 1;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        vec![self]
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl WireScalar for u16 {
    const WIDTH: usize = 2;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, self);
        buf.to_vec()
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        LittleEndian::read_u16(bytes)
    }
}

impl WireScalar for u32 {
    const WIDTH: usize = 4;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, self);
        buf.to_vec()
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        LittleEndian::read_u32(bytes)
    }
}

impl WireScalar for u64 {
    const WIDTH: usize = 8;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        let mut buf = [0u8; 8];
        LittleEndian::write_u64(&mut buf, self);
        buf.to_vec()
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        LittleEndian::read_u64(bytes)
    }
}

impl WireScalar for i64 {
    const WIDTH: usize = 8;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        let mut buf = [0u8; 8];
        LittleEndian::write_i64(&mut buf, self);
        buf.to_vec()
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        LittleEndian::read_i64(bytes)
    }
}

impl WireScalar for f64 {
    const WIDTH: usize = 8;
    fn to_le_bytes_vec(self) -> Vec<u8> {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, self);
        buf.to_vec()
    }
    fn from_le_slice(bytes: &[u8]) -> Self {
        LittleEndian::read_f64(bytes)
    }
}

/// A scalar stored on the wire in a fixed (little-endian) byte order.
///
/// `Ordered<T>` is `repr(transparent)` over `T`: in memory it is exactly
/// `size_of::<T>()` bytes and behaves like `T` for arithmetic and
/// comparison. It exists to mark, at the type level, values that came from
/// or are going to the wire image rather than a native in-memory field.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Ordered<T> {
    value: T,
    _marker: PhantomData<()>,
}

impl<T: WireScalar> Ordered<T> {
    pub fn new(value: T) -> Self {
        Ordered {
            value,
            _marker: PhantomData,
        }
    }

    pub fn get(self) -> T {
        self.value
    }

    /// Encode to little-endian bytes, appending to `out`.
    pub fn write_to(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.value.to_le_bytes_vec());
    }

    /// Decode from a little-endian byte slice of exactly `T::WIDTH` bytes.
    pub fn read_from(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() >= T::WIDTH);
        Ordered::new(T::from_le_slice(&bytes[..T::WIDTH]))
    }
}

impl<T: fmt::Debug> fmt::Debug for Ordered<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, f)
    }
}

impl<T> From<T> for Ordered<T>
where
    T: WireScalar,
{
    fn from(value: T) -> Self {
        Ordered::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_round_trip_is_little_endian() {
        let v = Ordered::new(0x0102_0304u32);
        let mut buf = Vec::new();
        v.write_to(&mut buf);
        assert_eq!(buf, vec![0x04, 0x03, 0x02, 0x01]);
        assert_eq!(Ordered::<u32>::read_from(&buf).get(), 0x0102_0304);
    }

    #[test]
    fn i64_round_trip_preserves_sign() {
        let v = Ordered::new(-42i64);
        let mut buf = Vec::new();
        v.write_to(&mut buf);
        assert_eq!(Ordered::<i64>::read_from(&buf).get(), -42);
    }

    #[test]
    fn f64_round_trip() {
        let v = Ordered::new(2.5f64);
        let mut buf = Vec::new();
        v.write_to(&mut buf);
        assert_eq!(Ordered::<f64>::read_from(&buf).get(), 2.5);
    }

    #[test]
    fn size_is_preserved() {
        assert_eq!(std::mem::size_of::<Ordered<u32>>(), std::mem::size_of::<u32>());
        assert_eq!(std::mem::size_of::<Ordered<i64>>(), std::mem::size_of::<i64>());
    }
}
