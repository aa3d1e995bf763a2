//! The owning byte image behind every buffer value (§3 "Buffer form").

use weft_core::{new_shared, Shared};

/// A finalized, immutable byte image. Every buffer value descending from
/// the same finalize (or the same user-supplied image) shares one of
/// these handles, so descending into a sub-value costs a refcount bump,
/// not a copy (§3, §4.5).
pub type ByteImage = Shared<Vec<u8>>;

/// Wrap a byte image produced elsewhere (e.g. read from disk or a
/// network socket) as an owning handle, for lifting without a prior
/// finalize (§4.2 lifecycle: "born from ... lifting a byte image
/// supplied by the user").
pub fn wrap(bytes: Vec<u8>) -> ByteImage {
    new_shared(bytes)
}
