//! weft-core: the wire-format and sharing primitives underneath the `weft`
//! value model.
//!
//! This crate has no notion of a heap tree or a buffer image — those live
//! in the `weft` crate, which builds them out of the primitives here.
//!
//! # Modules
//!
//! - `error`: the three-kind error type shared by every fallible operation.
//! - `ordered`: fixed-endianness scalar wrapper for wire-format fields.
//! - `tag`: the wire tag byte assignment and the logical `Type` enum.
//! - `handle`: the pluggable refcounted handle (`Rc`/`RefCell` by default,
//!   `Arc`/`RwLock` under the `sync` feature) and the copy-on-write
//!   primitive built on top of it.
//! - `sstring`: the small-string / dynamic-string heap string layout.

pub mod error;
pub mod handle;
pub mod ordered;
pub mod sstring;
pub mod tag;

pub use error::{Error, Result};
pub use handle::{cow, new_handle, new_shared, strong_count, Guard, Handle, Shared};
pub use ordered::{Ordered, WireScalar};
pub use sstring::{HeapStr, DEFAULT_SMALL_CAP, MAX_KEY_LEN, MAX_STRING_LEN};
pub use tag::{RawTag, Type};
