//! weft: schemaless structured data with a dual heap/buffer
//! representation.
//!
//! A [`Value`] is either a mutable [`Heap`] tree, built and mutated
//! through `insert`/`set`/`erase`/... (§4.2), or a read-only [`Buffer`]
//! view over a finalized, zero-copy byte image (§4.4, §4.5).
//! [`Value::finalize`] lowers a heap value to a buffer; [`Value::lift`]
//! reverses it.
//!
//! ```
//! use weft::Value;
//!
//! let mut obj = Value::make_object();
//! obj.add_field("name", "ada").unwrap();
//! obj.add_field("age", 36i64).unwrap();
//!
//! let buf = obj.finalize().unwrap();
//! assert_eq!(&*buf.get("name").unwrap().as_str().unwrap(), "ada");
//! ```
//!
//! # Modules
//!
//! - `heap`: the mutable tree — `heap::array`, `heap::object`,
//!   `heap::mutate`.
//! - `buffer`: the read-only wire-format view — `buffer::image`,
//!   `buffer::read`.
//! - `finalize` / `lift`: the bidirectional heap↔buffer transcoder.
//! - `cursor`: the unified iteration model over either representation.
//! - `convert`: `From<T> for Value` conversions (the `Convert` hook).
//! - `value`: the top-level [`Value`] enum that dispatches to whichever
//!   representation is active.

pub mod buffer;
pub mod convert;
pub mod cursor;
pub mod finalize;
pub mod heap;
pub mod lift;
pub mod value;

pub use buffer::{Buffer, WireStr};
pub use cursor::{Cursor, KeyRef};
pub use heap::object::Str;
pub use heap::Heap;
pub use value::Value;

pub use weft_core::{Error, Result, Type};
