//! Record format codec.
//!
//! Encodes and decodes single `key: value` pairs in the restricted flat
//! textual representation used by both the legacy flat-file results and
//! the record store's extension blob. Supported value types are integers,
//! floats, strings, and one-dimensional numeric arrays; floats are
//! written with 17 fractional digits of scientific notation so that
//! every finite IEEE-754 double round-trips bit-for-bit.

pub mod codec;
pub mod error;
pub mod format;
pub mod value;

pub use codec::{decode, decode_map, encode, encode_map, encode_value, validate_key};
pub use error::CodecError;
pub use format::format_float17;
pub use value::Value;
