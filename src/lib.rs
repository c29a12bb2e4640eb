// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Composable encoders and decoders for densely packed binary formats.
//!
//! Two halves:
//!
//! - `encode`: describe output as a tree of `Encoder`s whose exact width
//!   is known as soon as they are built, then write it with one allocation.
//! - `decode`: compose `Decoder`s that read values at an offset and
//!   either succeed or fail, including `decode::loop_with` for repeated
//!   structures of any length.
//!
//! No wire format is imposed: every byte layout comes from how you compose
//! the primitives.
//!
//! ```
//! use bytekit::{decode, encode, Endianness};
//! use bytekit::decode::Decoder;
//!
//! let e = encode::sequence(vec![
//!     encode::uint8(2),
//!     encode::float32(Endianness::Big, 1.5),
//!     encode::float32(Endianness::Big, -0.5),
//! ]);
//! let bytes = bytekit::encode(&e);
//! assert_eq!(bytes.len(), 9);
//!
//! let floats = decode::uint8()
//!     .and_then(|n| decode::repeat(n as usize, decode::float32(Endianness::Big)));
//! assert_eq!(bytekit::decode(&floats, &bytes), Some(vec![1.5, -0.5]));
//! ```

pub mod decode;
pub mod encode;
mod endianness;
pub mod error;
pub mod length_prefixed;
mod width;

pub use bytes::Bytes;

pub use crate::{
    decode::{decode, decode_exact, try_decode, try_decode_exact, DecodeOnce, Decoder, Step},
    encode::{encode, Encoder},
    endianness::{host_endianness, Endianness},
    error::{DecodeError, EncodeError},
    width::{string_width, ConstantWidth, Width},
};
