// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Traits, combinators, and drivers for decoding values out of bytes.
//!
//! A decoder is run against a source `Bytes` at some offset, and either
//! succeeds with the offset just past what it read plus a value, or fails.
//! Decoders are values: build them once, run them as often as you like.
//!
//! ```
//! use bytekit::{decode, encode, Endianness};
//! use bytekit::decode::Decoder;
//!
//! let point = decode::map2(
//!     |x, y| (x, y),
//!     decode::int16(Endianness::Big),
//!     decode::int16(Endianness::Big),
//! );
//! let bytes = encode::encode(&encode::sequence(vec![
//!     encode::int16(Endianness::Big, -3),
//!     encode::int16(Endianness::Big, 4),
//! ]));
//! assert_eq!(decode::decode(&point, &bytes), Some((-3, 4)));
//! assert_eq!(decode::decode(&point.map(|(x, _)| x), &bytes), Some(-3));
//! ```

mod combinators;
mod primitives;
mod repeat;

pub use self::{
    combinators::{
        fail, from_fn, map2, map3, map4, map5, succeed, AndThen, Fail, FromFn, Map, MapOnce,
        Succeed,
    },
    primitives::{
        bytes, float32, float64, int16, int32, int8, string, uint16, uint32, uint8, Float32,
        Float64, Int16, Int32, Int8, RawBytes, Uint16, Uint32, Uint8, Utf8String,
    },
    repeat::{loop_with, repeat, Branch, Loop, Repeat, Step},
};

use bytes::Bytes;
use tracing::debug;

use crate::error::DecodeError;

/// Shorthand for what running a decoder returns: the new offset and the value.
pub type DecodeResult<T> = std::result::Result<(usize, T), DecodeError>;

/// A type-erased decoder, for when branches of an `and_then` need to return different decoders.
pub type BoxDecoder<'a, T> = Box<dyn Decoder<Output = T> + 'a>;

/// Trait for reusable computations that read a value from bytes.
pub trait Decoder {
    /// The type of value produced.
    type Output;

    /// Run starting at `offset` within `source`.
    ///
    /// On success, returns the offset just past the consumed bytes along with the value,
    /// where `offset <= new_offset <= source.len()`.
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<Self::Output>;

    /// Transform the decoded value. `f` is not called if decoding fails.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map::new(self, f)
    }

    /// Decode a value, then use it to choose the decoder for what follows.
    ///
    /// `f` is not called if this decoder fails.
    fn and_then<F, D>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> D,
        D: Decoder,
    {
        AndThen::new(self, f)
    }

    /// Erase the type of this decoder.
    fn boxed<'a>(self) -> BoxDecoder<'a, Self::Output>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<D: Decoder + ?Sized> Decoder for &D {
    type Output = D::Output;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<D::Output> {
        (**self).decode_at(source, offset)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    type Output = D::Output;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<D::Output> {
        (**self).decode_at(source, offset)
    }
}

/// Trait for decoders that are run at most once, consuming themselves.
///
/// Every `Decoder` is one of these. The step of a `loop_with` only has to be
/// one of these, so it can move the loop state into its result
/// (see `DecodeOnce::map_once`).
pub trait DecodeOnce {
    /// The type of value produced.
    type Output;

    /// Run once starting at `offset` within `source`.
    fn decode_once(self, source: &Bytes, offset: usize) -> DecodeResult<Self::Output>;

    /// Like `Decoder::map`, but `f` may consume what it captured.
    fn map_once<F, U>(self, f: F) -> MapOnce<Self, F>
    where
        Self: Sized,
        F: FnOnce(Self::Output) -> U,
    {
        MapOnce::new(self, f)
    }
}

impl<D: Decoder> DecodeOnce for D {
    type Output = <D as Decoder>::Output;
    fn decode_once(self, source: &Bytes, offset: usize) -> DecodeResult<<D as Decoder>::Output> {
        self.decode_at(source, offset)
    }
}

/// Run a decoder from the start of `source`.
///
/// Returns `None` if it fails anywhere. Bytes left over after it finishes are ignored.
pub fn decode<D: Decoder + ?Sized>(decoder: &D, source: &Bytes) -> Option<D::Output> {
    try_decode(decoder, source).ok()
}

/// Run a decoder from the start of `source`, keeping the reason for any failure.
pub fn try_decode<D: Decoder + ?Sized>(
    decoder: &D,
    source: &Bytes,
) -> Result<D::Output, DecodeError> {
    match decoder.decode_at(source, 0) {
        Ok((_, value)) => Ok(value),
        Err(e) => {
            debug!(error = %e, width = source.len(), "decode failed");
            Err(e)
        }
    }
}

/// Run a decoder from the start of `source`, requiring it to consume every byte.
pub fn decode_exact<D: Decoder + ?Sized>(decoder: &D, source: &Bytes) -> Option<D::Output> {
    try_decode_exact(decoder, source).ok()
}

/// Like `try_decode`, but fails with `DecodeError::TrailingBytes` if anything is left over.
pub fn try_decode_exact<D: Decoder + ?Sized>(
    decoder: &D,
    source: &Bytes,
) -> Result<D::Output, DecodeError> {
    let (consumed, value) = decoder.decode_at(source, 0).map_err(|e| {
        debug!(error = %e, width = source.len(), "decode failed");
        e
    })?;
    if consumed == source.len() {
        Ok(value)
    } else {
        let e = DecodeError::TrailingBytes {
            consumed,
            remaining: source.len() - consumed,
        };
        debug!(error = %e, "decode left trailing bytes");
        Err(e)
    }
}
