// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

use bytes::{Buf, Bytes};

use super::{DecodeResult, Decoder};
use crate::{
    error::{check_remaining, DecodeError},
    width::ConstantWidth,
    Endianness,
};

macro_rules! single_byte_decoder {
    ($name:ident, $ctor:ident, $t:ty, $get:ident) => {
        #[doc = concat!("Decoder for a single `", stringify!($t), "` byte.")]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        #[doc = concat!("Decode a `", stringify!($t), "`, failing if no bytes remain.")]
        pub fn $ctor() -> $name {
            $name
        }

        impl Decoder for $name {
            type Output = $t;
            fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<$t> {
                check_remaining(source, offset, <$t>::WIDTH)?;
                let mut chunk = &source[offset..];
                Ok((offset + <$t>::WIDTH, chunk.$get()))
            }
        }
    };
}

macro_rules! ordered_decoder {
    ($name:ident, $ctor:ident, $t:ty, $get_be:ident, $get_le:ident) => {
        #[doc = concat!("Decoder for a `", stringify!($t), "` in a given byte order.")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Endianness);

        #[doc = concat!(
            "Decode a `", stringify!($t), "` in the given byte order, ",
            "failing if fewer than its width in bytes remain."
        )]
        pub fn $ctor(endianness: Endianness) -> $name {
            $name(endianness)
        }

        impl Decoder for $name {
            type Output = $t;
            fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<$t> {
                check_remaining(source, offset, <$t>::WIDTH)?;
                let mut chunk = &source[offset..offset + <$t>::WIDTH];
                let value = if self.0.is_little() {
                    chunk.$get_le()
                } else {
                    chunk.$get_be()
                };
                Ok((offset + <$t>::WIDTH, value))
            }
        }
    };
}

single_byte_decoder!(Int8, int8, i8, get_i8);
single_byte_decoder!(Uint8, uint8, u8, get_u8);
ordered_decoder!(Int16, int16, i16, get_i16, get_i16_le);
ordered_decoder!(Uint16, uint16, u16, get_u16, get_u16_le);
ordered_decoder!(Int32, int32, i32, get_i32, get_i32_le);
ordered_decoder!(Uint32, uint32, u32, get_u32, get_u32_le);
ordered_decoder!(Float32, float32, f32, get_f32, get_f32_le);
ordered_decoder!(Float64, float64, f64, get_f64, get_f64_le);

/// Decoder for a run of raw bytes of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawBytes {
    len: usize,
}

/// Decode exactly `len` bytes.
///
/// The result shares memory with the source rather than copying it.
pub fn bytes(len: usize) -> RawBytes {
    RawBytes { len }
}

impl Decoder for RawBytes {
    type Output = Bytes;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<Bytes> {
        check_remaining(source, offset, self.len)?;
        let end = offset + self.len;
        Ok((end, source.slice(offset..end)))
    }
}

/// Decoder for a UTF-8 string occupying a known number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utf8String {
    len: usize,
}

/// Decode a UTF-8 string that is `len` bytes long (not `len` characters).
///
/// Fails if the bytes are not valid UTF-8.
pub fn string(len: usize) -> Utf8String {
    Utf8String { len }
}

impl Decoder for Utf8String {
    type Output = String;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<String> {
        check_remaining(source, offset, self.len)?;
        let end = offset + self.len;
        let s = std::str::from_utf8(&source[offset..end])
            .map_err(|e| DecodeError::InvalidUtf8 { offset, source: e })?;
        Ok((end, s.to_owned()))
    }
}
