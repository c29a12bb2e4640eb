// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Variable-length data preceded by its length.
//!
//! ```
//! use bytekit::{decode, length_prefixed::{self, LengthPrefix}, Endianness};
//!
//! let prefix = LengthPrefix::U16(Endianness::Big);
//! let e = length_prefixed::encode_string(prefix, "brød").unwrap();
//! let bytes = bytekit::encode(&e);
//! assert_eq!(&bytes[..], &[0x00, 0x05, 0x62, 0x72, 0xC3, 0xB8, 0x64][..]);
//! assert_eq!(
//!     decode::decode(&length_prefixed::decode_string(prefix), &bytes),
//!     Some("brød".to_string())
//! );
//! ```

use bytes::Bytes;
use std::convert::TryFrom;

use crate::{
    decode::{self, DecodeResult, Decoder},
    encode::{self, Encoder},
    error::EncodeError,
    width::ConstantWidth,
    Endianness,
};

/// The integer type used to carry a length.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LengthPrefix {
    U8,
    U16(Endianness),
    U32(Endianness),
}

impl LengthPrefix {
    /// Largest length this prefix can carry.
    pub fn max(self) -> usize {
        match self {
            LengthPrefix::U8 => usize::from(u8::MAX),
            LengthPrefix::U16(_) => usize::from(u16::MAX),
            LengthPrefix::U32(_) => usize::try_from(u32::MAX).unwrap_or(usize::MAX),
        }
    }

    /// Number of bytes the prefix itself takes.
    pub fn width(self) -> usize {
        match self {
            LengthPrefix::U8 => u8::WIDTH,
            LengthPrefix::U16(_) => u16::WIDTH,
            LengthPrefix::U32(_) => u32::WIDTH,
        }
    }

    /// Encoder for the prefix carrying `length`.
    pub fn encoder(self, length: usize) -> Result<Encoder, EncodeError> {
        let overflow = EncodeError::LengthOverflow {
            length,
            max: self.max(),
        };
        Ok(match self {
            LengthPrefix::U8 => encode::uint8(u8::try_from(length).map_err(|_| overflow)?),
            LengthPrefix::U16(e) => {
                encode::uint16(e, u16::try_from(length).map_err(|_| overflow)?)
            }
            LengthPrefix::U32(e) => {
                encode::uint32(e, u32::try_from(length).map_err(|_| overflow)?)
            }
        })
    }

    /// Decoder reading the prefix as a length.
    pub fn decoder(self) -> LengthDecoder {
        LengthDecoder(self)
    }
}

/// Decoder returned by `LengthPrefix::decoder`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LengthDecoder(LengthPrefix);

impl Decoder for LengthDecoder {
    type Output = usize;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<usize> {
        match self.0 {
            LengthPrefix::U8 => decode::uint8().map(usize::from).decode_at(source, offset),
            LengthPrefix::U16(e) => decode::uint16(e)
                .map(usize::from)
                .decode_at(source, offset),
            LengthPrefix::U32(e) => decode::uint32(e)
                .map(|n| n as usize)
                .decode_at(source, offset),
        }
    }
}

/// Encode raw bytes preceded by their length.
pub fn encode_bytes(prefix: LengthPrefix, value: Bytes) -> Result<Encoder, EncodeError> {
    Ok(encode::sequence(vec![
        prefix.encoder(value.len())?,
        encode::bytes(value),
    ]))
}

/// Encode a string preceded by its UTF-8 width in bytes.
pub fn encode_string(prefix: LengthPrefix, value: &str) -> Result<Encoder, EncodeError> {
    let body = encode::string(value);
    Ok(encode::sequence(vec![
        prefix.encoder(crate::string_width(value))?,
        body,
    ]))
}

/// Encode a list preceded by its element count, encoding each element with `f`.
pub fn encode_list<T, F>(prefix: LengthPrefix, items: &[T], f: F) -> Result<Encoder, EncodeError>
where
    F: Fn(&T) -> Encoder,
{
    let count = prefix.encoder(items.len())?;
    Ok(std::iter::once(count).chain(items.iter().map(f)).collect())
}

/// Decode raw bytes preceded by their length.
pub fn decode_bytes(prefix: LengthPrefix) -> impl Decoder<Output = Bytes> + Clone {
    prefix.decoder().and_then(decode::bytes)
}

/// Decode a string preceded by its UTF-8 width in bytes.
pub fn decode_string(prefix: LengthPrefix) -> impl Decoder<Output = String> + Clone {
    prefix.decoder().and_then(decode::string)
}

/// Decode a list preceded by its element count.
pub fn decode_list<D>(
    prefix: LengthPrefix,
    element: D,
) -> impl Decoder<Output = Vec<D::Output>> + Clone
where
    D: Decoder + Clone,
{
    prefix
        .decoder()
        .and_then(move |count| decode::repeat(count, element.clone()))
}
