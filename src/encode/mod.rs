// Copyright 2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Building byte-exact encoders.
//!
//! An `Encoder` is a tree describing some bytes: fixed-width numbers, raw
//! byte runs, UTF-8 strings, and sequences of those. Every node knows its
//! exact width as soon as it is built, so `encode` can allocate the output
//! once and fill it in a single pass.
//!
//! ```
//! use bytekit::{encode, Endianness};
//! let message = encode::sequence(vec![
//!     encode::uint8(1),
//!     encode::uint16(Endianness::Big, 0x0203),
//!     encode::string("hi"),
//! ]);
//! assert_eq!(&encode::encode(&message)[..], &[1, 2, 3, b'h', b'i'][..]);
//! ```

mod buffer;

pub use self::buffer::encode;

use crate::{
    width::{string_width, ConstantWidth, Width},
    Endianness,
};
use bytes::Bytes;
use std::iter::FromIterator;

/// A description of bytes to write, with its width computed up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoder(Node);

#[derive(Debug, Clone, PartialEq)]
enum Node {
    I8(i8),
    U8(u8),
    I16(Endianness, i16),
    U16(Endianness, u16),
    I32(Endianness, i32),
    U32(Endianness, u32),
    F32(Endianness, f32),
    F64(Endianness, f64),
    Bytes(Bytes),
    Utf8 { string: String, width: usize },
    Sequence { children: Vec<Encoder>, width: usize },
}

impl Width for Encoder {
    fn width(&self) -> usize {
        match &self.0 {
            Node::I8(_) => i8::WIDTH,
            Node::U8(_) => u8::WIDTH,
            Node::I16(..) => i16::WIDTH,
            Node::U16(..) => u16::WIDTH,
            Node::I32(..) => i32::WIDTH,
            Node::U32(..) => u32::WIDTH,
            Node::F32(..) => f32::WIDTH,
            Node::F64(..) => f64::WIDTH,
            Node::Bytes(b) => b.width(),
            Node::Utf8 { width, .. } => *width,
            Node::Sequence { width, .. } => *width,
        }
    }
}

impl Encoder {
    /// An encoder that writes nothing: an empty sequence.
    pub fn empty() -> Encoder {
        Encoder(Node::Sequence {
            children: Vec::new(),
            width: 0,
        })
    }
}

/// Children are detached onto a work list first, so dropping a deeply
/// nested tree does not recurse.
impl Drop for Encoder {
    fn drop(&mut self) {
        let mut pending = match &mut self.0 {
            Node::Sequence { children, .. } if !children.is_empty() => std::mem::take(children),
            _ => return,
        };
        while let Some(mut child) = pending.pop() {
            if let Node::Sequence { children, .. } = &mut child.0 {
                pending.append(children);
            }
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::empty()
    }
}

/// Collecting encoders produces their sequence.
impl FromIterator<Encoder> for Encoder {
    fn from_iter<I: IntoIterator<Item = Encoder>>(iter: I) -> Self {
        sequence(iter)
    }
}

/// Encode a signed 8-bit integer.
pub fn int8(value: i8) -> Encoder {
    Encoder(Node::I8(value))
}

/// Encode an unsigned 8-bit integer.
pub fn uint8(value: u8) -> Encoder {
    Encoder(Node::U8(value))
}

/// Encode a signed 16-bit integer in the given byte order.
pub fn int16(endianness: Endianness, value: i16) -> Encoder {
    Encoder(Node::I16(endianness, value))
}

/// Encode an unsigned 16-bit integer in the given byte order.
///
/// ```
/// use bytekit::{encode, Endianness};
/// assert_eq!(&encode::encode(&encode::uint16(Endianness::Big, 7))[..], &[0x00, 0x07][..]);
/// assert_eq!(&encode::encode(&encode::uint16(Endianness::Little, 7))[..], &[0x07, 0x00][..]);
/// ```
pub fn uint16(endianness: Endianness, value: u16) -> Encoder {
    Encoder(Node::U16(endianness, value))
}

/// Encode a signed 32-bit integer in the given byte order.
pub fn int32(endianness: Endianness, value: i32) -> Encoder {
    Encoder(Node::I32(endianness, value))
}

/// Encode an unsigned 32-bit integer in the given byte order.
pub fn uint32(endianness: Endianness, value: u32) -> Encoder {
    Encoder(Node::U32(endianness, value))
}

/// Encode a 32-bit IEEE-754 float in the given byte order.
pub fn float32(endianness: Endianness, value: f32) -> Encoder {
    Encoder(Node::F32(endianness, value))
}

/// Encode a 64-bit IEEE-754 float in the given byte order.
pub fn float64(endianness: Endianness, value: f64) -> Encoder {
    Encoder(Node::F64(endianness, value))
}

/// Copy existing bytes into the output as-is.
pub fn bytes(value: Bytes) -> Encoder {
    Encoder(Node::Bytes(value))
}

/// Encode a string as UTF-8, with no length or terminator.
///
/// Its width is the UTF-8 byte count, which can be larger than the number of characters:
/// a decoder will need `string_width(s)`, not `s.chars().count()`.
pub fn string<S: Into<String>>(value: S) -> Encoder {
    let string = value.into();
    let width = string_width(&string);
    Encoder(Node::Utf8 { string, width })
}

/// Encode a list of encoders one after another.
///
/// The total width is summed here, once.
pub fn sequence<I: IntoIterator<Item = Encoder>>(encoders: I) -> Encoder {
    let children: Vec<Encoder> = encoders.into_iter().collect();
    let width = children.iter().map(Width::width).sum();
    Encoder(Node::Sequence { children, width })
}
