// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Traits describing the number of bytes things occupy in a buffer.

use bytes::Bytes;

/// Trait for things that always take the same number of bytes in a buffer.
pub trait ConstantWidth {
    /// The number of bytes needed in a buffer.
    const WIDTH: usize;
}

macro_rules! constant_width_primitive {
    ($($t:ty),*) => {
        $(
            impl ConstantWidth for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();
            }
        )*
    };
}

constant_width_primitive!(i8, u8, i16, u16, i32, u32, f32, f64);

/// Trait for values that know their exact size in bytes.
pub trait Width {
    /// Number of bytes this occupies (or will occupy, for an encoder).
    fn width(&self) -> usize;
}

impl Width for Bytes {
    fn width(&self) -> usize {
        self.len()
    }
}

/// Number of bytes the UTF-8 encoding of a string occupies.
///
/// This is what a string encoder caches, and what a string decoder must be
/// told to read.
///
/// ```
/// assert_eq!(bytekit::string_width("brød"), 5);
/// ```
pub fn string_width(s: &str) -> usize {
    // Rust strings are stored as UTF-8 already.
    s.len()
}
