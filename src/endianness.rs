// Copyright 2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Byte order selection for multi-byte primitives.

use std::fmt::{self, Display};

/// Byte order of a multi-byte integer or float.
///
/// Nothing in this crate assumes a "native" order: every 2, 4 or 8 byte
/// encoder and decoder takes one of these explicitly.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Endianness {
    /// Least significant byte first.
    Little,
    /// Most significant byte first, "network order".
    Big,
}

impl Endianness {
    pub fn is_little(self) -> bool {
        self == Endianness::Little
    }
}

/// Get the byte order of the machine we are running on.
///
/// Only useful when producing data for the same machine (memory-mapped files,
/// shared memory): pass the result explicitly to the encoders and decoders
/// that need it.
///
/// ```
/// use bytekit::{host_endianness, Endianness};
/// let e = host_endianness();
/// assert!(e == Endianness::Little || e == Endianness::Big);
/// ```
pub fn host_endianness() -> Endianness {
    if cfg!(target_endian = "little") {
        Endianness::Little
    } else {
        Endianness::Big
    }
}

impl Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endianness::Little => write!(f, "little-endian"),
            Endianness::Big => write!(f, "big-endian"),
        }
    }
}
