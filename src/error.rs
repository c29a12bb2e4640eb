// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

use std::str::Utf8Error;
use thiserror::Error;

/// Error type returned by decoding.
///
/// `decode` collapses all of these into `None`; use `try_decode` to see which one happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("decoding ran out of bytes at offset {offset}: need {needed}, only {remaining} remaining")]
    InsufficientBytes {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("decoder failed explicitly")]
    ExplicitFailure,
    #[error("invalid UTF-8 in string starting at offset {offset}: {source}")]
    InvalidUtf8 {
        offset: usize,
        #[source]
        source: Utf8Error,
    },
    #[error("decoding finished after {consumed} bytes, leaving {remaining} bytes unconsumed")]
    TrailingBytes { consumed: usize, remaining: usize },
}

impl DecodeError {
    /// True if the input was too short, rather than malformed.
    pub fn is_insufficient_bytes(&self) -> bool {
        matches!(self, DecodeError::InsufficientBytes { .. })
    }
}

/// Error type returned by the fallible (length-prefixed) encoder constructors.
///
/// Building and running a plain `Encoder` never fails.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeError {
    #[error("length {length} does not fit in a length prefix (maximum {max})")]
    LengthOverflow { length: usize, max: usize },
}

/// Check whether a source has enough bytes remaining at `offset` to read `needed` bytes.
///
/// An offset past the end fails even when nothing is needed.
pub fn check_remaining(source: &[u8], offset: usize, needed: usize) -> Result<(), DecodeError> {
    let remaining = source.len().saturating_sub(offset);
    if offset > source.len() || remaining < needed {
        Err(DecodeError::InsufficientBytes {
            offset,
            needed,
            remaining,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_checks() {
        let data = [0_u8; 4];
        assert!(check_remaining(&data, 0, 4).is_ok());
        assert!(check_remaining(&data, 4, 0).is_ok());
        assert_eq!(
            check_remaining(&data, 2, 4),
            Err(DecodeError::InsufficientBytes {
                offset: 2,
                needed: 4,
                remaining: 2
            })
        );
        // Offsets past the end count as nothing remaining.
        assert!(check_remaining(&data, 9, 1)
            .unwrap_err()
            .is_insufficient_bytes());
    }

    #[test]
    fn empty_read_past_end() {
        let data = [0_u8; 4];
        assert_eq!(
            check_remaining(&data, 5, 0),
            Err(DecodeError::InsufficientBytes {
                offset: 5,
                needed: 0,
                remaining: 0
            })
        );
    }

    #[test]
    fn messages() {
        let e = DecodeError::InsufficientBytes {
            offset: 0,
            needed: 4,
            remaining: 2,
        };
        assert_eq!(
            e.to_string(),
            "decoding ran out of bytes at offset 0: need 4, only 2 remaining"
        );
        assert_eq!(
            EncodeError::LengthOverflow {
                length: 300,
                max: 255
            }
            .to_string(),
            "length 300 does not fit in a length prefix (maximum 255)"
        );
        assert!(!DecodeError::ExplicitFailure.is_insufficient_bytes());
    }
}
