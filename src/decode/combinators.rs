// Copyright 2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Decoders built out of other decoders.

use bytes::Bytes;
use std::{fmt, marker::PhantomData};

use super::{DecodeOnce, DecodeResult, Decoder};
use crate::error::DecodeError;

/// Decoder returned by `Decoder::map`.
#[derive(Debug, Clone, Copy)]
pub struct Map<D, F> {
    decoder: D,
    f: F,
}

impl<D, F> Map<D, F> {
    pub(crate) fn new(decoder: D, f: F) -> Self {
        Self { decoder, f }
    }
}

impl<D, F, U> Decoder for Map<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> U,
{
    type Output = U;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<U> {
        let (offset, value) = self.decoder.decode_at(source, offset)?;
        Ok((offset, (self.f)(value)))
    }
}

/// One-shot decoder returned by `DecodeOnce::map_once`.
#[derive(Debug, Clone, Copy)]
pub struct MapOnce<D, F> {
    decoder: D,
    f: F,
}

impl<D, F> MapOnce<D, F> {
    pub(crate) fn new(decoder: D, f: F) -> Self {
        Self { decoder, f }
    }
}

impl<D, F, U> DecodeOnce for MapOnce<D, F>
where
    D: DecodeOnce,
    F: FnOnce(D::Output) -> U,
{
    type Output = U;
    fn decode_once(self, source: &Bytes, offset: usize) -> DecodeResult<U> {
        let (offset, value) = self.decoder.decode_once(source, offset)?;
        Ok((offset, (self.f)(value)))
    }
}

/// Decoder returned by `Decoder::and_then`.
#[derive(Debug, Clone, Copy)]
pub struct AndThen<D, F> {
    decoder: D,
    f: F,
}

impl<D, F> AndThen<D, F> {
    pub(crate) fn new(decoder: D, f: F) -> Self {
        Self { decoder, f }
    }
}

impl<D, F, E> Decoder for AndThen<D, F>
where
    D: Decoder,
    F: Fn(D::Output) -> E,
    E: Decoder,
{
    type Output = E::Output;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<E::Output> {
        let (offset, value) = self.decoder.decode_at(source, offset)?;
        (self.f)(value).decode_at(source, offset)
    }
}

/// Decoder that always produces a clone of the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Succeed<T>(T);

/// Succeed with `value` without consuming any bytes.
pub fn succeed<T: Clone>(value: T) -> Succeed<T> {
    Succeed(value)
}

impl<T: Clone> Decoder for Succeed<T> {
    type Output = T;
    fn decode_at(&self, _source: &Bytes, offset: usize) -> DecodeResult<T> {
        Ok((offset, self.0.clone()))
    }
}

/// Decoder that always fails.
pub struct Fail<T>(PhantomData<fn() -> T>);

/// Fail without consuming any bytes, no matter what the input is.
///
/// Useful in an `and_then` that has read something it cannot accept, like an unknown tag.
pub fn fail<T>() -> Fail<T> {
    Fail(PhantomData)
}

impl<T> Clone for Fail<T> {
    fn clone(&self) -> Self {
        fail()
    }
}

impl<T> Copy for Fail<T> {}

impl<T> fmt::Debug for Fail<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fail")
    }
}

impl<T> Decoder for Fail<T> {
    type Output = T;
    fn decode_at(&self, _source: &Bytes, _offset: usize) -> DecodeResult<T> {
        Err(DecodeError::ExplicitFailure)
    }
}

/// Decoder wrapping a plain function, returned by `from_fn`.
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Make a decoder from a function taking the source and the current offset.
///
/// The function must return an offset no less than the one it was given,
/// and no greater than the source length.
pub fn from_fn<F, T>(f: F) -> FromFn<F>
where
    F: Fn(&Bytes, usize) -> DecodeResult<T>,
{
    FromFn(f)
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn")
    }
}

impl<F, T> Decoder for FromFn<F>
where
    F: Fn(&Bytes, usize) -> DecodeResult<T>,
{
    type Output = T;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<T> {
        (self.0)(source, offset)
    }
}

/// Tuples of decoders run each in order, threading the offset through.
macro_rules! tuple_decoder {
    ($($d:ident $v:ident),+) => {
        impl<$($d: Decoder),+> Decoder for ($($d,)+) {
            type Output = ($($d::Output,)+);
            fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<($($d::Output,)+)> {
                let ($($v,)+) = self;
                $(
                    let (offset, $v) = $v.decode_at(source, offset)?;
                )+
                Ok((offset, ($($v,)+)))
            }
        }
    };
}

tuple_decoder!(D1 a, D2 b);
tuple_decoder!(D1 a, D2 b, D3 c);
tuple_decoder!(D1 a, D2 b, D3 c, D4 d);
tuple_decoder!(D1 a, D2 b, D3 c, D4 d, D5 e);

/// Run two decoders in order and combine their values.
///
/// If the first fails, the second is never run.
pub fn map2<F, D1, D2, U>(f: F, d1: D1, d2: D2) -> impl Decoder<Output = U>
where
    D1: Decoder,
    D2: Decoder,
    F: Fn(D1::Output, D2::Output) -> U,
{
    (d1, d2).map(move |(a, b)| f(a, b))
}

/// Run three decoders in order and combine their values.
pub fn map3<F, D1, D2, D3, U>(f: F, d1: D1, d2: D2, d3: D3) -> impl Decoder<Output = U>
where
    D1: Decoder,
    D2: Decoder,
    D3: Decoder,
    F: Fn(D1::Output, D2::Output, D3::Output) -> U,
{
    (d1, d2, d3).map(move |(a, b, c)| f(a, b, c))
}

/// Run four decoders in order and combine their values.
pub fn map4<F, D1, D2, D3, D4, U>(f: F, d1: D1, d2: D2, d3: D3, d4: D4) -> impl Decoder<Output = U>
where
    D1: Decoder,
    D2: Decoder,
    D3: Decoder,
    D4: Decoder,
    F: Fn(D1::Output, D2::Output, D3::Output, D4::Output) -> U,
{
    (d1, d2, d3, d4).map(move |(a, b, c, d)| f(a, b, c, d))
}

/// Run five decoders in order and combine their values.
pub fn map5<F, D1, D2, D3, D4, D5, U>(
    f: F,
    d1: D1,
    d2: D2,
    d3: D3,
    d4: D4,
    d5: D5,
) -> impl Decoder<Output = U>
where
    D1: Decoder,
    D2: Decoder,
    D3: Decoder,
    D4: Decoder,
    D5: Decoder,
    F: Fn(D1::Output, D2::Output, D3::Output, D4::Output, D5::Output) -> U,
{
    (d1, d2, d3, d4, d5).map(move |(a, b, c, d, e)| f(a, b, c, d, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decode::{decode, int16, string, try_decode, uint16, uint32, uint8, BoxDecoder},
        Endianness,
    };
    use std::cell::Cell;

    #[test]
    fn map_transforms_value() {
        let source = Bytes::from_static(&[0, 7]);
        let d = uint16(Endianness::Big).map(|v| v * 3);
        assert_eq!(d.decode_at(&source, 0), Ok((2, 21)));
    }

    #[test]
    fn map_skipped_on_failure() {
        let calls = Cell::new(0);
        let d = uint32(Endianness::Big).map(|v| {
            calls.set(calls.get() + 1);
            v
        });
        assert!(decode(&d, &Bytes::from_static(&[1, 2])).is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn tuples_thread_offsets() {
        let source = Bytes::from_static(&[1, 0, 2, 0, 0, 0, 3]);
        let d = (uint8(), uint16(Endianness::Big), uint32(Endianness::Big));
        assert_eq!(d.decode_at(&source, 0), Ok((7, (1, 2, 3))));
    }

    #[test]
    fn map_n_short_circuits() {
        let later = Cell::new(0);
        let counting = from_fn(|source: &Bytes, offset| {
            later.set(later.get() + 1);
            uint8().decode_at(source, offset)
        });
        let d = map3(
            |a, b, c| (a, b, c),
            uint8(),
            uint32(Endianness::Big),
            counting,
        );
        assert!(decode(&d, &Bytes::from_static(&[1, 2])).is_none());
        assert_eq!(later.get(), 0);
    }

    #[test]
    fn map_n_all_arities() {
        let source = Bytes::from_static(&[1, 2, 3, 4, 5]);
        assert_eq!(decode(&map2(|a, b| a + b, uint8(), uint8()), &source), Some(3));
        assert_eq!(
            decode(&map4(|a, b, c, d| a + b + c + d, uint8(), uint8(), uint8(), uint8()), &source),
            Some(10)
        );
        assert_eq!(
            decode(
                &map5(
                    |a, b, c, d, e| [a, b, c, d, e],
                    uint8(),
                    uint8(),
                    uint8(),
                    uint8(),
                    uint8()
                ),
                &source
            ),
            Some([1, 2, 3, 4, 5])
        );
        assert_eq!(
            decode(&map5(|_, _, _, _, e| e, uint8(), uint8(), uint8(), uint8(), uint8()), &Bytes::from_static(&[1, 2, 3, 4])),
            None
        );
    }

    #[test]
    fn and_then_uses_value() {
        // A length byte followed by that many bytes of string.
        let sized = uint8().and_then(|len| string(len as usize));
        let source = Bytes::from_static(b"\x03abcdef");
        assert_eq!(sized.decode_at(&source, 0), Ok((4, "abc".to_string())));
    }

    #[test]
    fn and_then_short_circuits() {
        let calls = Cell::new(0);
        let d = uint16(Endianness::Little).and_then(|v| {
            calls.set(calls.get() + 1);
            succeed(v)
        });
        assert_eq!(
            try_decode(&d, &Bytes::from_static(&[1])),
            Err(DecodeError::InsufficientBytes {
                offset: 0,
                needed: 2,
                remaining: 1
            })
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn and_then_branches() {
        fn shape<'a>(tag: u8) -> BoxDecoder<'a, i32> {
            match tag {
                0 => succeed(0).boxed(),
                1 => int16(Endianness::Big).map(i32::from).boxed(),
                _ => fail().boxed(),
            }
        }
        let d = uint8().and_then(shape);
        assert_eq!(decode(&d, &Bytes::from_static(&[0])), Some(0));
        assert_eq!(decode(&d, &Bytes::from_static(&[1, 0xff, 0xfe])), Some(-2));
        assert_eq!(
            try_decode(&d, &Bytes::from_static(&[9, 0, 0])),
            Err(DecodeError::ExplicitFailure)
        );
    }

    #[test]
    fn succeed_and_fail_consume_nothing() {
        let source = Bytes::from_static(&[1, 2, 3]);
        assert_eq!(succeed("x").decode_at(&source, 2), Ok((2, "x")));
        assert_eq!(succeed(5).decode_at(&Bytes::new(), 0), Ok((0, 5)));
        assert_eq!(
            fail::<u8>().decode_at(&source, 0),
            Err(DecodeError::ExplicitFailure)
        );
    }

    #[test]
    fn from_fn_custom_primitive() {
        // 24-bit big-endian integer
        let u24 = from_fn(|source: &Bytes, offset| {
            crate::error::check_remaining(source, offset, 3)?;
            let b = &source[offset..offset + 3];
            Ok((
                offset + 3,
                (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]),
            ))
        });
        let source = Bytes::from_static(&[1, 2, 3, 4]);
        assert_eq!(u24.decode_at(&source, 0), Ok((3, 0x010203)));
        assert!(u24.decode_at(&source, 2).is_err());
    }
}
