// Copyright 2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Decoding repeated structures without growing the call stack.

use bytes::Bytes;
use tracing::trace;

use super::{DecodeOnce, DecodeResult, Decoder};

/// What the step of a `loop_with` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<S, R> {
    /// Keep going, with this new state.
    Loop(S),
    /// Stop, producing this result.
    Done(R),
}

/// A step outcome already known without reading anything decodes as itself.
impl<S, R> DecodeOnce for Step<S, R> {
    type Output = Step<S, R>;
    fn decode_once(self, _source: &Bytes, offset: usize) -> DecodeResult<Step<S, R>> {
        Ok((offset, self))
    }
}

/// Either of two one-shot decoders producing the same type.
///
/// Lets a loop step pick between, say, `Step::Done(...)` and reading another element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch<L, R> {
    Left(L),
    Right(R),
}

impl<L, R> DecodeOnce for Branch<L, R>
where
    L: DecodeOnce,
    R: DecodeOnce<Output = L::Output>,
{
    type Output = L::Output;
    fn decode_once(self, source: &Bytes, offset: usize) -> DecodeResult<L::Output> {
        match self {
            Branch::Left(d) => d.decode_once(source, offset),
            Branch::Right(d) => d.decode_once(source, offset),
        }
    }
}

/// Decoder returned by `loop_with`.
#[derive(Debug, Clone, Copy)]
pub struct Loop<S, F> {
    initial: S,
    step: F,
}

/// Decode by repeatedly running `step` on a state until it says `Step::Done`.
///
/// Each iteration calls `step(state)` to get a decoder, runs it where the
/// previous iteration stopped, then either continues with the `Step::Loop`
/// state or finishes with the `Step::Done` result. Any failure fails the
/// whole loop. Iterations run in a plain loop, so stack use does not depend
/// on how many there are.
///
/// A step that keeps looping without consuming bytes loops forever.
///
/// ```
/// use bytekit::decode::{self, DecodeOnce, Step};
/// use bytes::Bytes;
///
/// // Bytes up to (not including) a zero terminator.
/// let element = decode::uint8();
/// let until_zero = decode::loop_with(Vec::new(), |mut seen: Vec<u8>| {
///     element.map_once(move |b| {
///         if b == 0 {
///             Step::Done(seen)
///         } else {
///             seen.push(b);
///             Step::Loop(seen)
///         }
///     })
/// });
/// let source = Bytes::from_static(b"abc\0def");
/// assert_eq!(decode::decode(&until_zero, &source), Some(b"abc".to_vec()));
/// ```
pub fn loop_with<S, F, D, R>(initial: S, step: F) -> Loop<S, F>
where
    S: Clone,
    F: Fn(S) -> D,
    D: DecodeOnce<Output = Step<S, R>>,
{
    Loop { initial, step }
}

impl<S, F, D, R> Decoder for Loop<S, F>
where
    S: Clone,
    F: Fn(S) -> D,
    D: DecodeOnce<Output = Step<S, R>>,
{
    type Output = R;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<R> {
        run_loop(self.initial.clone(), &self.step, source, offset)
    }
}

/// The trampoline behind `Loop`, taking ownership of the starting state.
fn run_loop<S, F, D, R>(initial: S, step: F, source: &Bytes, offset: usize) -> DecodeResult<R>
where
    F: Fn(S) -> D,
    D: DecodeOnce<Output = Step<S, R>>,
{
    let mut state = initial;
    let mut offset = offset;
    let mut iterations: usize = 0;
    loop {
        let (next, outcome) = step(state).decode_once(source, offset)?;
        offset = next;
        iterations += 1;
        match outcome {
            Step::Loop(s) => state = s,
            Step::Done(result) => {
                trace!(iterations, offset, "loop finished");
                return Ok((offset, result));
            }
        }
    }
}

/// Decoder returned by `repeat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Repeat<D> {
    count: usize,
    element: D,
}

/// Decode `count` values with `element`, one after another, into a `Vec`.
pub fn repeat<D: Decoder>(count: usize, element: D) -> Repeat<D> {
    Repeat { count, element }
}

impl<D: Decoder> Decoder for Repeat<D> {
    type Output = Vec<D::Output>;
    fn decode_at(&self, source: &Bytes, offset: usize) -> DecodeResult<Vec<D::Output>> {
        let element = &self.element;
        // A count read from untrusted input should not decide the allocation alone.
        let capacity = self.count.min(source.len().saturating_sub(offset));
        run_loop(
            (self.count, Vec::with_capacity(capacity)),
            |(remaining, mut items): (usize, Vec<D::Output>)| {
                if remaining == 0 {
                    Branch::Left(Step::Done(items))
                } else {
                    Branch::Right(element.map_once(move |item| {
                        items.push(item);
                        Step::<_, Vec<D::Output>>::Loop((remaining - 1, items))
                    }))
                }
            },
            source,
            offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decode::{decode, fail, string, succeed, try_decode, uint16, uint8},
        error::DecodeError,
        Endianness,
    };

    #[test]
    fn counts_down() {
        let sum = loop_with((3_u8, 0_u32), |(remaining, total): (u8, u32)| {
            uint8().map(move |v| {
                let total = total + u32::from(v);
                if remaining == 1 {
                    Step::Done(total)
                } else {
                    Step::Loop((remaining - 1, total))
                }
            })
        });
        let source = Bytes::from_static(&[1, 2, 3, 4]);
        assert_eq!(sum.decode_at(&source, 0), Ok((3, 6)));
        assert_eq!(sum.decode_at(&source, 1), Ok((4, 9)));
        assert!(sum.decode_at(&source, 2).is_err());
    }

    #[test]
    fn done_immediately() {
        let d = loop_with((), |()| succeed(Step::<(), _>::Done("nothing")));
        assert_eq!(d.decode_at(&Bytes::new(), 0), Ok((0, "nothing")));
    }

    #[test]
    fn failure_aborts_loop() {
        let d = loop_with(0_u32, |n: u32| {
            if n < 2 {
                uint8().map(move |_| Step::Loop(n + 1)).boxed()
            } else {
                fail::<Step<u32, u32>>().boxed()
            }
        });
        assert_eq!(
            try_decode(&d, &Bytes::from_static(&[1, 2, 3])),
            Err(DecodeError::ExplicitFailure)
        );
    }

    #[test]
    fn repeat_in_order() {
        let source = Bytes::from_static(&[0, 1, 0, 2, 0, 3]);
        assert_eq!(
            decode(&repeat(3, uint16(Endianness::Big)), &source),
            Some(vec![1, 2, 3])
        );
        assert_eq!(decode(&repeat(0, uint8()), &Bytes::new()), Some(vec![]));
        assert_eq!(decode(&repeat(4, uint16(Endianness::Big)), &source), None);
    }

    #[test]
    fn repeat_non_clone_elements() {
        struct Opaque(u8);
        let source = Bytes::from_static(&[4, 5]);
        let items = decode(&repeat(2, uint8().map(Opaque)), &source).unwrap();
        assert_eq!(items.iter().map(|o| o.0).collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn repeat_strings() {
        let source = Bytes::from_static(b"abcdef");
        assert_eq!(
            decode(&repeat(3, string(2)), &source),
            Some(vec!["ab".to_string(), "cd".to_string(), "ef".to_string()])
        );
    }

    #[test]
    fn many_iterations_constant_stack() {
        let n = 200_000;
        let source = Bytes::from(vec![7_u8; n]);
        let items = decode(&repeat(n, uint8()), &source).unwrap();
        assert_eq!(items.len(), n);
        assert!(items.iter().all(|&v| v == 7));
    }
}
