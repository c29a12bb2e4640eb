// Copyright 2018-2021, Collabora, Ltd.
// SPDX-License-Identifier: BSL-1.0
// Author: Ryan A. Pavlik <ryan.pavlik@collabora.com>

//! Materializing an encoder tree into bytes.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use super::{Encoder, Node};
use crate::width::Width;

/// Write an encoder's bytes into a freshly allocated, exactly sized buffer.
///
/// Allocates once (the width is already known) and walks the tree once.
pub fn encode(encoder: &Encoder) -> Bytes {
    let width = encoder.width();
    trace!(width, "encoding");
    let mut buf = BytesMut::with_capacity(width);
    write_to(encoder, &mut buf);
    debug_assert_eq!(buf.len(), width, "cached encoder width was wrong");
    buf.freeze()
}

macro_rules! put_ordered {
    ($buf:expr, $endianness:expr, $value:expr, $put_be:ident, $put_le:ident) => {
        if $endianness.is_little() {
            $buf.$put_le(*$value)
        } else {
            $buf.$put_be(*$value)
        }
    };
}

/// Depth-first write pass: each leaf appends, so it lands right after its preceding siblings.
///
/// Buffer guaranteed big enough. Sequences are walked with an explicit stack
/// of sibling iterators, so nesting depth does not use call stack.
fn write_to<T: BufMut>(encoder: &Encoder, buf: &mut T) {
    let mut pending = vec![std::slice::from_ref(encoder).iter()];
    while let Some(siblings) = pending.last_mut() {
        let encoder = match siblings.next() {
            Some(e) => e,
            None => {
                pending.pop();
                continue;
            }
        };
        write_node(&encoder.0, buf, &mut pending);
    }
}

fn write_node<'a, T: BufMut>(
    node: &'a Node,
    buf: &mut T,
    pending: &mut Vec<std::slice::Iter<'a, Encoder>>,
) {
    match node {
        Node::I8(v) => buf.put_i8(*v),
        Node::U8(v) => buf.put_u8(*v),
        Node::I16(e, v) => put_ordered!(buf, e, v, put_i16, put_i16_le),
        Node::U16(e, v) => put_ordered!(buf, e, v, put_u16, put_u16_le),
        Node::I32(e, v) => put_ordered!(buf, e, v, put_i32, put_i32_le),
        Node::U32(e, v) => put_ordered!(buf, e, v, put_u32, put_u32_le),
        Node::F32(e, v) => put_ordered!(buf, e, v, put_f32, put_f32_le),
        Node::F64(e, v) => put_ordered!(buf, e, v, put_f64, put_f64_le),
        Node::Bytes(b) => buf.put_slice(b),
        Node::Utf8 { string, .. } => buf.put_slice(string.as_bytes()),
        Node::Sequence { children, .. } => pending.push(children.iter()),
    }
}
