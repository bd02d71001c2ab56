/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Conversion between bounded-width unsigned integers and sequences of store bytes.

A field of `n` bits starting at sub-byte offset `s` is cut into per-byte
*segments*: a leading segment of at most `8 - s` bits, zero or more full bytes,
and a trailing partial byte. Each segment is transferred using the single-byte
rules below; segments are then concatenated following the [`ByteOrder`]: with
[`ByteOrder::BigEndian`] the segment found first in the stream is the most
significant part of the value, with [`ByteOrder::LittleEndian`] it is the least
significant part. Shift amounts are computed from the widths already consumed,
as the leading segment is usually not a full byte.

Inside a byte, a segment of width `w` at offset `s`, with `r = 8 - s` bits left
in the byte, is found

| case           | [`MSB`](BitOrder::MostSignificantFirst) | [`LSB`](BitOrder::LeastSignificantFirst) |
|----------------|--------------|--------------|
| `s == 0`       | `>> (8 - w)` | mask         |
| `w == r`       | mask         | `>> (8 - w)` |
| `w < r`        | `>> (r - w)` | `>> s`       |

The apparent swap between the first two rows is a consequence of the bit order
describing the direction in which bits are consumed: with most-significant-first
order the offset `s` counts from the top of the byte, with least-significant-first
order from the bottom.

The functions in this module never fail by themselves; the only errors are
those of the backing store, which are returned unchanged.

*/

use crate::impls::Cursor;
use crate::traits::{BitOrder, ByteOrder, ByteRead, ByteWrite};

/// Return a mask with the lowest `n_bits` bits set.
#[inline(always)]
#[must_use]
pub const fn mask(n_bits: usize) -> u64 {
    if n_bits >= 64 {
        u64::MAX
    } else {
        (1 << n_bits) - 1
    }
}

/// The part of a field stored in a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Offset of the first bit of the segment in its byte, in `[0..8)`.
    pub sub_index: u8,
    /// Number of bits of the segment, in `[1..8]`.
    pub width: u8,
}

/// Iterator over the [segments](Segment) of a field, in stream order.
#[derive(Debug, Clone)]
pub struct Segments {
    sub_index: u8,
    left: usize,
}

impl Iterator for Segments {
    type Item = Segment;

    #[inline]
    fn next(&mut self) -> Option<Segment> {
        if self.left == 0 {
            return None;
        }
        let width = core::cmp::min(8 - self.sub_index as usize, self.left) as u8;
        let segment = Segment {
            sub_index: self.sub_index,
            width,
        };
        self.left -= width as usize;
        self.sub_index = (self.sub_index + width) & 7;
        Some(segment)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.left == 0 {
            0
        } else {
            let lead = core::cmp::min(8 - self.sub_index as usize, self.left);
            1 + (self.left - lead).div_ceil(8)
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Segments {}

/// Cut a field of `n_bits` bits starting at offset `sub_index` of a byte into
/// segments.
#[inline]
pub fn segments(sub_index: u8, n_bits: usize) -> Segments {
    debug_assert!(sub_index < 8);
    Segments {
        sub_index,
        left: n_bits,
    }
}

/// Shift that moves a segment to the low end of its byte.
#[inline(always)]
fn shift(sub_index: u8, width: u8, bit_order: BitOrder) -> u8 {
    debug_assert!(width >= 1 && width <= 8 - sub_index);
    match bit_order {
        BitOrder::MostSignificantFirst => 8 - sub_index - width,
        BitOrder::LeastSignificantFirst => sub_index,
    }
}

/// Extract a segment from `byte`.
#[inline]
#[must_use]
pub fn extract(byte: u8, segment: Segment, bit_order: BitOrder) -> u8 {
    let shift = shift(segment.sub_index, segment.width, bit_order);
    ((byte >> shift) as u64 & mask(segment.width as usize)) as u8
}

/// Store the lowest bits of `part` as a segment of `byte`, leaving the other
/// bits of `byte` unchanged.
#[inline]
#[must_use]
pub fn deposit(byte: u8, part: u8, segment: Segment, bit_order: BitOrder) -> u8 {
    let shift = shift(segment.sub_index, segment.width, bit_order);
    let field = (mask(segment.width as usize) as u8) << shift;
    (byte & !field) | ((part << shift) & field)
}

/// Add a segment to the value assembled so far from the `consumed` bits
/// preceding it in the stream.
#[inline(always)]
#[must_use]
pub fn assemble(acc: u64, part: u8, width: u8, consumed: usize, byte_order: ByteOrder) -> u64 {
    match byte_order {
        ByteOrder::BigEndian => (acc << width) | part as u64,
        ByteOrder::LittleEndian => acc | (part as u64) << consumed,
    }
}

/// Take from `value`, a field of `n_bits` bits, the segment of width `width`
/// that follows the first `consumed` bits in the stream.
#[inline(always)]
#[must_use]
pub fn split(value: u64, n_bits: usize, consumed: usize, width: u8, byte_order: ByteOrder) -> u8 {
    let shift = match byte_order {
        ByteOrder::BigEndian => n_bits - consumed - width as usize,
        ByteOrder::LittleEndian => consumed,
    };
    ((value >> shift) & mask(width as usize)) as u8
}

/// Read a field of `n_bits` bits, in `[0..64]`, at `cursor`, advancing it.
///
/// The caller is responsible for checking that `n_bits` bits are available;
/// on error, `cursor` is left unchanged.
pub fn unpack<S: ByteRead>(
    store: &mut S,
    cursor: &mut Cursor,
    n_bits: usize,
    byte_order: ByteOrder,
    bit_order: BitOrder,
) -> Result<u64, S::Error> {
    debug_assert!(n_bits <= 64);
    let mut pos = *cursor;
    let mut acc = 0;
    let mut consumed = 0;
    for segment in segments(pos.bit_offset(), n_bits) {
        let byte = store.current_byte(pos.byte_index())?;
        let part = extract(byte, segment, bit_order);
        acc = assemble(acc, part, segment.width, consumed, byte_order);
        consumed += segment.width as usize;
        pos.advance(segment.width as u64);
        if pos.bit_offset() == 0 {
            store.on_seek(pos.byte_index(), 0)?;
        }
    }
    *cursor = pos;
    Ok(acc)
}

/// Write the lowest `n_bits` bits of `value`, with `n_bits` in `[0..64]`, at
/// `cursor`, advancing it.
///
/// On error, `cursor` is left unchanged, but the segments preceding the failure
/// might have been stored.
pub fn pack<S: ByteWrite>(
    store: &mut S,
    cursor: &mut Cursor,
    value: u64,
    n_bits: usize,
    byte_order: ByteOrder,
    bit_order: BitOrder,
) -> Result<(), S::Error> {
    debug_assert!(n_bits <= 64);
    let mut pos = *cursor;
    let mut consumed = 0;
    for segment in segments(pos.bit_offset(), n_bits) {
        let part = split(value, n_bits, consumed, segment.width, byte_order);
        let byte = store.load_byte(pos.byte_index())?;
        store.store_byte(deposit(byte, part, segment, bit_order), pos.byte_index())?;
        consumed += segment.width as usize;
        pos.advance(segment.width as u64);
        if pos.bit_offset() == 0 {
            store.on_seek(pos.byte_index(), 0)?;
        }
    }
    *cursor = pos;
    Ok(())
}
