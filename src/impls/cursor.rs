/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// A position in a bit stream, kept as a byte index and a sub-byte offset.
///
/// The offset is always in `[0..8)`, so the linear bit position is
/// `byte_index * 8 + bit_offset`.
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let mut cursor = Cursor::from_bit_pos(13);
/// assert_eq!(cursor.byte_index(), 1);
/// assert_eq!(cursor.bit_offset(), 5);
/// cursor.advance(3);
/// assert_eq!((cursor.byte_index(), cursor.bit_offset()), (2, 0));
/// assert_eq!(cursor.remaining_bits(20), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
pub struct Cursor {
    byte_index: u64,
    bit_offset: u8,
}

impl Cursor {
    /// A cursor at the start of the stream.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            byte_index: 0,
            bit_offset: 0,
        }
    }

    /// A cursor at the given linear bit position.
    #[must_use]
    pub const fn from_bit_pos(bit_pos: u64) -> Self {
        Self {
            byte_index: bit_pos >> 3,
            bit_offset: (bit_pos & 7) as u8,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn byte_index(&self) -> u64 {
        self.byte_index
    }

    /// Offset of the cursor in the current byte, in `[0..8)`.
    #[inline(always)]
    #[must_use]
    pub const fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    #[inline(always)]
    #[must_use]
    pub const fn bit_pos(&self) -> u64 {
        (self.byte_index << 3) | self.bit_offset as u64
    }

    /// Number of bits from the cursor to `total_bits`, or zero if the cursor
    /// is past it.
    #[inline(always)]
    #[must_use]
    pub const fn remaining_bits(&self, total_bits: u64) -> u64 {
        total_bits.saturating_sub(self.bit_pos())
    }

    /// Move the cursor forward by `n_bits`.
    #[inline(always)]
    pub fn advance(&mut self, n_bits: u64) {
        let offset = self.bit_offset as u64 + n_bits;
        self.byte_index += offset >> 3;
        self.bit_offset = (offset & 7) as u8;
    }
}
