/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::config::StreamConfig;
use crate::engine;
use crate::impls::Cursor;
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`BitRead`] for a [`ByteRead`].
///
/// The reader owns the backing store and the cursor, and keeps the default
/// byte and bit order used by the methods that do not specify one. Reads past
/// the end of the data are clamped to the available bits and set the
/// [`truncated`](BitRead::truncated) flag.
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let data = [0xFC, 0x11, 0xC5, 0x56, 0xF0];
/// let mut reader = BitReader::new(MemByteReader::new(&data));
///
/// assert_eq!(reader.read_bits(11).unwrap(), 2016);
/// assert_eq!(reader.read_bits(4).unwrap(), 8);
/// assert_eq!(reader.read_bits(5).unwrap(), 28);
/// assert_eq!(reader.bit_pos(), 20);
///
/// // per-call orders
/// reader.set_bit_pos(0).unwrap();
/// assert_eq!(reader.read_bits_with(4, BE, LSB).unwrap(), 0xC);
///
/// // clamping at the end of the data
/// reader.set_bit_pos(37).unwrap();
/// assert_eq!(reader.read_bits(10).unwrap(), 0);
/// assert!(reader.truncated());
/// assert!(reader.has_ended());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BitReader<S: ByteRead> {
    /// The store which we will read bytes from.
    backend: S,
    cursor: Cursor,
    byte_order: ByteOrder,
    bit_order: BitOrder,
    /// Whether the last read was clamped.
    truncated: bool,
}

impl<S: ByteRead> BitReader<S> {
    /// Create a new [`BitReader`] with big-endian byte order and
    /// most-significant-first bit order.
    pub fn new(backend: S) -> Self {
        Self::with_orders(backend, ByteOrder::BigEndian, BitOrder::MostSignificantFirst)
    }

    /// Create a new [`BitReader`] with the given default orders.
    pub fn with_orders(backend: S, byte_order: ByteOrder, bit_order: BitOrder) -> Self {
        Self {
            backend,
            cursor: Cursor::new(),
            byte_order,
            bit_order,
            truncated: false,
        }
    }

    /// Create a new [`BitReader`] with the default orders of `config`.
    pub fn with_config(backend: S, config: &StreamConfig) -> Self {
        Self::with_orders(backend, config.byte_order, config.bit_order)
    }

    /// The current position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }
}

impl<S: ByteRead> BitStream for BitReader<S> {
    type Error = S::Error;

    #[inline(always)]
    fn bit_pos(&self) -> u64 {
        self.cursor.bit_pos()
    }

    #[inline(always)]
    fn bit_len(&self) -> u64 {
        self.backend.byte_len().saturating_mul(8)
    }

    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<(), BitError<S::Error>> {
        let bit_len = self.bit_len();
        let first = self.backend.first_seekable_byte().saturating_mul(8);
        if bit_pos < first || bit_pos > bit_len {
            return Err(BitError::OutOfRange {
                bit_pos: bit_pos as i128,
                bit_len,
            });
        }
        let cursor = Cursor::from_bit_pos(bit_pos);
        self.backend
            .seek(cursor.byte_index())
            .map_err(BitError::Store)?;
        self.backend
            .on_seek(cursor.byte_index(), cursor.bit_offset())
            .map_err(BitError::Store)?;
        self.cursor = cursor;
        Ok(())
    }

    #[inline(always)]
    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline(always)]
    fn bit_order(&self) -> BitOrder {
        self.bit_order
    }

    #[inline(always)]
    fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    #[inline(always)]
    fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.bit_order = bit_order;
    }
}

impl<S: ByteRead> BitRead for BitReader<S> {
    #[inline]
    fn read_bits_with(
        &mut self,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<u64, BitError<S::Error>> {
        if n_bits > 64 {
            return Err(BitError::InvalidWidth {
                width: n_bits,
                max: 64,
            });
        }
        let available = self.remaining_bits();
        self.truncated = n_bits as u64 > available;
        let n_bits = if self.truncated {
            available as usize
        } else {
            n_bits
        };
        if n_bits == 0 {
            return Ok(0);
        }
        engine::unpack(
            &mut self.backend,
            &mut self.cursor,
            n_bits,
            byte_order,
            bit_order,
        )
        .map_err(BitError::Store)
    }

    #[inline(always)]
    fn truncated(&self) -> bool {
        self.truncated
    }
}
