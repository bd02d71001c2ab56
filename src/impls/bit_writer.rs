/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::config::StreamConfig;
use crate::engine::{self, mask};
use crate::impls::Cursor;
use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`BitWrite`] for a [`ByteWrite`].
///
/// Every write loads the bytes it touches from the store, replaces the bits of
/// the field and stores them back, so bits around the field are preserved.
/// Over a growable store, writing or positioning past the end grows it; over
/// a non-growable one, it fails with [`BitError::OutOfRange`].
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let mut data = Vec::new();
/// let mut writer = BitWriter::new(MemByteWriterVec::new(&mut data));
///
/// for (value, n_bits) in [(2016, 11), (8, 4), (28, 5), (10, 5), (43, 6), (30, 6)] {
///     writer.write_bits(value, n_bits).unwrap();
/// }
/// assert_eq!(writer.bit_pos(), 37);
/// writer.flush().unwrap();
/// drop(writer);
/// assert_eq!(data, vec![0xFC, 0x11, 0xC5, 0x56, 0xF0]);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
pub struct BitWriter<S: ByteWrite> {
    /// The store which we will write bytes to.
    backend: S,
    cursor: Cursor,
    byte_order: ByteOrder,
    bit_order: BitOrder,
}

impl<S: ByteWrite> BitWriter<S> {
    /// Create a new [`BitWriter`] with big-endian byte order and
    /// most-significant-first bit order.
    pub fn new(backend: S) -> Self {
        Self::with_orders(backend, ByteOrder::BigEndian, BitOrder::MostSignificantFirst)
    }

    /// Create a new [`BitWriter`] with the given default orders.
    pub fn with_orders(backend: S, byte_order: ByteOrder, bit_order: BitOrder) -> Self {
        Self {
            backend,
            cursor: Cursor::new(),
            byte_order,
            bit_order,
        }
    }

    /// Create a new [`BitWriter`] with the default orders of `config`.
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

    /// The number of bits of the store, if it cannot grow.
    #[inline(always)]
    fn bit_capacity(&self) -> Option<u64> {
        self.backend
            .capacity_limit()
            .map(|bytes| bytes.saturating_mul(8))
    }
}

impl<S: ByteWrite> BitStream for BitWriter<S> {
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
        let first = self.backend.first_seekable_byte().saturating_mul(8);
        let beyond = self.bit_capacity().is_some_and(|capacity| bit_pos > capacity);
        if bit_pos < first || beyond {
            return Err(BitError::OutOfRange {
                bit_pos: bit_pos as i128,
                bit_len: self.bit_len(),
            });
        }
        let cursor = Cursor::from_bit_pos(bit_pos);
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

impl<S: ByteWrite> BitWrite for BitWriter<S> {
    #[inline]
    fn write_bits_with(
        &mut self,
        value: u64,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<S::Error>> {
        if n_bits > 64 {
            return Err(BitError::InvalidWidth {
                width: n_bits,
                max: 64,
            });
        }
        #[cfg(feature = "checks")]
        assert!(
            value & !mask(n_bits) == 0,
            "Value {} does not fit in {} bits",
            value,
            n_bits
        );
        if n_bits == 0 {
            return Ok(0);
        }
        if let Some(capacity) = self.bit_capacity() {
            let end = self.bit_pos() as i128 + n_bits as i128;
            if end > capacity as i128 {
                return Err(BitError::OutOfRange {
                    bit_pos: end,
                    bit_len: capacity,
                });
            }
        }
        engine::pack(
            &mut self.backend,
            &mut self.cursor,
            value & mask(n_bits),
            n_bits,
            byte_order,
            bit_order,
        )
        .map_err(BitError::Store)?;
        Ok(n_bits)
    }

    fn flush(&mut self) -> Result<(), BitError<S::Error>> {
        self.backend.flush().map_err(BitError::Store)?;
        let first = self.backend.first_seekable_byte().saturating_mul(8);
        if self.cursor.bit_pos() < first {
            self.cursor = Cursor::from_bit_pos(first);
        }
        Ok(())
    }
}
