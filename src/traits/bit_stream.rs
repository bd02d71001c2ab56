/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;
use core::fmt::{Display, Formatter};

use crate::traits::{BitOrder, ByteOrder};

/// The error returned by bit streams.
///
/// Reading past the end of the data is not an error: reads are clamped to the
/// available bits and [`BitRead::truncated`] reports it. Only invalid
/// arguments and failures of the backing store are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError<E> {
    /// The width of a transfer is outside the valid range of the operation.
    InvalidWidth { width: usize, max: usize },
    /// A position is negative or not reachable in the backing store.
    OutOfRange { bit_pos: i128, bit_len: u64 },
    /// Returned by the strict read methods only: fewer bits than requested
    /// are left.
    EndOfData { requested: usize, available: u64 },
    /// A range `[min..=max]` is empty, or a value written in a range is not
    /// in it.
    InvalidRange { min: i64, max: i64 },
    /// The backing store failed.
    Store(E),
}

impl<E: Display> Display for BitError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            BitError::InvalidWidth { width, max } => write!(
                f,
                "The number of bits to transfer has to be in [0..{}] and {} is not",
                max, width
            ),
            BitError::OutOfRange { bit_pos, bit_len } => write!(
                f,
                "Bit position {} is out of range (stream length {} bits)",
                bit_pos, bit_len
            ),
            BitError::EndOfData {
                requested,
                available,
            } => write!(
                f,
                "Requested {} bits, but only {} are available",
                requested, available
            ),
            BitError::InvalidRange { min, max } => {
                write!(f, "Invalid range or value outside of [{}..={}]", min, max)
            }
            BitError::Store(e) => write!(f, "Backing store error: {}", e),
        }
    }
}

impl<E: Error + 'static> Error for BitError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BitError::Store(e) => Some(e),
            _ => None,
        }
    }
}

/// The error returned by the bit copy methods [`BitRead::copy_to`] and [`BitWrite::copy_from`].
///
/// It can be a read or a write error, depending on which stream (source or
/// destination) generated the error.
#[derive(Debug, Clone)]
pub enum CopyError<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> {
    ReadError(BitError<RE>),
    WriteError(BitError<WE>),
}

impl<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> Display
    for CopyError<RE, WE>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            CopyError::ReadError(e) => write!(f, "Read error while copying: {}", e),
            CopyError::WriteError(e) => write!(f, "Write error while copying: {}", e),
        }
    }
}

impl<RE: Error + Send + Sync + 'static, WE: Error + Send + Sync + 'static> Error
    for CopyError<RE, WE>
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CopyError::ReadError(e) => Some(e),
            CopyError::WriteError(e) => Some(e),
        }
    }
}

/// Position model and per-stream defaults shared by [`BitRead`] and
/// [`BitWrite`].
///
/// The position is a bit index; it is split by implementations into a byte
/// index and a sub-byte offset in `[0..8)`.
pub trait BitStream {
    type Error: Error + Send + Sync + 'static;

    /// Get the current position in bits from the start of the stream.
    fn bit_pos(&self) -> u64;

    /// Get the index of the byte containing the current position.
    #[inline(always)]
    fn byte_pos(&self) -> u64 {
        self.bit_pos() >> 3
    }

    /// Length of the stream in bits.
    ///
    /// For readers this is the size of the data; for writers it is the
    /// logical size written (or positioned over) so far.
    fn bit_len(&self) -> u64;

    /// Number of bits between the current position and the end of the stream.
    #[inline(always)]
    fn remaining_bits(&self) -> u64 {
        self.bit_len().saturating_sub(self.bit_pos())
    }

    /// Set the current position in bits from the start of the stream.
    ///
    /// Fails with [`BitError::OutOfRange`], leaving the position unchanged, if
    /// the backing store cannot reach `bit_pos`. Writers over growable stores
    /// accept positions past the end and grow.
    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<(), BitError<Self::Error>>;

    /// Set the current position to the first bit of the byte `byte_pos`.
    #[inline]
    fn set_byte_pos(&mut self, byte_pos: u64) -> Result<(), BitError<Self::Error>> {
        match byte_pos.checked_mul(8) {
            Some(bit_pos) => self.set_bit_pos(bit_pos),
            None => Err(BitError::OutOfRange {
                bit_pos: byte_pos as i128 * 8,
                bit_len: self.bit_len(),
            }),
        }
    }

    /// Move the current position by `n_bits` (possibly negative).
    fn skip_bits(&mut self, n_bits: i64) -> Result<(), BitError<Self::Error>> {
        let target = self.bit_pos() as i128 + n_bits as i128;
        if !(0..=u64::MAX as i128).contains(&target) {
            return Err(BitError::OutOfRange {
                bit_pos: target,
                bit_len: self.bit_len(),
            });
        }
        self.set_bit_pos(target as u64)
    }

    /// Move to the first bit of the byte `n_bytes` bytes after (or before)
    /// the byte containing the current position.
    ///
    /// The sub-byte offset is reset, so skipping zero bytes moves back to the
    /// start of the current byte.
    fn skip_bytes(&mut self, n_bytes: i64) -> Result<(), BitError<Self::Error>> {
        let target = self.byte_pos() as i128 + n_bytes as i128;
        if !(0..=(u64::MAX >> 3) as i128).contains(&target) {
            return Err(BitError::OutOfRange {
                bit_pos: target * 8,
                bit_len: self.bit_len(),
            });
        }
        self.set_byte_pos(target as u64)
    }

    /// The byte order used by the methods that do not specify one.
    fn byte_order(&self) -> ByteOrder;

    /// The bit order used by the methods that do not specify one.
    fn bit_order(&self) -> BitOrder;

    /// Change the default byte order of this stream.
    fn set_byte_order(&mut self, byte_order: ByteOrder);

    /// Change the default bit order of this stream.
    fn set_bit_order(&mut self, bit_order: BitOrder);
}

/// Random-access bit-by-bit reads.
///
/// Typed reads (integers, floats, strings, etc.) are provided by the
/// extension trait [`TypedRead`](crate::typed::TypedRead), which is
/// implemented for every [`BitRead`].
pub trait BitRead: BitStream {
    /// Read `n_bits` bits with the given orders and return them in the
    /// lowest bits of the result.
    ///
    /// `n_bits` must be at most 64. If fewer than `n_bits` bits are left the
    /// read is clamped to the remaining bits, the cursor advances only by
    /// those, and [`truncated`](BitRead::truncated) returns true until the
    /// next read.
    fn read_bits_with(
        &mut self,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<u64, BitError<Self::Error>>;

    /// Read `n_bits` bits using the default orders of the stream.
    #[inline]
    fn read_bits(&mut self, n_bits: usize) -> Result<u64, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_bits_with(n_bits, byte_order, bit_order)
    }

    /// Whether the last read was clamped at the end of the data.
    fn truncated(&self) -> bool;

    /// Whether the cursor is at the end of the data.
    #[inline(always)]
    fn has_ended(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Like [`read_bits_with`](BitRead::read_bits_with), but fails with
    /// [`BitError::EndOfData`], without moving, instead of clamping.
    fn read_bits_exact_with(
        &mut self,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<u64, BitError<Self::Error>> {
        let available = self.remaining_bits();
        if n_bits <= 64 && n_bits as u64 > available {
            return Err(BitError::EndOfData {
                requested: n_bits,
                available,
            });
        }
        self.read_bits_with(n_bits, byte_order, bit_order)
    }

    /// Like [`read_bits`](BitRead::read_bits), but fails with
    /// [`BitError::EndOfData`], without moving, instead of clamping.
    #[inline]
    fn read_bits_exact(&mut self, n_bits: usize) -> Result<u64, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_bits_exact_with(n_bits, byte_order, bit_order)
    }

    /// Copy `n` bits to `bit_write`, 64 bits at a time, using the default
    /// orders of both streams.
    ///
    /// The bit sequence is preserved only if both streams use the same
    /// orders, and these are big-endian with most-significant-first bit order
    /// or little-endian with least-significant-first bit order. With other
    /// orders each 64-bit chunk is reassembled, so bits are shuffled unless
    /// both streams are at the same alignment.
    ///
    /// Fails with [`BitError::EndOfData`] if fewer than `n` bits are left.
    fn copy_to<W: BitWrite>(
        &mut self,
        bit_write: &mut W,
        mut n: u64,
    ) -> Result<(), CopyError<Self::Error, W::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, 64) as usize;
            let read = self
                .read_bits_exact(to_read)
                .map_err(CopyError::ReadError)?;
            bit_write
                .write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}

/// Random-access bit-by-bit writes.
///
/// Typed writes are provided by the extension trait
/// [`TypedWrite`](crate::typed::TypedWrite).
pub trait BitWrite: BitStream {
    /// Write the lowest `n_bits` bits of `value` with the given orders and
    /// return the number of bits written, that is, `n_bits`.
    ///
    /// The other bits of `value` are ignored, but if the feature `checks` is
    /// enabled implementations panic if they are not zero.
    fn write_bits_with(
        &mut self,
        value: u64,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>>;

    /// Write the lowest `n_bits` bits of `value` using the default orders of
    /// the stream.
    #[inline]
    fn write_bits(&mut self, value: u64, n_bits: usize) -> Result<usize, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_bits_with(value, n_bits, byte_order, bit_order)
    }

    /// Push every written bit to the backing store, padding a partially
    /// written last byte.
    ///
    /// If the store cannot modify the bytes it has pushed, as with a
    /// `FileByteWriter`, the position moves to the next byte boundary.
    fn flush(&mut self) -> Result<(), BitError<Self::Error>>;

    /// Copy `n` bits from `bit_read`, 64 bits at a time, using the default
    /// orders of both streams.
    ///
    /// The bit sequence is preserved only if both streams use the same
    /// orders, and these are big-endian with most-significant-first bit order
    /// or little-endian with least-significant-first bit order. With other
    /// orders each 64-bit chunk is reassembled, so bits are shuffled unless
    /// both streams are at the same alignment.
    fn copy_from<R: BitRead>(
        &mut self,
        bit_read: &mut R,
        mut n: u64,
    ) -> Result<(), CopyError<R::Error, Self::Error>> {
        while n > 0 {
            let to_read = core::cmp::min(n, 64) as usize;
            let read = bit_read
                .read_bits_exact(to_read)
                .map_err(CopyError::ReadError)?;
            self.write_bits(read, to_read)
                .map_err(CopyError::WriteError)?;
            n -= to_read as u64;
        }
        Ok(())
    }
}
