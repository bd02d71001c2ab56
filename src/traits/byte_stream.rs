/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use core::error::Error;

/// Random access to the bytes of a backing store, as needed by a bit reader.
///
/// The bit reader owns the cursor; the store only answers for the byte the
/// cursor is on. Stores that stream their content (e.g., files) may only be
/// able to answer for bytes at or after [`first_seekable_byte`](ByteRead::first_seekable_byte).
pub trait ByteRead {
    type Error: Error + Send + Sync + 'static;

    /// Return the byte at `byte_index`.
    ///
    /// Callers guarantee that `byte_index` is smaller than
    /// [`byte_len`](ByteRead::byte_len).
    fn current_byte(&mut self, byte_index: u64) -> Result<u8, Self::Error>;

    /// Length of the store in bytes.
    fn byte_len(&self) -> u64;

    /// Whether `byte_index` is past the last byte of the store.
    #[inline(always)]
    fn at_end(&self, byte_index: u64) -> bool {
        byte_index >= self.byte_len()
    }

    /// Move the store to `byte_index` (at most [`byte_len`](ByteRead::byte_len)).
    ///
    /// In-memory stores just validate the index; streamed stores skip forward
    /// and refill their lookahead.
    fn seek(&mut self, byte_index: u64) -> Result<(), Self::Error>;

    /// Hook called after every change of position, including the implicit
    /// ones made by reads crossing a byte boundary.
    #[inline(always)]
    fn on_seek(&mut self, _byte_index: u64, _sub_index: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    /// The smallest byte index the store can still move to.
    #[inline(always)]
    fn first_seekable_byte(&self) -> u64 {
        0
    }
}

/// Random access to the bytes of a backing store, as needed by a bit writer.
///
/// Writes are performed one byte at a time in read-modify-write fashion: the
/// writer [loads](ByteWrite::load_byte) the current content of a byte, deposits
/// the bits of a field into it and [stores](ByteWrite::store_byte) it back.
pub trait ByteWrite {
    type Error: Error + Send + Sync + 'static;

    /// Return the current content of the byte at `byte_index`, or zero if it
    /// has never been written.
    fn load_byte(&mut self, byte_index: u64) -> Result<u8, Self::Error>;

    /// Set the byte at `byte_index`, growing the store if necessary.
    fn store_byte(&mut self, byte: u8, byte_index: u64) -> Result<(), Self::Error>;

    /// Logical length of the store in bytes.
    fn byte_len(&self) -> u64;

    /// Hook called after every change of position, including the implicit
    /// ones made by writes crossing a byte boundary.
    ///
    /// Growable stores use it to extend their logical size, streamed stores to
    /// emit completed bytes and to fill skipped bytes with zeros.
    fn on_seek(&mut self, byte_index: u64, sub_index: u8) -> Result<(), Self::Error>;

    /// The maximum number of bytes of the store, or `None` if it can grow.
    #[inline(always)]
    fn capacity_limit(&self) -> Option<u64> {
        None
    }

    /// The smallest byte index the store can still be written at.
    #[inline(always)]
    fn first_seekable_byte(&self) -> u64 {
        0
    }

    /// Push to the underlying destination every byte accumulated so far,
    /// including a partially written last byte.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors of the in-memory stores; replacement of [`std::io::Error`] for
/// `no_std` environments.
pub enum ByteError {
    /// A byte beyond the end of the data was requested.
    UnexpectedEof { byte_pos: u64 },
    /// A byte beyond the end of a non-growable buffer was written.
    CapacityExceeded { byte_pos: u64, capacity: u64 },
}

impl core::error::Error for ByteError {}
impl core::fmt::Display for ByteError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteError::UnexpectedEof { byte_pos } => {
                write!(f, "Unexpected end of data at byte position {}", byte_pos)
            }
            ByteError::CapacityExceeded { byte_pos, capacity } => {
                write!(
                    f,
                    "Byte position {} is beyond the capacity of the buffer ({} bytes)",
                    byte_pos, capacity
                )
            }
        }
    }
}
