/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// An implementation of [`ByteWrite`] for a mutable slice.
///
/// This is the non-growable in-memory store: its capacity is the length of the
/// slice, and loading, storing or positioning past it fails with
/// [`ByteError::CapacityExceeded`]. The logical length is the high-water mark
/// of the positions written or moved over.
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let mut data = [0_u8; 2];
/// let mut bytes = MemByteWriter::new(&mut data);
/// assert!(bytes.store_byte(0xAB, 0).is_ok());
/// assert_eq!(bytes.len(), 1);
/// assert_eq!(bytes.load_byte(0), Ok(0xAB));
/// assert!(bytes.store_byte(0xCD, 2).is_err());
/// assert_eq!(bytes.as_bytes(), &[0xAB]);
/// ```
#[derive(Debug, PartialEq)]
pub struct MemByteWriter<B: AsMut<[u8]> + AsRef<[u8]>> {
    data: B,
    len: u64,
}

impl<B: AsMut<[u8]> + AsRef<[u8]>> MemByteWriter<B> {
    /// Create a new [`MemByteWriter`] from a slice of data. The current
    /// content of the slice is preserved by writes that do not cover it.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data, len: 0 }
    }

    /// The logical length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of the underlying slice.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().len()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data.as_ref()[..self.len as usize]
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    #[inline(always)]
    fn check(&self, byte_index: u64) -> Result<usize, ByteError> {
        let capacity = self.data.as_ref().len() as u64;
        if byte_index >= capacity {
            return Err(ByteError::CapacityExceeded {
                byte_pos: byte_index,
                capacity,
            });
        }
        Ok(byte_index as usize)
    }
}

impl<B: AsMut<[u8]> + AsRef<[u8]>> ByteWrite for MemByteWriter<B> {
    type Error = ByteError;

    #[inline]
    fn load_byte(&mut self, byte_index: u64) -> Result<u8, ByteError> {
        let i = self.check(byte_index)?;
        Ok(self.data.as_ref()[i])
    }

    #[inline]
    fn store_byte(&mut self, byte: u8, byte_index: u64) -> Result<(), ByteError> {
        let i = self.check(byte_index)?;
        self.data.as_mut()[i] = byte;
        self.len = self.len.max(byte_index + 1);
        Ok(())
    }

    #[inline(always)]
    fn byte_len(&self) -> u64 {
        self.len
    }

    fn on_seek(&mut self, byte_index: u64, sub_index: u8) -> Result<(), ByteError> {
        let end = byte_index + (sub_index > 0) as u64;
        let capacity = self.data.as_ref().len() as u64;
        if end > capacity {
            return Err(ByteError::CapacityExceeded {
                byte_pos: byte_index,
                capacity,
            });
        }
        self.len = self.len.max(end);
        Ok(())
    }

    #[inline(always)]
    fn capacity_limit(&self) -> Option<u64> {
        Some(self.data.as_ref().len() as u64)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<(), ByteError> {
        Ok(())
    }
}

/// Buffer sizing of a [`MemByteWriterVec`].
///
/// When a byte past the current capacity is needed the buffer is reallocated
/// to hold at least `increment` more bytes than needed, and at least twice its
/// previous capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthPolicy {
    /// Capacity reserved at construction.
    pub initial_capacity: usize,
    /// Minimum slack added past the needed size when growing.
    pub increment: usize,
}

impl GrowthPolicy {
    pub const DEFAULT_INITIAL_CAPACITY: usize = 64;
    pub const DEFAULT_INCREMENT: usize = 16;

    /// The capacity to reserve to hold `needed` bytes in a buffer whose
    /// current capacity is `capacity`.
    #[must_use]
    pub fn grown_capacity(&self, needed: usize, capacity: usize) -> usize {
        if needed <= capacity {
            return capacity;
        }
        needed
            .saturating_add(self.increment)
            .max(capacity.saturating_mul(2))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            increment: Self::DEFAULT_INCREMENT,
        }
    }
}

/// An implementation of [`ByteWrite`] for a mutable [`Vec<u8>`].
///
/// The core difference between [`MemByteWriter`] and [`MemByteWriterVec`] is
/// that the latter grows the vector following a [`GrowthPolicy`] when the
/// stream writes or moves past its end. The length of the vector is always the
/// logical length of the stream, that is, the high-water mark of the positions
/// written or moved over, rounded up to a byte.
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let mut data = Vec::new();
/// let mut bytes = MemByteWriterVec::new(&mut data);
/// assert!(bytes.store_byte(0xAB, 0).is_ok());
/// assert!(bytes.store_byte(0xCD, 2).is_ok());
/// assert_eq!(bytes.as_bytes(), &[0xAB, 0x00, 0xCD]);
/// assert!(bytes.capacity() >= 64);
/// ```
#[derive(Debug, PartialEq)]
#[cfg(feature = "alloc")]
pub struct MemByteWriterVec<B: AsMut<alloc::vec::Vec<u8>> + AsRef<alloc::vec::Vec<u8>>> {
    data: B,
    policy: GrowthPolicy,
}

#[cfg(feature = "alloc")]
impl<B: AsMut<alloc::vec::Vec<u8>> + AsRef<alloc::vec::Vec<u8>>> MemByteWriterVec<B> {
    /// Create a new [`MemByteWriterVec`] with the default [`GrowthPolicy`].
    /// The current content of the vector is the initial content of the stream.
    #[must_use]
    pub fn new(data: B) -> Self {
        Self::with_policy(data, GrowthPolicy::default())
    }

    /// Create a new [`MemByteWriterVec`] with the given [`GrowthPolicy`].
    #[must_use]
    pub fn with_policy(mut data: B, policy: GrowthPolicy) -> Self {
        let vec = data.as_mut();
        if vec.capacity() < policy.initial_capacity {
            let len = vec.len();
            // the initial capacity is a hint; growth reports allocation failures
            let _ = vec.try_reserve_exact(policy.initial_capacity - len);
        }
        Self { data, policy }
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// The logical length in bytes.
    pub fn len(&self) -> usize {
        self.data.as_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of bytes the vector can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.as_ref().capacity()
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }

    /// Extend the vector with zeros to `len` bytes.
    fn extend_to(&mut self, len: u64) -> Result<(), ByteError> {
        let needed = usize::try_from(len).map_err(|_| ByteError::CapacityExceeded {
            byte_pos: len,
            capacity: usize::MAX as u64,
        })?;
        let vec = self.data.as_mut();
        if needed <= vec.len() {
            return Ok(());
        }
        let capacity_exceeded = ByteError::CapacityExceeded {
            byte_pos: len - 1,
            capacity: vec.capacity() as u64,
        };
        let target = self.policy.grown_capacity(needed, vec.capacity());
        if target > vec.capacity() {
            let len = vec.len();
            // fall back to the exact size if the slack cannot be allocated
            if vec.try_reserve_exact(target - len).is_err() {
                vec.try_reserve_exact(needed - len)
                    .map_err(|_| capacity_exceeded)?;
            }
        }
        vec.resize(needed, 0);
        Ok(())
    }
}

#[cfg(feature = "alloc")]
impl<B: AsMut<alloc::vec::Vec<u8>> + AsRef<alloc::vec::Vec<u8>>> ByteWrite
    for MemByteWriterVec<B>
{
    type Error = ByteError;

    #[inline]
    fn load_byte(&mut self, byte_index: u64) -> Result<u8, ByteError> {
        Ok(usize::try_from(byte_index)
            .ok()
            .and_then(|i| self.data.as_ref().get(i).copied())
            .unwrap_or(0))
    }

    #[inline]
    fn store_byte(&mut self, byte: u8, byte_index: u64) -> Result<(), ByteError> {
        self.extend_to(byte_index + 1)?;
        self.data.as_mut()[byte_index as usize] = byte;
        Ok(())
    }

    #[inline(always)]
    fn byte_len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    #[inline]
    fn on_seek(&mut self, byte_index: u64, sub_index: u8) -> Result<(), ByteError> {
        self.extend_to(byte_index + (sub_index > 0) as u64)
    }

    #[inline(always)]
    fn flush(&mut self) -> Result<(), ByteError> {
        Ok(())
    }
}
