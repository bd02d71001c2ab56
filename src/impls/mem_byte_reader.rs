/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// An implementation of [`ByteRead`] for a slice.
///
/// The length of the store is fixed at construction; requests past the end
/// return [`ByteError::UnexpectedEof`].
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let data = [0xFC, 0x11];
/// let mut bytes = MemByteReader::new(&data);
/// assert_eq!(bytes.byte_len(), 2);
/// assert_eq!(bytes.current_byte(1), Ok(0x11));
/// assert!(bytes.current_byte(2).is_err());
/// assert!(bytes.at_end(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MemByteReader<B: AsRef<[u8]>> {
    data: B,
}

impl<B: AsRef<[u8]>> MemByteReader<B> {
    /// Create a new [`MemByteReader`] from a slice of data
    #[must_use]
    pub fn new(data: B) -> Self {
        Self { data }
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}

impl<B: AsRef<[u8]>> ByteRead for MemByteReader<B> {
    type Error = ByteError;

    #[inline(always)]
    fn current_byte(&mut self, byte_index: u64) -> Result<u8, ByteError> {
        usize::try_from(byte_index)
            .ok()
            .and_then(|i| self.data.as_ref().get(i).copied())
            .ok_or(ByteError::UnexpectedEof {
                byte_pos: byte_index,
            })
    }

    #[inline(always)]
    fn byte_len(&self) -> u64 {
        self.data.as_ref().len() as u64
    }

    #[inline(always)]
    fn seek(&mut self, byte_index: u64) -> Result<(), ByteError> {
        if byte_index > self.byte_len() {
            return Err(ByteError::UnexpectedEof {
                byte_pos: byte_index,
            });
        }
        Ok(())
    }
}
