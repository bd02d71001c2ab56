/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// An adapter from [`Write`] to [`ByteWrite`] accumulating a partial byte.
///
/// Bytes are emitted in order: the byte under the cursor is kept in memory
/// until the cursor moves past it, and moving forward past bytes never
/// written emits zeros. Bytes already emitted cannot be modified, so
/// [`first_seekable_byte`](ByteWrite::first_seekable_byte) is the index of the
/// byte in memory.
///
/// [`flush`](ByteWrite::flush) emits the partial byte, padded with zeros; it
/// is called when the writer is dropped, ignoring errors. Use
/// [`into_inner`](FileByteWriter::into_inner) to get errors and the backend.
#[derive(Debug)]
pub struct FileByteWriter<W: Write> {
    /// Taken by [`into_inner`](FileByteWriter::into_inner).
    backend: Option<W>,
    /// Number of bytes emitted to the backend.
    emitted: u64,
    /// Content of the byte at index `emitted`, if it has been touched.
    partial: Option<u8>,
}

impl<W: Write> FileByteWriter<W> {
    /// Create a new [`FileByteWriter`] emitting bytes to `backend`.
    pub fn new(backend: W) -> Self {
        Self {
            backend: Some(backend),
            emitted: 0,
            partial: None,
        }
    }

    /// Flush and return the backend.
    pub fn into_inner(mut self) -> std::io::Result<W> {
        ByteWrite::flush(&mut self)?;
        self.backend.take().ok_or_else(Self::detached)
    }

    fn detached() -> std::io::Error {
        std::io::Error::other("The backend has been taken")
    }

    fn backend_mut(&mut self) -> std::io::Result<&mut W> {
        self.backend.as_mut().ok_or_else(Self::detached)
    }

    /// Emit bytes until `byte_index` is the byte in memory.
    fn emit_to(&mut self, byte_index: u64) -> std::io::Result<()> {
        if byte_index < self.emitted {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                format!(
                    "Cannot move back to byte {}: {} bytes have been emitted",
                    byte_index, self.emitted
                ),
            ));
        }
        while self.emitted < byte_index {
            let byte = self.partial.take().unwrap_or(0);
            self.backend_mut()?.write_all(&[byte])?;
            self.emitted += 1;
        }
        Ok(())
    }
}

impl FileByteWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path` for writing.
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ByteWrite for FileByteWriter<W> {
    type Error = std::io::Error;

    #[inline]
    fn load_byte(&mut self, byte_index: u64) -> Result<u8, std::io::Error> {
        if byte_index < self.emitted {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                format!("Byte {} has already been emitted", byte_index),
            ));
        }
        if byte_index == self.emitted {
            return Ok(self.partial.unwrap_or(0));
        }
        Ok(0)
    }

    #[inline]
    fn store_byte(&mut self, byte: u8, byte_index: u64) -> Result<(), std::io::Error> {
        self.emit_to(byte_index)?;
        self.partial = Some(byte);
        Ok(())
    }

    #[inline(always)]
    fn byte_len(&self) -> u64 {
        self.emitted + self.partial.is_some() as u64
    }

    fn on_seek(&mut self, byte_index: u64, sub_index: u8) -> Result<(), std::io::Error> {
        self.emit_to(byte_index)?;
        if sub_index > 0 && self.partial.is_none() {
            self.partial = Some(0);
        }
        Ok(())
    }

    #[inline(always)]
    fn first_seekable_byte(&self) -> u64 {
        self.emitted
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        if let Some(byte) = self.partial.take() {
            self.backend_mut()?.write_all(&[byte])?;
            self.emitted += 1;
        }
        self.backend_mut()?.flush()
    }
}

impl<W: Write> Drop for FileByteWriter<W> {
    fn drop(&mut self) {
        // During a drop we can't save anything if it goes bad :/
        if self.backend.is_some() {
            let _ = ByteWrite::flush(self);
        }
    }
}
