/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// An adapter from [`Read`] to [`ByteRead`] keeping a single byte of
/// lookahead.
///
/// The source is consumed sequentially: the byte under the cursor is kept in
/// the lookahead, and moving forward skips the intermediate bytes of the
/// source and refills the lookahead. Moving before the lookahead is not
/// possible, so [`first_seekable_byte`](ByteRead::first_seekable_byte) is the
/// index of the byte in the lookahead.
///
/// The length of the data must be known in advance: it is passed to
/// [`new`](FileByteReader::new), or measured by
/// [`from_seekable`](FileByteReader::from_seekable) and
/// [`open`](FileByteReader::open).
#[derive(Debug)]
pub struct FileByteReader<R: Read> {
    backend: R,
    len: u64,
    /// Index and value of the byte read last from the source.
    lookahead: Option<(u64, u8)>,
    /// Number of bytes consumed from the source.
    consumed: u64,
}

impl<R: Read> FileByteReader<R> {
    /// Create a new [`FileByteReader`] reading `len` bytes from `backend`.
    pub fn new(backend: R, len: u64) -> Self {
        Self {
            backend,
            len,
            lookahead: None,
            consumed: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.backend
    }

    /// Skip `n` bytes of the source.
    fn skip(&mut self, n: u64) -> std::io::Result<()> {
        let skipped = std::io::copy(&mut (&mut self.backend).take(n), &mut std::io::sink())?;
        self.consumed += skipped;
        if skipped < n {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("Unexpected EOF, skipped only {} of {} bytes", skipped, n),
            ));
        }
        Ok(())
    }

    /// Make `byte_index` the byte in the lookahead.
    fn fill(&mut self, byte_index: u64) -> std::io::Result<u8> {
        if byte_index < self.consumed {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                format!(
                    "Cannot move back to byte {}: the stream is at byte {}",
                    byte_index,
                    self.first_seekable_byte()
                ),
            ));
        }
        self.skip(byte_index - self.consumed)?;
        let mut buf = [0_u8; 1];
        self.backend.read_exact(&mut buf)?;
        self.consumed += 1;
        self.lookahead = Some((byte_index, buf[0]));
        Ok(buf[0])
    }
}

impl<R: Read + Seek> FileByteReader<R> {
    /// Create a new [`FileByteReader`] reading `backend` from its current
    /// position to its end.
    pub fn from_seekable(mut backend: R) -> std::io::Result<Self> {
        let start = backend.stream_position()?;
        let end = backend.seek(SeekFrom::End(0))?;
        backend.seek(SeekFrom::Start(start))?;
        Ok(Self::new(backend, end.saturating_sub(start)))
    }
}

impl FileByteReader<BufReader<File>> {
    /// Open the file at `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self::new(BufReader::new(file), len))
    }
}

impl<R: Read> ByteRead for FileByteReader<R> {
    type Error = std::io::Error;

    #[inline]
    fn current_byte(&mut self, byte_index: u64) -> Result<u8, std::io::Error> {
        match self.lookahead {
            Some((index, byte)) if index == byte_index => Ok(byte),
            _ => self.fill(byte_index),
        }
    }

    #[inline(always)]
    fn byte_len(&self) -> u64 {
        self.len
    }

    fn seek(&mut self, byte_index: u64) -> Result<(), std::io::Error> {
        if byte_index > self.len {
            return Err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "Cannot move to byte {}: the stream has {} bytes",
                    byte_index, self.len
                ),
            ));
        }
        if byte_index < self.len {
            self.current_byte(byte_index)?;
        }
        Ok(())
    }

    #[inline]
    fn on_seek(&mut self, byte_index: u64, sub_index: u8) -> Result<(), std::io::Error> {
        if sub_index == 0 && byte_index < self.len {
            self.current_byte(byte_index)?;
        }
        Ok(())
    }

    #[inline(always)]
    fn first_seekable_byte(&self) -> u64 {
        match self.lookahead {
            Some((index, _)) => index,
            None => self.consumed,
        }
    }
}
