/*
 * SPDX-FileCopyrightText: 2023 Tommaso Fontana
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Implementations of backing stores and bit streams.

If you want to read or write directly from memory, you can use
[`MemByteReader`], [`MemByteWriter`] (over a slice of fixed length) and
[`MemByteWriterVec`] (over a vector, which grows following a
[`GrowthPolicy`]).

If you need to read or write bytes from a file or any backend implementing
[`std::io::Read`] or [`std::io::Write`] you just need to wrap it in a
[`FileByteReader`] or [`FileByteWriter`]. These stores consume or emit their
bytes in order, so they can only move forward.

Once you have a backing store, you can use [`BitReader`] and [`BitWriter`] to
read or write fields of any width from 0 to 64 bits at any bit position. Both
keep a default byte and bit order, which can be overridden for each call.

*/

mod cursor;
pub use cursor::Cursor;

mod mem_byte_reader;
pub use mem_byte_reader::*;

mod mem_byte_writer;
pub use mem_byte_writer::*;

#[cfg(feature = "std")]
mod file_byte_reader;
#[cfg(feature = "std")]
pub use file_byte_reader::*;

#[cfg(feature = "std")]
mod file_byte_writer;
#[cfg(feature = "std")]
pub use file_byte_writer::*;

mod bit_reader;
pub use bit_reader::BitReader;

mod bit_writer;
pub use bit_writer::BitWriter;
