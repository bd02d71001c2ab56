/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Typed reads and writes.

[`TypedRead`] and [`TypedWrite`] are extension traits, implemented for every
[`BitRead`](crate::traits::BitRead) and [`BitWrite`](crate::traits::BitWrite),
that express integers of any width, floats, booleans, byte sequences,
zero-terminated strings, integers in a range and length-prefixed sequences as
fixed-width transfers.

Each method comes in two forms: one using the default orders of the stream,
and one, with suffix `_with`, taking explicit orders.

*/

#[cfg(feature = "alloc")]
mod encoding;
#[cfg(feature = "alloc")]
pub use encoding::TextEncoding;

mod read;
pub use read::TypedRead;

mod write;
pub use write::TypedWrite;
