/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Traits

The traits are split in two layers. [`ByteRead`] and [`ByteWrite`] describe a
backing store of bytes (a slice, a vector, a file); [`BitRead`] and
[`BitWrite`] describe bit streams positioned by a [`BitStream`] cursor on top of
such a store.

*/

mod bit_stream;
pub use bit_stream::*;

mod byte_stream;
pub use byte_stream::*;

mod order;
pub use order::*;
