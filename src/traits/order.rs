/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Runtime selectors for the two independent orderings of a bit field.
//!
//! Differently from word-oriented bit streams, where endianness is a property
//! of the stream type, packed records routinely mix orderings field by field,
//! so both orders are plain values that can be passed to every call or stored
//! as a per-stream default.

#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Order in which the successive whole bytes of a multi-byte field are
/// assembled or emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum ByteOrder {
    /// The segment that comes first in the stream is the most significant.
    #[default]
    BigEndian,
    /// The segment that comes first in the stream is the least significant.
    LittleEndian,
}

/// Alias for [`ByteOrder::BigEndian`]
pub const BE: ByteOrder = ByteOrder::BigEndian;

/// Alias for [`ByteOrder::LittleEndian`]
pub const LE: ByteOrder = ByteOrder::LittleEndian;

/// Direction in which the bits of a single byte are consumed.
///
/// With [`BitOrder::MostSignificantFirst`] the bit at sub-byte offset 0 is the
/// highest bit of the byte; with [`BitOrder::LeastSignificantFirst`] it is the
/// lowest one. The value of a sub-byte field always keeps the bit order of the
/// byte it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub enum BitOrder {
    #[default]
    MostSignificantFirst,
    LeastSignificantFirst,
}

/// Alias for [`BitOrder::MostSignificantFirst`]
pub const MSB: BitOrder = BitOrder::MostSignificantFirst;

/// Alias for [`BitOrder::LeastSignificantFirst`]
pub const LSB: BitOrder = BitOrder::LeastSignificantFirst;

impl core::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "BE"),
            ByteOrder::LittleEndian => write!(f, "LE"),
        }
    }
}

impl core::fmt::Display for BitOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitOrder::MostSignificantFirst => write!(f, "MSB"),
            BitOrder::LeastSignificantFirst => write!(f, "LSB"),
        }
    }
}
