/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Construction parameters of bit streams.

use crate::impls::GrowthPolicy;
use crate::traits::{BitOrder, ByteOrder};
#[cfg(feature = "mem_dbg")]
use mem_dbg::{MemDbg, MemSize};

/// Default orders of a stream and sizing of growable in-memory stores.
///
/// The default configuration uses [big-endian](ByteOrder::BigEndian) byte
/// order, [most-significant-first](BitOrder::MostSignificantFirst) bit order,
/// an initial capacity of 64 bytes and an increment of 16 bytes.
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let config = StreamConfig::default()
///     .with_byte_order(ByteOrder::LittleEndian)
///     .with_increment(256);
///
/// let mut data = Vec::new();
/// let mut writer = BitWriter::with_config(
///     MemByteWriterVec::with_policy(&mut data, config.growth_policy()),
///     &config,
/// );
/// assert_eq!(writer.byte_order(), ByteOrder::LittleEndian);
/// assert_eq!(writer.bit_order(), BitOrder::MostSignificantFirst);
/// writer.write_bits(0x1234, 16).unwrap();
/// drop(writer);
/// assert_eq!(data, vec![0x34, 0x12]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "mem_dbg", derive(MemDbg, MemSize))]
#[cfg_attr(feature = "mem_dbg", mem_size(flat))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StreamConfig {
    pub byte_order: ByteOrder,
    pub bit_order: BitOrder,
    /// Capacity reserved by growable in-memory stores at construction.
    pub initial_capacity: usize,
    /// Minimum slack added by growable in-memory stores when growing.
    pub increment: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::BigEndian,
            bit_order: BitOrder::MostSignificantFirst,
            initial_capacity: GrowthPolicy::DEFAULT_INITIAL_CAPACITY,
            increment: GrowthPolicy::DEFAULT_INCREMENT,
        }
    }
}

impl StreamConfig {
    #[must_use]
    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    #[must_use]
    pub fn with_bit_order(mut self, bit_order: BitOrder) -> Self {
        self.bit_order = bit_order;
        self
    }

    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    #[must_use]
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment;
        self
    }

    /// The sizing of growable in-memory stores described by this
    /// configuration.
    #[must_use]
    pub fn growth_policy(&self) -> GrowthPolicy {
        GrowthPolicy {
            initial_capacity: self.initial_capacity,
            increment: self.increment,
        }
    }
}
