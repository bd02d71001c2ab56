/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::engine::mask;
use crate::prelude::*;
use alloc::vec::Vec;
use arbitrary::Arbitrary;

const DEBUG: bool = false;

macro_rules! debugln {
    ($($arg:tt)*) => {
        if DEBUG {
            println!($($arg)*);
        }
    };
}

#[derive(Arbitrary, Debug, Clone)]
pub struct FuzzCase {
    bit_order: BitOrder,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug, Clone)]
enum RandomCommand {
    Bits(u64, usize, ByteOrder),
    Bool(bool),
    Ranged(i64, i64, i64),
    Signed(i64, usize, ByteOrder),
    Skip(u8),
}

/// Write a sequence of fields with a single bit order and per-field byte
/// orders, then read them back.
///
/// Fields written with different bit orders may overlap within a byte, so
/// the bit order is fixed for the whole case.
pub fn harness(data: FuzzCase) {
    let mut data = data;
    for command in &mut data.commands {
        match command {
            RandomCommand::Bits(value, n_bits, _) => {
                *n_bits %= 65;
                *value &= mask(*n_bits);
            }
            RandomCommand::Ranged(value, min, max) => {
                if *min > *max {
                    core::mem::swap(min, max);
                }
                *value = (*value).clamp(*min, *max);
            }
            RandomCommand::Signed(value, n_bits, _) => {
                *n_bits = 1 + *n_bits % 64;
                let shift = 64 - *n_bits;
                *value = (*value << shift) >> shift;
            }
            RandomCommand::Bool(_) | RandomCommand::Skip(_) => {}
        }
    }

    debugln!("{:#4?}", data);

    let mut buffer = Vec::new();
    let mut positions = Vec::with_capacity(data.commands.len());
    let end = {
        let mut writer = BitWriter::with_orders(
            MemByteWriterVec::new(&mut buffer),
            ByteOrder::default(),
            data.bit_order,
        );
        for command in &data.commands {
            positions.push(writer.bit_pos());
            let written = match command {
                RandomCommand::Bits(value, n_bits, byte_order) => writer
                    .write_bits_with(*value, *n_bits, *byte_order, data.bit_order)
                    .unwrap(),
                RandomCommand::Bool(value) => writer.write_bool(*value).unwrap(),
                RandomCommand::Ranged(value, min, max) => {
                    writer.write_ranged(*value, *min, *max).unwrap()
                }
                RandomCommand::Signed(value, n_bits, byte_order) => writer
                    .write_int_with(*value, *n_bits, *byte_order, data.bit_order)
                    .unwrap(),
                RandomCommand::Skip(n_bits) => {
                    writer.skip_bits(*n_bits as i64).unwrap();
                    *n_bits as usize
                }
            };
            assert_eq!(
                writer.bit_pos(),
                positions.last().copied().unwrap_or(0) + written as u64
            );
        }
        writer.flush().unwrap();
        writer.bit_pos()
    };
    assert_eq!(buffer.len() as u64, end.div_ceil(8));

    debugln!("{:02x?}", buffer);

    let mut reader = BitReader::with_orders(
        MemByteReader::new(&buffer),
        ByteOrder::default(),
        data.bit_order,
    );
    for (command, pos) in data.commands.iter().zip(positions) {
        assert_eq!(reader.bit_pos(), pos);
        match command {
            RandomCommand::Bits(value, n_bits, byte_order) => {
                let read = reader
                    .read_bits_with(*n_bits, *byte_order, data.bit_order)
                    .unwrap();
                assert_eq!(
                    read,
                    *value,
                    "\nread : {:0n$b}\ntruth: {:0n$b}",
                    read,
                    value,
                    n = *n_bits
                );
            }
            RandomCommand::Bool(value) => {
                assert_eq!(reader.read_bool().unwrap(), *value);
            }
            RandomCommand::Ranged(value, min, max) => {
                assert_eq!(reader.read_ranged(*min, *max).unwrap(), *value);
            }
            RandomCommand::Signed(value, n_bits, byte_order) => {
                let read: i64 = reader
                    .read_int_with(*n_bits, *byte_order, data.bit_order)
                    .unwrap();
                assert_eq!(read, *value);
            }
            RandomCommand::Skip(n_bits) => {
                reader.skip_bits(*n_bits as i64).unwrap();
            }
        }
        assert!(!reader.truncated());
    }
}
