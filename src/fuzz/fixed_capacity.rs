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

const CAPACITY: usize = 32;

#[derive(Arbitrary, Debug, Clone)]
pub struct FuzzCase {
    bit_order: BitOrder,
    commands: Vec<RandomCommand>,
}

#[derive(Arbitrary, Debug, Clone)]
enum RandomCommand {
    Bits(u64, usize, ByteOrder),
    Seek(u16),
}

/// A successful write, checked at the end if no later write touched it.
#[derive(Debug)]
struct Field {
    bit_pos: u64,
    n_bits: usize,
    value: u64,
    byte_order: ByteOrder,
}

/// Write and overwrite fields at random positions of a fixed buffer, checking
/// that positions past the end are rejected without side effects, then read
/// back the fields that were not overwritten.
pub fn harness(data: FuzzCase) {
    let mut data = data;
    for command in &mut data.commands {
        if let RandomCommand::Bits(value, n_bits, _) = command {
            *n_bits = 1 + *n_bits % 64;
            *value &= mask(*n_bits);
        }
    }

    debugln!("{:#4?}", data);

    let bit_capacity = CAPACITY as u64 * 8;
    let mut buffer = [0_u8; CAPACITY];
    let mut fields: Vec<Field> = Vec::new();
    {
        let mut writer = BitWriter::with_orders(
            MemByteWriter::new(&mut buffer),
            ByteOrder::default(),
            data.bit_order,
        );
        for command in &data.commands {
            let pos = writer.bit_pos();
            match command {
                RandomCommand::Bits(value, n_bits, byte_order) => {
                    let result =
                        writer.write_bits_with(*value, *n_bits, *byte_order, data.bit_order);
                    let end = pos + *n_bits as u64;
                    if end > bit_capacity {
                        assert!(matches!(result, Err(BitError::OutOfRange { .. })));
                        assert_eq!(writer.bit_pos(), pos);
                    } else {
                        assert_eq!(result.unwrap(), *n_bits);
                        assert_eq!(writer.bit_pos(), end);
                        fields.retain(|f| f.bit_pos + f.n_bits as u64 <= pos || end <= f.bit_pos);
                        fields.push(Field {
                            bit_pos: pos,
                            n_bits: *n_bits,
                            value: *value,
                            byte_order: *byte_order,
                        });
                    }
                }
                RandomCommand::Seek(bit_pos) => {
                    let bit_pos = *bit_pos as u64;
                    let result = writer.set_bit_pos(bit_pos);
                    if bit_pos > bit_capacity {
                        assert!(result.is_err());
                        assert_eq!(writer.bit_pos(), pos);
                    } else {
                        result.unwrap();
                        assert_eq!(writer.bit_pos(), bit_pos);
                    }
                }
            }
            assert!(writer.bit_len() <= bit_capacity);
        }
        writer.flush().unwrap();
    }

    debugln!("{:02x?}", buffer);

    let mut reader = BitReader::with_orders(
        MemByteReader::new(&buffer),
        ByteOrder::default(),
        data.bit_order,
    );
    for field in &fields {
        reader.set_bit_pos(field.bit_pos).unwrap();
        let read = reader
            .read_bits_exact_with(field.n_bits, field.byte_order, data.bit_order)
            .unwrap();
        assert_eq!(
            read,
            field.value,
            "\nread : {:0n$b}\ntruth: {:0n$b}",
            read,
            field.value,
            n = field.n_bits
        );
    }
}
