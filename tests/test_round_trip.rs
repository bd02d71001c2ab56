/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitfield_stream::engine::mask;
use bitfield_stream::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const ORDERS: [(ByteOrder, BitOrder); 4] = [(BE, MSB), (BE, LSB), (LE, MSB), (LE, LSB)];

#[test]
fn test_every_width() -> anyhow::Result<()> {
    for (byte_order, bit_order) in ORDERS {
        for start in 0..8 {
            for n_bits in 1..=64 {
                let mut r = SmallRng::seed_from_u64(n_bits as u64);
                let values: Vec<u64> = (0..10).map(|_| r.random_range(0..=mask(n_bits))).collect();

                let mut buffer = Vec::new();
                let mut writer = BitWriter::with_orders(
                    MemByteWriterVec::new(&mut buffer),
                    byte_order,
                    bit_order,
                );
                writer.set_bit_pos(start)?;
                for &value in &values {
                    assert_eq!(writer.write_bits(value, n_bits)?, n_bits);
                }
                writer.flush()?;
                let end = writer.bit_pos();
                assert_eq!(end, start + 10 * n_bits as u64);
                drop(writer);
                assert_eq!(buffer.len() as u64, end.div_ceil(8));

                let mut reader =
                    BitReader::with_orders(MemByteReader::new(&buffer), byte_order, bit_order);
                reader.set_bit_pos(start)?;
                for &value in &values {
                    let read = reader.read_bits(n_bits)?;
                    assert_eq!(
                        read, value,
                        "{byte_order} {bit_order} start {start} width {n_bits}"
                    );
                    assert!(!reader.truncated());
                }
                assert_eq!(reader.bit_pos(), end);
            }
        }
    }
    Ok(())
}

#[test]
fn test_mixed_widths() -> anyhow::Result<()> {
    let mut r = SmallRng::seed_from_u64(0);
    for (byte_order, bit_order) in ORDERS {
        let fields: Vec<(u64, usize)> = (0..1000)
            .map(|_| {
                let n_bits = r.random_range(0..=64);
                (r.random_range(0..=mask(n_bits)), n_bits)
            })
            .collect();

        let config = StreamConfig::default()
            .with_byte_order(byte_order)
            .with_bit_order(bit_order)
            .with_initial_capacity(0)
            .with_increment(1);
        let mut writer = BitWriter::with_config(
            MemByteWriterVec::with_policy(Vec::new(), config.growth_policy()),
            &config,
        );
        for &(value, n_bits) in &fields {
            writer.write_bits(value, n_bits)?;
        }
        let total: u64 = fields.iter().map(|&(_, n_bits)| n_bits as u64).sum();
        assert_eq!(writer.bit_pos(), total);
        let buffer = writer.into_inner().into_inner();

        let mut reader = BitReader::with_config(MemByteReader::new(buffer), &config);
        for &(value, n_bits) in &fields {
            assert_eq!(reader.read_bits(n_bits)?, value);
        }
        // at most the padding of the last byte is left
        assert!(reader.remaining_bits() < 8);
    }
    Ok(())
}

#[test]
fn test_overwrite() -> anyhow::Result<()> {
    let mut r = SmallRng::seed_from_u64(0);
    for (byte_order, bit_order) in ORDERS {
        let mut buffer = vec![0_u8; 64];
        let mut writer =
            BitWriter::with_orders(MemByteWriter::new(&mut buffer), byte_order, bit_order);
        // background of ones
        for _ in 0..8 {
            writer.write_bits(u64::MAX, 64)?;
        }
        for _ in 0..100 {
            let n_bits = r.random_range(1..=64);
            let pos = r.random_range(0..=512 - n_bits as u64);
            let value = r.random_range(0..=mask(n_bits));
            writer.set_bit_pos(pos)?;
            writer.write_bits(value, n_bits)?;

            let bytes = writer.backend().as_bytes().to_vec();
            let mut reader =
                BitReader::with_orders(MemByteReader::new(&bytes), byte_order, bit_order);
            reader.set_bit_pos(pos)?;
            assert_eq!(reader.read_bits(n_bits)?, value);

            // restore the background
            writer.set_bit_pos(pos)?;
            writer.write_bits(mask(n_bits), n_bits)?;
            assert!(writer.backend().as_bytes().iter().all(|&b| b == 0xFF));
        }
    }
    Ok(())
}
