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

#[test]
fn test_file_round_trip() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("bitfield_stream_test_file_round_trip.bin");
    let mut r = SmallRng::seed_from_u64(0);
    let fields: Vec<(u64, usize, u64)> = (0..1000)
        .map(|_| {
            let n_bits = r.random_range(1..=64);
            // occasional forward gaps
            let gap = if r.random_range(0..10) == 0 {
                r.random_range(0..20)
            } else {
                0
            };
            (r.random_range(0..=mask(n_bits)), n_bits, gap)
        })
        .collect();

    let mut in_memory = BitWriter::new(MemByteWriterVec::new(Vec::new()));
    {
        let mut writer = BitWriter::new(FileByteWriter::create(&path)?);
        for &(value, n_bits, gap) in &fields {
            writer.skip_bits(gap as i64)?;
            writer.write_bits(value, n_bits)?;
            in_memory.skip_bits(gap as i64)?;
            in_memory.write_bits(value, n_bits)?;
        }
        assert_eq!(writer.bit_pos(), in_memory.bit_pos());
        writer.into_inner().into_inner()?;
    }
    let expected = in_memory.into_inner().into_inner();
    assert_eq!(std::fs::read(&path)?, expected);

    let mut reader = BitReader::new(FileByteReader::open(&path)?);
    assert_eq!(reader.bit_len(), expected.len() as u64 * 8);
    for &(value, n_bits, gap) in &fields {
        reader.skip_bits(gap as i64)?;
        assert_eq!(reader.read_bits(n_bits)?, value);
    }
    assert!(reader.remaining_bits() < 8);
    std::fs::remove_file(&path)?;
    Ok(())
}

#[test]
fn test_file_forward_only() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("bitfield_stream_test_file_forward_only.bin");
    {
        let mut writer = BitWriter::new(FileByteWriter::create(&path)?);
        writer.write_bits(0x5, 4)?;
        // same byte, still in memory
        writer.set_bit_pos(0)?;
        writer.write_bits(0xA, 4)?;
        writer.write_bits(0xBC, 8)?;
        assert!(matches!(
            writer.set_bit_pos(4),
            Err(BitError::OutOfRange { bit_pos: 4, .. })
        ));
        writer.write_bits(0x1, 2)?;
        // dropping flushes the last byte
    }
    assert_eq!(std::fs::read(&path)?, vec![0xAB, 0xC4]);

    let mut reader = BitReader::new(FileByteReader::open(&path)?);
    reader.skip_bits(4)?;
    assert_eq!(reader.read_bits(8)?, 0xBC);
    assert!(reader.skip_bits(-8).is_err());
    assert_eq!(reader.read_bits(4)?, 0x4);
    assert!(reader.has_ended());
    assert!(!reader.truncated());
    std::fs::remove_file(&path)?;
    Ok(())
}
