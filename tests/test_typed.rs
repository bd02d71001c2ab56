/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitfield_stream::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_primitives() -> anyhow::Result<()> {
    for (byte_order, bit_order) in [(BE, MSB), (BE, LSB), (LE, MSB), (LE, LSB)] {
        let mut writer = BitWriter::with_orders(
            MemByteWriterVec::new(Vec::new()),
            byte_order,
            bit_order,
        );
        // misalign everything
        writer.write_bool(true)?;
        writer.write_u8(0xAB)?;
        writer.write_i16(-2)?;
        writer.write_u32(0xDEAD_BEEF)?;
        writer.write_i64(i64::MIN)?;
        writer.write_f32(-1.5)?;
        writer.write_f64(core::f64::consts::PI)?;
        writer.write_int(-100_i32, 9)?;
        writer.write_int(300_u16, 9)?;
        writer.write_bool(false)?;
        writer.flush()?;
        let bytes = writer.into_inner().into_inner();

        let mut reader = BitReader::with_orders(MemByteReader::new(&bytes), byte_order, bit_order);
        assert!(reader.read_bool()?);
        assert_eq!(reader.read_u8()?, 0xAB);
        assert_eq!(reader.read_i16()?, -2);
        assert_eq!(reader.read_u32()?, 0xDEAD_BEEF);
        assert_eq!(reader.read_i64()?, i64::MIN);
        assert_eq!(reader.read_f32()?, -1.5);
        assert_eq!(reader.read_f64()?, core::f64::consts::PI);
        assert_eq!(reader.read_int::<i32>(9)?, -100);
        assert_eq!(reader.read_int::<u16>(9)?, 300);
        assert!(!reader.read_bool()?);
    }
    Ok(())
}

#[test]
fn test_sign_extension() -> anyhow::Result<()> {
    let data = [0b1110_0110];
    let mut reader = BitReader::new(MemByteReader::new(&data));
    assert_eq!(reader.read_int::<i8>(3)?, -1);
    reader.set_bit_pos(0)?;
    assert_eq!(reader.read_int::<u8>(3)?, 0b111);
    reader.set_bit_pos(0)?;
    assert_eq!(reader.read_int::<i64>(4)?, -2);
    // the sign bit is zero
    assert_eq!(reader.read_int::<i32>(4)?, 0b0110);
    Ok(())
}

#[test]
fn test_ranged() -> anyhow::Result<()> {
    let mut r = SmallRng::seed_from_u64(0);
    let values: Vec<i64> = (0..100).map(|_| r.random_range(-1000..=1000)).collect();

    let mut writer = BitWriter::new(MemByteWriterVec::new(Vec::new()));
    for &value in &values {
        // 11 bits each
        assert_eq!(writer.write_ranged(value, -1000, 1000)?, 11);
    }
    assert!(matches!(
        writer.write_ranged(1001, -1000, 1000),
        Err(BitError::InvalidRange {
            min: -1000,
            max: 1000
        })
    ));
    assert!(matches!(
        writer.write_ranged(0, 1, 0),
        Err(BitError::InvalidRange { .. })
    ));
    assert_eq!(writer.bit_pos(), 1100);
    // a constant takes no space
    assert_eq!(writer.write_ranged(7, 7, 7)?, 0);
    let bytes = writer.into_inner().into_inner();

    let mut reader = BitReader::new(MemByteReader::new(&bytes));
    for &value in &values {
        assert_eq!(reader.read_ranged(-1000, 1000)?, value);
    }
    assert_eq!(reader.read_ranged(7, 7)?, 7);
    Ok(())
}

#[test]
fn test_strings() -> anyhow::Result<()> {
    let mut writer = BitWriter::with_orders(MemByteWriterVec::new(Vec::new()), LE, LSB);
    writer.write_bits(0b101, 3)?;
    assert_eq!(writer.write_string("año", TextEncoding::Utf8)?, 40);
    assert_eq!(writer.write_string("año", TextEncoding::Latin1)?, 32);
    // trailing zeros are not written twice
    assert_eq!(writer.write_bytes_nul_terminated(b"ab\0\0")?, 24);
    assert_eq!(writer.write_string("", TextEncoding::Utf8)?, 8);
    writer.write_bytes(b"xyz")?;
    let bytes = writer.into_inner().into_inner();

    let mut reader = BitReader::with_orders(MemByteReader::new(&bytes), LE, LSB);
    assert_eq!(reader.read_bits(3)?, 0b101);
    assert_eq!(reader.read_string(TextEncoding::Utf8)?, "año");
    assert_eq!(reader.read_string(TextEncoding::Latin1)?, "año");
    assert_eq!(reader.read_bytes_until_nul()?, b"ab");
    assert_eq!(reader.read_string(TextEncoding::Utf8)?, "");
    assert_eq!(reader.read_bytes(2)?, b"xy");
    // no terminator before the end of the data
    assert_eq!(reader.read_bits(5)?, b'z' as u64 & 0x1F);
    let tail = reader.read_bytes_until_nul()?;
    assert_eq!(tail.len(), 1);
    assert!(reader.truncated());
    assert!(reader.has_ended());
    Ok(())
}

#[test]
fn test_len_prefixed() -> anyhow::Result<()> {
    let names = ["alpha", "beta", "gamma"];
    let mut writer = BitWriter::new(MemByteWriterVec::new(Vec::new()));
    let written = writer.write_len_prefixed(&names, |w, name| {
        w.write_string(name, TextEncoding::Utf8)
    })?;
    assert_eq!(written, 32 + 8 * (6 + 5 + 6));
    writer.write_len_prefixed::<u8, _>(&[], |w, &b| w.write_u8(b))?;
    let bytes = writer.into_inner().into_inner();
    assert_eq!(&bytes[..4], &[0, 0, 0, 3]);

    let mut reader = BitReader::new(MemByteReader::new(&bytes));
    let read = reader.read_len_prefixed(|r| r.read_string(TextEncoding::Utf8))?;
    assert_eq!(read, names);
    assert!(reader.read_len_prefixed(|r| r.read_u8())?.is_empty());
    assert!(reader.has_ended());

    // a length cut short yields no elements
    let mut reader = BitReader::new(MemByteReader::new(&[0x00, 0x01]));
    let mut calls = 0;
    let read = reader.read_len_prefixed(|r| {
        calls += 1;
        r.read_int::<u8>(3)
    })?;
    assert!(read.is_empty());
    assert_eq!(calls, 0);
    assert!(reader.truncated());
    assert_eq!(reader.bit_pos(), 16);
    Ok(())
}

#[test]
fn test_copy_across_alignments() -> anyhow::Result<()> {
    let mut r = SmallRng::seed_from_u64(1);
    let bits: Vec<bool> = (0..300).map(|_| r.random_range(0..2) == 1).collect();
    for (byte_order, bit_order) in [(BE, MSB), (LE, LSB)] {
        let mut writer =
            BitWriter::with_orders(MemByteWriterVec::new(Vec::new()), byte_order, bit_order);
        writer.write_bits(0, 3)?;
        for &bit in &bits {
            writer.write_bool(bit)?;
        }
        let bytes = writer.into_inner().into_inner();

        let mut reader = BitReader::with_orders(MemByteReader::new(&bytes), byte_order, bit_order);
        reader.skip_bits(3)?;
        let mut copy =
            BitWriter::with_orders(MemByteWriterVec::new(Vec::new()), byte_order, bit_order);
        copy.write_bits(0, 5)?;
        reader.copy_to(&mut copy, bits.len() as u64)?;
        let copied = copy.into_inner().into_inner();

        let mut reader = BitReader::with_orders(MemByteReader::new(&copied), byte_order, bit_order);
        reader.skip_bits(5)?;
        for &bit in &bits {
            assert_eq!(reader.read_bool()?, bit);
        }
    }
    Ok(())
}

#[test]
fn test_copy() -> anyhow::Result<()> {
    let mut r = SmallRng::seed_from_u64(0);
    for len in [0_u64, 1, 7, 63, 64, 65, 1000] {
        let mut writer = BitWriter::new(MemByteWriterVec::new(Vec::new()));
        for _ in 0..len {
            writer.write_bool(r.random_range(0..2) == 1)?;
        }
        let bytes = writer.into_inner().into_inner();

        // copy from an odd offset
        let mut reader = BitReader::new(MemByteReader::new(&bytes));
        let mut copy = BitWriter::new(MemByteWriterVec::new(Vec::new()));
        copy.write_bits(0b101, 3)?;
        reader.copy_to(&mut copy, len)?;
        assert_eq!(copy.bit_pos(), 3 + len);
        let copied = copy.into_inner().into_inner();

        let mut reader = BitReader::new(MemByteReader::new(&copied));
        reader.skip_bits(3)?;
        let mut back = BitWriter::new(MemByteWriterVec::new(Vec::new()));
        back.copy_from(&mut reader, len)?;
        assert_eq!(back.into_inner().into_inner(), bytes);

        let mut reader = BitReader::new(MemByteReader::new(&bytes));
        let mut sink = BitWriter::new(MemByteWriterVec::new(Vec::new()));
        assert!(matches!(
            reader.copy_to(&mut sink, bytes.len() as u64 * 8 + 1),
            Err(CopyError::ReadError(BitError::EndOfData { .. }))
        ));
    }
    Ok(())
}
