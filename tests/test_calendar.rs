/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitfield_stream::prelude::*;

/// A timestamp packed in 40 bits: year (11), month (4), day (5), hour (5),
/// minute (6), second (6) and 3 bits of padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timestamp {
    year: u16,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl Timestamp {
    fn write<W: BitWrite>(&self, writer: &mut W) -> Result<usize, BitError<W::Error>> {
        Ok(writer.write_int(self.year, 11)?
            + writer.write_int(self.month, 4)?
            + writer.write_int(self.day, 5)?
            + writer.write_int(self.hour, 5)?
            + writer.write_int(self.minute, 6)?
            + writer.write_int(self.second, 6)?
            + writer.write_bits(0, 3)?)
    }

    fn read<R: BitRead>(reader: &mut R) -> Result<Self, BitError<R::Error>> {
        let timestamp = Self {
            year: reader.read_int(11)?,
            month: reader.read_int(4)?,
            day: reader.read_int(5)?,
            hour: reader.read_int(5)?,
            minute: reader.read_int(6)?,
            second: reader.read_int(6)?,
        };
        reader.skip_bits(3)?;
        Ok(timestamp)
    }
}

const PACKED: [u8; 5] = [0xFC, 0x11, 0xC5, 0x56, 0xF0];

const TIMESTAMP: Timestamp = Timestamp {
    year: 2016,
    month: 8,
    day: 28,
    hour: 10,
    minute: 43,
    second: 30,
};

#[test]
fn test_pack() -> anyhow::Result<()> {
    let mut writer = BitWriter::new(MemByteWriterVec::new(Vec::new()));
    assert_eq!(TIMESTAMP.write(&mut writer)?, 40);
    assert_eq!(writer.backend().as_bytes(), &PACKED);
    Ok(())
}

#[test]
fn test_unpack() -> anyhow::Result<()> {
    let mut reader = BitReader::new(MemByteReader::new(&PACKED));
    assert_eq!(Timestamp::read(&mut reader)?, TIMESTAMP);
    assert!(reader.has_ended());
    assert!(!reader.truncated());
    Ok(())
}

#[test]
fn test_records() -> anyhow::Result<()> {
    let timestamps: Vec<Timestamp> = (0..100)
        .map(|i| Timestamp {
            year: 1900 + i,
            month: 1 + (i % 12) as u8,
            day: 1 + (i % 31) as u8,
            hour: (i % 24) as u8,
            minute: (i % 60) as u8,
            second: (59 - i % 60) as u8,
        })
        .collect();

    let mut writer = CountBitWriter::<_, false>::new(BitWriter::new(MemByteWriterVec::new(Vec::new())));
    for timestamp in &timestamps {
        timestamp.write(&mut writer)?;
    }
    assert_eq!(writer.bits_written, 4000);
    let bytes = writer.into_inner().into_inner().into_inner();
    assert_eq!(bytes.len(), 500);

    let mut reader = CountBitReader::<_, false>::new(BitReader::new(MemByteReader::new(&bytes)));
    // random access to the 42nd record
    reader.set_byte_pos(42 * 5)?;
    assert_eq!(Timestamp::read(&mut reader)?, timestamps[42]);
    reader.set_bit_pos(0)?;
    for timestamp in &timestamps {
        assert_eq!(Timestamp::read(&mut reader)?, *timestamp);
    }
    assert!(reader.has_ended());
    Ok(())
}
