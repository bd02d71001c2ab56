/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::traits::*;

/// Wrapping struct that keep tracks of written bits. Optionally,
/// prints to standard error information about methods called.
///
/// Typed writes of [`TypedWrite`](crate::typed::TypedWrite) are performed
/// through [`write_bits_with`](BitWrite::write_bits_with), so they are counted
/// (and printed) as primitive writes.
#[derive(Debug, Clone)]
pub struct CountBitWriter<BW: BitWrite, const PRINT: bool = false> {
    bit_write: BW,
    /// The number of bits written so far on the underlying [`BitWrite`].
    pub bits_written: u64,
}

impl<BW: BitWrite, const PRINT: bool> CountBitWriter<BW, PRINT> {
    pub fn new(bit_write: BW) -> Self {
        Self {
            bit_write,
            bits_written: 0,
        }
    }

    pub fn into_inner(self) -> BW {
        self.bit_write
    }
}

impl<BW: BitWrite, const PRINT: bool> BitStream for CountBitWriter<BW, PRINT> {
    type Error = BW::Error;

    #[inline(always)]
    fn bit_pos(&self) -> u64 {
        self.bit_write.bit_pos()
    }

    #[inline(always)]
    fn bit_len(&self) -> u64 {
        self.bit_write.bit_len()
    }

    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<(), BitError<BW::Error>> {
        if PRINT {
            eprintln!("set_bit_pos({})", bit_pos);
        }
        self.bit_write.set_bit_pos(bit_pos)
    }

    fn byte_order(&self) -> ByteOrder {
        self.bit_write.byte_order()
    }

    fn bit_order(&self) -> BitOrder {
        self.bit_write.bit_order()
    }

    fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.bit_write.set_byte_order(byte_order)
    }

    fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.bit_write.set_bit_order(bit_order)
    }
}

impl<BW: BitWrite, const PRINT: bool> BitWrite for CountBitWriter<BW, PRINT> {
    fn write_bits_with(
        &mut self,
        value: u64,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<BW::Error>> {
        self.bit_write
            .write_bits_with(value, n_bits, byte_order, bit_order)
            .inspect(|x| {
                self.bits_written += *x as u64;
                if PRINT {
                    eprintln!(
                        "write_bits({:#x}, {}, {}, {}) = {} (total = {})",
                        value, n_bits, byte_order, bit_order, x, self.bits_written
                    );
                }
            })
    }

    fn flush(&mut self) -> Result<(), BitError<BW::Error>> {
        self.bit_write.flush()
    }
}

/// Wrapping struct that keep tracks of read bits. Optionally,
/// prints to standard error information about methods called.
///
/// Clamped reads are counted for the bits actually read.
#[derive(Debug, Clone)]
pub struct CountBitReader<BR: BitRead, const PRINT: bool = false> {
    bit_read: BR,
    /// The number of bits read so far from the underlying [`BitRead`].
    pub bits_read: u64,
}

impl<BR: BitRead, const PRINT: bool> CountBitReader<BR, PRINT> {
    pub fn new(bit_read: BR) -> Self {
        Self {
            bit_read,
            bits_read: 0,
        }
    }

    pub fn into_inner(self) -> BR {
        self.bit_read
    }
}

impl<BR: BitRead, const PRINT: bool> BitStream for CountBitReader<BR, PRINT> {
    type Error = BR::Error;

    #[inline(always)]
    fn bit_pos(&self) -> u64 {
        self.bit_read.bit_pos()
    }

    #[inline(always)]
    fn bit_len(&self) -> u64 {
        self.bit_read.bit_len()
    }

    fn set_bit_pos(&mut self, bit_pos: u64) -> Result<(), BitError<BR::Error>> {
        if PRINT {
            eprintln!("set_bit_pos({})", bit_pos);
        }
        self.bit_read.set_bit_pos(bit_pos)
    }

    fn byte_order(&self) -> ByteOrder {
        self.bit_read.byte_order()
    }

    fn bit_order(&self) -> BitOrder {
        self.bit_read.bit_order()
    }

    fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.bit_read.set_byte_order(byte_order)
    }

    fn set_bit_order(&mut self, bit_order: BitOrder) {
        self.bit_read.set_bit_order(bit_order)
    }
}

impl<BR: BitRead, const PRINT: bool> BitRead for CountBitReader<BR, PRINT> {
    fn read_bits_with(
        &mut self,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<u64, BitError<BR::Error>> {
        let start = self.bit_read.bit_pos();
        self.bit_read
            .read_bits_with(n_bits, byte_order, bit_order)
            .inspect(|x| {
                self.bits_read += self.bit_read.bit_pos() - start;
                if PRINT {
                    eprintln!(
                        "read_bits({}, {}, {}) = {:#x}{} (total = {})",
                        n_bits,
                        byte_order,
                        bit_order,
                        x,
                        if self.bit_read.truncated() {
                            " truncated"
                        } else {
                            ""
                        },
                        self.bits_read
                    );
                }
            })
    }

    #[inline(always)]
    fn truncated(&self) -> bool {
        self.bit_read.truncated()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_count() -> anyhow::Result<()> {
        let mut buffer = Vec::new();
        let bit_write = BitWriter::new(MemByteWriterVec::new(&mut buffer));
        let mut count_bit_write = CountBitWriter::<_, true>::new(bit_write);

        count_bit_write.write_bits(5, 3)?;
        assert_eq!(count_bit_write.bits_written, 3);
        count_bit_write.write_u16(1000)?;
        assert_eq!(count_bit_write.bits_written, 19);
        count_bit_write.write_bits_with(1, 20, LE, LSB)?;
        assert_eq!(count_bit_write.bits_written, 39);
        count_bit_write.write_bool_with(true, LSB)?;
        assert_eq!(count_bit_write.bits_written, 40);
        count_bit_write.flush()?;
        drop(count_bit_write);

        let bit_read = BitReader::new(MemByteReader::new(&buffer));
        let mut count_bit_read = CountBitReader::<_, true>::new(bit_read);

        assert_eq!(count_bit_read.read_bits(3)?, 5);
        assert_eq!(count_bit_read.bits_read, 3);
        assert_eq!(count_bit_read.read_u16()?, 1000);
        assert_eq!(count_bit_read.bits_read, 19);
        assert_eq!(count_bit_read.read_bits_with(20, LE, LSB)?, 1);
        assert_eq!(count_bit_read.bits_read, 39);
        assert!(count_bit_read.read_bool_with(LSB)?);
        // clamped
        assert_eq!(count_bit_read.read_bits(8)?, 0);
        assert!(count_bit_read.truncated());
        assert_eq!(count_bit_read.bits_read, 40);
        Ok(())
    }
}
