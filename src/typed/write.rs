/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::read::range_width;
#[cfg(feature = "alloc")]
use super::TextEncoding;
use crate::engine::mask;
use crate::traits::*;
use num_traits::{AsPrimitive, PrimInt};

macro_rules! write_fixed {
    ($($name:ident, $name_with:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Write a `", stringify!($ty), "` using the default orders of the stream.")]
        #[inline]
        fn $name(&mut self, value: $ty) -> Result<usize, BitError<Self::Error>> {
            self.write_int(value, <$ty>::BITS as usize)
        }

        #[doc = concat!("Write a `", stringify!($ty), "` using the given orders.")]
        #[inline]
        fn $name_with(
            &mut self,
            value: $ty,
            byte_order: ByteOrder,
            bit_order: BitOrder,
        ) -> Result<usize, BitError<Self::Error>> {
            self.write_int_with(value, <$ty>::BITS as usize, byte_order, bit_order)
        }
    )*};
}

/// Typed writes on top of a [`BitWrite`].
///
/// Every method is a sequence of fixed-width calls to
/// [`write_bits_with`](BitWrite::write_bits_with) and returns the number of
/// bits written.
///
/// This trait is implemented for every [`BitWrite`].
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let mut data = Vec::new();
/// let mut writer = BitWriter::new(MemByteWriterVec::new(&mut data));
///
/// writer.write_int(2016_u16, 11).unwrap();
/// writer.write_int(8_u8, 4).unwrap();
/// writer.write_int(-4_i8, 5).unwrap();
/// writer.write_string("hi", TextEncoding::Utf8).unwrap();
/// drop(writer);
///
/// let mut reader = BitReader::new(MemByteReader::new(&data));
/// assert_eq!(reader.read_int::<u16>(11).unwrap(), 2016);
/// assert_eq!(reader.read_int::<u8>(4).unwrap(), 8);
/// assert_eq!(reader.read_int::<i8>(5).unwrap(), -4);
/// assert_eq!(reader.read_string(TextEncoding::Utf8).unwrap(), "hi");
/// ```
pub trait TypedWrite: BitWrite {
    /// Write the lowest `n_bits` bits of an integer of type `T` using the
    /// given orders.
    ///
    /// `n_bits` must not exceed the width of `T`, or the write fails with
    /// [`BitError::InvalidWidth`]. The other bits of the value are ignored, so
    /// negative values can be written in fewer bits than their type and read
    /// back with sign extension.
    #[inline]
    fn write_int_with<T>(
        &mut self,
        value: T,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>>
    where
        T: PrimInt + AsPrimitive<u64>,
    {
        let max = core::mem::size_of::<T>() * 8;
        if n_bits > max {
            return Err(BitError::InvalidWidth {
                width: n_bits,
                max,
            });
        }
        self.write_bits_with(value.as_() & mask(n_bits), n_bits, byte_order, bit_order)
    }

    /// Write the lowest `n_bits` bits of an integer of type `T` using the
    /// default orders of the stream.
    #[inline]
    fn write_int<T>(&mut self, value: T, n_bits: usize) -> Result<usize, BitError<Self::Error>>
    where
        T: PrimInt + AsPrimitive<u64>,
    {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_int_with(value, n_bits, byte_order, bit_order)
    }

    write_fixed! {
        write_u8, write_u8_with => u8;
        write_u16, write_u16_with => u16;
        write_u32, write_u32_with => u32;
        write_u64, write_u64_with => u64;
        write_i8, write_i8_with => i8;
        write_i16, write_i16_with => i16;
        write_i32, write_i32_with => i32;
        write_i64, write_i64_with => i64;
    }

    /// Write a 32-bit IEEE 754 float using the given orders.
    #[inline]
    fn write_f32_with(
        &mut self,
        value: f32,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        self.write_u32_with(value.to_bits(), byte_order, bit_order)
    }

    #[inline]
    fn write_f32(&mut self, value: f32) -> Result<usize, BitError<Self::Error>> {
        self.write_u32(value.to_bits())
    }

    /// Write a 64-bit IEEE 754 float using the given orders.
    #[inline]
    fn write_f64_with(
        &mut self,
        value: f64,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        self.write_u64_with(value.to_bits(), byte_order, bit_order)
    }

    #[inline]
    fn write_f64(&mut self, value: f64) -> Result<usize, BitError<Self::Error>> {
        self.write_u64(value.to_bits())
    }

    /// Write a single bit using the given bit order.
    #[inline]
    fn write_bool_with(
        &mut self,
        value: bool,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        let byte_order = self.byte_order();
        self.write_bits_with(value as u64, 1, byte_order, bit_order)
    }

    #[inline]
    fn write_bool(&mut self, value: bool) -> Result<usize, BitError<Self::Error>> {
        let bit_order = self.bit_order();
        self.write_bool_with(value, bit_order)
    }

    /// Write an integer in `[min..=max]` as its offset from `min` in as many
    /// bits as needed by `max - min`, using the given orders.
    ///
    /// Fails with [`BitError::InvalidRange`] if the range is empty or `value`
    /// is not in it.
    fn write_ranged_with(
        &mut self,
        value: i64,
        min: i64,
        max: i64,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        if min > max || !(min..=max).contains(&value) {
            return Err(BitError::InvalidRange { min, max });
        }
        let offset = (value as i128 - min as i128) as u64;
        self.write_bits_with(offset, range_width(min, max), byte_order, bit_order)
    }

    #[inline]
    fn write_ranged(
        &mut self,
        value: i64,
        min: i64,
        max: i64,
    ) -> Result<usize, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_ranged_with(value, min, max, byte_order, bit_order)
    }

    /// Write `bytes`, 8 bits each, using the given orders.
    fn write_bytes_with(
        &mut self,
        bytes: &[u8],
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        let mut written = 0;
        for &byte in bytes {
            written += self.write_bits_with(byte as u64, 8, byte_order, bit_order)?;
        }
        Ok(written)
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_bytes_with(bytes, byte_order, bit_order)
    }

    /// Write `bytes` without their trailing zero bytes, followed by a single
    /// zero byte, using the given orders.
    fn write_bytes_nul_terminated_with(
        &mut self,
        bytes: &[u8],
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        let written = self.write_bytes_with(&bytes[..end], byte_order, bit_order)?;
        Ok(written + self.write_bits_with(0, 8, byte_order, bit_order)?)
    }

    #[inline]
    fn write_bytes_nul_terminated(&mut self, bytes: &[u8]) -> Result<usize, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_bytes_nul_terminated_with(bytes, byte_order, bit_order)
    }

    /// Write a zero-terminated string in the given encoding using the given
    /// orders.
    #[cfg(feature = "alloc")]
    fn write_string_with(
        &mut self,
        text: &str,
        encoding: TextEncoding,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<usize, BitError<Self::Error>> {
        self.write_bytes_nul_terminated_with(&encoding.encode(text), byte_order, bit_order)
    }

    #[cfg(feature = "alloc")]
    #[inline]
    fn write_string(
        &mut self,
        text: &str,
        encoding: TextEncoding,
    ) -> Result<usize, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.write_string_with(text, encoding, byte_order, bit_order)
    }

    /// Write the number of `items` as a 32-bit length using the default orders
    /// of the stream, and then each item using `write_item`.
    ///
    /// Fails with [`BitError::InvalidRange`] if there are more than
    /// [`u32::MAX`] items.
    fn write_len_prefixed<T, F>(
        &mut self,
        items: &[T],
        mut write_item: F,
    ) -> Result<usize, BitError<Self::Error>>
    where
        F: FnMut(&mut Self, &T) -> Result<usize, BitError<Self::Error>>,
    {
        let len = u32::try_from(items.len()).map_err(|_| BitError::InvalidRange {
            min: 0,
            max: u32::MAX as i64,
        })?;
        let mut written = self.write_u32(len)?;
        for item in items {
            written += write_item(self, item)?;
        }
        Ok(written)
    }
}

impl<W: BitWrite + ?Sized> TypedWrite for W {}
