/*
 * SPDX-FileCopyrightText: 2023 Inria
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#[cfg(feature = "alloc")]
use super::TextEncoding;
use crate::traits::*;
#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};
use num_traits::{AsPrimitive, PrimInt};

/// Sign-extend the lowest `n_bits` bits of `value` if `T` is signed.
#[inline(always)]
fn extend<T: PrimInt>(value: u64, n_bits: usize) -> u64 {
    if T::min_value() < T::zero() && n_bits > 0 && n_bits < 64 {
        let shift = 64 - n_bits;
        (((value << shift) as i64) >> shift) as u64
    } else {
        value
    }
}

/// The number of bits needed to store the values of `[min..=max]`.
#[inline(always)]
pub(crate) fn range_width(min: i64, max: i64) -> usize {
    let span = (max as i128 - min as i128) as u64;
    (u64::BITS - span.leading_zeros()) as usize
}

macro_rules! read_fixed {
    ($($name:ident, $name_with:ident => $ty:ty;)*) => {$(
        #[doc = concat!("Read a `", stringify!($ty), "` using the default orders of the stream.")]
        #[inline]
        fn $name(&mut self) -> Result<$ty, BitError<Self::Error>> {
            self.read_int::<$ty>(<$ty>::BITS as usize)
        }

        #[doc = concat!("Read a `", stringify!($ty), "` using the given orders.")]
        #[inline]
        fn $name_with(
            &mut self,
            byte_order: ByteOrder,
            bit_order: BitOrder,
        ) -> Result<$ty, BitError<Self::Error>> {
            self.read_int_with::<$ty>(<$ty>::BITS as usize, byte_order, bit_order)
        }
    )*};
}

/// Typed reads on top of a [`BitRead`].
///
/// Every method is a sequence of fixed-width calls to
/// [`read_bits_with`](BitRead::read_bits_with) followed by a reinterpretation
/// of the bits, so the clamping policy of the underlying stream applies: at
/// the end of the data values are built from the available bits and
/// [`truncated`](BitRead::truncated) reports it.
///
/// This trait is implemented for every [`BitRead`].
///
/// # Example
/// ```
/// use bitfield_stream::prelude::*;
///
/// let data = [0xFC, 0x11, 0xC5, 0x56, 0xF0];
/// let mut reader = BitReader::new(MemByteReader::new(&data));
///
/// let year: u16 = reader.read_int(11).unwrap();
/// let month: u8 = reader.read_int(4).unwrap();
/// assert_eq!((year, month), (2016, 8));
/// // signed types are sign-extended
/// assert_eq!(reader.read_int::<i8>(5).unwrap(), -4);
/// ```
pub trait TypedRead: BitRead {
    /// Read an integer of type `T` stored in `n_bits` bits using the given
    /// orders.
    ///
    /// `n_bits` must not exceed the width of `T`, or the read fails with
    /// [`BitError::InvalidWidth`] without moving. If `T` is signed, the value
    /// is sign-extended from bit `n_bits - 1`.
    #[inline]
    fn read_int_with<T>(
        &mut self,
        n_bits: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<T, BitError<Self::Error>>
    where
        T: PrimInt + 'static,
        u64: AsPrimitive<T>,
    {
        let max = core::mem::size_of::<T>() * 8;
        if n_bits > max {
            return Err(BitError::InvalidWidth {
                width: n_bits,
                max,
            });
        }
        let value = self.read_bits_with(n_bits, byte_order, bit_order)?;
        Ok(extend::<T>(value, n_bits).as_())
    }

    /// Read an integer of type `T` stored in `n_bits` bits using the default
    /// orders of the stream.
    #[inline]
    fn read_int<T>(&mut self, n_bits: usize) -> Result<T, BitError<Self::Error>>
    where
        T: PrimInt + 'static,
        u64: AsPrimitive<T>,
    {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_int_with(n_bits, byte_order, bit_order)
    }

    read_fixed! {
        read_u8, read_u8_with => u8;
        read_u16, read_u16_with => u16;
        read_u32, read_u32_with => u32;
        read_u64, read_u64_with => u64;
        read_i8, read_i8_with => i8;
        read_i16, read_i16_with => i16;
        read_i32, read_i32_with => i32;
        read_i64, read_i64_with => i64;
    }

    /// Read a 32-bit IEEE 754 float using the given orders.
    #[inline]
    fn read_f32_with(
        &mut self,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<f32, BitError<Self::Error>> {
        self.read_u32_with(byte_order, bit_order).map(f32::from_bits)
    }

    #[inline]
    fn read_f32(&mut self) -> Result<f32, BitError<Self::Error>> {
        self.read_u32().map(f32::from_bits)
    }

    /// Read a 64-bit IEEE 754 float using the given orders.
    #[inline]
    fn read_f64_with(
        &mut self,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<f64, BitError<Self::Error>> {
        self.read_u64_with(byte_order, bit_order).map(f64::from_bits)
    }

    #[inline]
    fn read_f64(&mut self) -> Result<f64, BitError<Self::Error>> {
        self.read_u64().map(f64::from_bits)
    }

    /// Read a single bit using the given bit order.
    #[inline]
    fn read_bool_with(&mut self, bit_order: BitOrder) -> Result<bool, BitError<Self::Error>> {
        let byte_order = self.byte_order();
        Ok(self.read_bits_with(1, byte_order, bit_order)? != 0)
    }

    #[inline]
    fn read_bool(&mut self) -> Result<bool, BitError<Self::Error>> {
        let bit_order = self.bit_order();
        self.read_bool_with(bit_order)
    }

    /// Read an integer in `[min..=max]` stored as its offset from `min` in
    /// as many bits as needed by `max - min`, using the given orders.
    ///
    /// Values larger than `max` are clamped to `max`.
    fn read_ranged_with(
        &mut self,
        min: i64,
        max: i64,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<i64, BitError<Self::Error>> {
        if min > max {
            return Err(BitError::InvalidRange { min, max });
        }
        let offset = self.read_bits_with(range_width(min, max), byte_order, bit_order)?;
        Ok((min as i128 + offset as i128).min(max as i128) as i64)
    }

    #[inline]
    fn read_ranged(&mut self, min: i64, max: i64) -> Result<i64, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_ranged_with(min, max, byte_order, bit_order)
    }

    /// Read `len` bytes, 8 bits each, using the given orders.
    #[cfg(feature = "alloc")]
    fn read_bytes_with(
        &mut self,
        len: usize,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<Vec<u8>, BitError<Self::Error>> {
        let mut bytes = Vec::with_capacity(len.min(self.remaining_bits().div_ceil(8) as usize));
        for _ in 0..len {
            bytes.push(self.read_bits_with(8, byte_order, bit_order)? as u8);
        }
        Ok(bytes)
    }

    #[cfg(feature = "alloc")]
    #[inline]
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_bytes_with(len, byte_order, bit_order)
    }

    /// Read bytes, 8 bits each, up to a zero byte, using the given orders.
    ///
    /// The terminator is consumed but not returned. If the data ends before a
    /// terminator is found, the bytes read so far are returned and
    /// [`truncated`](BitRead::truncated) is true.
    #[cfg(feature = "alloc")]
    fn read_bytes_until_nul_with(
        &mut self,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<Vec<u8>, BitError<Self::Error>> {
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_bits_with(8, byte_order, bit_order)? as u8;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            if self.truncated() {
                break;
            }
        }
        Ok(bytes)
    }

    #[cfg(feature = "alloc")]
    #[inline]
    fn read_bytes_until_nul(&mut self) -> Result<Vec<u8>, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_bytes_until_nul_with(byte_order, bit_order)
    }

    /// Read a zero-terminated string in the given encoding using the given
    /// orders.
    #[cfg(feature = "alloc")]
    fn read_string_with(
        &mut self,
        encoding: TextEncoding,
        byte_order: ByteOrder,
        bit_order: BitOrder,
    ) -> Result<String, BitError<Self::Error>> {
        let bytes = self.read_bytes_until_nul_with(byte_order, bit_order)?;
        Ok(encoding.decode(&bytes))
    }

    #[cfg(feature = "alloc")]
    #[inline]
    fn read_string(&mut self, encoding: TextEncoding) -> Result<String, BitError<Self::Error>> {
        let (byte_order, bit_order) = (self.byte_order(), self.bit_order());
        self.read_string_with(encoding, byte_order, bit_order)
    }

    /// Read a 32-bit length using the default orders of the stream, and then
    /// as many elements using `read_item`.
    ///
    /// Reading stops early if an element is truncated at the end of the data.
    /// If the length itself is truncated no element is read, and the result
    /// is empty.
    #[cfg(feature = "alloc")]
    fn read_len_prefixed<T, F>(&mut self, mut read_item: F) -> Result<Vec<T>, BitError<Self::Error>>
    where
        F: FnMut(&mut Self) -> Result<T, BitError<Self::Error>>,
    {
        let len = self.read_u32()?;
        let mut items = Vec::new();
        if self.truncated() {
            return Ok(items);
        }
        for _ in 0..len {
            items.push(read_item(self)?);
            if self.truncated() {
                break;
            }
        }
        Ok(items)
    }
}

impl<R: BitRead + ?Sized> TypedRead for R {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_range_width() {
        assert_eq!(range_width(0, 0), 0);
        assert_eq!(range_width(0, 1), 1);
        assert_eq!(range_width(1900, 2155), 8);
        assert_eq!(range_width(-8, 7), 4);
        assert_eq!(range_width(i64::MIN, i64::MAX), 64);
    }

    #[test]
    fn test_extend() {
        assert_eq!(extend::<i8>(0b11100, 5) as i64, -4);
        assert_eq!(extend::<i8>(0b01100, 5), 12);
        assert_eq!(extend::<u8>(0b11100, 5), 0b11100);
        assert_eq!(extend::<i64>(u64::MAX, 64), u64::MAX);
    }

    #[test]
    fn test_widths() {
        let data = [0xAB, 0xCD];
        let mut reader = BitReader::new(MemByteReader::new(&data));
        assert_eq!(
            reader.read_int::<u8>(9),
            Err(BitError::InvalidWidth { width: 9, max: 8 })
        );
        assert_eq!(reader.bit_pos(), 0);
        assert_eq!(reader.read_int::<u8>(0).unwrap(), 0);
        assert_eq!(reader.read_u16_with(LE, MSB).unwrap(), 0xCDAB);
    }

    #[test]
    fn test_nul_terminated_at_end() -> anyhow::Result<()> {
        let data = *b"ab\0cd";
        let mut reader = BitReader::new(MemByteReader::new(&data));
        assert_eq!(reader.read_bytes_until_nul()?, b"ab");
        assert!(!reader.truncated());
        assert_eq!(reader.read_bytes_until_nul()?, b"cd");
        assert!(reader.truncated());
        assert!(reader.has_ended());
        assert_eq!(reader.read_bytes_until_nul()?, b"");
        Ok(())
    }

    #[test]
    fn test_ranged_clamps() -> anyhow::Result<()> {
        // 3 bits for [10..=15], stored offset 7
        let data = [0b1110_0000];
        let mut reader = BitReader::new(MemByteReader::new(&data));
        assert_eq!(reader.read_ranged(10, 15)?, 15);
        assert_eq!(reader.bit_pos(), 3);
        assert_eq!(reader.read_ranged(5, 5)?, 5);
        assert_eq!(reader.bit_pos(), 3);
        assert_eq!(
            reader.read_ranged(1, 0),
            Err(BitError::InvalidRange { min: 1, max: 0 })
        );
        Ok(())
    }
}
