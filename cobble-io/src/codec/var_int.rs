use std::{
    io::{Read, Write},
    num::NonZeroUsize,
};

use crate::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

use super::Codec;

pub type VarIntType = i32;

/**
 * A variable-length integer type, used for string lengths and element counts.
 * Unsigned LEB128 over the two's-complement bits, so `-1` takes the full five bytes.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarInt(pub VarIntType);

impl Codec<Self> for VarInt {
    /// The maximum number of bytes a `VarInt` can occupy.
    const MAX_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
        Some(size) => size,
        None => unreachable!(),
    };

    fn encode<W: Write + ?Sized>(&self, write: &mut W) -> Result<(), WritingError> {
        let mut val = self.0 as u32;
        loop {
            let byte = (val & 0x7F) as u8;
            val >>= 7;
            if val == 0 {
                return write.write_u8_be(byte);
            }
            write.write_u8_be(byte | 0x80)?;
        }
    }

    fn decode<R: Read + ?Sized>(read: &mut R) -> Result<Self, ReadingError> {
        let mut val = 0u32;
        for i in 0..Self::MAX_SIZE.get() {
            let byte = read.get_u8_be()?;
            val |= u32::from(byte & 0x7F) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(VarInt(val as i32));
            }
        }
        Err(ReadingError::TooLarge("VarInt".to_string()))
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        VarInt(value)
    }
}

impl TryFrom<usize> for VarInt {
    type Error = <i32 as TryFrom<usize>>::Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        i32::try_from(value).map(VarInt)
    }
}
