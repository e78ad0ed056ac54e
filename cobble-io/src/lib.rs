use std::io::{Read, Write};

use codec::{Codec, var_int::VarInt};
use thiserror::Error;

pub mod codec;

/// Longest string accepted when no explicit bound is given.
pub const DEFAULT_STRING_BOUND: usize = i16::MAX as usize;

#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("incomplete: {0}")]
    Incomplete(String),
    #[error("corrupt data: {0}")]
    CorruptData(String),
    #[error("too large: {0}")]
    TooLarge(String),
    #[error("no codec registered for {0}")]
    UnsupportedType(String),
    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Error)]
pub enum WritingError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("too large: {0}")]
    TooLarge(String),
    #[error("no codec registered for {0}")]
    UnsupportedType(String),
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("{0}")]
    Message(String),
}

macro_rules! get_be {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self) -> Result<$ty, ReadingError> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            self.read_exact(&mut buf).map_err(|err| {
                ReadingError::Incomplete(format!("{}: {err}", stringify!($ty)))
            })?;

            Ok(<$ty>::from_be_bytes(buf))
        }
    };
}

macro_rules! write_be {
    ($name:ident, $ty:ty) => {
        fn $name(&mut self, data: $ty) -> Result<(), WritingError> {
            self.write_all(&data.to_be_bytes())
                .map_err(WritingError::IoError)
        }
    };
}

/// Big-endian reads on top of any [`Read`], including `dyn Read`.
pub trait StreamReadExt {
    fn get_i8_be(&mut self) -> Result<i8, ReadingError>;
    fn get_u8_be(&mut self) -> Result<u8, ReadingError>;
    fn get_i16_be(&mut self) -> Result<i16, ReadingError>;
    fn get_u16_be(&mut self) -> Result<u16, ReadingError>;
    fn get_i32_be(&mut self) -> Result<i32, ReadingError>;
    fn get_u32_be(&mut self) -> Result<u32, ReadingError>;
    fn get_i64_be(&mut self) -> Result<i64, ReadingError>;
    fn get_u64_be(&mut self) -> Result<u64, ReadingError>;
    fn get_f32_be(&mut self) -> Result<f32, ReadingError>;
    fn get_f64_be(&mut self) -> Result<f64, ReadingError>;
    fn read_boxed_slice(&mut self, count: usize) -> Result<Box<[u8]>, ReadingError>;

    /// Reads a single byte that must be `0` or `1`.
    fn get_bool(&mut self) -> Result<bool, ReadingError>;
    fn get_var_int(&mut self) -> Result<VarInt, ReadingError>;
    /// Reads a VarInt used as a length and checks it against `bound`.
    fn get_length(&mut self, bound: usize) -> Result<usize, ReadingError>;
    fn get_string_bounded(&mut self, bound: usize) -> Result<String, ReadingError>;
    fn get_string(&mut self) -> Result<String, ReadingError>;

    fn get_option<G>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<G, ReadingError>,
    ) -> Result<Option<G>, ReadingError>;

    fn get_list_bounded<G>(
        &mut self,
        bound: usize,
        parse: impl Fn(&mut Self) -> Result<G, ReadingError>,
    ) -> Result<Vec<G>, ReadingError>;
}

/// Upper bound on what a declared length may pre-allocate before the
/// elements are actually read.
const MAX_PREALLOCATED: usize = 1024;

impl<R: Read + ?Sized> StreamReadExt for R {
    get_be!(get_i8_be, i8);
    get_be!(get_u8_be, u8);
    get_be!(get_i16_be, i16);
    get_be!(get_u16_be, u16);
    get_be!(get_i32_be, i32);
    get_be!(get_u32_be, u32);
    get_be!(get_i64_be, i64);
    get_be!(get_u64_be, u64);
    get_be!(get_f32_be, f32);
    get_be!(get_f64_be, f64);

    fn read_boxed_slice(&mut self, count: usize) -> Result<Box<[u8]>, ReadingError> {
        // Grows with the bytes actually present instead of trusting `count`.
        let mut buf = Vec::with_capacity(count.min(MAX_PREALLOCATED));
        Read::take(&mut *self, count as u64)
            .read_to_end(&mut buf)
            .map_err(|err| ReadingError::Incomplete(format!("{count} bytes: {err}")))?;
        if buf.len() < count {
            return Err(ReadingError::Incomplete(format!(
                "expected {count} bytes, got {}",
                buf.len()
            )));
        }

        Ok(buf.into())
    }

    fn get_bool(&mut self) -> Result<bool, ReadingError> {
        match self.get_u8_be()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(ReadingError::CorruptData(format!(
                "expected a 0/1 flag, got {byte:#04x}"
            ))),
        }
    }

    fn get_var_int(&mut self) -> Result<VarInt, ReadingError> {
        VarInt::decode(self)
    }

    fn get_length(&mut self, bound: usize) -> Result<usize, ReadingError> {
        let length = self.get_var_int()?.0;
        let length = usize::try_from(length)
            .map_err(|_| ReadingError::CorruptData(format!("negative length {length}")))?;
        if length > bound {
            return Err(ReadingError::TooLarge(format!(
                "length {length} exceeds the bound of {bound}"
            )));
        }
        Ok(length)
    }

    fn get_string_bounded(&mut self, bound: usize) -> Result<String, ReadingError> {
        let size = self.get_length(bound)?;
        let data = self.read_boxed_slice(size)?;
        String::from_utf8(data.into()).map_err(|e| ReadingError::CorruptData(e.to_string()))
    }

    fn get_string(&mut self) -> Result<String, ReadingError> {
        self.get_string_bounded(DEFAULT_STRING_BOUND)
    }

    fn get_option<G>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<G, ReadingError>,
    ) -> Result<Option<G>, ReadingError> {
        if self.get_bool()? {
            Ok(Some(parse(self)?))
        } else {
            Ok(None)
        }
    }

    fn get_list_bounded<G>(
        &mut self,
        bound: usize,
        parse: impl Fn(&mut Self) -> Result<G, ReadingError>,
    ) -> Result<Vec<G>, ReadingError> {
        let len = self.get_length(bound)?;
        let mut list = Vec::with_capacity(len.min(MAX_PREALLOCATED));
        for _ in 0..len {
            list.push(parse(self)?);
        }
        Ok(list)
    }
}

/// Big-endian writes on top of any [`Write`], including `dyn Write`.
pub trait StreamWriteExt {
    fn write_i8_be(&mut self, data: i8) -> Result<(), WritingError>;
    fn write_u8_be(&mut self, data: u8) -> Result<(), WritingError>;
    fn write_i16_be(&mut self, data: i16) -> Result<(), WritingError>;
    fn write_u16_be(&mut self, data: u16) -> Result<(), WritingError>;
    fn write_i32_be(&mut self, data: i32) -> Result<(), WritingError>;
    fn write_u32_be(&mut self, data: u32) -> Result<(), WritingError>;
    fn write_i64_be(&mut self, data: i64) -> Result<(), WritingError>;
    fn write_u64_be(&mut self, data: u64) -> Result<(), WritingError>;
    fn write_f32_be(&mut self, data: f32) -> Result<(), WritingError>;
    fn write_f64_be(&mut self, data: f64) -> Result<(), WritingError>;
    fn write_slice(&mut self, data: &[u8]) -> Result<(), WritingError>;

    fn write_bool(&mut self, data: bool) -> Result<(), WritingError>;
    fn write_var_int(&mut self, data: &VarInt) -> Result<(), WritingError>;
    /// Writes `length` as a VarInt after checking it against `bound`.
    fn write_length(&mut self, length: usize, bound: usize) -> Result<(), WritingError>;
    fn write_string_bounded(&mut self, data: &str, bound: usize) -> Result<(), WritingError>;
    fn write_string(&mut self, data: &str) -> Result<(), WritingError>;

    fn write_option<G>(
        &mut self,
        data: &Option<G>,
        write: impl FnOnce(&mut Self, &G) -> Result<(), WritingError>,
    ) -> Result<(), WritingError>;

    fn write_list_bounded<G>(
        &mut self,
        data: &[G],
        bound: usize,
        write: impl Fn(&mut Self, &G) -> Result<(), WritingError>,
    ) -> Result<(), WritingError>;
}

impl<W: Write + ?Sized> StreamWriteExt for W {
    write_be!(write_i8_be, i8);
    write_be!(write_u8_be, u8);
    write_be!(write_i16_be, i16);
    write_be!(write_u16_be, u16);
    write_be!(write_i32_be, i32);
    write_be!(write_u32_be, u32);
    write_be!(write_i64_be, i64);
    write_be!(write_u64_be, u64);
    write_be!(write_f32_be, f32);
    write_be!(write_f64_be, f64);

    fn write_slice(&mut self, data: &[u8]) -> Result<(), WritingError> {
        self.write_all(data).map_err(WritingError::IoError)
    }

    fn write_bool(&mut self, data: bool) -> Result<(), WritingError> {
        self.write_u8_be(u8::from(data))
    }

    fn write_var_int(&mut self, data: &VarInt) -> Result<(), WritingError> {
        data.encode(self)
    }

    fn write_length(&mut self, length: usize, bound: usize) -> Result<(), WritingError> {
        if length > bound {
            return Err(WritingError::TooLarge(format!(
                "length {length} exceeds the bound of {bound}"
            )));
        }
        let length = VarInt::try_from(length).map_err(|_| {
            WritingError::TooLarge(format!("{length} isn't representable as a VarInt"))
        })?;
        self.write_var_int(&length)
    }

    fn write_string_bounded(&mut self, data: &str, bound: usize) -> Result<(), WritingError> {
        self.write_length(data.len(), bound)?;
        self.write_slice(data.as_bytes())
    }

    fn write_string(&mut self, data: &str) -> Result<(), WritingError> {
        self.write_string_bounded(data, DEFAULT_STRING_BOUND)
    }

    fn write_option<G>(
        &mut self,
        data: &Option<G>,
        writer: impl FnOnce(&mut Self, &G) -> Result<(), WritingError>,
    ) -> Result<(), WritingError> {
        if let Some(data) = data {
            self.write_bool(true)?;
            writer(self, data)
        } else {
            self.write_bool(false)
        }
    }

    fn write_list_bounded<G>(
        &mut self,
        list: &[G],
        bound: usize,
        writer: impl Fn(&mut Self, &G) -> Result<(), WritingError>,
    ) -> Result<(), WritingError> {
        self.write_length(list.len(), bound)?;
        for data in list {
            writer(self, data)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::io::{Cursor, Read};

    use crate::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

    #[test]
    fn test_fixed_width_layout() {
        let mut bytes = Vec::new();
        bytes.write_i16_be(-2).unwrap();
        bytes.write_i32_be(0x0102_0304).unwrap();
        bytes.write_f32_be(1.0).unwrap();
        bytes.write_bool(true).unwrap();

        assert_eq!(
            bytes,
            [0xFF, 0xFE, 0x01, 0x02, 0x03, 0x04, 0x3F, 0x80, 0x00, 0x00, 0x01]
        );

        let mut cursor = Cursor::new(bytes);
        assert_eq!(cursor.get_i16_be().unwrap(), -2);
        assert_eq!(cursor.get_i32_be().unwrap(), 0x0102_0304);
        assert_eq!(cursor.get_f32_be().unwrap(), 1.0);
        assert!(cursor.get_bool().unwrap());
    }

    #[test]
    fn test_dyn_stream() {
        let mut bytes = Vec::new();
        {
            let write: &mut dyn std::io::Write = &mut bytes;
            write.write_i64_be(i64::MIN).unwrap();
            write.write_string("dyn").unwrap();
        }

        let mut cursor = Cursor::new(bytes);
        let read: &mut dyn Read = &mut cursor;
        assert_eq!(read.get_i64_be().unwrap(), i64::MIN);
        assert_eq!(read.get_string().unwrap(), "dyn");
    }

    #[test]
    fn test_string_layout() {
        let mut bytes = Vec::new();
        bytes.write_string("hello").unwrap();
        assert_eq!(bytes, [5, b'h', b'e', b'l', b'l', b'o']);
    }

    #[test]
    fn test_eof_is_incomplete() {
        let mut cursor = Cursor::new([0u8, 1, 2]);
        assert!(matches!(
            cursor.get_i32_be(),
            Err(ReadingError::Incomplete(_))
        ));
    }

    #[test]
    fn test_bad_bool_is_corrupt() {
        let mut cursor = Cursor::new([2u8]);
        assert!(matches!(cursor.get_bool(), Err(ReadingError::CorruptData(_))));
    }

    #[test]
    fn test_string_bounds() {
        let mut bytes = Vec::new();
        assert!(matches!(
            bytes.write_string_bounded("abcd", 3),
            Err(WritingError::TooLarge(_))
        ));
        assert!(bytes.is_empty());

        bytes.write_string("abcd").unwrap();
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            cursor.get_string_bounded(3),
            Err(ReadingError::TooLarge(_))
        ));
    }

    #[test]
    fn test_negative_length_is_corrupt() {
        // VarInt -1
        let mut cursor = Cursor::new([0xFFu8, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert!(matches!(
            cursor.get_length(usize::MAX),
            Err(ReadingError::CorruptData(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let mut cursor = Cursor::new([2u8, 0xC3, 0x28]);
        assert!(matches!(
            cursor.get_string(),
            Err(ReadingError::CorruptData(_))
        ));
    }

    #[test]
    fn test_option_list() {
        let list = [Some(3i16), None, Some(-7)];
        let mut bytes = Vec::new();
        bytes
            .write_list_bounded(&list, 8, |w, item| {
                w.write_option(item, |w, v| w.write_i16_be(*v))
            })
            .unwrap();
        assert_eq!(bytes, [3, 1, 0x00, 0x03, 0, 1, 0xFF, 0xF9]);

        let mut cursor = Cursor::new(bytes);
        let read = cursor
            .get_list_bounded(8, |r| r.get_option(|r| r.get_i16_be()))
            .unwrap();
        assert_eq!(read, list);
    }

    #[test]
    fn test_huge_declared_string_is_incomplete() {
        // Declares i32::MAX bytes but carries three.
        let mut cursor = Cursor::new([0xFFu8, 0xFF, 0xFF, 0xFF, 0x07, b'a', b'b', b'c']);
        assert!(matches!(
            cursor.get_string_bounded(i32::MAX as usize),
            Err(ReadingError::Incomplete(_))
        ));

        let mut cursor = Cursor::new([0u8; 4]);
        assert!(matches!(
            cursor.read_boxed_slice(5),
            Err(ReadingError::Incomplete(_))
        ));
        let mut cursor = Cursor::new([7u8; 4]);
        assert_eq!(&*cursor.read_boxed_slice(4).unwrap(), [7, 7, 7, 7]);
    }

    #[test]
    fn test_huge_declared_list_does_not_preallocate() {
        // Declares i32::MAX elements but carries none.
        let mut cursor = Cursor::new([0xFFu8, 0xFF, 0xFF, 0xFF, 0x07]);
        let read = cursor.get_list_bounded(usize::MAX, |r| r.get_u8_be());
        assert!(matches!(read, Err(ReadingError::Incomplete(_))));
    }
}
