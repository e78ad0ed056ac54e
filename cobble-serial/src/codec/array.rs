//! Presence-flagged arrays.
//!
//! ```text
//! present: u8 (0 | 1)
//! if present:
//!     count: VarInt
//!     count × { present: u8, element if present }
//! ```
//!
//! Element bytes come from a caller-supplied closure, which is how nested
//! arrays recurse back through the registry. Dimensionality is never
//! special-cased here.

use std::io::{Read, Write};

use cobble_io::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

use crate::Value;

use super::mismatch;

pub fn write_array<W: Write + ?Sized>(
    write: &mut W,
    value: &Value,
    max_length: usize,
    write_element: impl Fn(&mut W, &Value) -> Result<(), WritingError>,
) -> Result<(), WritingError> {
    let items = match value {
        Value::Null => return write.write_bool(false),
        Value::Array(items) => items,
        value => return Err(mismatch("array", value)),
    };
    if items.len() > max_length {
        return Err(WritingError::TooLarge(format!(
            "array of {} elements exceeds the bound of {max_length}",
            items.len()
        )));
    }

    write.write_bool(true)?;
    write.write_list_bounded(items, max_length, |write, item| {
        let item = (!item.is_null()).then_some(item);
        write.write_option(&item, |write, item| write_element(write, *item))
    })
}

pub fn read_array<R: Read + ?Sized>(
    read: &mut R,
    max_length: usize,
    read_element: impl Fn(&mut R) -> Result<Value, ReadingError>,
) -> Result<Value, ReadingError> {
    if !read.get_bool()? {
        return Ok(Value::Null);
    }

    let items = read.get_list_bounded(max_length, |read| {
        Ok(read.get_option(&read_element)?.unwrap_or(Value::Null))
    })?;
    Ok(Value::Array(items))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use cobble_io::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

    use super::{read_array, write_array};
    use crate::Value;

    fn write_ints(value: &Value) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_array(&mut bytes, value, 16, |write, item| match item {
            Value::Int(int) => write.write_i32_be(*int),
            _ => unreachable!(),
        })
        .unwrap();
        bytes
    }

    fn read_ints(bytes: Vec<u8>) -> Result<Value, ReadingError> {
        read_array(&mut Cursor::new(bytes), 16, |read| {
            Ok(Value::Int(read.get_i32_be()?))
        })
    }

    #[test]
    fn test_absent() {
        let bytes = write_ints(&Value::Null);
        assert_eq!(bytes, [0]);
        assert!(read_ints(bytes).unwrap().is_null());
    }

    #[test]
    fn test_empty_is_not_absent() {
        let bytes = write_ints(&Value::Array(vec![]));
        assert_eq!(bytes, [1, 0]);
        assert_eq!(read_ints(bytes).unwrap().as_array().map(<[_]>::len), Some(0));
    }

    #[test]
    fn test_null_elements() {
        let bytes = write_ints(&Value::Array(vec![Value::Int(7), Value::Null]));
        assert_eq!(bytes, [1, 2, 1, 0, 0, 0, 7, 0]);

        let read = read_ints(bytes).unwrap();
        let items = read.as_array().unwrap();
        assert!(matches!(items, [Value::Int(7), Value::Null]));
    }

    #[test]
    fn test_corrupt_presence() {
        assert!(matches!(
            read_ints(vec![2]),
            Err(ReadingError::CorruptData(_))
        ));
        assert!(matches!(
            read_ints(vec![1, 1, 5]),
            Err(ReadingError::CorruptData(_))
        ));
    }

    #[test]
    fn test_length_limit() {
        let mut bytes = Vec::new();
        let value = Value::Array((0..17).map(Value::Int).collect());
        assert!(matches!(
            write_array(&mut bytes, &value, 16, |_, _| Ok(())),
            Err(WritingError::TooLarge(_))
        ));
        assert!(bytes.is_empty());

        assert!(matches!(
            read_ints(vec![1, 17]),
            Err(ReadingError::TooLarge(_))
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(matches!(
            write_array(&mut Vec::<u8>::new(), &Value::Int(1), 16, |_, _| Ok(())),
            Err(WritingError::ContractViolation(_))
        ));
    }
}
