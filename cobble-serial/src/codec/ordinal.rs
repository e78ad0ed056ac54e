use std::io::{Read, Write};

use cobble_io::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

use crate::{EnumDescriptor, TypeDescriptor, Value, descriptor::OrdinalWidth};

use super::{mismatch, null_without_presence};

pub fn write_ordinal<W: Write + ?Sized>(
    write: &mut W,
    descriptor: &EnumDescriptor,
    value: &Value,
) -> Result<(), WritingError> {
    let ordinal = match value {
        Value::Enum(ordinal) => *ordinal,
        Value::Null => return Err(null_without_presence(&TypeDescriptor::Enum(*descriptor))),
        value => return Err(mismatch(TypeDescriptor::Enum(*descriptor), value)),
    };
    if ordinal as usize >= descriptor.len() {
        return Err(WritingError::ContractViolation(format!(
            "ordinal {ordinal} is out of range for enum {} with {} variants",
            descriptor.name,
            descriptor.len()
        )));
    }

    match descriptor.ordinal_width() {
        OrdinalWidth::U8 => write.write_u8_be(ordinal as u8),
        OrdinalWidth::U16 => write.write_u16_be(ordinal as u16),
        OrdinalWidth::U32 => write.write_u32_be(ordinal),
    }
}

pub fn read_ordinal<R: Read + ?Sized>(
    read: &mut R,
    descriptor: &EnumDescriptor,
) -> Result<Value, ReadingError> {
    let ordinal = match descriptor.ordinal_width() {
        OrdinalWidth::U8 => u32::from(read.get_u8_be()?),
        OrdinalWidth::U16 => u32::from(read.get_u16_be()?),
        OrdinalWidth::U32 => read.get_u32_be()?,
    };
    if ordinal as usize >= descriptor.len() {
        return Err(ReadingError::CorruptData(format!(
            "ordinal {ordinal} is out of range for enum {} with {} variants",
            descriptor.name,
            descriptor.len()
        )));
    }
    Ok(Value::Enum(ordinal))
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use cobble_io::{ReadingError, WritingError};

    use super::{read_ordinal, write_ordinal};
    use crate::{EnumDescriptor, Value};

    const FACING: EnumDescriptor =
        EnumDescriptor::new("Facing", &["Down", "Up", "North", "South", "West", "East"]);

    const WIDE_VARIANTS: [&str; 1000] = ["Wide"; 1000];
    const WIDE: EnumDescriptor = EnumDescriptor::new("Wide", &WIDE_VARIANTS);

    #[test]
    fn test_single_byte() {
        let mut bytes = Vec::new();
        write_ordinal(&mut bytes, &FACING, &Value::Enum(5)).unwrap();
        assert_eq!(bytes, [5]);

        let read = read_ordinal(&mut Cursor::new(bytes), &FACING).unwrap();
        assert!(matches!(read, Value::Enum(5)));
    }

    #[test]
    fn test_two_bytes() {
        let mut bytes = Vec::new();
        write_ordinal(&mut bytes, &WIDE, &Value::Enum(999)).unwrap();
        assert_eq!(bytes, [0x03, 0xE7]);

        let read = read_ordinal(&mut Cursor::new(bytes), &WIDE).unwrap();
        assert!(matches!(read, Value::Enum(999)));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            read_ordinal(&mut Cursor::new([6u8]), &FACING),
            Err(ReadingError::CorruptData(_))
        ));
        assert!(matches!(
            write_ordinal(&mut Vec::<u8>::new(), &FACING, &Value::Enum(6)),
            Err(WritingError::ContractViolation(_))
        ));
    }

    #[test]
    fn test_null_enum() {
        assert!(matches!(
            write_ordinal(&mut Vec::<u8>::new(), &FACING, &Value::Null),
            Err(WritingError::ContractViolation(_))
        ));
    }
}
