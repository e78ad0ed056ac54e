use std::io::{Read, Write};

use cobble_io::{ReadingError, StreamReadExt, StreamWriteExt, WritingError};

use crate::{PrimitiveKind, TypeDescriptor, Value};

use super::{mismatch, null_without_presence};

pub fn write_primitive<W: Write + ?Sized>(
    write: &mut W,
    kind: PrimitiveKind,
    value: &Value,
    max_string_length: usize,
) -> Result<(), WritingError> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(data)) => write.write_bool(*data),
        (PrimitiveKind::Byte, Value::Byte(data)) => write.write_i8_be(*data),
        (PrimitiveKind::Short, Value::Short(data)) => write.write_i16_be(*data),
        (PrimitiveKind::Int, Value::Int(data)) => write.write_i32_be(*data),
        (PrimitiveKind::Long, Value::Long(data)) => write.write_i64_be(*data),
        (PrimitiveKind::Float, Value::Float(data)) => write.write_f32_be(*data),
        (PrimitiveKind::Double, Value::Double(data)) => write.write_f64_be(*data),
        (PrimitiveKind::String, Value::String(data)) => {
            write.write_string_bounded(data, max_string_length)
        }
        (kind, Value::Null) => Err(null_without_presence(&TypeDescriptor::Primitive(kind))),
        (kind, value) => Err(mismatch(kind, value)),
    }
}

pub fn read_primitive<R: Read + ?Sized>(
    read: &mut R,
    kind: PrimitiveKind,
    max_string_length: usize,
) -> Result<Value, ReadingError> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool(read.get_bool()?),
        PrimitiveKind::Byte => Value::Byte(read.get_i8_be()?),
        PrimitiveKind::Short => Value::Short(read.get_i16_be()?),
        PrimitiveKind::Int => Value::Int(read.get_i32_be()?),
        PrimitiveKind::Long => Value::Long(read.get_i64_be()?),
        PrimitiveKind::Float => Value::Float(read.get_f32_be()?),
        PrimitiveKind::Double => Value::Double(read.get_f64_be()?),
        PrimitiveKind::String => Value::String(read.get_string_bounded(max_string_length)?),
    })
}
